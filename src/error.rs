use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VeoError {
    #[error("Missing API key")]
    MissingCredential,
    #[error("Missing prompt")]
    MissingPrompt,
    #[error("Missing image: {0}")]
    MissingImage(String),
    #[error("Image error: {0}")]
    Image(String),
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    #[error("Response error: {0}")]
    Response(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation failed ({code}): {message}")]
    OperationFailed { code: i32, message: String },
    #[error("No response received from the API")]
    NoResponse,
    #[error("Video was blocked: {0}")]
    ContentFiltered(String),
    #[error("No video was generated")]
    NoVideo,
    #[error("Operation still running after {polls} status checks")]
    Timeout { polls: u32 },
}

impl VeoError {
    /// True for errors raised before anything is sent to the service.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            VeoError::MissingCredential
                | VeoError::MissingPrompt
                | VeoError::MissingImage(_)
                | VeoError::Image(_)
                | VeoError::Config(_)
        )
    }
}

pub fn from_reqwest_error(details: impl AsRef<str>, err: reqwest::Error) -> VeoError {
    VeoError::Transport(format!("{}: {err}", details.as_ref()))
}

/// Maps an unsuccessful HTTP status and its body to an error.
pub fn error_from_status(status: StatusCode, message: impl Into<String>) -> VeoError {
    let message = message.into();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => VeoError::Auth(message),
        StatusCode::BAD_REQUEST => VeoError::InvalidRequest(message),
        StatusCode::TOO_MANY_REQUESTS => VeoError::QuotaExceeded(message),
        _ => VeoError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

pub type Result<T> = std::result::Result<T, VeoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            error_from_status(StatusCode::FORBIDDEN, "denied"),
            VeoError::Auth(_)
        ));
        assert!(matches!(
            error_from_status(StatusCode::BAD_REQUEST, "bad"),
            VeoError::InvalidRequest(_)
        ));
        assert!(matches!(
            error_from_status(StatusCode::TOO_MANY_REQUESTS, "slow down"),
            VeoError::QuotaExceeded(_)
        ));

        let err = error_from_status(StatusCode::BAD_GATEWAY, "upstream");
        assert_eq!(err.to_string(), "API error (HTTP 502): upstream");
    }

    #[test]
    fn test_validation_classification() {
        assert!(VeoError::MissingPrompt.is_validation());
        assert!(VeoError::MissingImage("start".into()).is_validation());
        assert!(!VeoError::NoVideo.is_validation());
        assert!(!VeoError::Transport("reset".into()).is_validation());
    }

    #[test]
    fn test_filtered_message_carries_reason() {
        let err = VeoError::ContentFiltered("unsafe content".into());
        assert_eq!(err.to_string(), "Video was blocked: unsafe content");
    }
}
