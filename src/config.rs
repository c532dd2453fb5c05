use crate::error::{Result, VeoError};
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct VeoConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub poll_interval: Duration,
    pub max_polls: Option<u32>,
    pub request_timeout: Duration,
}

impl Default for VeoConfig {
    fn default() -> Self {
        VeoConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl VeoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_key = env::var("GOOGLE_API_KEY").ok();
        let base_url = env::var("VEO_BASE_URL").unwrap_or(defaults.base_url);
        let poll_interval = env::var("VEO_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.poll_interval);
        let max_polls = env::var("VEO_MAX_POLLS").ok().and_then(|s| s.parse().ok());
        let request_timeout = env::var("VEO_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        VeoConfig {
            api_key,
            base_url,
            poll_interval,
            max_polls,
            request_timeout,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = Some(max_polls);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// The credential is opaque; only its presence is checked.
    pub fn credential(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(VeoError::MissingCredential),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.credential()?;

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(VeoError::Config(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }

        if self.max_polls == Some(0) {
            return Err(VeoError::Config("max_polls must be at least 1".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VeoConfig::new();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert!(config.max_polls.is_none());
    }

    #[test]
    fn test_missing_credential() {
        let config = VeoConfig::new();
        assert!(matches!(config.validate(), Err(VeoError::MissingCredential)));

        let blank = VeoConfig::new().with_api_key("   ");
        assert!(matches!(blank.credential(), Err(VeoError::MissingCredential)));
    }

    #[test]
    fn test_builder_and_validation() {
        let config = VeoConfig::new()
            .with_api_key("key-123")
            .with_base_url("http://localhost:8080/v1beta")
            .with_poll_interval(Duration::from_millis(5))
            .with_max_polls(3);

        assert!(config.validate().is_ok());
        assert_eq!(config.credential().unwrap(), "key-123");

        let bad_url = config.clone().with_base_url("ftp://example.com");
        assert!(matches!(bad_url.validate(), Err(VeoError::Config(_))));

        let zero_polls = config.with_max_polls(0);
        assert!(matches!(zero_polls.validate(), Err(VeoError::Config(_))));
    }
}
