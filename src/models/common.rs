use crate::media::VideoArtifact;
use crate::models::ModelId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSubstitution {
    pub requested: ModelId,
    pub used: ModelId,
}

impl ModelSubstitution {
    pub fn notice(&self) -> String {
        format!(
            "Switched from {} to {} (interpolation requires Veo 3.1)",
            self.requested, self.used
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum ProgressEvent {
    Submitting,
    Waiting { elapsed_secs: u64 },
    Downloading,
}

impl ProgressEvent {
    pub fn message(&self) -> String {
        match self {
            ProgressEvent::Submitting => "Sending request to the API...".to_string(),
            ProgressEvent::Waiting { elapsed_secs } => {
                format!("Generating video... ({elapsed_secs} seconds)")
            }
            ProgressEvent::Downloading => "Downloading video...".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub video: VideoArtifact,
    pub message: String,
    pub elapsed_secs: u64,
    pub model: ModelId,
    pub substitution: Option<ModelSubstitution>,
}

/// What a front-end renders: the video and a success line, or a reason.
#[derive(Debug, Clone)]
pub enum GenerationReport {
    Success(GenerationOutcome),
    Failure { reason: String },
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationReport::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            GenerationReport::Success(outcome) => &outcome.message,
            GenerationReport::Failure { reason } => reason,
        }
    }

    pub fn into_parts(self) -> (Option<Vec<u8>>, String) {
        match self {
            GenerationReport::Success(outcome) => (Some(outcome.video.bytes), outcome.message),
            GenerationReport::Failure { reason } => (None, reason),
        }
    }
}
