use crate::error::Result;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_VIDEO_MIME: &str = "video/mp4";

#[derive(Clone)]
pub struct VideoArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
}

impl VideoArtifact {
    pub fn new(bytes: Vec<u8>, mime_type: Option<String>) -> Self {
        Self::created_at(bytes, mime_type, Utc::now())
    }

    pub fn created_at(bytes: Vec<u8>, mime_type: Option<String>, at: DateTime<Utc>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.unwrap_or_else(|| DEFAULT_VIDEO_MIME.to_string()),
            file_name: format!("video_{}.mp4", at.timestamp()),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Writes the video into `dir` under its timestamped name.
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;

        log::info!("Saved {} bytes to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}

impl fmt::Debug for VideoArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoArtifact")
            .field("bytes", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_file_name_uses_unix_timestamp() {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let artifact = VideoArtifact::created_at(vec![0, 1], None, at);

        assert_eq!(artifact.file_name, "video_1700000000.mp4");
        assert_eq!(artifact.mime_type, DEFAULT_VIDEO_MIME);
        assert_eq!(artifact.len(), 2);
    }

    #[tokio::test]
    async fn test_save_to_directory() {
        let dir = std::env::temp_dir().join(format!("veogen-test-{}", uuid::Uuid::new_v4()));
        let artifact = VideoArtifact::new(b"fake mp4".to_vec(), Some("video/mp4".into()));

        let path = artifact.save_to(&dir).await.unwrap();
        assert!(path.starts_with(&dir));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"fake mp4");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
