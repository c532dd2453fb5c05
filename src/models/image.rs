use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Wide,
    #[serde(rename = "9:16")]
    Tall,
}

impl AspectRatio {
    pub fn ratio(&self) -> f64 {
        match self {
            AspectRatio::Wide => 16.0 / 9.0,
            AspectRatio::Tall => 9.0 / 16.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Wide => "16:9",
            AspectRatio::Tall => "9:16",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "16:9" | "wide" | "landscape" => Ok(AspectRatio::Wide),
            "9:16" | "tall" | "portrait" => Ok(AspectRatio::Tall),
            other => Err(format!("unknown aspect ratio: {other}")),
        }
    }
}

/// How an image is brought to the target ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMethod {
    #[default]
    Crop,
    Pad,
}

impl FromStr for FitMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crop" => Ok(FitMethod::Crop),
            "pad" | "padding" => Ok(FitMethod::Pad),
            other => Err(format!("unknown fit method: {other}")),
        }
    }
}

/// Which horizontal band survives a vertical crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropAnchor {
    Top,
    #[default]
    Center,
    Bottom,
}

impl FromStr for CropAnchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(CropAnchor::Top),
            "center" | "centre" => Ok(CropAnchor::Center),
            "bottom" => Ok(CropAnchor::Bottom),
            other => Err(format!("unknown crop anchor: {other}")),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
}

impl NormalizedImage {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

// Keeps multi-megabyte buffers out of debug logs.
impl fmt::Debug for NormalizedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedImage")
            .field("bytes", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("mime_type", &self.mime_type)
            .finish()
    }
}
