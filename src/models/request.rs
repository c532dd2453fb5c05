use crate::models::{AspectRatio, CropAnchor, FitMethod, NormalizedImage};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const LEGACY_MODEL: &str = "veo-2.0-generate-001";
pub const INTERPOLATION_MODEL: &str = "veo-3.1-generate-preview";
const INTERPOLATION_MARKER: &str = "3.1";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn supports_interpolation(&self) -> bool {
        self.0.contains(INTERPOLATION_MARKER)
    }

    pub fn supports_resolution(&self) -> bool {
        self.0 != LEGACY_MODEL
    }

    /// (id, display name, note)
    pub fn supported_models() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("veo-3.0-generate-001", "Veo 3", "default"),
            ("veo-3.1-generate-preview", "Veo 3.1", "supports interpolation"),
            ("veo-3.0-fast-generate-001", "Veo 3 Fast", "faster, lower cost"),
            (
                "veo-3.1-fast-generate-preview",
                "Veo 3.1 Fast",
                "supports interpolation",
            ),
            ("veo-2.0-generate-001", "Veo 2", "no resolution control"),
        ]
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self::new("veo-3.0-generate-001")
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    #[default]
    TextToVideo,
    ImageToVideo,
    Interpolation,
}

impl FromStr for ModeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "text_to_video" | "text" => Ok(ModeKind::TextToVideo),
            "image_to_video" | "image" => Ok(ModeKind::ImageToVideo),
            "interpolation" | "first_last_frame" => Ok(ModeKind::Interpolation),
            other => Err(format!("unknown generation mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DurationSeconds {
    Four,
    Six,
    #[default]
    Eight,
}

impl DurationSeconds {
    pub fn as_secs(&self) -> u8 {
        match self {
            DurationSeconds::Four => 4,
            DurationSeconds::Six => 6,
            DurationSeconds::Eight => 8,
        }
    }
}

impl TryFrom<u8> for DurationSeconds {
    type Error = String;

    fn try_from(secs: u8) -> Result<Self, Self::Error> {
        match secs {
            4 => Ok(DurationSeconds::Four),
            6 => Ok(DurationSeconds::Six),
            8 => Ok(DurationSeconds::Eight),
            other => Err(format!("unsupported duration: {other}s (allowed: 4, 6, 8)")),
        }
    }
}

impl FromStr for DurationSeconds {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let secs: u8 = s
            .trim()
            .trim_end_matches('s')
            .parse()
            .map_err(|_| format!("invalid duration: {s}"))?;
        Self::try_from(secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "720p" | "720" => Ok(Resolution::P720),
            "1080p" | "1080" => Ok(Resolution::P1080),
            other => Err(format!("unknown resolution: {other}")),
        }
    }
}

/// Raw selections from whatever front-end collects them. Images are the
/// uploaded bytes, not yet normalized.
#[derive(Debug, Clone, Default)]
pub struct GenerationInputs {
    pub model: ModelId,
    pub mode: ModeKind,
    pub prompt: String,
    pub negative_prompt: String,
    pub aspect_ratio: AspectRatio,
    pub duration: DurationSeconds,
    pub resolution: Resolution,
    pub fit: FitMethod,
    pub crop_anchor: CropAnchor,
    pub start_image: Option<Vec<u8>>,
    pub end_image: Option<Vec<u8>>,
}

impl GenerationInputs {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = ModelId::new(model);
        self
    }

    pub fn with_mode(mut self, mode: ModeKind) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = negative_prompt.into();
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_duration(mut self, duration: DurationSeconds) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_fit(mut self, fit: FitMethod, crop_anchor: CropAnchor) -> Self {
        self.fit = fit;
        self.crop_anchor = crop_anchor;
        self
    }

    pub fn with_start_image(mut self, bytes: Vec<u8>) -> Self {
        self.start_image = Some(bytes);
        self
    }

    pub fn with_end_image(mut self, bytes: Vec<u8>) -> Self {
        self.end_image = Some(bytes);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationMode {
    TextToVideo,
    ImageToVideo {
        image: NormalizedImage,
    },
    Interpolation {
        first: NormalizedImage,
        last: NormalizedImage,
    },
}

impl GenerationMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            GenerationMode::TextToVideo => ModeKind::TextToVideo,
            GenerationMode::ImageToVideo { .. } => ModeKind::ImageToVideo,
            GenerationMode::Interpolation { .. } => ModeKind::Interpolation,
        }
    }
}

/// A request that has passed validation. Only the request builder creates
/// one, so every field combination here is one the service accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRequest {
    pub(crate) model: ModelId,
    pub(crate) prompt: String,
    pub(crate) negative_prompt: Option<String>,
    pub(crate) aspect_ratio: AspectRatio,
    pub(crate) duration: DurationSeconds,
    pub(crate) resolution: Option<Resolution>,
    pub(crate) mode: GenerationMode,
}

impl VideoRequest {
    pub fn model(&self) -> &ModelId {
        &self.model
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn negative_prompt(&self) -> Option<&str> {
        self.negative_prompt.as_deref()
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn duration(&self) -> DurationSeconds {
        self.duration
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    pub fn mode(&self) -> &GenerationMode {
        &self.mode
    }

    pub fn to_payload(&self) -> PredictRequest {
        let (image, last_frame) = match &self.mode {
            GenerationMode::TextToVideo => (None, None),
            GenerationMode::ImageToVideo { image } => (Some(InlineImage::from(image)), None),
            GenerationMode::Interpolation { first, last } => (
                Some(InlineImage::from(first)),
                Some(InlineImage::from(last)),
            ),
        };

        PredictRequest {
            instances: vec![PredictInstance {
                prompt: self.prompt.clone(),
                image,
                last_frame,
            }],
            parameters: PredictParameters {
                aspect_ratio: self.aspect_ratio,
                duration_seconds: self.duration.as_secs(),
                negative_prompt: self.negative_prompt.clone(),
                resolution: self.resolution,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    pub instances: Vec<PredictInstance>,
    pub parameters: PredictParameters,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictInstance {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<InlineImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_frame: Option<InlineImage>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub bytes_base64_encoded: String,
    pub mime_type: String,
}

impl From<&NormalizedImage> for InlineImage {
    fn from(image: &NormalizedImage) -> Self {
        Self {
            bytes_base64_encoded: base64::engine::general_purpose::STANDARD.encode(&image.bytes),
            mime_type: image.mime_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters {
    pub aspect_ratio: AspectRatio,
    pub duration_seconds: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
}
