use crate::{
    error::{Result, VeoError},
    media::{ImageNormalizer, NormalizeOptions, MAX_IMAGE_BYTES},
    models::{
        DurationSeconds, GenerationInputs, GenerationMode, ModeKind, ModelId, ModelSubstitution,
        NormalizedImage, Resolution, VideoRequest, INTERPOLATION_MODEL,
    },
};

#[derive(Debug, Clone)]
pub struct BuiltRequest {
    pub request: VideoRequest,
    /// Set when the requested model could not serve the mode and another
    /// one was picked; front-ends should tell the user.
    pub substitution: Option<ModelSubstitution>,
}

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    max_image_bytes: usize,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            max_image_bytes: MAX_IMAGE_BYTES,
        }
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_image_bytes(mut self, max_image_bytes: usize) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }

    pub fn build(&self, inputs: GenerationInputs) -> Result<BuiltRequest> {
        let prompt = inputs.prompt.trim();
        if prompt.is_empty() {
            return Err(VeoError::MissingPrompt);
        }

        check_images(&inputs)?;

        let normalizer = ImageNormalizer::new(
            NormalizeOptions::new(inputs.aspect_ratio)
                .with_fit(inputs.fit, inputs.crop_anchor)
                .with_max_bytes(self.max_image_bytes),
        );

        let mut model = inputs.model.clone();
        let mut substitution = None;
        let mut duration = inputs.duration;

        let mode = match inputs.mode {
            ModeKind::TextToVideo => GenerationMode::TextToVideo,
            ModeKind::ImageToVideo => GenerationMode::ImageToVideo {
                image: normalize(&normalizer, inputs.start_image.as_deref(), "start")?,
            },
            ModeKind::Interpolation => {
                if !model.supports_interpolation() {
                    let used = ModelId::new(INTERPOLATION_MODEL);
                    log::warn!(
                        "Model {} does not support interpolation, using {}",
                        model,
                        used
                    );
                    substitution = Some(ModelSubstitution {
                        requested: model,
                        used: used.clone(),
                    });
                    model = used;
                }

                if duration != DurationSeconds::Eight {
                    log::info!(
                        "Interpolation always runs for 8 seconds (requested {}s)",
                        duration.as_secs()
                    );
                    duration = DurationSeconds::Eight;
                }

                GenerationMode::Interpolation {
                    first: normalize(&normalizer, inputs.start_image.as_deref(), "start")?,
                    last: normalize(&normalizer, inputs.end_image.as_deref(), "end")?,
                }
            }
        };

        let resolution = if model.supports_resolution() {
            Some(inputs.resolution)
        } else {
            log::debug!("Model {} has no resolution setting, omitting it", model);
            None
        };

        if resolution == Some(Resolution::P1080) && duration != DurationSeconds::Eight {
            log::warn!(
                "1080p is only offered for 8 second videos (requested {}s)",
                duration.as_secs()
            );
        }

        let negative_prompt = Some(inputs.negative_prompt.trim())
            .filter(|text| !text.is_empty())
            .map(String::from);

        Ok(BuiltRequest {
            request: VideoRequest {
                model,
                prompt: prompt.to_string(),
                negative_prompt,
                aspect_ratio: inputs.aspect_ratio,
                duration,
                resolution,
                mode,
            },
            substitution,
        })
    }
}

// Runs before any decoding so a missing upload is reported as such.
fn check_images(inputs: &GenerationInputs) -> Result<()> {
    match inputs.mode {
        ModeKind::TextToVideo => Ok(()),
        ModeKind::ImageToVideo if inputs.start_image.is_none() => Err(VeoError::MissingImage(
            "image-to-video needs a start image".into(),
        )),
        ModeKind::Interpolation if inputs.start_image.is_none() || inputs.end_image.is_none() => {
            Err(VeoError::MissingImage(
                "interpolation needs both a start and an end image".into(),
            ))
        }
        _ => Ok(()),
    }
}

fn normalize(
    normalizer: &ImageNormalizer,
    bytes: Option<&[u8]>,
    which: &str,
) -> Result<NormalizedImage> {
    let bytes = bytes.ok_or_else(|| VeoError::MissingImage(format!("missing {which} image")))?;
    let image = normalizer.normalize(bytes)?;
    log::info!(
        "Processed {} image: {}x{} ({} bytes)",
        which,
        image.width,
        image.height,
        image.bytes.len()
    );
    Ok(image)
}
