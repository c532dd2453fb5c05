use crate::{
    error::{Result, VeoError},
    models::{AspectRatio, CropAnchor, FitMethod, NormalizedImage},
};
use ::image::codecs::jpeg::JpegEncoder;
use ::image::imageops::{self, FilterType};
use ::image::{DynamicImage, Rgb, RgbImage};

pub const MAX_IMAGE_BYTES: usize = 7 * 1024 * 1024;
pub const JPEG_QUALITY: u8 = 90;
pub const RATIO_TOLERANCE: f64 = 0.01;
const MAX_RESIZE_PASSES: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeOptions {
    pub aspect_ratio: AspectRatio,
    pub fit: FitMethod,
    pub crop_anchor: CropAnchor,
    pub max_bytes: usize,
    pub quality: u8,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::Wide,
            fit: FitMethod::Crop,
            crop_anchor: CropAnchor::Center,
            max_bytes: MAX_IMAGE_BYTES,
            quality: JPEG_QUALITY,
        }
    }
}

impl NormalizeOptions {
    pub fn new(aspect_ratio: AspectRatio) -> Self {
        Self {
            aspect_ratio,
            ..Default::default()
        }
    }

    pub fn with_fit(mut self, fit: FitMethod, crop_anchor: CropAnchor) -> Self {
        self.fit = fit;
        self.crop_anchor = crop_anchor;
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }
}

/// Turns an uploaded picture into an opaque JPEG that matches the requested
/// aspect ratio and stays under the byte budget.
#[derive(Debug, Clone, Copy)]
pub struct ImageNormalizer {
    options: NormalizeOptions,
}

impl ImageNormalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    pub fn normalize(&self, bytes: &[u8]) -> Result<NormalizedImage> {
        let image = ::image::load_from_memory(bytes)
            .map_err(|e| VeoError::Image(format!("Failed to decode image: {e}")))?;

        self.normalize_image(&image)
    }

    pub fn normalize_image(&self, image: &DynamicImage) -> Result<NormalizedImage> {
        log::debug!(
            "Normalizing {}x{} image to {} ({:?})",
            image.width(),
            image.height(),
            self.options.aspect_ratio,
            self.options.fit
        );

        let rgb = flatten_onto_white(image);
        let fitted = fit_to_ratio(
            rgb,
            self.options.aspect_ratio.ratio(),
            self.options.fit,
            self.options.crop_anchor,
        );
        let (bytes, width, height) =
            encode_within_budget(fitted, self.options.quality, self.options.max_bytes)?;

        log::debug!("Normalized image: {}x{}, {} bytes", width, height, bytes.len());

        Ok(NormalizedImage {
            bytes,
            width,
            height,
            mime_type: "image/jpeg".to_string(),
        })
    }
}

/// Alpha is composited over white; grayscale expands to three channels.
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let mut flattened = RgbImage::new(rgba.width(), rgba.height());

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u16;
        let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        flattened.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }

    flattened
}

pub fn fit_to_ratio(image: RgbImage, target: f64, fit: FitMethod, anchor: CropAnchor) -> RgbImage {
    let (width, height) = image.dimensions();
    let current = width as f64 / height as f64;

    if (current - target).abs() <= RATIO_TOLERANCE {
        return image;
    }

    let too_wide = current > target;

    match fit {
        FitMethod::Crop if too_wide => {
            let new_width = ((height as f64 * target) as u32).clamp(1, width);
            let left = (width - new_width) / 2;
            log::debug!("Cropping width {} -> {} at x={}", width, new_width, left);
            imageops::crop_imm(&image, left, 0, new_width, height).to_image()
        }
        FitMethod::Crop => {
            let new_height = ((width as f64 / target) as u32).clamp(1, height);
            let top = match anchor {
                CropAnchor::Top => 0,
                CropAnchor::Center => (height - new_height) / 2,
                CropAnchor::Bottom => height - new_height,
            };
            log::debug!("Cropping height {} -> {} at y={}", height, new_height, top);
            imageops::crop_imm(&image, 0, top, width, new_height).to_image()
        }
        FitMethod::Pad if too_wide => {
            let new_height = ((width as f64 / target) as u32).max(height);
            let mut canvas = RgbImage::from_pixel(width, new_height, Rgb([0, 0, 0]));
            imageops::replace(&mut canvas, &image, 0, ((new_height - height) / 2) as i64);
            canvas
        }
        FitMethod::Pad => {
            let new_width = ((height as f64 * target) as u32).max(width);
            let mut canvas = RgbImage::from_pixel(new_width, height, Rgb([0, 0, 0]));
            imageops::replace(&mut canvas, &image, ((new_width - width) / 2) as i64, 0);
            canvas
        }
    }
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    image
        .write_with_encoder(encoder)
        .map_err(|e| VeoError::Image(format!("Failed to encode JPEG: {e}")))?;
    Ok(buffer)
}

// Byte size only roughly tracks pixel area, so one rescale is not always
// enough; keep shrinking until the encoding fits.
fn encode_within_budget(
    mut image: RgbImage,
    quality: u8,
    max_bytes: usize,
) -> Result<(Vec<u8>, u32, u32)> {
    let mut encoded = encode_jpeg(&image, quality)?;
    let mut passes = 0;

    while encoded.len() > max_bytes {
        let (width, height) = image.dimensions();
        if passes == MAX_RESIZE_PASSES || (width == 1 && height == 1) {
            return Err(VeoError::Image(format!(
                "Could not fit image under {} bytes ({} bytes at {}x{})",
                max_bytes,
                encoded.len(),
                width,
                height
            )));
        }

        let scale = (max_bytes as f64 / encoded.len() as f64).sqrt();
        let new_width = shrink(width, scale);
        let new_height = shrink(height, scale);

        log::info!(
            "Image is {} bytes (limit {}), resizing {}x{} -> {}x{}",
            encoded.len(),
            max_bytes,
            width,
            height,
            new_width,
            new_height
        );

        image = imageops::resize(&image, new_width, new_height, FilterType::Lanczos3);
        encoded = encode_jpeg(&image, quality)?;
        passes += 1;
    }

    let (width, height) = image.dimensions();
    Ok((encoded, width, height))
}

fn shrink(dimension: u32, scale: f64) -> u32 {
    if dimension <= 1 {
        return 1;
    }
    ((dimension as f64 * scale) as u32).clamp(1, dimension - 1)
}
