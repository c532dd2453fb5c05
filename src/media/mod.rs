pub mod artifact;
pub mod normalizer;

pub use artifact::VideoArtifact;
pub use normalizer::{ImageNormalizer, NormalizeOptions, MAX_IMAGE_BYTES};
