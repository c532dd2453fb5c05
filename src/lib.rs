pub mod config;
pub mod error;
pub mod logger;
pub mod media;
pub mod models;
pub mod veo;

pub use config::VeoConfig;
pub use error::{Result, VeoError};
pub use media::{ImageNormalizer, NormalizeOptions, VideoArtifact};
pub use models::{
    AspectRatio, CropAnchor, DurationSeconds, FitMethod, GenerationInputs, GenerationMode,
    GenerationOutcome, GenerationReport, ModeKind, ModelId, ModelSubstitution, NormalizedImage,
    ProgressEvent, Resolution, VideoRequest,
};
pub use veo::{
    generate_report, BuiltRequest, GeminiVideoService, OperationPoller, OperationState,
    RequestBuilder, VeoClient, VideoService,
};
