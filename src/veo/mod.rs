pub mod api;
pub mod builder;
pub mod extractor;
pub mod poller;
pub mod state;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

use crate::{
    config::VeoConfig,
    error::Result,
    logger,
    models::{GenerationInputs, GenerationOutcome, GenerationReport, ProgressEvent},
};
use std::sync::Arc;
use uuid::Uuid;

pub use api::GeminiVideoService;
pub use builder::{BuiltRequest, RequestBuilder};
pub use poller::{OperationPoller, PollOutcome};
pub use state::{EmptyReason, OperationState};
pub use traits::VideoService;

#[derive(Clone)]
pub struct VeoClient {
    service: Arc<dyn VideoService>,
    builder: RequestBuilder,
    poller: OperationPoller,
}

impl VeoClient {
    pub fn new(config: VeoConfig) -> Result<Self> {
        let service = GeminiVideoService::new(&config)?;
        Ok(Self::with_service(Arc::new(service), &config))
    }

    pub fn with_service(service: Arc<dyn VideoService>, config: &VeoConfig) -> Self {
        Self {
            service,
            builder: RequestBuilder::new(),
            poller: OperationPoller::new(config.poll_interval).with_max_polls(config.max_polls),
        }
    }

    pub fn with_builder(mut self, builder: RequestBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    pub fn poller(&self) -> &OperationPoller {
        &self.poller
    }

    /// Validates the inputs, runs the remote job to completion and downloads
    /// the first video.
    pub async fn generate<F>(
        &self,
        inputs: GenerationInputs,
        mut observer: F,
    ) -> Result<GenerationOutcome>
    where
        F: FnMut(&ProgressEvent),
    {
        let run_id = Uuid::new_v4();
        let _timer = logger::timer(&format!("generation {run_id}"));

        log::info!(
            "[{}] Generating {:?} video with {}",
            run_id,
            inputs.mode,
            inputs.model
        );

        let BuiltRequest {
            request,
            substitution,
        } = self.builder.build(inputs)?;

        if let Some(substitution) = &substitution {
            log::info!("[{}] {}", run_id, substitution.notice());
        }

        let outcome = self
            .poller
            .run(self.service.as_ref(), &request, &mut observer)
            .await?;
        let elapsed_secs = outcome.elapsed.as_secs();

        let video = extractor::into_video(outcome.state)?;

        observer(&ProgressEvent::Downloading);
        let artifact = extractor::fetch(self.service.as_ref(), &video).await?;

        log::info!(
            "[{}] Video ready: {} bytes after {}s",
            run_id,
            artifact.len(),
            elapsed_secs
        );

        Ok(GenerationOutcome {
            video: artifact,
            message: extractor::success_message(elapsed_secs),
            elapsed_secs,
            model: request.model().clone(),
            substitution,
        })
    }

    /// Like `generate`, but every error becomes a failure reason.
    pub async fn run<F>(&self, inputs: GenerationInputs, observer: F) -> GenerationReport
    where
        F: FnMut(&ProgressEvent),
    {
        match self.generate(inputs, observer).await {
            Ok(outcome) => GenerationReport::Success(outcome),
            Err(e) => {
                log::error!("Video generation failed: {}", e);
                GenerationReport::Failure {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// One-shot entry point: builds the client from `config` and reports
/// construction errors the same way as generation errors.
pub async fn generate_report<F>(
    config: VeoConfig,
    inputs: GenerationInputs,
    observer: F,
) -> GenerationReport
where
    F: FnMut(&ProgressEvent),
{
    match VeoClient::new(config) {
        Ok(client) => client.run(inputs, observer).await,
        Err(e) => {
            log::error!("Could not create video client: {}", e);
            GenerationReport::Failure {
                reason: e.to_string(),
            }
        }
    }
}
