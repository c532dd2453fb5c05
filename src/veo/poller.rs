use crate::{
    config::DEFAULT_POLL_INTERVAL,
    error::{Result, VeoError},
    models::{ProgressEvent, VideoRequest},
    veo::{state::OperationState, traits::VideoService},
};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub state: OperationState,
    pub elapsed: Duration,
    pub polls: u32,
}

/// Submits a request and waits on the returned operation at a fixed
/// interval. Nothing is retried: the first transport error ends the run.
#[derive(Debug, Clone)]
pub struct OperationPoller {
    interval: Duration,
    max_polls: Option<u32>,
}

impl Default for OperationPoller {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_polls: None,
        }
    }
}

impl OperationPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_polls: None,
        }
    }

    pub fn with_max_polls(mut self, max_polls: Option<u32>) -> Self {
        self.max_polls = max_polls;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn run<S, F>(
        &self,
        service: &S,
        request: &VideoRequest,
        observer: &mut F,
    ) -> Result<PollOutcome>
    where
        S: VideoService + ?Sized,
        F: FnMut(&ProgressEvent),
    {
        observer(&ProgressEvent::Submitting);
        let operation = service.submit(request).await?;
        let started = Instant::now();

        log::info!("Operation started: {}", operation.name);

        let mut state = OperationState::submitted(operation);
        let mut polls = 0;

        while let Some(handle) = state.handle().cloned() {
            if self.max_polls.is_some_and(|max| polls >= max) {
                log::warn!("Giving up on {} after {} status checks", handle, polls);
                return Err(VeoError::Timeout { polls });
            }

            let elapsed_secs = started.elapsed().as_secs();
            log::debug!("Operation {} is {} ({}s)", handle, state.label(), elapsed_secs);
            observer(&ProgressEvent::Waiting { elapsed_secs });

            tokio::time::sleep(self.interval).await;
            state = OperationState::observe(service.refresh(&handle).await?);
            polls += 1;
        }

        let elapsed = started.elapsed();
        log::info!(
            "Operation finished as {} after {} checks ({}s)",
            state.label(),
            polls,
            elapsed.as_secs()
        );

        Ok(PollOutcome {
            state,
            elapsed,
            polls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerationInputs;
    use crate::veo::builder::RequestBuilder;
    use crate::veo::testing::{done_filtered, done_with_video, pending, FakeService};

    fn request() -> VideoRequest {
        RequestBuilder::new()
            .build(GenerationInputs::text("a cat surfing"))
            .unwrap()
            .request
    }

    fn poller() -> OperationPoller {
        OperationPoller::new(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_polls_until_done() {
        let service = FakeService::new()
            .with_submit(pending("op-1"))
            .with_refresh(pending("op-1"))
            .with_refresh(done_with_video("op-1", "https://files/v"));

        let mut events = Vec::new();
        let outcome = poller()
            .run(&service, &request(), &mut |event: &ProgressEvent| {
                events.push(event.clone())
            })
            .await
            .unwrap();

        assert_eq!(outcome.polls, 2);
        assert_eq!(outcome.state.label(), "done-success");
        assert_eq!(service.refresh_calls(), 2);

        assert_eq!(events.len(), 3);
        assert_eq!(events[0], ProgressEvent::Submitting);
        assert!(matches!(events[1], ProgressEvent::Waiting { .. }));
        assert!(matches!(events[2], ProgressEvent::Waiting { .. }));
    }

    #[tokio::test]
    async fn test_immediately_done_operation() {
        let service = FakeService::new().with_submit(done_filtered("op", &["unsafe"]));

        let outcome = poller()
            .run(&service, &request(), &mut |_: &ProgressEvent| {})
            .await
            .unwrap();

        assert_eq!(outcome.polls, 0);
        assert_eq!(outcome.state, OperationState::Filtered("unsafe".into()));
        assert_eq!(service.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_failure_is_not_retried() {
        let service = FakeService::new().with_submit_error(VeoError::Auth("bad key".into()));

        let result = poller()
            .run(&service, &request(), &mut |_: &ProgressEvent| {})
            .await;

        assert!(matches!(result, Err(VeoError::Auth(_))));
        assert_eq!(service.submit_calls(), 1);
        assert_eq!(service.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn test_refresh_failure_ends_run() {
        let service = FakeService::new()
            .with_submit(pending("op"))
            .with_refresh_error(VeoError::Transport("connection reset".into()));

        let result = poller()
            .run(&service, &request(), &mut |_: &ProgressEvent| {})
            .await;

        assert!(matches!(result, Err(VeoError::Transport(_))));
        assert_eq!(service.refresh_calls(), 1);
    }

    #[tokio::test]
    async fn test_poll_limit() {
        let service = FakeService::new()
            .with_submit(pending("op"))
            .with_refresh(pending("op"))
            .with_refresh(pending("op"));

        let result = poller()
            .with_max_polls(Some(2))
            .run(&service, &request(), &mut |_: &ProgressEvent| {})
            .await;

        assert!(matches!(result, Err(VeoError::Timeout { polls: 2 })));
    }
}
