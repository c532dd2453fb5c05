use crate::{
    error::Result,
    models::{Operation, OperationHandle, VideoRequest},
};
use async_trait::async_trait;

/// The remote long-running video API, reduced to the three calls a
/// generation run needs.
#[async_trait]
pub trait VideoService: Send + Sync {
    async fn submit(&self, request: &VideoRequest) -> Result<Operation>;

    async fn refresh(&self, handle: &OperationHandle) -> Result<Operation>;

    async fn download(&self, uri: &str) -> Result<Vec<u8>>;
}
