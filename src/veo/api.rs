use crate::{
    config::VeoConfig,
    error::{error_from_status, from_reqwest_error, Result, VeoError},
    models::{ModelId, Operation, OperationHandle, VideoRequest},
    veo::traits::VideoService,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// `VideoService` backed by the Gemini REST API.
#[derive(Clone)]
pub struct GeminiVideoService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiVideoService {
    pub fn new(config: &VeoConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| from_reqwest_error("Failed to initialize HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.credential()?.to_string(),
        })
    }

    fn predict_url(&self, model: &ModelId) -> String {
        format!("{}/models/{}:predictLongRunning", self.base_url, model)
    }

    fn operation_url(&self, handle: &OperationHandle) -> String {
        format!("{}/{}", self.base_url, handle.name().trim_start_matches('/'))
    }
}

#[async_trait]
impl VideoService for GeminiVideoService {
    async fn submit(&self, request: &VideoRequest) -> Result<Operation> {
        let payload = request.to_payload();
        let url = self.predict_url(request.model());

        log::info!("Submitting video generation to model: {}", request.model());
        log::trace!(
            "Generation parameters: {}",
            serde_json::to_string(&payload.parameters)
                .map_err(|e| VeoError::Serialization(e.to_string()))?
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| from_reqwest_error("Request failed", e))?;

        parse_response(response).await
    }

    async fn refresh(&self, handle: &OperationHandle) -> Result<Operation> {
        log::trace!("Polling operation: {}", handle);

        let response = self
            .client
            .get(self.operation_url(handle))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| from_reqwest_error("Poll request failed", e))?;

        parse_response(response).await
    }

    async fn download(&self, uri: &str) -> Result<Vec<u8>> {
        log::info!("Downloading generated video");

        let response = self
            .client
            .get(uri)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| from_reqwest_error("Download failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| from_reqwest_error("Failed to read error response", e))?;
            return Err(error_from_status(status, body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| from_reqwest_error("Failed to read video body", e))?;

        log::debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| from_reqwest_error("Failed to read response body", e))?;

    if !status.is_success() {
        log::error!("Request failed with {}: {}", status, body);
        return Err(error_from_status(status, body));
    }

    serde_json::from_str(&body)
        .map_err(|e| VeoError::Response(format!("Failed to decode response: {e}")))
}
