//! Replicate predictions client for Stable Diffusion illustration generation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::ImageGenerationPort;
use crate::domain::{IllustrationRequest, IllustrationResult};
use crate::infrastructure::config::ImageGenConfig;

/// How long to wait between polls of an unfinished prediction
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Client for the Replicate predictions API
pub struct ReplicateClient {
    client: Client,
    base_url: String,
    api_token: String,
    model_version: String,
    image: ImageGenConfig,
    /// Upper bound on polling before the prediction is treated as timed out
    max_polls: u32,
}

impl ReplicateClient {
    pub fn new(
        base_url: &str,
        api_token: &str,
        model_version: &str,
        image: ImageGenConfig,
        timeout: Duration,
    ) -> Result<Self, ReplicateError> {
        let client = Client::builder().timeout(timeout).build()?;
        let max_polls = (timeout.as_secs() / POLL_INTERVAL.as_secs()).max(1) as u32;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
            model_version: model_version.to_string(),
            image,
            max_polls,
        })
    }

    /// Poll an unfinished prediction until it reaches a terminal status
    async fn wait_for_prediction(
        &self,
        mut prediction: Prediction,
    ) -> Result<Prediction, ReplicateError> {
        let mut polls = 0;
        while !prediction.status.is_terminal() {
            if polls >= self.max_polls {
                return Err(ReplicateError::Timeout);
            }
            polls += 1;
            tokio::time::sleep(POLL_INTERVAL).await;

            let url = prediction
                .urls
                .as_ref()
                .map(|u| u.get.clone())
                .unwrap_or_else(|| format!("{}/predictions/{}", self.base_url, prediction.id));

            let response = self
                .client
                .get(url)
                .bearer_auth(&self.api_token)
                .send()
                .await?;

            if !response.status().is_success() {
                let error_text = response.text().await.unwrap_or_default();
                return Err(ReplicateError::ApiError(error_text));
            }

            prediction = response.json().await?;
        }
        Ok(prediction)
    }
}

#[async_trait]
impl ImageGenerationPort for ReplicateClient {
    type Error = ReplicateError;

    async fn generate(
        &self,
        request: &IllustrationRequest,
    ) -> Result<IllustrationResult, Self::Error> {
        let body = PredictionRequest {
            version: &self.model_version,
            input: PredictionInput {
                prompt: &request.prompt_text,
                width: self.image.width,
                height: self.image.height,
                num_outputs: self.image.num_outputs,
                scheduler: &self.image.scheduler,
                guidance_scale: self.image.guidance_scale,
                num_inference_steps: self.image.num_inference_steps,
            },
        };

        let response = self
            .client
            .post(format!("{}/predictions", self.base_url))
            .bearer_auth(&self.api_token)
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ReplicateError::ApiError(format!("{status}: {error_text}")));
        }

        let prediction: Prediction = response.json().await?;
        let prediction = self.wait_for_prediction(prediction).await?;

        match prediction.status {
            PredictionStatus::Succeeded => prediction
                .output
                .unwrap_or_default()
                .into_iter()
                .next()
                .map(|image_location| IllustrationResult { image_location })
                .ok_or(ReplicateError::NoOutput),
            status => Err(ReplicateError::ApiError(format!(
                "prediction ended as {status:?}: {}",
                prediction.error.unwrap_or_default()
            ))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReplicateError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("prediction returned no outputs")]
    NoOutput,
    #[error("prediction did not finish in time")]
    Timeout,
}

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    version: &'a str,
    input: PredictionInput<'a>,
}

#[derive(Debug, Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
    width: u32,
    height: u32,
    num_outputs: u32,
    scheduler: &'a str,
    guidance_scale: f32,
    num_inference_steps: u32,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: PredictionStatus,
    #[serde(default)]
    output: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl PredictionStatus {
    fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}
