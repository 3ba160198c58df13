//! Shared application state

use tokio::sync::Mutex;

use crate::application::services::{
    PromptBuilder, RngPicker, SceneExtractor, StoryPipeline,
};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::image_fetch::HttpImageFetcher;
use crate::infrastructure::openai::OpenAiClient;
use crate::infrastructure::replicate::ReplicateClient;

/// The production pipeline wiring
pub type EnginePipeline =
    StoryPipeline<OpenAiClient, ReplicateClient, HttpImageFetcher, RngPicker>;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    /// The pipeline runs one trigger at a time; the mutex is the
    /// single-run guard, a second trigger while a run is in flight is
    /// rejected at the route
    pub pipeline: Mutex<EnginePipeline>,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let textgen = OpenAiClient::new(
            &config.openai_base_url,
            &config.openai_api_key,
            &config.openai_model,
            config.request_timeout,
        )?;
        let imagegen = ReplicateClient::new(
            &config.replicate_base_url,
            &config.replicate_api_token,
            &config.replicate_model_version,
            config.image.clone(),
            config.request_timeout,
        )?;
        let fetcher = HttpImageFetcher::new(config.request_timeout)?;

        let pipeline = StoryPipeline::new(
            textgen,
            imagegen,
            fetcher,
            PromptBuilder::new(RngPicker::new()),
            SceneExtractor::new(config.scene_strategy),
        );

        Ok(Self {
            config,
            pipeline: Mutex::new(pipeline),
        })
    }
}
