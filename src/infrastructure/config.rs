//! Application configuration

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::services::SceneStrategy;

/// Tuning values for image generation
///
/// These are product choices, not contracts; all of them can be overridden
/// from the environment.
#[derive(Debug, Clone)]
pub struct ImageGenConfig {
    pub width: u32,
    pub height: u32,
    pub num_outputs: u32,
    pub scheduler: String,
    pub guidance_scale: f32,
    pub num_inference_steps: u32,
}

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OpenAI API key (required)
    pub openai_api_key: String,
    /// OpenAI-compatible API base URL
    pub openai_base_url: String,
    /// Model for story and scene-summary requests
    pub openai_model: String,

    /// Replicate API token (required)
    pub replicate_api_token: String,
    /// Replicate API base URL
    pub replicate_base_url: String,
    /// Stable Diffusion model version hash
    pub replicate_model_version: String,

    /// Image generation tuning
    pub image: ImageGenConfig,

    /// How the illustration scene is derived from the story
    pub scene_strategy: SceneStrategy,

    /// Per-call timeout for all outbound requests; expiry surfaces as a
    /// generation or fetch failure
    pub request_timeout: Duration,

    /// HTTP server port
    pub server_port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Missing credentials are startup-fatal, never a per-run error.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            openai_api_key: env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY environment variable is required")?,
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4".to_string()),

            replicate_api_token: env::var("REPLICATE_API_TOKEN")
                .context("REPLICATE_API_TOKEN environment variable is required")?,
            replicate_base_url: env::var("REPLICATE_BASE_URL")
                .unwrap_or_else(|_| "https://api.replicate.com/v1".to_string()),
            replicate_model_version: env::var("REPLICATE_MODEL_VERSION").unwrap_or_else(|_| {
                "ac732df83cea7fff18b8472768c88ad041fa750ff7682a21affe81863cbe77e4".to_string()
            }),

            image: ImageGenConfig {
                width: parse_env("IMAGE_WIDTH", 512)?,
                height: parse_env("IMAGE_HEIGHT", 512)?,
                num_outputs: 1,
                scheduler: env::var("IMAGE_SCHEDULER")
                    .unwrap_or_else(|_| "DPMSolverMultistep".to_string()),
                guidance_scale: parse_env("IMAGE_GUIDANCE_SCALE", 10.0)?,
                num_inference_steps: parse_env("IMAGE_STEPS", 75)?,
            },

            scene_strategy: env::var("SCENE_STRATEGY")
                .unwrap_or_else(|_| "summary".to_string())
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("SCENE_STRATEGY must be 'keyword' or 'summary'")?,

            request_timeout: Duration::from_secs(parse_env("REQUEST_TIMEOUT_SECS", 120)?),

            server_port: parse_env("SERVER_PORT", 3000)?,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{key} has an invalid value")),
        Err(_) => Ok(default),
    }
}
