//! Port for the image-generation capability

use async_trait::async_trait;

use crate::domain::{IllustrationRequest, IllustrationResult};

/// Capability to turn a style-qualified prompt into one generated image
///
/// Output count, resolution, and sampler tuning are implementation
/// configuration; the pipeline only depends on getting back the location
/// of the first output.
#[async_trait]
pub trait ImageGenerationPort: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send a single image-generation request and return the first output
    async fn generate(&self, request: &IllustrationRequest)
        -> Result<IllustrationResult, Self::Error>;
}
