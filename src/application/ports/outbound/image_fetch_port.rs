//! Port for fetching generated image bytes for document embedding

use async_trait::async_trait;

/// Capability to download raw image bytes from a location returned by the
/// image-generation service
///
/// A failure here is recoverable for the pipeline: the document is still
/// produced text-only and the failure is reported beside the result.
#[async_trait]
pub trait ImageFetchPort: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the image bytes; a non-success status is an error
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, Self::Error>;
}
