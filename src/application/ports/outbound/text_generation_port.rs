//! Port for the text-generation capability

use async_trait::async_trait;

/// A single completion returned by the text-generation service
#[derive(Debug, Clone)]
pub struct Completion {
    /// Text of the first choice in the response
    pub text: String,
    /// Model that produced it
    pub model: String,
}

/// Capability to turn one user prompt into one completion
///
/// Implementations send exactly one request per call. The pipeline defines
/// no retry policy; any failure propagates to the caller as a run failure.
#[async_trait]
pub trait TextGenerationPort: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send a single user message and return the first completion's text
    async fn complete(&self, prompt: &str) -> Result<Completion, Self::Error>;
}
