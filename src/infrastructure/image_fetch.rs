//! HTTP fetcher for generated image bytes

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::application::ports::outbound::ImageFetchPort;

/// Downloads image bytes from the location returned by the image service
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetchPort for HttpImageFetcher {
    type Error = FetchError;

    async fn fetch(&self, location: &str) -> Result<Vec<u8>, Self::Error> {
        let response = self.client.get(location).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::UnexpectedStatus(response.status()));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    UnexpectedStatus(StatusCode),
}
