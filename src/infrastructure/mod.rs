//! Infrastructure layer - Adapters for external services and the HTTP surface

pub mod config;
pub mod http;
pub mod image_fetch;
pub mod openai;
pub mod replicate;
pub mod state;
