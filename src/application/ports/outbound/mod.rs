//! Outbound ports - Interfaces that the application requires from external systems

mod image_fetch_port;
mod image_generation_port;
mod text_generation_port;

pub use image_fetch_port::ImageFetchPort;
pub use image_generation_port::ImageGenerationPort;
pub use text_generation_port::{Completion, TextGenerationPort};
