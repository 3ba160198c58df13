//! Application services - The story-to-illustrated-document pipeline
//!
//! Each stage of the pipeline lives in its own module and is sequenced by
//! `pipeline::StoryPipeline`. Services accept their outbound port
//! dependencies explicitly and never read ambient state.

pub mod document_assembler;
pub mod pipeline;
pub mod prompt_builder;
pub mod scene_extractor;
pub mod text_normalizer;

pub use pipeline::StoryPipeline;
pub use prompt_builder::{PromptBuilder, RngPicker};
pub use scene_extractor::{SceneExtractor, SceneStrategy};
