//! Domain layer - Per-run value objects with no external dependencies
//!
//! Every entity here is created and consumed within a single pipeline run.
//! Nothing is mutated after construction and nothing outlives the run.

mod story;

pub use story::{
    Artifact, GenerationMode, IllustrationRequest, IllustrationResult, InvalidMode, RunId, Scene,
    StoryRequest, StoryResult,
};
