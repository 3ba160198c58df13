//! Value objects for one story-to-illustrated-document run

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a single pipeline run, used to correlate log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which prompt template drives story generation
///
/// `Fixed` always tells a story about the same predetermined protagonist.
/// `Wildcard` draws a random character, place, and situation per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationMode {
    Fixed,
    Wildcard,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Wildcard => write!(f, "wildcard"),
        }
    }
}

/// Unrecognized generation mode at the trigger surface
#[derive(Debug, Clone, thiserror::Error)]
#[error("unrecognized generation mode: {0}")]
pub struct InvalidMode(pub String);

impl FromStr for GenerationMode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dragon" | "fixed" => Ok(Self::Fixed),
            "wildcard" => Ok(Self::Wildcard),
            other => Err(InvalidMode(other.to_string())),
        }
    }
}

/// A fully built story-generation request
///
/// The prompt text is fixed at build time; wildcard picks are never
/// resampled mid-run.
#[derive(Debug, Clone)]
pub struct StoryRequest {
    pub mode: GenerationMode,
    pub prompt_text: String,
}

/// Raw story text returned by the text-generation capability
#[derive(Debug, Clone)]
pub struct StoryResult {
    pub raw_text: String,
}

/// Short description of one scene from the story, used to drive
/// illustration generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub description: String,
}

/// Style-qualified prompt for the image-generation capability
#[derive(Debug, Clone)]
pub struct IllustrationRequest {
    pub prompt_text: String,
}

impl IllustrationRequest {
    /// Prefix the scene with the illustration-style preamble for the mode.
    ///
    /// The wildcard stories describe Eliana as a human protagonist, so their
    /// illustrations carry her physical description and a colored-pencil
    /// style; the fixed dragon stories use the generic playful preamble.
    pub fn from_scene(mode: GenerationMode, scene: &Scene) -> Self {
        let prompt_text = match mode {
            GenerationMode::Fixed => format!(
                "A playful, imaginative children's illustration of: {}.",
                scene.description
            ),
            GenerationMode::Wildcard => format!(
                "An illustration of: {}. The illustration should look like it was made \
                 with colored pencils. Eliana is a 9 year old girl from Boston with brown \
                 hair and brown eyes. Her favorite color is orange.",
                scene.description
            ),
        };
        Self { prompt_text }
    }
}

/// Location of a generated illustration, as returned by the image service
#[derive(Debug, Clone)]
pub struct IllustrationResult {
    pub image_location: String,
}

/// The final downloadable document
#[derive(Debug, Clone)]
pub struct Artifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}
