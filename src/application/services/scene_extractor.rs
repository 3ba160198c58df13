//! Scene extraction - choosing what to illustrate
//!
//! Two interchangeable strategies exist. The keyword strategy scans the
//! story for sentence units mentioning one of a fixed set of evocative
//! words. The summary strategy asks the text-generation capability for a
//! compact scene description phrased for image-generation use.

use std::fmt;
use std::str::FromStr;

use crate::application::ports::outbound::TextGenerationPort;
use crate::application::services::pipeline::{PipelineError, RunStage};
use crate::domain::{Scene, StoryResult};

/// Keywords that mark a sentence as worth illustrating
const SCENE_KEYWORDS: [&str; 4] = ["cave", "underwater", "shimmer", "adventure"];

/// Which scene-extraction strategy a deployment uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneStrategy {
    /// Deterministic keyword-sentence search over the story text
    Keyword,
    /// Auxiliary text-generation call producing a scene summary
    Summary,
}

impl fmt::Display for SceneStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword => write!(f, "keyword"),
            Self::Summary => write!(f, "summary"),
        }
    }
}

impl FromStr for SceneStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keyword" => Ok(Self::Keyword),
            "summary" => Ok(Self::Summary),
            other => Err(format!("unknown scene strategy: {other}")),
        }
    }
}

/// Derives the illustration scene from exactly one story result
pub struct SceneExtractor {
    strategy: SceneStrategy,
}

impl SceneExtractor {
    pub fn new(strategy: SceneStrategy) -> Self {
        Self { strategy }
    }

    /// Extract the scene using the configured strategy
    pub async fn extract<T: TextGenerationPort>(
        &self,
        story: &StoryResult,
        textgen: &T,
    ) -> Result<Scene, PipelineError> {
        match self.strategy {
            SceneStrategy::Keyword => keyword_scene(&story.raw_text),
            SceneStrategy::Summary => self.summarize_scene(story, textgen).await,
        }
    }

    async fn summarize_scene<T: TextGenerationPort>(
        &self,
        story: &StoryResult,
        textgen: &T,
    ) -> Result<Scene, PipelineError> {
        if story.raw_text.trim().is_empty() {
            return Err(PipelineError::EmptyStory);
        }

        let prompt = format!(
            "Select an important scene from this story and describe it in 200 characters \
             or less. Use descriptive language optimized for Stable Diffusion:\n\n{}",
            story.raw_text
        );

        let completion = textgen.complete(&prompt).await.map_err(|e| {
            PipelineError::GenerationFailure {
                stage: RunStage::ExtractingScene,
                message: e.to_string(),
            }
        })?;

        Ok(Scene {
            description: completion.text.trim().to_string(),
        })
    }
}

/// Keyword-sentence search over the story text.
///
/// Splits on `". "`, returns the first unit containing any scene keyword
/// (case-insensitive), falling back to the first unit. Units are trimmed
/// and a trailing period is ensured.
fn keyword_scene(raw_text: &str) -> Result<Scene, PipelineError> {
    let units: Vec<&str> = raw_text
        .split(". ")
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .collect();

    let first = units.first().ok_or(PipelineError::EmptyStory)?;

    let chosen = units
        .iter()
        .find(|unit| {
            let lower = unit.to_lowercase();
            SCENE_KEYWORDS.iter().any(|kw| lower.contains(kw))
        })
        .unwrap_or(first);

    let mut description = chosen.to_string();
    if !description.ends_with('.') {
        description.push('.');
    }
    Ok(Scene { description })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::Completion;

    struct MockTextGen {
        reply: &'static str,
    }

    #[async_trait::async_trait]
    impl TextGenerationPort for MockTextGen {
        type Error = std::io::Error;

        async fn complete(&self, _prompt: &str) -> Result<Completion, Self::Error> {
            Ok(Completion {
                text: self.reply.to_string(),
                model: "mock".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_summary_strategy_trims_response() {
        let extractor = SceneExtractor::new(SceneStrategy::Summary);
        let story = StoryResult {
            raw_text: "Eliana found a cave.".to_string(),
        };
        let textgen = MockTextGen {
            reply: "  A dragonet at a glowing cave mouth.  \n",
        };

        let scene = extractor.extract(&story, &textgen).await.unwrap();
        assert_eq!(scene.description, "A dragonet at a glowing cave mouth.");
    }

    struct FailingTextGen;

    #[async_trait::async_trait]
    impl TextGenerationPort for FailingTextGen {
        type Error = std::io::Error;

        async fn complete(&self, _prompt: &str) -> Result<Completion, Self::Error> {
            Err(std::io::Error::other("service unavailable"))
        }
    }

    #[tokio::test]
    async fn test_summary_failure_names_scene_extraction() {
        let extractor = SceneExtractor::new(SceneStrategy::Summary);
        let story = StoryResult {
            raw_text: "Eliana found a cave.".to_string(),
        };

        let err = extractor.extract(&story, &FailingTextGen).await.unwrap_err();
        match err {
            PipelineError::GenerationFailure { stage, .. } => {
                assert_eq!(stage, RunStage::ExtractingScene);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_summary_strategy_rejects_empty_story() {
        let extractor = SceneExtractor::new(SceneStrategy::Summary);
        let story = StoryResult {
            raw_text: String::new(),
        };
        let textgen = MockTextGen { reply: "anything" };

        let err = extractor.extract(&story, &textgen).await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyStory));
    }

    #[test]
    fn test_keyword_match_wins() {
        let scene =
            keyword_scene("A dragon flew. They found a shimmering cave. The end.").unwrap();
        assert_eq!(scene.description, "They found a shimmering cave.");
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let scene = keyword_scene("Quiet day. An UNDERWATER palace appeared. Done.").unwrap();
        assert_eq!(scene.description, "An UNDERWATER palace appeared.");
    }

    #[test]
    fn test_no_match_falls_back_to_first_unit() {
        let scene = keyword_scene("Nothing special happens here. The end.").unwrap();
        assert_eq!(scene.description, "Nothing special happens here.");
    }

    #[test]
    fn test_empty_story_is_rejected() {
        assert!(matches!(keyword_scene(""), Err(PipelineError::EmptyStory)));
        assert!(matches!(keyword_scene("   "), Err(PipelineError::EmptyStory)));
    }

    #[test]
    fn test_first_unit_keeps_existing_period() {
        // A single-sentence story never splits, so the trailing period from
        // the source text is preserved rather than doubled
        let scene = keyword_scene("Eliana found a cave.").unwrap();
        assert_eq!(scene.description, "Eliana found a cave.");
    }
}
