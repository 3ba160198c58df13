//! Pipeline orchestrator - one trigger, one linear run
//!
//! Sequences prompt building, story generation, scene extraction,
//! illustration generation, and document assembly strictly in order. Each
//! stage failure short-circuits the rest of the run; only the image fetch
//! inside assembly is recoverable. Every run starts from fresh entities;
//! nothing is reused across runs.

use std::fmt;

use crate::application::ports::outbound::{
    ImageFetchPort, ImageGenerationPort, TextGenerationPort,
};
use crate::application::services::document_assembler::DocumentAssembler;
use crate::application::services::prompt_builder::{OptionPicker, PromptBuilder};
use crate::application::services::scene_extractor::SceneExtractor;
use crate::application::services::text_normalizer::normalize;
use crate::domain::{
    Artifact, GenerationMode, IllustrationRequest, RunId, StoryResult,
};

/// Fixed name under which the artifact is offered for download
pub const ARTIFACT_FILENAME: &str = "Generated_Adventure.pdf";

/// The stage a run was in when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    GeneratingStory,
    ExtractingScene,
    GeneratingIllustration,
    Assembling,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GeneratingStory => write!(f, "story generation"),
            Self::ExtractingScene => write!(f, "scene extraction"),
            Self::GeneratingIllustration => write!(f, "illustration generation"),
            Self::Assembling => write!(f, "document assembly"),
        }
    }
}

/// Run-fatal pipeline failures
///
/// These are never retried; a retry is a fresh `run()` invocation.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A generation capability returned an error or a malformed response
    #[error("{stage} failed: {message}")]
    GenerationFailure { stage: RunStage, message: String },
    /// Scene extraction received zero-length story text
    #[error("generated story was empty")]
    EmptyStory,
    /// Document serialization failed
    #[error("document assembly failed: {0}")]
    AssemblyFailure(String),
}

/// Recoverable image-fetch failure, reported beside a successful artifact
#[derive(Debug, Clone, thiserror::Error)]
#[error("could not fetch or embed the illustration: {0}")]
pub struct FetchFailure(pub String);

/// Result of a successful run
#[derive(Debug)]
pub struct RunOutcome {
    pub run_id: RunId,
    pub artifact: Artifact,
    /// Present when the artifact is text-only because the image bytes could
    /// not be fetched or embedded
    pub fetch_failure: Option<FetchFailure>,
}

/// The story-to-illustrated-document pipeline
pub struct StoryPipeline<T, I, F, P>
where
    T: TextGenerationPort,
    I: ImageGenerationPort,
    F: ImageFetchPort,
    P: OptionPicker,
{
    textgen: T,
    imagegen: I,
    fetcher: F,
    prompt_builder: PromptBuilder<P>,
    scene_extractor: SceneExtractor,
    assembler: DocumentAssembler,
}

impl<T, I, F, P> StoryPipeline<T, I, F, P>
where
    T: TextGenerationPort,
    I: ImageGenerationPort,
    F: ImageFetchPort,
    P: OptionPicker,
{
    pub fn new(
        textgen: T,
        imagegen: I,
        fetcher: F,
        prompt_builder: PromptBuilder<P>,
        scene_extractor: SceneExtractor,
    ) -> Self {
        Self {
            textgen,
            imagegen,
            fetcher,
            prompt_builder,
            scene_extractor,
            assembler: DocumentAssembler::new(),
        }
    }

    /// Execute one full run for the given mode
    pub async fn run(&mut self, mode: GenerationMode) -> Result<RunOutcome, PipelineError> {
        let run_id = RunId::new();
        tracing::info!(%run_id, %mode, "run triggered");

        // Stage: generating story
        let request = self.prompt_builder.build_story_request(mode);
        tracing::debug!(%run_id, prompt = %request.prompt_text, "story prompt built");

        let completion = self.textgen.complete(&request.prompt_text).await.map_err(|e| {
            PipelineError::GenerationFailure {
                stage: RunStage::GeneratingStory,
                message: e.to_string(),
            }
        })?;
        let story = StoryResult {
            raw_text: completion.text,
        };
        tracing::info!(
            %run_id,
            model = %completion.model,
            chars = story.raw_text.len(),
            "story generated"
        );

        // Stage: generating illustration
        let scene = self.scene_extractor.extract(&story, &self.textgen).await?;
        tracing::info!(%run_id, scene = %scene.description, "scene selected");

        let illustration_request = IllustrationRequest::from_scene(request.mode, &scene);
        let illustration = self
            .imagegen
            .generate(&illustration_request)
            .await
            .map_err(|e| PipelineError::GenerationFailure {
                stage: RunStage::GeneratingIllustration,
                message: e.to_string(),
            })?;
        tracing::info!(%run_id, location = %illustration.image_location, "illustration generated");

        // Stage: assembling. The fetch is the one recoverable step: a
        // failure degrades the artifact to text-only instead of aborting.
        let (image_bytes, mut fetch_failure) =
            match self.fetcher.fetch(&illustration.image_location).await {
                Ok(bytes) => (Some(bytes), None),
                Err(e) => {
                    tracing::warn!(%run_id, error = %e, "image fetch failed, continuing text-only");
                    (None, Some(FetchFailure(e.to_string())))
                }
            };

        let normalized = normalize(&story.raw_text);
        let document = self
            .assembler
            .assemble(&normalized, image_bytes.as_deref())
            .map_err(|e| {
                tracing::error!(%run_id, stage = %RunStage::Assembling, error = %e, "run failed");
                PipelineError::AssemblyFailure(e.to_string())
            })?;

        if let Some(embed_failure) = document.embed_failure {
            tracing::warn!(%run_id, error = %embed_failure, "image embed failed, document is text-only");
            fetch_failure.get_or_insert(FetchFailure(embed_failure));
        }

        tracing::info!(%run_id, bytes = document.bytes.len(), "run ready");
        Ok(RunOutcome {
            run_id,
            artifact: Artifact {
                filename: ARTIFACT_FILENAME.to_string(),
                bytes: document.bytes,
            },
            fetch_failure,
        })
    }
}
