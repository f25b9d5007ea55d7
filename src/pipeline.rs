//! Two-step inquiry flow: image analysis, then related-question generation.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{error, info, warn};

use crate::error::{ModelError, PipelineError};
use crate::image_payload::UploadedImage;
use crate::model::{GenerativeModel, Part};
use crate::prompts::{follow_up_prompt, question_instruction, CONSULTANT_PROMPT};
use crate::sanitize::sanitize;
use crate::state::{PipelineEvent, PipelineState};

pub const UNKNOWN_FAILURE: &str = "An unknown error occurred while identifying the crop disease.";

/// Outcome of one analysis. Model failures are folded into `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub text: String,
    pub succeeded: bool,
}

pub fn failure_message(err: &ModelError) -> String {
    match err.message() {
        Some(message) => format!("Error identifying crop disease: {}", message),
        None => UNKNOWN_FAILURE.to_string(),
    }
}

/// Split a follow-up response into questions, one per line, in model order.
/// Blank lines are dropped; the count is whatever the model returned.
pub fn parse_follow_ups(raw: &str) -> Vec<String> {
    raw.trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Clears `pending` if an analysis future is dropped before it resolves.
struct PendingGuard<'a> {
    pipeline: &'a DiseaseInquiryPipeline,
    generation: u64,
    armed: bool,
}

impl PendingGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(generation = self.generation, "Crop disease analysis abandoned");
            self.pipeline.transition(PipelineEvent::AnalysisAbandoned {
                generation: self.generation,
            });
        }
    }
}

pub struct DiseaseInquiryPipeline {
    model: Arc<dyn GenerativeModel>,
    state: Mutex<PipelineState>,
}

impl DiseaseInquiryPipeline {
    pub fn new(model: Arc<dyn GenerativeModel>, language: impl Into<String>) -> Self {
        Self {
            model,
            state: Mutex::new(PipelineState::new(language)),
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    fn lock(&self) -> MutexGuard<'_, PipelineState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn transition(&self, event: PipelineEvent) -> PipelineState {
        let mut state = self.lock();
        *state = state.apply(event);
        state.clone()
    }

    pub fn snapshot(&self) -> PipelineState {
        self.lock().clone()
    }

    /// Replace the held image. Allowed while a request is in flight; the
    /// in-flight request keeps the image it started with.
    pub fn select_image(&self, image: UploadedImage) -> Result<(), PipelineError> {
        if image.is_empty() {
            return Err(PipelineError::NoImage);
        }
        info!(
            file = %image.file_name,
            mime = %image.mime_type,
            bytes = image.data.len(),
            "Image selected"
        );
        self.transition(PipelineEvent::ImageSelected(image));
        Ok(())
    }

    pub fn select_language(&self, language: impl Into<String>) {
        let language = language.into();
        info!(%language, "Response language selected");
        self.transition(PipelineEvent::LanguageSelected(language));
    }

    /// Analyze the current image, optionally scoped by an extra instruction.
    ///
    /// Fails fast with [`PipelineError::NoImage`] when no image is held and
    /// with [`PipelineError::Busy`] while another analysis is pending; in
    /// both cases nothing is sent and the state is untouched. A model
    /// failure becomes the displayed result. On success the related
    /// questions are derived before this returns. Dropping the future
    /// before the model answers clears `pending` and leaves the result.
    pub async fn analyze(
        &self,
        additional_instruction: Option<&str>,
    ) -> Result<AnalysisResult, PipelineError> {
        let (image, generation) = {
            let mut state = self.lock();
            let image = state.image.clone().ok_or(PipelineError::NoImage)?;
            if state.pending {
                return Err(PipelineError::Busy);
            }
            *state = state.apply(PipelineEvent::AnalysisStarted);
            (image, state.generation)
        };
        let mut guard = PendingGuard {
            pipeline: self,
            generation,
            armed: true,
        };

        let payload = image.encode();
        self.transition(PipelineEvent::PayloadEncoded);

        let prompt = match additional_instruction {
            Some(instruction) => format!("{}{}", CONSULTANT_PROMPT, instruction),
            None => CONSULTANT_PROMPT.to_string(),
        };
        let parts = vec![Part::Text(prompt), Part::InlineData(payload)];

        info!(
            generation,
            file = %image.file_name,
            scoped = additional_instruction.is_some(),
            "Identifying crop disease"
        );

        match self.model.generate_content(parts).await {
            Ok(raw) => {
                let text = sanitize(&raw);
                self.transition(PipelineEvent::AnalysisSucceeded { text: text.clone() });
                guard.disarm();
                info!(generation, chars = text.len(), "Crop disease identified");

                self.follow_ups_for(generation, &text).await;

                Ok(AnalysisResult {
                    text,
                    succeeded: true,
                })
            }
            Err(err) => {
                error!(generation, error = %err, "Error identifying crop disease");
                let message = failure_message(&err);
                self.transition(PipelineEvent::AnalysisFailed {
                    message: message.clone(),
                });
                guard.disarm();
                Ok(AnalysisResult {
                    text: message,
                    succeeded: false,
                })
            }
        }
    }

    /// Ask the model for questions a farmer might have about `analysis_text`
    /// and store them in place of the current list.
    pub async fn derive_follow_ups(&self, analysis_text: &str) -> Vec<String> {
        let generation = self.snapshot().generation;
        self.follow_ups_for(generation, analysis_text).await
    }

    /// Re-run the analysis on the image held now, scoped to `question`.
    pub async fn reinvoke_with_question(
        &self,
        question: &str,
    ) -> Result<AnalysisResult, PipelineError> {
        if question.trim().is_empty() {
            return Err(PipelineError::EmptyQuestion);
        }
        let instruction = question_instruction(question);
        self.analyze(Some(instruction.as_str())).await
    }

    async fn follow_ups_for(&self, generation: u64, analysis_text: &str) -> Vec<String> {
        let language = self
            .transition(PipelineEvent::FollowUpsRequested { generation })
            .language;
        let parts = vec![Part::Text(follow_up_prompt(analysis_text, &language))];

        match self.model.generate_content(parts).await {
            Ok(raw) => {
                let questions = parse_follow_ups(&raw);
                info!(generation, count = questions.len(), "Related questions generated");
                self.transition(PipelineEvent::FollowUpsReceived {
                    generation,
                    questions: questions.clone(),
                });
                questions
            }
            Err(err) => {
                warn!(generation, error = %err, "Error generating related questions");
                self.transition(PipelineEvent::FollowUpsFailed { generation });
                Vec::new()
            }
        }
    }
}
