//! Inquiry session state and its single transition function.
//!
//! Every change goes through [`PipelineState::apply`], which takes the
//! current snapshot and an event and returns the next snapshot.

use serde::{Deserialize, Serialize};

use crate::image_payload::UploadedImage;
use crate::prompts::DEFAULT_LANGUAGE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Encoding,
    AwaitingAnalysis,
    AnalysisSucceeded,
    AwaitingFollowUps,
    FollowUpsReady,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    ImageSelected(UploadedImage),
    LanguageSelected(String),
    AnalysisStarted,
    PayloadEncoded,
    AnalysisSucceeded { text: String },
    AnalysisFailed { message: String },
    /// The caller stopped waiting before the model answered.
    AnalysisAbandoned { generation: u64 },
    FollowUpsRequested { generation: u64 },
    FollowUpsReceived { generation: u64, questions: Vec<String> },
    FollowUpsFailed { generation: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineState {
    pub image: Option<UploadedImage>,
    pub result: Option<String>,
    pub pending: bool,
    pub follow_up_questions: Vec<String>,
    pub phase: Phase,
    pub language: String,
    /// Incremented by every analysis; follow-ups for an older one are dropped.
    pub generation: u64,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

impl PipelineState {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            image: None,
            result: None,
            pending: false,
            follow_up_questions: Vec::new(),
            phase: Phase::Idle,
            language: language.into(),
            generation: 0,
        }
    }

    pub fn apply(&self, event: PipelineEvent) -> PipelineState {
        let mut next = self.clone();
        match event {
            PipelineEvent::ImageSelected(image) => {
                next.image = Some(image);
            }
            PipelineEvent::LanguageSelected(language) => {
                next.language = language;
            }
            PipelineEvent::AnalysisStarted => {
                next.pending = true;
                next.phase = Phase::Encoding;
                next.generation += 1;
            }
            PipelineEvent::PayloadEncoded => {
                next.phase = Phase::AwaitingAnalysis;
            }
            PipelineEvent::AnalysisSucceeded { text } => {
                next.result = Some(text);
                next.pending = false;
                next.phase = Phase::AnalysisSucceeded;
            }
            PipelineEvent::AnalysisFailed { message } => {
                next.result = Some(message);
                next.pending = false;
                next.phase = Phase::Idle;
            }
            PipelineEvent::AnalysisAbandoned { generation }
                if generation == self.generation && self.pending =>
            {
                next.pending = false;
                next.phase = Phase::Idle;
            }
            PipelineEvent::FollowUpsRequested { generation } if generation == self.generation => {
                next.phase = Phase::AwaitingFollowUps;
            }
            PipelineEvent::FollowUpsReceived {
                generation,
                questions,
            } if generation == self.generation => {
                next.follow_up_questions = questions;
                next.phase = Phase::FollowUpsReady;
            }
            PipelineEvent::FollowUpsFailed { generation } if generation == self.generation => {
                next.follow_up_questions = Vec::new();
                next.phase = Phase::FollowUpsReady;
            }
            PipelineEvent::AnalysisAbandoned { .. }
            | PipelineEvent::FollowUpsRequested { .. }
            | PipelineEvent::FollowUpsReceived { .. }
            | PipelineEvent::FollowUpsFailed { .. } => {}
        }
        next
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.has_image() && !self.pending
    }
}
