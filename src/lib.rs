//! Crop disease identification site.
//!
//! A photo of a crop goes to a multimodal model with a consultant persona
//! prompt; the cleaned-up answer is shown with model-suggested follow-up
//! questions that re-run the analysis scoped to the chosen question.

pub mod catalog;
pub mod config;
pub mod error;
pub mod image_payload;
pub mod logging;
pub mod model;
pub mod page;
pub mod pipeline;
pub mod prompts;
pub mod render;
pub mod sanitize;
pub mod server;
pub mod state;
pub mod theme;

pub use config::SiteConfig;
pub use error::{ConfigError, ModelError, PipelineError};
pub use image_payload::{EncodedImagePayload, UploadedImage};
pub use model::{GeminiClient, GenerativeModel, Part};
pub use pipeline::{AnalysisResult, DiseaseInquiryPipeline};
pub use state::{Phase, PipelineEvent, PipelineState};
