//! Business logic services for leap-as

pub mod evaluator;
pub mod generation_client;
pub mod grader;
pub mod level_mapper;
pub mod progress_reconciler;
pub mod response_normalizer;
pub mod streak_engine;
pub mod transcription_client;

pub use evaluator::Evaluator;
pub use generation_client::{GenerateError, GenerationClient};
pub use transcription_client::{TranscribeError, TranscriptionClient};
