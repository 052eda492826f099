//! Data models for leap-as

pub mod assessment;
pub mod progress;
pub mod question;

pub use assessment::{AssessmentKind, AssessmentResult, CefrLevel, SubScores};
pub use progress::{AssessmentHistoryEntry, BadgeTier, UserProgress};
pub use question::{placement_questions, Question, QuestionKind};
