//! Assessment request and result types

use serde::{Deserialize, Serialize};

/// Kind of assessment submitted by the learner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentKind {
    /// Spoken sample (audio transcribed before evaluation)
    Speaking,
    /// Written sample (free text)
    Writing,
    /// Placement test (multiple-choice plus optional free writing)
    Placement,
}

impl AssessmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentKind::Speaking => "speaking",
            AssessmentKind::Writing => "writing",
            AssessmentKind::Placement => "placement",
        }
    }
}

/// CEFR proficiency level classification
///
/// `Unknown` appears only in degraded results where the evaluator could not
/// recover a structured score from the model output; the level mapper itself
/// never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
    Unknown,
}

impl CefrLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
            CefrLevel::Unknown => "Unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "A1" => Some(CefrLevel::A1),
            "A2" => Some(CefrLevel::A2),
            "B1" => Some(CefrLevel::B1),
            "B2" => Some(CefrLevel::B2),
            "C1" => Some(CefrLevel::C1),
            "C2" => Some(CefrLevel::C2),
            "Unknown" => Some(CefrLevel::Unknown),
            _ => None,
        }
    }

    /// Ordinal position on the six-tier scale (A1 = 0, C2 = 5; Unknown = -1)
    pub fn rank(&self) -> i8 {
        match self {
            CefrLevel::A1 => 0,
            CefrLevel::A2 => 1,
            CefrLevel::B1 => 2,
            CefrLevel::B2 => 3,
            CefrLevel::C1 => 4,
            CefrLevel::C2 => 5,
            CefrLevel::Unknown => -1,
        }
    }
}

/// Per-dimension sub-scores, each nominally 0-100
///
/// Consumers clamp out-of-range values; see `services::level_mapper`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub vocabulary: f64,
    pub grammar: f64,
    pub cohesion: f64,
}

impl SubScores {
    /// Uniform sub-scores (used when a single percentage stands in for all
    /// three dimensions, e.g. multiple-choice fallback)
    pub fn uniform(score: f64) -> Self {
        Self {
            vocabulary: score,
            grammar: score,
            cohesion: score,
        }
    }
}

/// One assessment outcome, produced fresh per request and never mutated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Classified proficiency level
    pub level: CefrLevel,

    /// Evaluator confidence, 0.0 - 1.0
    pub confidence: f64,

    /// Weighted composite of the sub-scores (0-100)
    pub overall_score: f64,

    /// Per-dimension sub-scores
    pub scores: SubScores,

    /// Human-readable explanation of the classification
    pub explanation: String,

    /// Suggested improvements, when the evaluator supplied them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvements: Option<String>,

    /// Opaque diagnostic payload (grading detail, raw model text on
    /// degradation, claimed level, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AssessmentResult {
    /// Degraded result used when the model output could not be normalized:
    /// the request still succeeds, the raw text is preserved for diagnosis.
    pub fn unknown(raw: String) -> Self {
        Self {
            level: CefrLevel::Unknown,
            confidence: 0.0,
            overall_score: 0.0,
            scores: SubScores::default(),
            explanation: String::new(),
            improvements: None,
            details: Some(serde_json::json!({ "raw": raw })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cefr_level_round_trips_through_str() {
        for level in [
            CefrLevel::A1,
            CefrLevel::A2,
            CefrLevel::B1,
            CefrLevel::B2,
            CefrLevel::C1,
            CefrLevel::C2,
        ] {
            assert_eq!(CefrLevel::parse(level.as_str()), Some(level));
        }
    }

    #[test]
    fn cefr_rank_is_strictly_increasing() {
        assert!(CefrLevel::A1.rank() < CefrLevel::A2.rank());
        assert!(CefrLevel::A2.rank() < CefrLevel::B1.rank());
        assert!(CefrLevel::B1.rank() < CefrLevel::B2.rank());
        assert!(CefrLevel::B2.rank() < CefrLevel::C1.rank());
        assert!(CefrLevel::C1.rank() < CefrLevel::C2.rank());
    }

    #[test]
    fn unknown_result_preserves_raw_text() {
        let result = AssessmentResult::unknown("not json at all".to_string());
        assert_eq!(result.level, CefrLevel::Unknown);
        assert_eq!(result.confidence, 0.0);
        let details = result.details.unwrap();
        assert_eq!(details["raw"], "not json at all");
    }
}
