//! Persistent per-user progress record and assessment history

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::assessment::CefrLevel;

/// Badge tier unlocked at a streak milestone; once earned, never removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    /// Streak >= 3
    Starter,
    /// Streak >= 7
    Bronze,
    /// Streak >= 14
    Silver,
    /// Streak >= 30
    Gold,
}

impl BadgeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeTier::Starter => "starter",
            BadgeTier::Bronze => "bronze",
            BadgeTier::Silver => "silver",
            BadgeTier::Gold => "gold",
        }
    }
}

/// Per-user progress snapshot, owned by the persistence layer
///
/// The pipeline reads one snapshot, computes a new snapshot, and writes it
/// back through a conditional upsert; the row is never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProgress {
    pub user_id: String,

    /// Most recent level classification
    pub level: CefrLevel,

    /// Confidence attached to the most recent classification (0.0 - 1.0)
    pub level_confidence: f64,

    /// Timestamp of the most recent assessment
    pub last_assessment_at: DateTime<Utc>,

    /// Calendar date of the most recent assessment (streak granularity)
    pub last_assessment_date: NaiveDate,

    /// Consecutive calendar days with at least one assessment
    pub streak: u32,

    /// Earned badge tiers, in ascending order, duplicates never stored
    pub badges: Vec<BadgeTier>,
}

/// Append-only record of one completed assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentHistoryEntry {
    pub entry_id: Uuid,
    pub user_id: String,
    /// Assessment kind label ("speaking", "writing", "placement")
    pub kind: String,
    /// Input payload (transcript, submitted text, or placement answers)
    pub input: serde_json::Value,
    /// Serialized AssessmentResult
    pub result: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_tiers_order_matches_thresholds() {
        assert!(BadgeTier::Starter < BadgeTier::Bronze);
        assert!(BadgeTier::Bronze < BadgeTier::Silver);
        assert!(BadgeTier::Silver < BadgeTier::Gold);
    }

    #[test]
    fn badge_serializes_to_lowercase_label() {
        let json = serde_json::to_string(&BadgeTier::Starter).unwrap();
        assert_eq!(json, "\"starter\"");
        let back: BadgeTier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BadgeTier::Starter);
    }
}
