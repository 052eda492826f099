//! Progress reconciliation
//!
//! Applies one assessment result and the streak engine's outcome to the
//! user's persistent record, and appends the immutable history entry. The
//! read-compute-write cycle retries on conditional-update misses, so
//! concurrent same-user assessments serialize instead of losing updates.

use sqlx::SqlitePool;
use uuid::Uuid;
use leap_common::{time, Error, Result};

use crate::db::progress as progress_db;
use crate::models::{AssessmentHistoryEntry, AssessmentKind, AssessmentResult, UserProgress};
use crate::services::streak_engine;

/// Conditional-update retry budget; contention between a user's own requests
/// is short-lived, so a couple of retries settles it
const MAX_COMMIT_ATTEMPTS: u32 = 3;

/// Reconcile an assessment into the user's stored progress
///
/// Returns the stored snapshot. Same-day re-assessments overwrite the level
/// and confidence but leave the streak untouched; badge tiers are unioned
/// and never removed.
pub async fn reconcile(
    pool: &SqlitePool,
    user_id: &str,
    kind: AssessmentKind,
    input: serde_json::Value,
    result: &AssessmentResult,
) -> Result<UserProgress> {
    let result_json = serde_json::to_value(result)
        .map_err(|e| Error::Internal(format!("Failed to serialize result: {}", e)))?;

    for attempt in 1..=MAX_COMMIT_ATTEMPTS {
        let prior = progress_db::load_progress(pool, user_id).await?;

        let today = time::today_utc();
        let prior_state = prior
            .as_ref()
            .map(|p| (p.last_assessment_date, p.streak));
        let outcome = streak_engine::advance(
            prior_state.map(|(date, _)| date),
            prior_state.map(|(_, streak)| streak).unwrap_or(0),
            today,
        );

        let prior_badges = prior.as_ref().map(|p| p.badges.as_slice()).unwrap_or(&[]);
        let badges = streak_engine::merge_badges(prior_badges, outcome.streak);

        let progress = UserProgress {
            user_id: user_id.to_string(),
            level: result.level,
            level_confidence: result.confidence,
            last_assessment_at: time::now(),
            last_assessment_date: outcome.date,
            streak: outcome.streak,
            badges,
        };

        let entry = AssessmentHistoryEntry {
            entry_id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            kind: kind.as_str().to_string(),
            input: input.clone(),
            result: result_json.clone(),
            created_at: progress.last_assessment_at,
        };

        if progress_db::commit_progress(pool, &progress, prior_state, &entry).await? {
            tracing::info!(
                user_id = %user_id,
                kind = kind.as_str(),
                level = progress.level.as_str(),
                streak = progress.streak,
                streak_changed = outcome.changed,
                "Progress reconciled"
            );
            return Ok(progress);
        }

        tracing::debug!(
            user_id = %user_id,
            attempt,
            "Concurrent progress update detected, retrying"
        );
    }

    Err(Error::Internal(format!(
        "Progress update for {} kept losing to concurrent writers",
        user_id
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{BadgeTier, CefrLevel, SubScores};

    async fn memory_pool() -> SqlitePool {
        // Single connection: every pooled connection to ":memory:" would
        // otherwise get its own private database.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        db::init_tables(&pool).await.unwrap();
        pool
    }

    fn writing_result() -> AssessmentResult {
        AssessmentResult {
            level: CefrLevel::B1,
            confidence: 0.76,
            overall_score: 70.4,
            scores: SubScores {
                vocabulary: 72.0,
                grammar: 68.0,
                cohesion: 70.0,
            },
            explanation: "Comfortable intermediate writing.".to_string(),
            improvements: None,
            details: None,
        }
    }

    #[tokio::test]
    async fn first_assessment_creates_record_and_history() {
        let pool = memory_pool().await;
        let result = writing_result();

        let progress = reconcile(
            &pool,
            "user-1",
            AssessmentKind::Writing,
            serde_json::json!({"text": "sample"}),
            &result,
        )
        .await
        .unwrap();

        assert_eq!(progress.level, CefrLevel::B1);
        assert_eq!(progress.streak, 1);
        assert!(progress.badges.is_empty());

        let stored = progress_db::load_progress(&pool, "user-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.streak, 1);
        assert_eq!(stored.level, CefrLevel::B1);
        assert!((stored.level_confidence - 0.76).abs() < 1e-9);

        let history = progress_db::list_history(&pool, "user-1", 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, "writing");
        assert_eq!(history[0].input["text"], "sample");
    }

    #[tokio::test]
    async fn same_day_reassessment_keeps_streak_but_overwrites_level() {
        let pool = memory_pool().await;
        let first = writing_result();
        reconcile(
            &pool,
            "user-2",
            AssessmentKind::Writing,
            serde_json::json!({}),
            &first,
        )
        .await
        .unwrap();

        let mut second = writing_result();
        second.level = CefrLevel::B2;
        second.confidence = 0.9;

        let progress = reconcile(
            &pool,
            "user-2",
            AssessmentKind::Writing,
            serde_json::json!({}),
            &second,
        )
        .await
        .unwrap();

        assert_eq!(progress.streak, 1, "same-day streak must not grow");
        assert_eq!(progress.level, CefrLevel::B2);
        assert!((progress.level_confidence - 0.9).abs() < 1e-9);

        let history = progress_db::list_history(&pool, "user-2", 10).await.unwrap();
        assert_eq!(history.len(), 2, "every assessment appends history");
    }

    #[tokio::test]
    async fn badges_union_from_seeded_streak() {
        let pool = memory_pool().await;

        // Seed a row as if the user assessed yesterday with a 6-day streak
        let yesterday = time::today_utc().pred_opt().unwrap();
        sqlx::query(
            r#"
            INSERT INTO user_progress (
                user_id, level, level_confidence, last_assessment_at,
                last_assessment_date, streak, badges
            ) VALUES (?, 'B1', 0.5, ?, ?, 6, '["starter"]')
            "#,
        )
        .bind("user-3")
        .bind(time::now().to_rfc3339())
        .bind(time::format_iso_date(yesterday))
        .execute(&pool)
        .await
        .unwrap();

        let progress = reconcile(
            &pool,
            "user-3",
            AssessmentKind::Placement,
            serde_json::json!({}),
            &writing_result(),
        )
        .await
        .unwrap();

        assert_eq!(progress.streak, 7);
        assert_eq!(progress.badges, vec![BadgeTier::Starter, BadgeTier::Bronze]);
    }
}
