//! User progress and assessment history persistence
//!
//! The progress row is written through a conditional upsert: the update only
//! applies when the row still carries the streak/date the caller read, so
//! two concurrent assessments for one user can never silently overwrite each
//! other's streak advance. The losing writer observes zero affected rows and
//! re-reads.

use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};
use leap_common::{time, Error, Result};

use crate::models::{AssessmentHistoryEntry, BadgeTier, CefrLevel, UserProgress};

/// Load one user's progress snapshot
pub async fn load_progress(pool: &SqlitePool, user_id: &str) -> Result<Option<UserProgress>> {
    let row = sqlx::query(
        r#"
        SELECT user_id, level, level_confidence, last_assessment_at,
               last_assessment_date, streak, badges
        FROM user_progress
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let level: String = row.get("level");
            let level = CefrLevel::parse(&level)
                .ok_or_else(|| Error::Internal(format!("Unknown level in database: {}", level)))?;

            let last_assessment_at: String = row.get("last_assessment_at");
            let last_assessment_at = chrono::DateTime::parse_from_rfc3339(&last_assessment_at)
                .map_err(|e| Error::Internal(format!("Failed to parse last_assessment_at: {}", e)))?
                .with_timezone(&chrono::Utc);

            let last_assessment_date: String = row.get("last_assessment_date");
            let last_assessment_date = time::parse_iso_date(&last_assessment_date)
                .ok_or_else(|| {
                    Error::Internal(format!(
                        "Failed to parse last_assessment_date: {}",
                        last_assessment_date
                    ))
                })?;

            let badges: String = row.get("badges");
            let badges: Vec<BadgeTier> = serde_json::from_str(&badges)
                .map_err(|e| Error::Internal(format!("Failed to deserialize badges: {}", e)))?;

            Ok(Some(UserProgress {
                user_id: row.get("user_id"),
                level,
                level_confidence: row.get("level_confidence"),
                last_assessment_at,
                last_assessment_date,
                streak: row.get::<i64, _>("streak") as u32,
                badges,
            }))
        }
        None => Ok(None),
    }
}

/// Persist a progress snapshot and its history entry atomically
///
/// `prior` is the (date, streak) pair the snapshot was computed from, None
/// for a first-ever assessment. Returns false when the conditional update
/// found the row changed underneath the caller (no write happened, including
/// the history entry); the caller re-reads and recomputes.
pub async fn commit_progress(
    pool: &SqlitePool,
    progress: &UserProgress,
    prior: Option<(NaiveDate, u32)>,
    entry: &AssessmentHistoryEntry,
) -> Result<bool> {
    // Prepare all data before opening the transaction
    let level = progress.level.as_str();
    let last_assessment_at = progress.last_assessment_at.to_rfc3339();
    let last_assessment_date = time::format_iso_date(progress.last_assessment_date);
    let badges = serde_json::to_string(&progress.badges)
        .map_err(|e| Error::Internal(format!("Failed to serialize badges: {}", e)))?;
    let input = serde_json::to_string(&entry.input)
        .map_err(|e| Error::Internal(format!("Failed to serialize input payload: {}", e)))?;
    let result = serde_json::to_string(&entry.result)
        .map_err(|e| Error::Internal(format!("Failed to serialize result: {}", e)))?;
    let prior_date = prior.map(|(date, _)| time::format_iso_date(date));
    let prior_streak = prior.map(|(_, streak)| streak as i64);

    let mut tx = pool.begin().await?;

    let written = if let (Some(prior_date), Some(prior_streak)) = (&prior_date, prior_streak) {
        // Row existed at read time: update only if it is still the row we read
        sqlx::query(
            r#"
            UPDATE user_progress
            SET level = ?,
                level_confidence = ?,
                last_assessment_at = ?,
                last_assessment_date = ?,
                streak = ?,
                badges = ?
            WHERE user_id = ?
              AND last_assessment_date = ?
              AND streak = ?
            "#,
        )
        .bind(level)
        .bind(progress.level_confidence)
        .bind(&last_assessment_at)
        .bind(&last_assessment_date)
        .bind(progress.streak as i64)
        .bind(&badges)
        .bind(&progress.user_id)
        .bind(prior_date)
        .bind(prior_streak)
        .execute(&mut *tx)
        .await?
        .rows_affected()
    } else {
        // First-ever assessment: insert only if nobody else inserted first
        sqlx::query(
            r#"
            INSERT INTO user_progress (
                user_id, level, level_confidence, last_assessment_at,
                last_assessment_date, streak, badges
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO NOTHING
            "#,
        )
        .bind(&progress.user_id)
        .bind(level)
        .bind(progress.level_confidence)
        .bind(&last_assessment_at)
        .bind(&last_assessment_date)
        .bind(progress.streak as i64)
        .bind(&badges)
        .execute(&mut *tx)
        .await?
        .rows_affected()
    };

    if written == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query(
        r#"
        INSERT INTO assessment_history (entry_id, user_id, kind, input, result, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(entry.entry_id.to_string())
    .bind(&entry.user_id)
    .bind(&entry.kind)
    .bind(&input)
    .bind(&result)
    .bind(entry.created_at.to_rfc3339())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(true)
}

/// List a user's assessment history, most recent first
pub async fn list_history(
    pool: &SqlitePool,
    user_id: &str,
    limit: u32,
) -> Result<Vec<AssessmentHistoryEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT entry_id, user_id, kind, input, result, created_at
        FROM assessment_history
        WHERE user_id = ?
        ORDER BY created_at DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let entry_id: String = row.get("entry_id");
        let entry_id = uuid::Uuid::parse_str(&entry_id)
            .map_err(|e| Error::Internal(format!("Failed to parse entry_id: {}", e)))?;

        let input: String = row.get("input");
        let input = serde_json::from_str(&input)
            .map_err(|e| Error::Internal(format!("Failed to deserialize input: {}", e)))?;

        let result: String = row.get("result");
        let result = serde_json::from_str(&result)
            .map_err(|e| Error::Internal(format!("Failed to deserialize result: {}", e)))?;

        let created_at: String = row.get("created_at");
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| Error::Internal(format!("Failed to parse created_at: {}", e)))?
            .with_timezone(&chrono::Utc);

        entries.push(AssessmentHistoryEntry {
            entry_id,
            user_id: row.get("user_id"),
            kind: row.get("kind"),
            input,
            result,
            created_at,
        });
    }

    Ok(entries)
}
