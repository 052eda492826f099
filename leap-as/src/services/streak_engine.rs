//! Daily streak state machine
//!
//! Pure state-transition function over calendar-day granularity. All
//! comparisons use the calendar date, never the timestamp; "today" is
//! injected by the caller so the engine stays deterministic under test.

use chrono::NaiveDate;

use crate::models::BadgeTier;

/// Badge thresholds, ascending: (minimum streak, tier)
const BADGE_THRESHOLDS: [(u32, BadgeTier); 4] = [
    (3, BadgeTier::Starter),
    (7, BadgeTier::Bronze),
    (14, BadgeTier::Silver),
    (30, BadgeTier::Gold),
];

/// Outcome of one streak advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakOutcome {
    /// New streak count
    pub streak: u32,
    /// The calendar date the streak was advanced to (always "today")
    pub date: NaiveDate,
    /// Whether the streak count changed (same-day re-assessment does not)
    pub changed: bool,
}

/// Advance the streak given the previous assessment date and count
///
/// - No previous date: first-ever assessment, streak starts at 1.
/// - Previous date is today: idempotent same-day re-assessment; the count is
///   carried (lifted to 1 if a zero was ever persisted) and `changed` is
///   false.
/// - Previous date is exactly yesterday: streak extends by one.
/// - Anything else (gap of 2+ days, or a future date from clock skew): the
///   streak resets to 1.
pub fn advance(prev_date: Option<NaiveDate>, prev_streak: u32, today: NaiveDate) -> StreakOutcome {
    let Some(prev) = prev_date else {
        return StreakOutcome {
            streak: 1,
            date: today,
            changed: true,
        };
    };

    if prev == today {
        return StreakOutcome {
            streak: prev_streak.max(1),
            date: today,
            changed: false,
        };
    }

    let streak = if prev.succ_opt() == Some(today) {
        prev_streak + 1
    } else {
        // Gap of 2+ days, or prev is in the future
        1
    };

    StreakOutcome {
        streak,
        date: today,
        changed: true,
    }
}

/// Badge tiers the given streak qualifies for
pub fn qualifying_badges(streak: u32) -> Vec<BadgeTier> {
    BADGE_THRESHOLDS
        .iter()
        .filter(|(threshold, _)| streak >= *threshold)
        .map(|(_, tier)| *tier)
        .collect()
}

/// Union newly qualified badges into an existing set
///
/// Evaluated on every advance regardless of `changed`; each tier is added at
/// most once and existing badges are never removed. The result stays in
/// ascending tier order.
pub fn merge_badges(existing: &[BadgeTier], streak: u32) -> Vec<BadgeTier> {
    let mut merged: Vec<BadgeTier> = existing.to_vec();
    for tier in qualifying_badges(streak) {
        if !merged.contains(&tier) {
            merged.push(tier);
        }
    }
    merged.sort();
    merged.dedup();
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn first_ever_assessment_starts_streak() {
        let today = day(2025, 6, 10);
        let outcome = advance(None, 0, today);
        assert_eq!(
            outcome,
            StreakOutcome {
                streak: 1,
                date: today,
                changed: true
            }
        );
    }

    #[test]
    fn same_day_reassessment_is_idempotent() {
        let today = day(2025, 6, 10);
        let outcome = advance(Some(today), 5, today);
        assert_eq!(outcome.streak, 5);
        assert!(!outcome.changed);
    }

    #[test]
    fn same_day_with_zero_streak_lifts_to_one() {
        let today = day(2025, 6, 10);
        let outcome = advance(Some(today), 0, today);
        assert_eq!(outcome.streak, 1);
        assert!(!outcome.changed);
    }

    #[test]
    fn consecutive_day_extends_streak() {
        let today = day(2025, 6, 10);
        let outcome = advance(Some(day(2025, 6, 9)), 5, today);
        assert_eq!(outcome.streak, 6);
        assert!(outcome.changed);
    }

    #[test]
    fn extension_works_across_month_boundary() {
        let outcome = advance(Some(day(2025, 5, 31)), 2, day(2025, 6, 1));
        assert_eq!(outcome.streak, 3);
    }

    #[test]
    fn gap_resets_streak() {
        let today = day(2025, 6, 10);
        let outcome = advance(Some(day(2025, 6, 7)), 5, today);
        assert_eq!(outcome.streak, 1);
        assert!(outcome.changed);
    }

    #[test]
    fn future_date_from_clock_skew_resets_streak() {
        let today = day(2025, 6, 10);
        let outcome = advance(Some(day(2025, 6, 12)), 5, today);
        assert_eq!(outcome.streak, 1);
        assert!(outcome.changed);
    }

    #[test]
    fn badge_thresholds() {
        assert!(qualifying_badges(2).is_empty());
        assert_eq!(qualifying_badges(3), vec![BadgeTier::Starter]);
        assert_eq!(
            qualifying_badges(7),
            vec![BadgeTier::Starter, BadgeTier::Bronze]
        );
        assert_eq!(
            qualifying_badges(30),
            vec![
                BadgeTier::Starter,
                BadgeTier::Bronze,
                BadgeTier::Silver,
                BadgeTier::Gold
            ]
        );
    }

    #[test]
    fn merging_twice_never_duplicates() {
        let once = merge_badges(&[], 7);
        let twice = merge_badges(&once, 7);
        assert_eq!(once, twice);
        assert_eq!(twice, vec![BadgeTier::Starter, BadgeTier::Bronze]);
    }

    #[test]
    fn existing_badges_survive_a_streak_reset() {
        let existing = vec![BadgeTier::Starter, BadgeTier::Bronze];
        let merged = merge_badges(&existing, 1);
        assert_eq!(merged, existing);
    }
}
