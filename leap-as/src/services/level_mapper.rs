//! Sub-score to CEFR level mapping
//!
//! Weighted composite over the three scoring dimensions, classified through
//! a fixed threshold table. Pure and total: any finite input produces a
//! level.

use crate::models::{CefrLevel, SubScores};

/// Dimension weights: vocabulary 40%, grammar 40%, cohesion 20%
const VOCABULARY_WEIGHT: f64 = 0.4;
const GRAMMAR_WEIGHT: f64 = 0.4;
const COHESION_WEIGHT: f64 = 0.2;

/// Map sub-scores to a CEFR level and the weighted overall score
///
/// Sub-scores are clamped into [0, 100] before weighting, so out-of-range
/// or non-finite inputs still classify. Thresholds are inclusive upper
/// bounds applied in ascending order, first match wins.
pub fn map_to_level(scores: &SubScores) -> (CefrLevel, f64) {
    let overall = VOCABULARY_WEIGHT * clamp_score(scores.vocabulary)
        + GRAMMAR_WEIGHT * clamp_score(scores.grammar)
        + COHESION_WEIGHT * clamp_score(scores.cohesion);

    let level = if overall <= 20.0 {
        CefrLevel::A1
    } else if overall <= 35.0 {
        CefrLevel::A2
    } else if overall <= 55.0 {
        CefrLevel::B1
    } else if overall <= 75.0 {
        CefrLevel::B2
    } else if overall <= 90.0 {
        CefrLevel::C1
    } else {
        CefrLevel::C2
    };

    (level, overall)
}

/// Clamp a sub-score into [0, 100]; NaN collapses to 0
fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(vocabulary: f64, grammar: f64, cohesion: f64) -> SubScores {
        SubScores {
            vocabulary,
            grammar,
            cohesion,
        }
    }

    #[test]
    fn weighted_composite_matches_expected() {
        let (level, overall) = map_to_level(&scores(72.0, 68.0, 70.0));
        assert!((overall - 70.4).abs() < 1e-9);
        assert_eq!(level, CefrLevel::B1);
    }

    #[test]
    fn threshold_boundaries_are_inclusive_upper_bounds() {
        // overall = value when all three dimensions are equal
        let (level, overall) = map_to_level(&scores(20.0, 20.0, 20.0));
        assert_eq!(overall, 20.0);
        assert_eq!(level, CefrLevel::A1);

        let (level, _) = map_to_level(&scores(20.01, 20.01, 20.01));
        assert_eq!(level, CefrLevel::A2);

        let (level, overall) = map_to_level(&scores(90.0, 90.0, 90.0));
        assert_eq!(overall, 90.0);
        assert_eq!(level, CefrLevel::C1);

        let (level, _) = map_to_level(&scores(90.01, 90.01, 90.01));
        assert_eq!(level, CefrLevel::C2);
    }

    #[test]
    fn all_bands_reachable() {
        assert_eq!(map_to_level(&scores(10.0, 10.0, 10.0)).0, CefrLevel::A1);
        assert_eq!(map_to_level(&scores(30.0, 30.0, 30.0)).0, CefrLevel::A2);
        assert_eq!(map_to_level(&scores(50.0, 50.0, 50.0)).0, CefrLevel::B1);
        assert_eq!(map_to_level(&scores(70.0, 70.0, 70.0)).0, CefrLevel::B2);
        assert_eq!(map_to_level(&scores(85.0, 85.0, 85.0)).0, CefrLevel::C1);
        assert_eq!(map_to_level(&scores(95.0, 95.0, 95.0)).0, CefrLevel::C2);
    }

    #[test]
    fn out_of_range_inputs_still_classify() {
        let (level, overall) = map_to_level(&scores(150.0, 150.0, 150.0));
        assert_eq!(overall, 100.0);
        assert_eq!(level, CefrLevel::C2);

        let (level, overall) = map_to_level(&scores(-40.0, -5.0, -1.0));
        assert_eq!(overall, 0.0);
        assert_eq!(level, CefrLevel::A1);

        let (level, _) = map_to_level(&scores(f64::NAN, 50.0, 50.0));
        assert_eq!(level, CefrLevel::A2);
    }

    #[test]
    fn monotonic_in_each_dimension() {
        // Increasing any one sub-score while holding the others fixed never
        // decreases the resulting level.
        let steps: Vec<f64> = (0..=20).map(|i| i as f64 * 5.0).collect();
        for &base in &[10.0, 40.0, 70.0] {
            let mut prev_rank = i8::MIN;
            for &v in &steps {
                let (level, _) = map_to_level(&scores(v, base, base));
                assert!(level.rank() >= prev_rank, "vocabulary not monotonic");
                prev_rank = level.rank();
            }
            let mut prev_rank = i8::MIN;
            for &g in &steps {
                let (level, _) = map_to_level(&scores(base, g, base));
                assert!(level.rank() >= prev_rank, "grammar not monotonic");
                prev_rank = level.rank();
            }
            let mut prev_rank = i8::MIN;
            for &c in &steps {
                let (level, _) = map_to_level(&scores(base, base, c));
                assert!(level.rank() >= prev_rank, "cohesion not monotonic");
                prev_rank = level.rank();
            }
        }
    }
}
