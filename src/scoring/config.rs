use serde::{Deserialize, Serialize};

use super::normalize::{Bounds, COHORT_CEILING, COHORT_FLOOR, RANGE_FALLBACK};

/// Score given to the bureaucracy category. The option record has no
/// authored input for it yet, so every option gets the same value.
pub const DEFAULT_BUREAUCRACY_SCORE: f64 = 7.0;

/// Scoring policy constants.
///
/// Every field is optional; unset fields fall back to the built-in constants.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   bureaucracy_score: 6
///   range_fallback: 1
///   cohort_floor: 0
///   cohort_ceiling: 1
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Fixed 0-10 score for the bureaucracy category (default: 7)
    #[serde(default)]
    pub bureaucracy_score: Option<f64>,

    /// Range used when a cohort's min equals its max (default: 1)
    #[serde(default)]
    pub range_fallback: Option<f64>,

    /// Value mixed into every cost cohort as a lower bound (default: 0)
    #[serde(default)]
    pub cohort_floor: Option<f64>,

    /// Value mixed into every cost cohort as an upper bound (default: 1)
    #[serde(default)]
    pub cohort_ceiling: Option<f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            bureaucracy_score: Some(DEFAULT_BUREAUCRACY_SCORE),
            range_fallback: Some(RANGE_FALLBACK),
            cohort_floor: Some(COHORT_FLOOR),
            cohort_ceiling: Some(COHORT_CEILING),
        }
    }
}

impl ScoringConfig {
    pub fn bureaucracy_score(&self) -> f64 {
        self.bureaucracy_score.unwrap_or(DEFAULT_BUREAUCRACY_SCORE)
    }

    pub fn range_fallback(&self) -> f64 {
        self.range_fallback.unwrap_or(RANGE_FALLBACK)
    }

    pub fn cohort_floor(&self) -> f64 {
        self.cohort_floor.unwrap_or(COHORT_FLOOR)
    }

    pub fn cohort_ceiling(&self) -> f64 {
        self.cohort_ceiling.unwrap_or(COHORT_CEILING)
    }

    /// Bounds of a cost cohort under this policy.
    pub fn bounds<I>(&self, values: I) -> Bounds
    where
        I: IntoIterator<Item = f64>,
    {
        Bounds::from_values(
            values,
            self.cohort_floor(),
            self.cohort_ceiling(),
            self.range_fallback(),
        )
    }
}
