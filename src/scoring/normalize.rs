/// Synthetic upper bound mixed into every cohort so a single option or an
/// all-zero cohort still has a non-degenerate range.
pub const COHORT_CEILING: f64 = 1.0;

/// Synthetic lower bound mixed into every cohort.
pub const COHORT_FLOOR: f64 = 0.0;

/// Range used when the cohort's min equals its max.
pub const RANGE_FALLBACK: f64 = 1.0;

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 10.0;

/// Ratings are authored on the 0-10 scale already, so only costs are
/// normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Cheaper is better: the cohort minimum scores 10.
    LowerIsBetter,
}

/// Min/max of a cohort after mixing in the synthetic floor and ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

impl Bounds {
    pub fn from_values<I>(values: I, floor: f64, ceiling: f64, range_fallback: f64) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = values
            .into_iter()
            .fold((floor, ceiling), |(min, max), v| (min.min(v), max.max(v)));
        let range = max - min;
        let range = if range == 0.0 { range_fallback } else { range };
        Self { min, max, range }
    }

    /// Map a raw value onto the 0-10 scale. Unrounded.
    pub fn normalize(&self, value: f64, direction: Direction) -> f64 {
        let distance = match direction {
            Direction::LowerIsBetter => self.max - value,
        };
        (distance / self.range * SCORE_MAX).clamp(SCORE_MIN, SCORE_MAX)
    }
}

/// Normalize `value` against `cohort` with the default fallback constants.
pub fn normalize(value: f64, cohort: &[f64], direction: Direction) -> f64 {
    Bounds::from_values(
        cohort.iter().copied(),
        COHORT_FLOOR,
        COHORT_CEILING,
        RANGE_FALLBACK,
    )
    .normalize(value, direction)
}

/// Arithmetic mean; 0 for no inputs.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Round to one decimal place, half away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
