use super::config::ScoringConfig;
use super::weights::{Category, Weights};

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(score) = config.bureaucracy_score {
        if !score.is_finite() || !(0.0..=10.0).contains(&score) {
            errors.push(format!(
                "scoring.bureaucracy_score: must be between 0 and 10, got {}",
                score
            ));
        }
    }

    if let Some(fallback) = config.range_fallback {
        if !fallback.is_finite() || fallback <= 0.0 {
            errors.push(format!(
                "scoring.range_fallback: must be positive, got {}",
                fallback
            ));
        }
    }

    for (name, value) in [
        ("cohort_floor", config.cohort_floor),
        ("cohort_ceiling", config.cohort_ceiling),
    ] {
        if let Some(v) = value {
            if !v.is_finite() {
                errors.push(format!("scoring.{}: must be a finite number", name));
            }
        }
    }

    if config.cohort_floor() >= config.cohort_ceiling() {
        errors.push(format!(
            "scoring.cohort_floor ({}) must be below scoring.cohort_ceiling ({})",
            config.cohort_floor(),
            config.cohort_ceiling()
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Weights must be finite and non-negative. Values above 10 are allowed.
pub fn validate_weights(weights: &Weights) -> Result<(), Vec<String>> {
    let errors: Vec<String> = Category::ALL
        .iter()
        .filter_map(|category| {
            let value = weights.get(*category);
            if !value.is_finite() || value < 0.0 {
                Some(format!(
                    "weights.{}: must be a non-negative number, got {}",
                    category.weight_key(),
                    value
                ))
            } else {
                None
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
