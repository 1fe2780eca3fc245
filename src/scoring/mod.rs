pub mod config;
pub mod costs;
pub mod engine;
pub mod normalize;
pub mod validation;
pub mod weights;

pub use config::{ScoringConfig, DEFAULT_BUREAUCRACY_SCORE};
pub use costs::{
    monthly_total, multi_month_total, one_time_total, six_month_total, DEFAULT_PROJECTION_MONTHS,
};
pub use engine::{breakdown_with_bounds, compute_breakdown, CohortBounds, ScoreBreakdown};
pub use normalize::{mean, normalize, round1, Bounds, Direction};
pub use validation::{validate_scoring, validate_weights};
pub use weights::{default_presets, Category, WeightPreset, Weights};
