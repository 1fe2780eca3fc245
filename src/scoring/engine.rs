use serde::Serialize;

use super::config::ScoringConfig;
use super::costs::monthly_total;
use super::normalize::{mean, round1, Bounds, Direction};
use super::weights::{Category, Weights};
use crate::options::StudyOption;

/// Per-category 0-10 scores plus the weighted final score for one option,
/// each rounded to one decimal place. Derived on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub cost_score: f64,
    pub housing_score: f64,
    pub stem_score: f64,
    pub work_score: f64,
    pub adaptation_score: f64,
    pub quality_score: f64,
    pub climate_score: f64,
    pub student_life_score: f64,
    pub bureaucracy_score: f64,
    pub emotional_score: f64,
    pub final_score: f64,
}

impl ScoreBreakdown {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Cost => self.cost_score,
            Category::Housing => self.housing_score,
            Category::Stem => self.stem_score,
            Category::Work => self.work_score,
            Category::Adaptation => self.adaptation_score,
            Category::Quality => self.quality_score,
            Category::Climate => self.climate_score,
            Category::StudentLife => self.student_life_score,
            Category::Bureaucracy => self.bureaucracy_score,
            Category::EmotionalFit => self.emotional_score,
        }
    }
}

/// Min/max of monthly totals and rents across a cohort.
///
/// Computed once per cohort so ranking stays linear in the number of options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CohortBounds {
    pub monthly: Bounds,
    pub rent: Bounds,
}

impl CohortBounds {
    pub fn from_options<'a, I>(cohort: I, config: &ScoringConfig) -> Self
    where
        I: IntoIterator<Item = &'a StudyOption> + Clone,
    {
        Self {
            monthly: config.bounds(cohort.clone().into_iter().map(monthly_total)),
            rent: config.bounds(cohort.into_iter().map(|o| o.monthly_rent)),
        }
    }
}

/// STEM strength: mean of the five academic ratings.
pub fn stem_score(option: &StudyOption) -> f64 {
    mean(&[
        option.stem_reputation,
        option.research_opportunities,
        option.lab_access,
        option.credit_compatibility,
        option.english_courses,
    ])
}

pub fn work_score(option: &StudyOption) -> f64 {
    mean(&[
        option.internship_chance,
        option.networking_quality,
        option.startup_ecosystem,
        option.university_jobs,
    ])
}

pub fn adaptation_score(option: &StudyOption) -> f64 {
    mean(&[
        option.language_difficulty,
        option.international_community,
        option.public_transport,
    ])
}

pub fn quality_score(option: &StudyOption) -> f64 {
    mean(&[option.safety, option.quality_of_life])
}

/// No authored student-life rating exists; derived from community, transport
/// and quality of life.
pub fn student_life_score(option: &StudyOption) -> f64 {
    mean(&[
        option.international_community,
        option.public_transport,
        option.quality_of_life,
    ])
}

/// Unrounded category scores, indexed like `Category::ALL`.
fn category_scores(
    option: &StudyOption,
    bounds: &CohortBounds,
    config: &ScoringConfig,
) -> [f64; 10] {
    Category::ALL.map(|category| match category {
        Category::Cost => bounds
            .monthly
            .normalize(monthly_total(option), Direction::LowerIsBetter),
        Category::Housing => bounds
            .rent
            .normalize(option.monthly_rent, Direction::LowerIsBetter),
        Category::Stem => stem_score(option),
        Category::Work => work_score(option),
        Category::Adaptation => adaptation_score(option),
        Category::Quality => quality_score(option),
        Category::Climate => option.climate_score,
        Category::StudentLife => student_life_score(option),
        Category::Bureaucracy => config.bureaucracy_score(),
        Category::EmotionalFit => option.emotional_score,
    })
}

/// Weighted mean of category scores. An all-zero weight sum divides by 1.
pub fn weighted_score(scores: &[f64; 10], weights: &Weights) -> f64 {
    let total_weight = weights.total();
    let denominator = if total_weight == 0.0 { 1.0 } else { total_weight };
    let weighted: f64 = Category::ALL
        .iter()
        .zip(scores)
        .map(|(category, score)| score * weights.get(*category))
        .sum();
    weighted / denominator
}

/// Score one option against precomputed cohort bounds.
pub fn breakdown_with_bounds(
    option: &StudyOption,
    bounds: &CohortBounds,
    weights: &Weights,
    config: &ScoringConfig,
) -> ScoreBreakdown {
    let scores = category_scores(option, bounds, config);
    let final_score = weighted_score(&scores, weights);
    let [cost, housing, stem, work, adaptation, quality, climate, student_life, bureaucracy, emotional] =
        scores.map(round1);

    ScoreBreakdown {
        cost_score: cost,
        housing_score: housing,
        stem_score: stem,
        work_score: work,
        adaptation_score: adaptation,
        quality_score: quality,
        climate_score: climate,
        student_life_score: student_life,
        bureaucracy_score: bureaucracy,
        emotional_score: emotional,
        final_score: round1(final_score),
    }
}

/// Score one option against `cohort`, which is used only for the min/max of
/// monthly totals and rents. The cohort is not filtered by status here.
pub fn compute_breakdown(
    option: &StudyOption,
    cohort: &[StudyOption],
    weights: &Weights,
    config: &ScoringConfig,
) -> ScoreBreakdown {
    let bounds = CohortBounds::from_options(cohort, config);
    breakdown_with_bounds(option, &bounds, weights, config)
}
