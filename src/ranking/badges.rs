use serde::Serialize;
use std::fmt;

use crate::options::{filter_active, StudyOption};
use crate::scoring::{
    breakdown_with_bounds, mean, monthly_total, CohortBounds, ScoringConfig, Weights,
};

/// Superlative tags an option can earn against the active cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Badge {
    Cheapest,
    BestStem,
    BestCareer,
    BestQualityOfLife,
    BestOverall,
}

impl Badge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Badge::Cheapest => "cheapest",
            Badge::BestStem => "best-stem",
            Badge::BestCareer => "best-career",
            Badge::BestQualityOfLife => "best-quality-of-life",
            Badge::BestOverall => "best-overall",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::Cheapest => "Cheapest",
            Badge::BestStem => "Best STEM",
            Badge::BestCareer => "Best for career",
            Badge::BestQualityOfLife => "Best quality of life",
            Badge::BestOverall => "Best overall",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Career badge metric: internships, networking and startups. University jobs
/// count toward the work category score but not here.
fn career_metric(option: &StudyOption) -> f64 {
    mean(&[
        option.internship_chance,
        option.networking_quality,
        option.startup_ecosystem,
    ])
}

fn cohort_max<F>(cohort: &[&StudyOption], metric: F) -> f64
where
    F: Fn(&StudyOption) -> f64,
{
    cohort
        .iter()
        .map(|&option| metric(option))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Badges `option` earns within the active members of `options`.
///
/// Needs at least two active options. Comparisons are exact, so ties give the
/// badge to every option holding the extreme value.
pub fn badges_for(
    option: &StudyOption,
    options: &[StudyOption],
    weights: &Weights,
    config: &ScoringConfig,
) -> Vec<Badge> {
    let cohort = filter_active(options);
    let mut badges = Vec::new();
    if cohort.len() < 2 {
        return badges;
    }

    let min_cost = cohort
        .iter()
        .map(|&o| monthly_total(o))
        .fold(f64::INFINITY, f64::min);
    if monthly_total(option) == min_cost {
        badges.push(Badge::Cheapest);
    }

    if option.stem_reputation == cohort_max(&cohort, |o| o.stem_reputation) {
        badges.push(Badge::BestStem);
    }

    if career_metric(option) == cohort_max(&cohort, career_metric) {
        badges.push(Badge::BestCareer);
    }

    if option.quality_of_life == cohort_max(&cohort, |o| o.quality_of_life) {
        badges.push(Badge::BestQualityOfLife);
    }

    let bounds = CohortBounds::from_options(cohort.iter().copied(), config);
    let final_score = |o: &StudyOption| breakdown_with_bounds(o, &bounds, weights, config).final_score;
    if final_score(option) == cohort_max(&cohort, final_score) {
        badges.push(Badge::BestOverall);
    }

    badges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Status;
    use chrono::Utc;

    fn sample_option(id: &str, rent: f64, stem: f64, quality_of_life: f64) -> StudyOption {
        let mut option = StudyOption::new(id, id.to_uppercase(), Utc::now());
        option.monthly_rent = rent;
        option.stem_reputation = stem;
        option.quality_of_life = quality_of_life;
        option
    }

    #[test]
    fn test_needs_two_active_options() {
        let mut discarded = sample_option("b", 500.0, 1.0, 1.0);
        discarded.status = Status::Discarded;
        let options = vec![sample_option("a", 1000.0, 9.0, 9.0), discarded];

        let badges = badges_for(
            &options[0],
            &options,
            &Weights::default(),
            &ScoringConfig::default(),
        );
        assert!(badges.is_empty());
    }

    #[test]
    fn test_empty_cohort() {
        let option = sample_option("a", 1000.0, 9.0, 9.0);
        let badges = badges_for(&option, &[], &Weights::default(), &ScoringConfig::default());
        assert!(badges.is_empty());
    }

    #[test]
    fn test_each_badge_goes_to_the_leader() {
        let mut career = sample_option("career", 1500.0, 6.0, 5.0);
        career.internship_chance = 9.0;
        career.networking_quality = 9.0;
        career.startup_ecosystem = 9.0;
        let options = vec![
            sample_option("cheap", 500.0, 5.0, 6.0),
            sample_option("stem", 1200.0, 10.0, 7.0),
            sample_option("qol", 1400.0, 6.0, 10.0),
            career,
        ];
        let weights = Weights::default();
        let config = ScoringConfig::default();

        let badges: Vec<_> = options
            .iter()
            .map(|o| badges_for(o, &options, &weights, &config))
            .collect();

        assert!(badges[0].contains(&Badge::Cheapest));
        assert!(!badges[1].contains(&Badge::Cheapest));
        assert!(badges[1].contains(&Badge::BestStem));
        assert!(badges[2].contains(&Badge::BestQualityOfLife));
        assert!(badges[3].contains(&Badge::BestCareer));

        let overall = badges.iter().filter(|b| b.contains(&Badge::BestOverall)).count();
        assert!(overall >= 1);
    }

    #[test]
    fn test_cheapest_ties_all_qualify() {
        let options = vec![
            sample_option("a", 800.0, 5.0, 5.0),
            sample_option("b", 800.0, 6.0, 6.0),
            sample_option("c", 1200.0, 7.0, 7.0),
        ];
        let weights = Weights::default();
        let config = ScoringConfig::default();

        assert!(badges_for(&options[0], &options, &weights, &config).contains(&Badge::Cheapest));
        assert!(badges_for(&options[1], &options, &weights, &config).contains(&Badge::Cheapest));
        assert!(!badges_for(&options[2], &options, &weights, &config).contains(&Badge::Cheapest));
    }

    #[test]
    fn test_identical_options_share_every_badge() {
        let options = vec![
            sample_option("a", 900.0, 8.0, 8.0),
            sample_option("b", 900.0, 8.0, 8.0),
        ];
        let badges = badges_for(
            &options[1],
            &options,
            &Weights::default(),
            &ScoringConfig::default(),
        );
        assert_eq!(
            badges,
            vec![
                Badge::Cheapest,
                Badge::BestStem,
                Badge::BestCareer,
                Badge::BestQualityOfLife,
                Badge::BestOverall,
            ]
        );
    }

    #[test]
    fn test_discarded_option_does_not_set_the_bar() {
        let mut discarded = sample_option("gone", 100.0, 10.0, 10.0);
        discarded.status = Status::Discarded;
        let options = vec![
            sample_option("a", 700.0, 8.0, 8.0),
            sample_option("b", 900.0, 6.0, 6.0),
            discarded,
        ];
        let badges = badges_for(
            &options[0],
            &options,
            &Weights::default(),
            &ScoringConfig::default(),
        );
        assert!(badges.contains(&Badge::Cheapest));
        assert!(badges.contains(&Badge::BestStem));
        assert!(badges.contains(&Badge::BestQualityOfLife));
    }

    #[test]
    fn test_badge_identifiers() {
        assert_eq!(Badge::BestQualityOfLife.as_str(), "best-quality-of-life");
        assert_eq!(
            serde_json::to_value(Badge::BestQualityOfLife).unwrap(),
            "best-quality-of-life"
        );
    }
}
