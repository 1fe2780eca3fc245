pub mod badges;

pub use badges::{badges_for, Badge};

use crate::options::{filter_active, StudyOption};
use crate::scoring::{breakdown_with_bounds, CohortBounds, ScoreBreakdown, ScoringConfig, Weights};

/// An active option with its breakdown and 1-based rank position.
#[derive(Debug, Clone)]
pub struct RankedOption<'a> {
    pub rank: usize,
    pub option: &'a StudyOption,
    pub breakdown: ScoreBreakdown,
}

/// Rank the active options by final score, highest first.
///
/// Discarded options are dropped before scoring, so cost and rent are
/// normalized against the active cohort only. Ties keep input order.
pub fn rank<'a>(
    options: &'a [StudyOption],
    weights: &Weights,
    config: &ScoringConfig,
) -> Vec<RankedOption<'a>> {
    let active = filter_active(options);
    let bounds = CohortBounds::from_options(active.iter().copied(), config);

    let mut scored: Vec<_> = active
        .into_iter()
        .map(|option| (option, breakdown_with_bounds(option, &bounds, weights, config)))
        .collect();

    // sort_by is stable, which keeps insertion order for equal scores
    scored.sort_by(|a, b| b.1.final_score.total_cmp(&a.1.final_score));

    tracing::debug!(ranked = scored.len(), total = options.len(), "ranked options");

    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (option, breakdown))| RankedOption {
            rank: idx + 1,
            option,
            breakdown,
        })
        .collect()
}

/// Look up an option by id, or by its 1-based rank when the key is a number
/// and no id matches. Discarded options are reachable by id only.
pub fn resolve<'a>(
    options: &'a [StudyOption],
    ranked: &[RankedOption<'a>],
    key: &str,
) -> Option<&'a StudyOption> {
    let key = key.trim();
    options.iter().find(|option| option.id == key).or_else(|| {
        key.parse::<usize>()
            .ok()
            .filter(|position| *position >= 1)
            .and_then(|position| ranked.get(position - 1))
            .map(|ranked| ranked.option)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Status;
    use crate::scoring::Category;
    use chrono::Utc;

    fn sample_option(id: &str, monthly_rent: f64, stem_reputation: f64) -> StudyOption {
        let mut option = StudyOption::new(id, id.to_uppercase(), Utc::now());
        option.monthly_rent = monthly_rent;
        option.stem_reputation = stem_reputation;
        option
    }

    #[test]
    fn test_empty_cohort_ranks_nothing() {
        let ranked = rank(&[], &Weights::default(), &ScoringConfig::default());
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_cheaper_option_ranks_first_when_only_cost_weighted() {
        let options = vec![sample_option("b", 2000.0, 5.0), sample_option("a", 1000.0, 9.0)];
        let weights = Weights::zero().with(Category::Cost, 10.0);

        let ranked = rank(&options, &weights, &ScoringConfig::default());

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].option.id, "a");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].breakdown.cost_score, 5.0);
        assert_eq!(ranked[0].breakdown.final_score, ranked[0].breakdown.cost_score);
        assert_eq!(ranked[1].option.id, "b");
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[1].breakdown.cost_score, 0.0);
        assert_eq!(ranked[1].breakdown.final_score, 0.0);
    }

    #[test]
    fn test_discarded_excluded_from_ranking_and_cohort() {
        let mut expensive = sample_option("gone", 9000.0, 10.0);
        expensive.status = Status::Discarded;
        let options = vec![
            sample_option("a", 1000.0, 5.0),
            expensive,
            sample_option("b", 2000.0, 5.0),
        ];
        let weights = Weights::zero().with(Category::Cost, 1.0);

        let ranked = rank(&options, &weights, &ScoringConfig::default());

        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.option.id != "gone"));
        // Cohort max is 2000, not 9000
        assert_eq!(ranked[1].option.id, "b");
        assert_eq!(ranked[1].breakdown.cost_score, 0.0);
        assert_eq!(ranked[0].breakdown.cost_score, 5.0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let options = vec![
            sample_option("first", 1000.0, 7.0),
            sample_option("second", 1000.0, 7.0),
            sample_option("third", 1000.0, 7.0),
        ];

        let ranked = rank(&options, &Weights::default(), &ScoringConfig::default());

        let ids: Vec<_> = ranked.iter().map(|r| r.option.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
        let ranks: Vec<_> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_sorted_descending() {
        let options = vec![
            sample_option("low", 1000.0, 2.0),
            sample_option("high", 1000.0, 10.0),
            sample_option("mid", 1000.0, 6.0),
        ];
        let weights = Weights::zero().with(Category::Stem, 1.0);

        let ranked = rank(&options, &weights, &ScoringConfig::default());

        let ids: Vec<_> = ranked.iter().map(|r| r.option.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
        for pair in ranked.windows(2) {
            assert!(pair[0].breakdown.final_score >= pair[1].breakdown.final_score);
        }
    }

    #[test]
    fn test_resolve_by_id_then_rank() {
        let mut gone = sample_option("gone", 100.0, 10.0);
        gone.status = Status::Discarded;
        let options = vec![
            sample_option("low", 1000.0, 2.0),
            gone,
            sample_option("high", 1000.0, 10.0),
        ];
        let weights = Weights::zero().with(Category::Stem, 1.0);
        let ranked = rank(&options, &weights, &ScoringConfig::default());

        assert_eq!(resolve(&options, &ranked, "low").unwrap().id, "low");
        assert_eq!(resolve(&options, &ranked, "gone").unwrap().id, "gone");
        assert_eq!(resolve(&options, &ranked, "1").unwrap().id, "high");
        assert_eq!(resolve(&options, &ranked, " 2 ").unwrap().id, "low");
        assert!(resolve(&options, &ranked, "0").is_none());
        assert!(resolve(&options, &ranked, "3").is_none());
        assert!(resolve(&options, &ranked, "nope").is_none());
    }
}
