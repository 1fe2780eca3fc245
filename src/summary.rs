use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::deadlines::{upcoming_deadlines, DeadlineConfig};
use crate::options::{Status, StudyOption};
use crate::ranking::rank;
use crate::scoring::{monthly_total, ScoringConfig, Weights};

/// Deadlines this close (or overdue) count as urgent.
pub const URGENT_DAYS: i64 = 30;

/// How many top-ranked options the dashboard lists.
pub const TOP_RANKED: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopOption {
    pub id: String,
    pub name: String,
    pub final_score: f64,
}

/// Headline numbers for the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_options: usize,
    /// Candidate or approved.
    pub candidates: usize,
    pub favorites: usize,
    /// Over every option, discarded included; 0 when there are none.
    pub average_monthly: f64,
    pub average_six_months: f64,
    pub urgent_deadlines: usize,
    pub top: Vec<TopOption>,
}

pub fn summarize(
    options: &[StudyOption],
    weights: &Weights,
    scoring: &ScoringConfig,
    deadlines: &DeadlineConfig,
    now: DateTime<Utc>,
) -> DashboardSummary {
    let average_monthly = if options.is_empty() {
        0.0
    } else {
        (options.iter().map(monthly_total).sum::<f64>() / options.len() as f64).round()
    };

    let urgent_deadlines = upcoming_deadlines(options, now, deadlines)
        .iter()
        .filter(|deadline| deadline.days_left <= URGENT_DAYS)
        .count();

    let top = rank(options, weights, scoring)
        .into_iter()
        .take(TOP_RANKED)
        .map(|ranked| TopOption {
            id: ranked.option.id.clone(),
            name: ranked.option.name.clone(),
            final_score: ranked.breakdown.final_score,
        })
        .collect();

    DashboardSummary {
        total_options: options.len(),
        candidates: options
            .iter()
            .filter(|o| matches!(o.status, Status::Candidate | Status::Approved))
            .count(),
        favorites: options.iter().filter(|o| o.is_favorite).count(),
        average_monthly,
        average_six_months: (average_monthly * 6.0).round(),
        urgent_deadlines,
        top,
    }
}
