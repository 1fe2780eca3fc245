use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::options::StudyOption;

/// Overdue milestones stay visible for this many days.
pub const DEFAULT_OVERDUE_DAYS: i64 = 30;

/// Milestones further out than this are hidden.
pub const DEFAULT_HORIZON_DAYS: i64 = 365;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Visibility window for upcoming deadlines.
///
/// Example YAML:
/// ```yaml
/// deadlines:
///   overdue_days: 30
///   horizon_days: 365
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DeadlineConfig {
    #[serde(default)]
    pub overdue_days: Option<i64>,

    #[serde(default)]
    pub horizon_days: Option<i64>,
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        Self {
            overdue_days: Some(DEFAULT_OVERDUE_DAYS),
            horizon_days: Some(DEFAULT_HORIZON_DAYS),
        }
    }
}

impl DeadlineConfig {
    pub fn overdue_days(&self) -> i64 {
        self.overdue_days.unwrap_or(DEFAULT_OVERDUE_DAYS)
    }

    pub fn horizon_days(&self) -> i64 {
        self.horizon_days.unwrap_or(DEFAULT_HORIZON_DAYS)
    }

    /// Both bounds are exclusive.
    pub fn contains(&self, days_left: i64) -> bool {
        days_left > -self.overdue_days() && days_left < self.horizon_days()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MilestoneKind {
    Application,
    Visa,
    Housing,
    SemesterStart,
}

impl MilestoneKind {
    pub fn label(&self) -> &'static str {
        match self {
            MilestoneKind::Application => "Application",
            MilestoneKind::Visa => "Visa",
            MilestoneKind::Housing => "Housing",
            MilestoneKind::SemesterStart => "Semester start",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Deadline<'a> {
    pub option: &'a StudyOption,
    pub kind: MilestoneKind,
    pub date: NaiveDate,
    pub days_left: i64,
}

/// The dated milestones of one option, in display order, skipping unset dates.
pub fn milestones(option: &StudyOption) -> Vec<(MilestoneKind, NaiveDate)> {
    [
        (MilestoneKind::Application, option.application_deadline),
        (MilestoneKind::Visa, option.visa_deadline),
        (MilestoneKind::Housing, option.housing_deadline),
        (MilestoneKind::SemesterStart, option.semester_start),
    ]
    .into_iter()
    .filter_map(|(kind, date)| date.map(|d| (kind, d)))
    .collect()
}

/// Whole days from `now` until midnight UTC of `date`, rounded up.
pub fn days_until(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let deadline = date.and_time(NaiveTime::MIN).and_utc();
    let millis = (deadline - now).num_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        days
    } else {
        days + 1
    }
}

/// Milestones of all active options inside the window, soonest (or most
/// overdue) first.
pub fn upcoming_deadlines<'a>(
    options: &'a [StudyOption],
    now: DateTime<Utc>,
    config: &DeadlineConfig,
) -> Vec<Deadline<'a>> {
    let mut deadlines: Vec<Deadline<'a>> = options
        .iter()
        .filter(|option| option.is_active())
        .flat_map(|option| {
            milestones(option)
                .into_iter()
                .map(move |(kind, date)| Deadline {
                    option,
                    kind,
                    date,
                    days_left: days_until(date, now),
                })
        })
        .filter(|deadline| config.contains(deadline.days_left))
        .collect();

    deadlines.sort_by_key(|deadline| deadline.days_left);
    deadlines
}
