use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::lenient;

/// Lifecycle of an option: interested -> candidate -> approved, or discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Interested,
    Candidate,
    Approved,
    Discarded,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Interested,
        Status::Candidate,
        Status::Approved,
        Status::Discarded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Interested => "interested",
            Status::Candidate => "candidate",
            Status::Approved => "approved",
            Status::Discarded => "discarded",
        }
    }

    /// Discarded is terminal; every other status may move anywhere.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Discarded)
    }

    pub fn can_transition_to(&self, next: Status) -> bool {
        !self.is_terminal() || next == *self
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown status '{}' (expected interested, candidate, approved or discarded)",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    A,
    B,
    C,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegretRisk {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub date: DateTime<Utc>,
    pub text: String,
}

/// Fixed pre-departure tasks every new option starts with, as (id, label).
pub const DEFAULT_CHECKLIST: [(&str, &str); 12] = [
    ("application", "Application submitted"),
    ("docs", "Documents translated"),
    ("acceptance", "Acceptance letter received"),
    ("passport", "Valid passport"),
    ("visa", "Visa requested"),
    ("insurance", "Insurance purchased"),
    ("housing", "Housing confirmed"),
    ("flight", "Flight booked"),
    ("courses", "Courses approved"),
    ("financial", "Financial plan closed"),
    ("bank", "International bank account opened"),
    ("chip", "International SIM/internet"),
];

pub fn default_checklist() -> Vec<ChecklistItem> {
    DEFAULT_CHECKLIST
        .iter()
        .map(|(id, label)| ChecklistItem {
            id: id.to_string(),
            label: label.to_string(),
            completed: false,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistProgress {
    pub completed: usize,
    pub total: usize,
    pub percent: u32,
}

/// A candidate study/relocation destination.
///
/// Field names serialize in camelCase so records can be exchanged with the
/// persistence service as-is. Absent numbers read as 0, absent lists as empty,
/// absent status as `interested`, and empty date strings as "not set".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyOption {
    pub id: String,
    pub name: String,
    pub acronym: String,
    pub city: String,
    pub country: String,
    pub flag: String,
    #[serde(deserialize_with = "lenient::number")]
    pub lat: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub lng: f64,
    pub website: String,
    pub stem_focus: Vec<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub status: Status,
    #[serde(deserialize_with = "lenient::optional")]
    pub priority: Option<Priority>,
    pub is_favorite: bool,

    // Monthly costs
    #[serde(deserialize_with = "lenient::number")]
    pub monthly_rent: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub monthly_food: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub monthly_transport: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub monthly_phone: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub monthly_academic: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub monthly_leisure: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub monthly_travel: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub monthly_health: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub monthly_misc: f64,

    // One-time arrival costs
    #[serde(deserialize_with = "lenient::number")]
    pub flight_cost: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub visa_cost: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub housing_deposit: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub setup_cost: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub insurance_cost: f64,

    /// Monthly income offset
    #[serde(deserialize_with = "lenient::number")]
    pub scholarship: f64,

    // Academic (0-10)
    #[serde(deserialize_with = "lenient::number")]
    pub stem_reputation: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub research_opportunities: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub english_courses: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub credit_compatibility: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub lab_access: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub academic_intensity: f64,

    // Career (0-10)
    #[serde(deserialize_with = "lenient::number")]
    pub internship_chance: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub networking_quality: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub startup_ecosystem: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub university_jobs: f64,

    // Adaptation (0-10)
    /// Inverted at input time: 10 means the language is easy.
    #[serde(deserialize_with = "lenient::number")]
    pub language_difficulty: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub climate_score: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub safety: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub quality_of_life: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub international_community: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub public_transport: f64,

    // Personal fit
    #[serde(deserialize_with = "lenient::number")]
    pub emotional_score: f64,
    pub regret_risk: RegretRisk,

    pub language: String,
    pub climate: String,
    pub professor_of_interest: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub red_flags: Vec<String>,
    pub notes: String,
    pub links: Vec<String>,

    // Timeline
    #[serde(with = "lenient::date")]
    pub application_deadline: Option<NaiveDate>,
    #[serde(with = "lenient::date")]
    pub visa_deadline: Option<NaiveDate>,
    #[serde(with = "lenient::date")]
    pub housing_deadline: Option<NaiveDate>,
    #[serde(with = "lenient::date")]
    pub semester_start: Option<NaiveDate>,
    #[serde(with = "lenient::date")]
    pub semester_end: Option<NaiveDate>,

    #[serde(default = "default_checklist")]
    pub checklist: Vec<ChecklistItem>,
    /// Insertion order; see `diary_recent_first` for display order.
    pub diary: Vec<DiaryEntry>,

    #[serde(deserialize_with = "lenient::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl StudyOption {
    /// Create a blank option with the default checklist and fresh timestamps.
    pub fn new(id: impl Into<String>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            checklist: default_checklist(),
            created_at: now,
            updated_at: now,
            ..Default::default()
        }
    }

    /// An option takes part in ranking, badges and deadlines unless discarded.
    pub fn is_active(&self) -> bool {
        self.status != Status::Discarded
    }

    /// Display name prefixed with the flag glyph when one is set
    pub fn display_name(&self) -> String {
        if self.flag.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.flag, self.name)
        }
    }

    pub fn checklist_progress(&self) -> ChecklistProgress {
        let total = self.checklist.len();
        let completed = self.checklist.iter().filter(|item| item.completed).count();
        let percent = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        };
        ChecklistProgress {
            completed,
            total,
            percent,
        }
    }

    pub fn diary_recent_first(&self) -> impl Iterator<Item = &DiaryEntry> {
        self.diary.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("candidate".parse::<Status>().unwrap(), Status::Candidate);
        assert_eq!(" Approved ".parse::<Status>().unwrap(), Status::Approved);
        assert!("maybe".parse::<Status>().is_err());
        assert_eq!(Status::Discarded.to_string(), "discarded");
    }

    #[test]
    fn test_discarded_is_terminal() {
        assert!(Status::Interested.can_transition_to(Status::Approved));
        assert!(Status::Approved.can_transition_to(Status::Interested));
        assert!(Status::Candidate.can_transition_to(Status::Discarded));
        assert!(!Status::Discarded.can_transition_to(Status::Candidate));
        assert!(Status::Discarded.can_transition_to(Status::Discarded));
    }

    #[test]
    fn test_default_checklist_ids_are_distinct() {
        let checklist = default_checklist();
        assert_eq!(checklist.len(), 12);
        let mut ids: Vec<_> = checklist.iter().map(|item| item.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 12);
        assert!(checklist.iter().all(|item| !item.completed));
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let json = r#"{ "id": "tum", "name": "TU Munich", "monthlyRent": 800 }"#;
        let option: StudyOption = serde_json::from_str(json).unwrap();
        assert_eq!(option.id, "tum");
        assert_eq!(option.monthly_rent, 800.0);
        assert_eq!(option.monthly_food, 0.0);
        assert_eq!(option.status, Status::Interested);
        assert!(option.pros.is_empty());
        assert_eq!(option.checklist.len(), 12);
        assert!(option.application_deadline.is_none());
    }

    #[test]
    fn test_deserialize_tolerates_malformed_numbers_and_empty_dates() {
        let json = r#"{
            "id": "kth",
            "monthlyRent": null,
            "monthlyFood": "350",
            "safety": "n/a",
            "applicationDeadline": "",
            "visaDeadline": "2026-03-01",
            "housingDeadline": null
        }"#;
        let option: StudyOption = serde_json::from_str(json).unwrap();
        assert_eq!(option.monthly_rent, 0.0);
        assert_eq!(option.monthly_food, 350.0);
        assert_eq!(option.safety, 0.0);
        assert!(option.application_deadline.is_none());
        assert_eq!(
            option.visa_deadline,
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert!(option.housing_deadline.is_none());
    }

    #[test]
    fn test_deserialize_blank_status_reads_as_interested() {
        for raw in [r#"null"#, r#""""#, r#""shortlisted""#, r#"3"#] {
            let json = format!(r#"{{ "id": "a", "status": {} }}"#, raw);
            let option: StudyOption = serde_json::from_str(&json).unwrap();
            assert_eq!(option.status, Status::Interested, "status {}", raw);
        }

        let approved: StudyOption =
            serde_json::from_str(r#"{ "id": "a", "status": "approved" }"#).unwrap();
        assert_eq!(approved.status, Status::Approved);
    }

    #[test]
    fn test_deserialize_form_style_fields() {
        let json = r#"{
            "id": "uc3m",
            "priority": "",
            "createdAt": "2026-01-20T14:00:00.000Z",
            "diary": [{ "id": "diary-1", "date": "2026-02-03", "text": "call with advisor" }]
        }"#;
        let option: StudyOption = serde_json::from_str(json).unwrap();
        assert_eq!(option.priority, None);
        assert_eq!(option.created_at.date_naive(), NaiveDate::from_ymd_opt(2026, 1, 20).unwrap());
        assert_eq!(
            option.diary[0].date.date_naive(),
            NaiveDate::from_ymd_opt(2026, 2, 3).unwrap()
        );

        let tiered: StudyOption = serde_json::from_str(r#"{ "priority": "B" }"#).unwrap();
        assert_eq!(tiered.priority, Some(Priority::B));
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let mut option = StudyOption::new("epfl", "EPFL", Utc::now());
        option.semester_start = NaiveDate::from_ymd_opt(2026, 9, 14);
        let value = serde_json::to_value(&option).unwrap();
        assert!(value.get("monthlyRent").is_some());
        assert_eq!(value["semesterStart"], "2026-09-14");
        assert_eq!(value["applicationDeadline"], "");
        assert_eq!(value["status"], "interested");
    }

    #[test]
    fn test_checklist_progress() {
        let mut option = StudyOption::new("a", "A", Utc::now());
        option.checklist[0].completed = true;
        option.checklist[1].completed = true;
        option.checklist[2].completed = true;
        let progress = option.checklist_progress();
        assert_eq!(progress.completed, 3);
        assert_eq!(progress.total, 12);
        assert_eq!(progress.percent, 25);
    }

    #[test]
    fn test_checklist_progress_empty() {
        let mut option = StudyOption::new("a", "A", Utc::now());
        option.checklist.clear();
        assert_eq!(option.checklist_progress().percent, 0);
    }

    #[test]
    fn test_diary_recent_first() {
        let now = Utc::now();
        let mut option = StudyOption::new("a", "A", now);
        for (i, text) in ["first", "second", "third"].iter().enumerate() {
            option.diary.push(DiaryEntry {
                id: format!("diary-{}", i),
                date: now,
                text: text.to_string(),
            });
        }
        let texts: Vec<_> = option.diary_recent_first().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_display_name_with_flag() {
        let mut option = StudyOption::new("a", "Aalto", Utc::now());
        assert_eq!(option.display_name(), "Aalto");
        option.flag = "FI".to_string();
        assert_eq!(option.display_name(), "FI Aalto");
    }
}
