use std::fmt;
use std::str::FromStr;

use crate::options::StudyOption;
use crate::scoring::{monthly_total, one_time_total, six_month_total};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    General,
    Costs,
    Academic,
    Work,
    Adaptation,
    Personal,
}

impl Group {
    pub const ALL: [Group; 6] = [
        Group::General,
        Group::Costs,
        Group::Academic,
        Group::Work,
        Group::Adaptation,
        Group::Personal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Group::General => "general",
            Group::Costs => "costs",
            Group::Academic => "academic",
            Group::Work => "work",
            Group::Adaptation => "adaptation",
            Group::Personal => "personal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Group::General => "General",
            Group::Costs => "Costs",
            Group::Academic => "Academic",
            Group::Work => "Work",
            Group::Adaptation => "Adaptation",
            Group::Personal => "Personal",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Group {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Group::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown criteria group '{}'", s))
    }
}

/// How a criterion's value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Currency,
    Score,
    Status,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

/// One row of the comparison table.
pub struct Criterion {
    pub label: &'static str,
    pub group: Group,
    pub kind: ValueKind,
    /// None for rows that are shown but never ranked.
    pub higher_is_better: Option<bool>,
    pub extract: fn(&StudyOption) -> CellValue,
}

impl fmt::Debug for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Criterion")
            .field("label", &self.label)
            .field("group", &self.group)
            .field("kind", &self.kind)
            .field("higher_is_better", &self.higher_is_better)
            .finish()
    }
}

const fn text(label: &'static str, group: Group, extract: fn(&StudyOption) -> CellValue) -> Criterion {
    Criterion {
        label,
        group,
        kind: ValueKind::Text,
        higher_is_better: None,
        extract,
    }
}

const fn cost(
    label: &'static str,
    higher_is_better: bool,
    extract: fn(&StudyOption) -> CellValue,
) -> Criterion {
    Criterion {
        label,
        group: Group::Costs,
        kind: ValueKind::Currency,
        higher_is_better: Some(higher_is_better),
        extract,
    }
}

const fn score(label: &'static str, group: Group, extract: fn(&StudyOption) -> CellValue) -> Criterion {
    Criterion {
        label,
        group,
        kind: ValueKind::Score,
        higher_is_better: Some(true),
        extract,
    }
}

fn text_or_dash(value: &str) -> CellValue {
    if value.is_empty() {
        CellValue::Text("-".to_string())
    } else {
        CellValue::Text(value.to_string())
    }
}

pub static CRITERIA: [Criterion; 27] = [
    text("City", Group::General, |o| text_or_dash(&o.city)),
    text("Country", Group::General, |o| text_or_dash(&o.country)),
    text("Language", Group::General, |o| text_or_dash(&o.language)),
    Criterion {
        label: "Status",
        group: Group::General,
        kind: ValueKind::Status,
        higher_is_better: None,
        extract: |o| CellValue::Text(o.status.to_string()),
    },
    cost("Rent/month", false, |o| CellValue::Number(o.monthly_rent)),
    cost("Food/month", false, |o| CellValue::Number(o.monthly_food)),
    cost("Transport/month", false, |o| CellValue::Number(o.monthly_transport)),
    cost("Monthly total", false, |o| CellValue::Number(monthly_total(o))),
    cost("Arrival costs", false, |o| CellValue::Number(one_time_total(o))),
    cost("6-month total", false, |o| CellValue::Number(six_month_total(o))),
    cost("Scholarship/month", true, |o| CellValue::Number(o.scholarship)),
    score("STEM reputation", Group::Academic, |o| CellValue::Number(o.stem_reputation)),
    score("Research", Group::Academic, |o| CellValue::Number(o.research_opportunities)),
    score("English courses", Group::Academic, |o| CellValue::Number(o.english_courses)),
    score("Credit compatibility", Group::Academic, |o| CellValue::Number(o.credit_compatibility)),
    score("Lab access", Group::Academic, |o| CellValue::Number(o.lab_access)),
    score("Internship chance", Group::Work, |o| CellValue::Number(o.internship_chance)),
    score("Networking", Group::Work, |o| CellValue::Number(o.networking_quality)),
    score("Startup ecosystem", Group::Work, |o| CellValue::Number(o.startup_ecosystem)),
    score("University jobs", Group::Work, |o| CellValue::Number(o.university_jobs)),
    score("Language ease", Group::Adaptation, |o| CellValue::Number(o.language_difficulty)),
    score("Climate fit", Group::Adaptation, |o| CellValue::Number(o.climate_score)),
    score("Safety", Group::Adaptation, |o| CellValue::Number(o.safety)),
    score("Quality of life", Group::Adaptation, |o| CellValue::Number(o.quality_of_life)),
    score("International community", Group::Adaptation, |o| {
        CellValue::Number(o.international_community)
    }),
    score("Public transport", Group::Adaptation, |o| CellValue::Number(o.public_transport)),
    score("Emotional fit", Group::Personal, |o| CellValue::Number(o.emotional_score)),
];
