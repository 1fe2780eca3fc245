use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::options::StudyOption;

/// The nine recurring monthly line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostLine {
    Rent,
    Food,
    Transport,
    Phone,
    Academic,
    Leisure,
    Travel,
    Health,
    Misc,
}

impl CostLine {
    pub const ALL: [CostLine; 9] = [
        CostLine::Rent,
        CostLine::Food,
        CostLine::Transport,
        CostLine::Phone,
        CostLine::Academic,
        CostLine::Leisure,
        CostLine::Travel,
        CostLine::Health,
        CostLine::Misc,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CostLine::Rent => "Rent",
            CostLine::Food => "Food",
            CostLine::Transport => "Transport",
            CostLine::Phone => "Phone/internet",
            CostLine::Academic => "Study materials",
            CostLine::Leisure => "Leisure",
            CostLine::Travel => "Travel",
            CostLine::Health => "Health",
            CostLine::Misc => "Miscellaneous",
        }
    }
}

/// One amount per cost line. Also used for per-line multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MonthlyCosts {
    pub rent: f64,
    pub food: f64,
    pub transport: f64,
    pub phone: f64,
    pub academic: f64,
    pub leisure: f64,
    pub travel: f64,
    pub health: f64,
    pub misc: f64,
}

impl MonthlyCosts {
    pub fn from_option(option: &StudyOption) -> Self {
        Self {
            rent: option.monthly_rent,
            food: option.monthly_food,
            transport: option.monthly_transport,
            phone: option.monthly_phone,
            academic: option.monthly_academic,
            leisure: option.monthly_leisure,
            travel: option.monthly_travel,
            health: option.monthly_health,
            misc: option.monthly_misc,
        }
    }

    pub fn uniform(value: f64) -> Self {
        Self {
            rent: value,
            food: value,
            transport: value,
            phone: value,
            academic: value,
            leisure: value,
            travel: value,
            health: value,
            misc: value,
        }
    }

    pub fn get(&self, line: CostLine) -> f64 {
        match line {
            CostLine::Rent => self.rent,
            CostLine::Food => self.food,
            CostLine::Transport => self.transport,
            CostLine::Phone => self.phone,
            CostLine::Academic => self.academic,
            CostLine::Leisure => self.leisure,
            CostLine::Travel => self.travel,
            CostLine::Health => self.health,
            CostLine::Misc => self.misc,
        }
    }

    pub fn set(&mut self, line: CostLine, value: f64) {
        let slot = match line {
            CostLine::Rent => &mut self.rent,
            CostLine::Food => &mut self.food,
            CostLine::Transport => &mut self.transport,
            CostLine::Phone => &mut self.phone,
            CostLine::Academic => &mut self.academic,
            CostLine::Leisure => &mut self.leisure,
            CostLine::Travel => &mut self.travel,
            CostLine::Health => &mut self.health,
            CostLine::Misc => &mut self.misc,
        };
        *slot = value;
    }

    pub fn total(&self) -> f64 {
        CostLine::ALL.iter().map(|line| self.get(*line)).sum()
    }
}

/// Named spending profile scaling every line of an option's authored costs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendingProfile {
    Frugal,
    #[default]
    Realistic,
    Comfortable,
}

impl SpendingProfile {
    pub const ALL: [SpendingProfile; 3] = [
        SpendingProfile::Frugal,
        SpendingProfile::Realistic,
        SpendingProfile::Comfortable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpendingProfile::Frugal => "frugal",
            SpendingProfile::Realistic => "realistic",
            SpendingProfile::Comfortable => "comfortable",
        }
    }

    pub fn multipliers(&self) -> MonthlyCosts {
        match self {
            SpendingProfile::Frugal => MonthlyCosts {
                rent: 0.75,
                food: 0.7,
                transport: 0.8,
                phone: 0.9,
                academic: 0.7,
                leisure: 0.5,
                travel: 0.5,
                health: 0.9,
                misc: 0.6,
            },
            SpendingProfile::Realistic => MonthlyCosts::uniform(1.0),
            SpendingProfile::Comfortable => MonthlyCosts {
                rent: 1.4,
                food: 1.3,
                transport: 1.2,
                phone: 1.1,
                academic: 1.3,
                leisure: 1.8,
                travel: 1.6,
                health: 1.2,
                misc: 1.4,
            },
        }
    }
}

impl fmt::Display for SpendingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpendingProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpendingProfile::ALL
            .into_iter()
            .find(|profile| profile.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown profile '{}' (expected frugal, realistic or comfortable)",
                    s
                )
            })
    }
}

/// Scale each authored monthly line by the profile multiplier, rounding every
/// line to a whole currency unit.
pub fn apply_profile(option: &StudyOption, profile: SpendingProfile) -> MonthlyCosts {
    let authored = MonthlyCosts::from_option(option);
    let multipliers = profile.multipliers();
    let mut costs = MonthlyCosts::default();
    for line in CostLine::ALL {
        costs.set(line, (authored.get(line) * multipliers.get(line)).round());
    }
    costs
}
