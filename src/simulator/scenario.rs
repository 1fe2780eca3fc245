use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::profile::{CostLine, MonthlyCosts};

pub const DORMITORY_RENT_FACTOR: f64 = 0.7;
pub const SHARED_ROOM_RENT_FACTOR: f64 = 0.8;
pub const SCHOLARSHIP_BONUS: f64 = 200.0;
pub const PART_TIME_INCOME: f64 = 400.0;
pub const CHEAPER_CITY_FACTOR: f64 = 0.85;

const CHEAPER_CITY_LINES: [CostLine; 3] = [CostLine::Rent, CostLine::Food, CostLine::Leisure];

/// A toggleable what-if adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Scenario {
    Dormitory,
    SharedRoom,
    ScholarshipBonus,
    PartTimeWork,
    CheaperCity,
    CurrencyShift,
}

impl Scenario {
    /// Order the steps run in. Not commutative: rent discounts compound,
    /// and the currency shift scales the net total so it must come last.
    pub const PIPELINE: [Scenario; 6] = [
        Scenario::Dormitory,
        Scenario::SharedRoom,
        Scenario::ScholarshipBonus,
        Scenario::PartTimeWork,
        Scenario::CheaperCity,
        Scenario::CurrencyShift,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Scenario::Dormitory => "dormitory",
            Scenario::SharedRoom => "sharedRoom",
            Scenario::ScholarshipBonus => "scholarship",
            Scenario::PartTimeWork => "partTime",
            Scenario::CheaperCity => "betterCity",
            Scenario::CurrencyShift => "euroBrl",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::Dormitory => "University dormitory (-30% rent)",
            Scenario::SharedRoom => "Shared room (-20% rent)",
            Scenario::ScholarshipBonus => "Extra scholarship (+200/month)",
            Scenario::PartTimeWork => "Part-time job (+400/month)",
            Scenario::CheaperCity => "Neighboring city (-15% rent, food, leisure)",
            Scenario::CurrencyShift => "Currency shift on the net monthly total",
        }
    }

    /// The transform this scenario contributes to the pipeline.
    pub fn transform(&self, fx_delta_percent: f64) -> Transform {
        match self {
            Scenario::Dormitory => Transform::ScaleCosts {
                lines: &[CostLine::Rent],
                factor: DORMITORY_RENT_FACTOR,
            },
            Scenario::SharedRoom => Transform::ScaleCosts {
                lines: &[CostLine::Rent],
                factor: SHARED_ROOM_RENT_FACTOR,
            },
            Scenario::ScholarshipBonus => Transform::AddIncome(SCHOLARSHIP_BONUS),
            Scenario::PartTimeWork => Transform::AddIncome(PART_TIME_INCOME),
            Scenario::CheaperCity => Transform::ScaleCosts {
                lines: &CHEAPER_CITY_LINES,
                factor: CHEAPER_CITY_FACTOR,
            },
            Scenario::CurrencyShift => Transform::ShiftNet {
                percent: fx_delta_percent,
            },
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Scenario::PIPELINE
            .into_iter()
            .find(|scenario| scenario.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown scenario '{}'", s))
    }
}

/// One step of the scenario pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Multiply the given cost lines, rounding each to a whole unit.
    ScaleCosts {
        lines: &'static [CostLine],
        factor: f64,
    },
    /// Add a fixed monthly income.
    AddIncome(f64),
    /// Scale the net total (costs minus income) by `1 + percent/100`, rounded.
    ShiftNet { percent: f64 },
}

/// Set of active scenarios. Membership only; order comes from the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioSet(BTreeSet<Scenario>);

impl ScenarioSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from string keys. Unknown keys are ignored.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for key in keys {
            match key.as_ref().parse::<Scenario>() {
                Ok(scenario) => {
                    set.insert(scenario);
                }
                Err(_) => tracing::warn!(key = key.as_ref(), "ignoring unknown scenario"),
            }
        }
        set
    }

    pub fn insert(&mut self, scenario: Scenario) -> bool {
        self.0.insert(scenario)
    }

    /// Flip membership; returns true if the scenario is now active.
    pub fn toggle(&mut self, scenario: Scenario) -> bool {
        if self.0.remove(&scenario) {
            false
        } else {
            self.0.insert(scenario);
            true
        }
    }

    pub fn contains(&self, scenario: Scenario) -> bool {
        self.0.contains(&scenario)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Scenario> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Scenario> for ScenarioSet {
    fn from_iter<T: IntoIterator<Item = Scenario>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Monthly costs and income after the pipeline has run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProjection {
    pub costs: MonthlyCosts,
    pub income: f64,
    pub total_monthly: f64,
}

/// Run the active scenarios over profile-adjusted costs in pipeline order.
pub fn apply_scenarios(
    base: &MonthlyCosts,
    scholarship: f64,
    active: &ScenarioSet,
    fx_delta_percent: f64,
) -> MonthlyProjection {
    let mut costs = *base;
    let mut income = scholarship;
    let mut shifted_net = None;

    for scenario in Scenario::PIPELINE.into_iter().filter(|s| active.contains(*s)) {
        match scenario.transform(fx_delta_percent) {
            Transform::ScaleCosts { lines, factor } => {
                for line in lines {
                    costs.set(*line, (costs.get(*line) * factor).round());
                }
            }
            Transform::AddIncome(amount) => income += amount,
            Transform::ShiftNet { percent } => {
                let net = costs.total() - income;
                // Multiply before dividing so 1430 at +15% lands on 1644.5, not 1644.4999..
                shifted_net = Some((net * (100.0 + percent) / 100.0).round());
            }
        }
    }

    MonthlyProjection {
        costs,
        income,
        total_monthly: shifted_net.unwrap_or_else(|| costs.total() - income),
    }
}
