use serde::Serialize;

use super::config::{SimulatorConfig, MAX_MONTHS, MIN_MONTHS};
use super::profile::{apply_profile, MonthlyCosts, SpendingProfile};
use super::scenario::{apply_scenarios, MonthlyProjection, ScenarioSet};
use crate::options::{filter_active, StudyOption};
use crate::scoring::one_time_total;

/// How many active options the cohort comparison covers.
pub const COHORT_LIMIT: usize = 5;

/// Parameters of one simulator run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationInput {
    pub profile: SpendingProfile,
    pub scenarios: ScenarioSet,
    pub fx_delta_percent: f64,
    pub months: u32,
    pub extra_reserve: f64,
}

impl SimulationInput {
    /// Configured defaults with no scenarios active.
    pub fn from_config(config: &SimulatorConfig) -> Self {
        Self {
            profile: config.profile(),
            scenarios: ScenarioSet::new(),
            fx_delta_percent: config.fx_delta_percent(),
            months: config.months(),
            extra_reserve: config.extra_reserve(),
        }
    }

    /// Duration clamped into 1..=12.
    pub fn clamped_months(&self) -> u32 {
        self.months.clamp(MIN_MONTHS, MAX_MONTHS)
    }
}

impl Default for SimulationInput {
    fn default() -> Self {
        Self::from_config(&SimulatorConfig::default())
    }
}

/// Outcome of simulating one option.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub option_id: String,
    pub profile: SpendingProfile,
    pub months: u32,
    pub profile_costs: MonthlyCosts,
    pub scenario: MonthlyProjection,
    pub baseline: MonthlyProjection,
    pub one_time: f64,
    pub extra_reserve: f64,
    pub total_estimate: f64,
    pub baseline_total: f64,
    /// Positive when the scenarios make the stay cheaper.
    pub savings_vs_baseline: f64,
}

fn total_estimate(total_monthly: f64, months: u32, one_time: f64, reserve: f64) -> f64 {
    total_monthly * months as f64 + one_time + reserve
}

/// Project one option's costs under a profile and scenario set, alongside the
/// same profile with no scenarios and no currency shift.
pub fn simulate(option: &StudyOption, input: &SimulationInput) -> Simulation {
    let months = input.clamped_months();
    let profile_costs = apply_profile(option, input.profile);
    let one_time = one_time_total(option);

    let scenario = apply_scenarios(
        &profile_costs,
        option.scholarship,
        &input.scenarios,
        input.fx_delta_percent,
    );
    let baseline = apply_scenarios(&profile_costs, option.scholarship, &ScenarioSet::new(), 0.0);

    let total = total_estimate(scenario.total_monthly, months, one_time, input.extra_reserve);
    let baseline_total =
        total_estimate(baseline.total_monthly, months, one_time, input.extra_reserve);

    tracing::debug!(
        option = %option.id,
        profile = %input.profile,
        months,
        total,
        baseline_total,
        "simulated option"
    );

    Simulation {
        option_id: option.id.clone(),
        profile: input.profile,
        months,
        profile_costs,
        scenario,
        baseline,
        one_time,
        extra_reserve: input.extra_reserve,
        total_estimate: total,
        baseline_total,
        savings_vs_baseline: baseline_total - total,
    }
}

/// The same run applied to the first few active options, in input order.
pub fn simulate_cohort<'a>(
    options: &'a [StudyOption],
    input: &SimulationInput,
) -> Vec<(&'a StudyOption, Simulation)> {
    filter_active(options)
        .into_iter()
        .take(COHORT_LIMIT)
        .map(|option| (option, simulate(option, input)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Status;
    use crate::simulator::Scenario;
    use chrono::Utc;

    fn sample_option(id: &str) -> StudyOption {
        let mut option = StudyOption::new(id, id.to_uppercase(), Utc::now());
        option.monthly_rent = 1000.0;
        option.monthly_food = 400.0;
        option.monthly_transport = 100.0;
        option.monthly_phone = 20.0;
        option.monthly_academic = 50.0;
        option.monthly_leisure = 150.0;
        option.monthly_travel = 100.0;
        option.monthly_health = 30.0;
        option.monthly_misc = 80.0;
        option.flight_cost = 900.0;
        option.visa_cost = 100.0;
        option
    }

    fn input(scenarios: &[Scenario]) -> SimulationInput {
        SimulationInput {
            scenarios: scenarios.iter().copied().collect(),
            ..SimulationInput::default()
        }
    }

    #[test]
    fn test_baseline_only() {
        let sim = simulate(&sample_option("a"), &input(&[]));
        assert_eq!(sim.months, 6);
        assert_eq!(sim.scenario.total_monthly, 1930.0);
        assert_eq!(sim.baseline.total_monthly, 1930.0);
        assert_eq!(sim.one_time, 1000.0);
        // 1930 * 6 + 1000 + 500
        assert_eq!(sim.total_estimate, 13080.0);
        assert_eq!(sim.baseline_total, 13080.0);
        assert_eq!(sim.savings_vs_baseline, 0.0);
    }

    #[test]
    fn test_savings_positive_when_cheaper() {
        let sim = simulate(
            &sample_option("a"),
            &input(&[Scenario::Dormitory, Scenario::ScholarshipBonus]),
        );
        assert_eq!(sim.scenario.total_monthly, 1430.0);
        assert_eq!(sim.savings_vs_baseline, 500.0 * 6.0);
    }

    #[test]
    fn test_baseline_ignores_currency_shift() {
        let sim = simulate(&sample_option("a"), &input(&[Scenario::CurrencyShift]));
        assert_eq!(sim.baseline.total_monthly, 1930.0);
        assert_eq!(sim.scenario.total_monthly, 2220.0);
        assert!(sim.savings_vs_baseline < 0.0);
    }

    #[test]
    fn test_baseline_uses_profile() {
        let mut run = input(&[]);
        run.profile = SpendingProfile::Frugal;
        let sim = simulate(&sample_option("a"), &run);
        assert_eq!(sim.baseline.costs.rent, 750.0);
        assert_eq!(sim.baseline, sim.scenario);
    }

    #[test]
    fn test_months_clamped() {
        let mut run = input(&[]);
        run.months = 0;
        assert_eq!(simulate(&sample_option("a"), &run).months, 1);
        run.months = 40;
        assert_eq!(simulate(&sample_option("a"), &run).months, 12);
    }

    #[test]
    fn test_scholarship_flows_into_income() {
        let mut option = sample_option("a");
        option.scholarship = 300.0;
        let sim = simulate(&option, &input(&[Scenario::PartTimeWork]));
        assert_eq!(sim.baseline.income, 300.0);
        assert_eq!(sim.scenario.income, 700.0);
        assert_eq!(sim.scenario.total_monthly, 1230.0);
    }

    #[test]
    fn test_cohort_takes_first_five_active() {
        let mut options: Vec<_> = (0..7).map(|i| sample_option(&format!("o{}", i))).collect();
        options[1].status = Status::Discarded;

        let results = simulate_cohort(&options, &input(&[]));

        let ids: Vec<_> = results.iter().map(|(o, _)| o.id.as_str()).collect();
        assert_eq!(ids, vec!["o0", "o2", "o3", "o4", "o5"]);
    }
}
