pub mod config;
pub mod profile;
pub mod projection;
pub mod scenario;

pub use config::{validate_simulator, SimulatorConfig};
pub use profile::{apply_profile, CostLine, MonthlyCosts, SpendingProfile};
pub use projection::{simulate, simulate_cohort, Simulation, SimulationInput, COHORT_LIMIT};
pub use scenario::{apply_scenarios, MonthlyProjection, Scenario, ScenarioSet, Transform};
