use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::deadlines::DeadlineConfig;
use crate::scoring::ScoringConfig;
use crate::simulator::SimulatorConfig;

/// Top-level `config.yaml`. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// State file location (default: ~/.config/mobimap/state.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadlines: Option<DeadlineConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulator: Option<SimulatorConfig>,
}

impl Config {
    pub fn scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    pub fn deadlines(&self) -> DeadlineConfig {
        self.deadlines.clone().unwrap_or_default()
    }

    pub fn simulator(&self) -> SimulatorConfig {
        self.simulator.clone().unwrap_or_default()
    }

    /// State file path: explicit override, then `data_file`, then the default.
    pub fn data_path(&self, override_path: Option<PathBuf>) -> PathBuf {
        override_path
            .or_else(|| self.data_file.clone())
            .unwrap_or_else(crate::store::get_state_path)
    }
}
