use super::{AppState, STATE_SCHEMA};
use crate::options::StudyOption;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Get the default state file path (~/.config/mobimap/state.json)
pub fn get_state_path() -> PathBuf {
    crate::config::get_config_dir().join("state.json")
}

/// Load application state from a JSON file
///
/// If the file doesn't exist, returns a fresh state with the default weights
/// and presets. If the file has an unsupported schema, returns an error.
pub fn load_state(path: &Path) -> Result<AppState> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no state file, starting fresh");
        return Ok(AppState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open state file at {}", path.display()))?;

    let state: AppState = serde_json::from_reader(file)
        .with_context(|| format!("Failed to load state from {}", path.display()))?;

    if state.schema != STATE_SCHEMA {
        anyhow::bail!("Unsupported state file schema: {}", state.schema);
    }

    tracing::debug!(
        path = %path.display(),
        options = state.options.len(),
        version = state.version,
        "loaded state"
    );

    Ok(state)
}

/// Save application state to a JSON file atomically
///
/// Creates the parent directory if it doesn't exist.
pub fn save_state(path: &Path, state: &AppState) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory at {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize state")?;

    file.commit().context("Failed to save state")?;

    tracing::debug!(path = %path.display(), version = state.version, "saved state");
    Ok(())
}

/// Read a JSON array of option records, as served by the persistence API.
///
/// Numeric fields that are missing or malformed read as 0.
pub fn import_options(path: &Path) -> Result<Vec<StudyOption>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open import file at {}", path.display()))?;

    let options: Vec<StudyOption> = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse options from {}", path.display()))?;

    tracing::info!(path = %path.display(), count = options.len(), "imported options");
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Status;
    use crate::scoring::Weights;
    use chrono::Utc;
    use std::env;

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp_path = env::temp_dir().join("mobimap_test_missing.json");
        let _ = fs::remove_file(&temp_path);

        let state = load_state(&temp_path).unwrap();
        assert_eq!(state.schema, STATE_SCHEMA);
        assert!(state.options.is_empty());
        assert_eq!(state.weights, Weights::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("mobimap_test_roundtrip.json");
        let _ = fs::remove_file(&temp_path);

        let mut state = AppState::new();
        let mut option = StudyOption::new("tum", "TU Munich", Utc::now());
        option.monthly_rent = 950.0;
        option.status = Status::Candidate;
        state.options.push(option);
        state.compare_ids.push("tum".to_string());
        state.version = 7;

        save_state(&temp_path, &state).unwrap();
        let loaded = load_state(&temp_path).unwrap();

        assert_eq!(loaded, state);

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_unsupported_schema_rejected() {
        let temp_path = env::temp_dir().join("mobimap_test_schema.json");
        fs::write(&temp_path, r#"{"schema": 99}"#).unwrap();

        let err = load_state(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Unsupported state file schema"));

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_sparse_state_fills_defaults() {
        let temp_path = env::temp_dir().join("mobimap_test_sparse.json");
        fs::write(&temp_path, r#"{"schema": 1, "weights": {"climate": 3}}"#).unwrap();

        let state = load_state(&temp_path).unwrap();
        assert_eq!(state.presets.len(), 4);
        assert_eq!(state.weights.climate, 3.0);
        assert_eq!(state.weights.total_cost, 0.0);

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_import_lenient_records() {
        let temp_path = env::temp_dir().join("mobimap_test_import.json");
        fs::write(
            &temp_path,
            r#"[
                {"id": "a", "name": "Alpha", "monthlyRent": "800", "stemReputation": null,
                 "applicationDeadline": "2026-05-01", "visaDeadline": ""},
                {"id": "b", "name": "Beta", "status": "discarded"}
            ]"#,
        )
        .unwrap();

        let options = import_options(&temp_path).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].monthly_rent, 800.0);
        assert_eq!(options[0].stem_reputation, 0.0);
        assert!(options[0].application_deadline.is_some());
        assert!(options[0].visa_deadline.is_none());
        assert_eq!(options[0].checklist.len(), 12);
        assert_eq!(options[1].status, Status::Discarded);

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_import_missing_file_errors() {
        let temp_path = env::temp_dir().join("mobimap_test_import_missing.json");
        let _ = fs::remove_file(&temp_path);
        assert!(import_options(&temp_path).is_err());
    }
}
