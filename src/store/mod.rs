pub mod command;
pub mod error;
pub mod storage;

pub use command::Command;
pub use error::StoreError;
pub use storage::{get_state_path, import_options, load_state, save_state};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::compare::MAX_COMPARED;
use crate::options::{default_checklist, DiaryEntry, Status, StudyOption};
use crate::scoring::{default_presets, WeightPreset, Weights};

/// On-disk layout version of the state file.
pub const STATE_SCHEMA: u32 = 1;

/// Everything the application persists between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub schema: u32,
    /// Bumped on every successful mutation.
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub options: Vec<StudyOption>,
    #[serde(default)]
    pub weights: Weights,
    #[serde(default = "default_presets")]
    pub presets: Vec<WeightPreset>,
    #[serde(default)]
    pub compare_ids: Vec<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            schema: STATE_SCHEMA,
            version: 0,
            options: Vec::new(),
            weights: Weights::default(),
            presets: default_presets(),
            compare_ids: Vec::new(),
        }
    }

    pub fn option(&self, id: &str) -> Option<&StudyOption> {
        self.options.iter().find(|o| o.id == id)
    }

    pub fn preset(&self, id: &str) -> Option<&WeightPreset> {
        self.presets.iter().find(|p| p.id == id)
    }
}

/// Single-writer container: every change goes through [`Store::apply`].
#[derive(Debug, Clone, Default)]
pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    pub fn apply(&mut self, command: Command) -> Result<(), StoreError> {
        self.apply_at(command, Utc::now())
    }

    /// Apply a command as of `now`. On error the state is untouched; no-op
    /// commands (blank diary text) leave the version as is.
    pub fn apply_at(&mut self, command: Command, now: DateTime<Utc>) -> Result<(), StoreError> {
        let name = command.name();
        let changed = self.mutate(command, now)?;
        if changed {
            self.state.version += 1;
        }
        tracing::debug!(command = name, version = self.state.version, "applied command");
        Ok(())
    }

    fn option_mut(&mut self, id: &str) -> Result<&mut StudyOption, StoreError> {
        self.state
            .options
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| StoreError::OptionNotFound(id.to_string()))
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.state
            .options
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| StoreError::OptionNotFound(id.to_string()))
    }

    fn mutate(&mut self, command: Command, now: DateTime<Utc>) -> Result<bool, StoreError> {
        match command {
            Command::SetOptions(options) => {
                for (i, option) in options.iter().enumerate() {
                    if options[..i].iter().any(|o| o.id == option.id) {
                        return Err(StoreError::DuplicateOptionId(option.id.clone()));
                    }
                }
                self.state.options = options;
                let AppState {
                    options,
                    compare_ids,
                    ..
                } = &mut self.state;
                compare_ids.retain(|id| options.iter().any(|o| &o.id == id));
            }
            Command::AddOption(option) => {
                if self.state.option(&option.id).is_some() {
                    return Err(StoreError::DuplicateOptionId(option.id));
                }
                self.state.options.push(option);
            }
            Command::UpdateOption(mut option) => {
                let idx = self.position(&option.id)?;
                if !self.state.options[idx].status.can_transition_to(option.status) {
                    return Err(StoreError::TerminalStatus(option.id));
                }
                option.updated_at = now;
                self.state.options[idx] = option;
            }
            Command::DeleteOption(id) => {
                let idx = self.position(&id)?;
                self.state.options.remove(idx);
                self.state.compare_ids.retain(|c| c != &id);
            }
            Command::DuplicateOption(id) => {
                let original = self
                    .state
                    .option(&id)
                    .ok_or_else(|| StoreError::OptionNotFound(id.clone()))?;
                let copy = self.duplicate_of(original, now);
                self.state.options.push(copy);
            }
            Command::ToggleFavorite(id) => {
                let option = self.option_mut(&id)?;
                option.is_favorite = !option.is_favorite;
                option.updated_at = now;
            }
            Command::SetStatus { id, status } => {
                let option = self.option_mut(&id)?;
                if !option.status.can_transition_to(status) {
                    return Err(StoreError::TerminalStatus(id));
                }
                option.status = status;
                option.updated_at = now;
            }
            Command::SetWeights(weights) => {
                self.state.weights = weights;
            }
            Command::SavePreset(preset) => {
                match self.state.presets.iter_mut().find(|p| p.id == preset.id) {
                    Some(existing) => *existing = preset,
                    None => self.state.presets.push(preset),
                }
            }
            Command::DeletePreset(id) => {
                let before = self.state.presets.len();
                self.state.presets.retain(|p| p.id != id);
                if self.state.presets.len() == before {
                    return Err(StoreError::PresetNotFound(id));
                }
            }
            Command::ApplyPreset(id) => {
                let weights = self
                    .state
                    .preset(&id)
                    .map(|p| p.weights)
                    .ok_or_else(|| StoreError::PresetNotFound(id.clone()))?;
                self.state.weights = weights;
                tracing::info!(preset = %id, "applied weight preset");
            }
            Command::SetCompareIds(ids) => {
                let mut unique: Vec<String> = Vec::new();
                for id in ids {
                    if self.state.option(&id).is_none() {
                        return Err(StoreError::OptionNotFound(id));
                    }
                    if !unique.contains(&id) {
                        unique.push(id);
                    }
                }
                if unique.len() > MAX_COMPARED {
                    return Err(StoreError::CompareLimitReached(MAX_COMPARED));
                }
                self.state.compare_ids = unique;
            }
            Command::ToggleCompare(id) => {
                if let Some(idx) = self.state.compare_ids.iter().position(|c| c == &id) {
                    self.state.compare_ids.remove(idx);
                } else {
                    if self.state.option(&id).is_none() {
                        return Err(StoreError::OptionNotFound(id));
                    }
                    if self.state.compare_ids.len() >= MAX_COMPARED {
                        return Err(StoreError::CompareLimitReached(MAX_COMPARED));
                    }
                    self.state.compare_ids.push(id);
                }
            }
            Command::ToggleChecklistItem { id, item } => {
                let option = self.option_mut(&id)?;
                let entry = option
                    .checklist
                    .iter_mut()
                    .find(|c| c.id == item)
                    .ok_or(StoreError::ChecklistItemNotFound {
                        option: id.clone(),
                        item,
                    })?;
                entry.completed = !entry.completed;
                option.updated_at = now;
            }
            Command::AddDiaryEntry { id, text } => {
                let text = text.trim();
                let option = self.option_mut(&id)?;
                if text.is_empty() {
                    return Ok(false);
                }
                let entry_id = unique_id(&format!("diary-{}", now.timestamp_millis()), |candidate| {
                    option.diary.iter().any(|d| d.id == candidate)
                });
                option.diary.push(DiaryEntry {
                    id: entry_id,
                    date: now,
                    text: text.to_string(),
                });
                option.updated_at = now;
            }
            Command::DeleteDiaryEntry { id, entry } => {
                let option = self.option_mut(&id)?;
                let before = option.diary.len();
                option.diary.retain(|d| d.id != entry);
                if option.diary.len() == before {
                    return Err(StoreError::DiaryEntryNotFound { option: id, entry });
                }
                option.updated_at = now;
            }
        }
        Ok(true)
    }

    fn duplicate_of(&self, original: &StudyOption, now: DateTime<Utc>) -> StudyOption {
        let base = format!("{}-copy-{}", original.id, now.timestamp_millis());
        let id = unique_id(&base, |candidate| self.state.option(candidate).is_some());
        StudyOption {
            id,
            name: format!("{} (copy)", original.name),
            status: Status::Interested,
            priority: None,
            is_favorite: false,
            diary: Vec::new(),
            checklist: default_checklist(),
            created_at: now,
            updated_at: now,
            ..original.clone()
        }
    }
}

/// `base`, or `base-N` for the first N that is not taken.
fn unique_id<F>(base: &str, taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    if !taken(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Category;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn later() -> DateTime<Utc> {
        now() + Duration::hours(1)
    }

    fn sample_option(id: &str) -> StudyOption {
        StudyOption::new(id, id.to_uppercase(), now())
    }

    fn store_with(ids: &[&str]) -> Store {
        let mut state = AppState::new();
        state.options = ids.iter().map(|id| sample_option(id)).collect();
        Store::new(state)
    }

    #[test]
    fn test_new_state_defaults() {
        let state = AppState::new();
        assert_eq!(state.schema, STATE_SCHEMA);
        assert_eq!(state.version, 0);
        assert_eq!(state.weights, Weights::default());
        assert_eq!(state.presets.len(), 4);
    }

    #[test]
    fn test_version_bumps_on_success_only() {
        let mut store = store_with(&["a"]);
        store.apply_at(Command::ToggleFavorite("a".into()), now()).unwrap();
        assert_eq!(store.state().version, 1);

        let err = store
            .apply_at(Command::ToggleFavorite("zzz".into()), now())
            .unwrap_err();
        assert_eq!(err, StoreError::OptionNotFound("zzz".into()));
        assert_eq!(store.state().version, 1);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut store = store_with(&["a"]);
        let err = store
            .apply_at(Command::AddOption(sample_option("a")), now())
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateOptionId("a".into()));
        store.apply_at(Command::AddOption(sample_option("b")), now()).unwrap();
        assert_eq!(store.state().options.len(), 2);
    }

    #[test]
    fn test_update_refreshes_timestamp() {
        let mut store = store_with(&["a"]);
        let mut edited = sample_option("a");
        edited.city = "Munich".into();
        store.apply_at(Command::UpdateOption(edited), later()).unwrap();

        let option = store.state().option("a").unwrap();
        assert_eq!(option.city, "Munich");
        assert_eq!(option.updated_at, later());
        assert_eq!(option.created_at, now());
    }

    #[test]
    fn test_delete_removes_from_compare_set() {
        let mut store = store_with(&["a", "b"]);
        store.apply_at(Command::ToggleCompare("a".into()), now()).unwrap();
        store.apply_at(Command::ToggleCompare("b".into()), now()).unwrap();
        store.apply_at(Command::DeleteOption("a".into()), now()).unwrap();

        assert!(store.state().option("a").is_none());
        assert_eq!(store.state().compare_ids, vec!["b".to_string()]);
    }

    #[test]
    fn test_duplicate_resets_personal_state() {
        let mut store = store_with(&["a"]);
        let mut original = sample_option("a");
        original.status = Status::Approved;
        original.is_favorite = true;
        original.monthly_rent = 900.0;
        original.checklist[0].completed = true;
        original.diary.push(DiaryEntry {
            id: "diary-1".into(),
            date: now(),
            text: "visited".into(),
        });
        store.apply_at(Command::UpdateOption(original), now()).unwrap();

        store.apply_at(Command::DuplicateOption("a".into()), later()).unwrap();

        let copy = &store.state().options[1];
        assert_eq!(copy.id, format!("a-copy-{}", later().timestamp_millis()));
        assert_eq!(copy.name, "A (copy)");
        assert_eq!(copy.status, Status::Interested);
        assert!(!copy.is_favorite);
        assert!(copy.diary.is_empty());
        assert_eq!(copy.checklist_progress().completed, 0);
        assert_eq!(copy.monthly_rent, 900.0);
        assert_eq!(copy.created_at, later());
    }

    #[test]
    fn test_duplicate_twice_in_same_millisecond() {
        let mut store = store_with(&["a"]);
        store.apply_at(Command::DuplicateOption("a".into()), now()).unwrap();
        store.apply_at(Command::DuplicateOption("a".into()), now()).unwrap();
        let ids: Vec<_> = store.state().options.iter().map(|o| o.id.clone()).collect();
        assert_eq!(ids.len(), 3);
        assert_ne!(ids[1], ids[2]);
    }

    #[test]
    fn test_discarded_status_is_terminal() {
        let mut store = store_with(&["a"]);
        store
            .apply_at(
                Command::SetStatus {
                    id: "a".into(),
                    status: Status::Discarded,
                },
                now(),
            )
            .unwrap();
        let err = store
            .apply_at(
                Command::SetStatus {
                    id: "a".into(),
                    status: Status::Candidate,
                },
                now(),
            )
            .unwrap_err();
        assert_eq!(err, StoreError::TerminalStatus("a".into()));
        assert_eq!(store.state().option("a").unwrap().status, Status::Discarded);
    }

    #[test]
    fn test_update_cannot_revive_discarded_option() {
        let mut store = store_with(&["a"]);
        store
            .apply_at(
                Command::SetStatus {
                    id: "a".into(),
                    status: Status::Discarded,
                },
                now(),
            )
            .unwrap();

        let mut edited = store.state().option("a").unwrap().clone();
        edited.status = Status::Candidate;
        edited.city = "Porto".into();
        let err = store
            .apply_at(Command::UpdateOption(edited.clone()), later())
            .unwrap_err();
        assert_eq!(err, StoreError::TerminalStatus("a".into()));
        assert_eq!(store.state().option("a").unwrap().status, Status::Discarded);
        assert_eq!(store.state().version, 1);

        // Edits that keep it discarded still go through
        edited.status = Status::Discarded;
        store.apply_at(Command::UpdateOption(edited), later()).unwrap();
        assert_eq!(store.state().option("a").unwrap().city, "Porto");
    }

    #[test]
    fn test_set_options_rejects_repeated_ids() {
        let mut store = store_with(&["a"]);
        let mut second = sample_option("dup");
        second.name = "Other".into();
        let err = store
            .apply_at(
                Command::SetOptions(vec![sample_option("dup"), sample_option("b"), second]),
                now(),
            )
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateOptionId("dup".into()));
        let ids: Vec<_> = store.state().options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
        assert_eq!(store.state().version, 0);
    }

    #[test]
    fn test_presets_save_apply_delete() {
        let mut store = store_with(&[]);
        let weights = Weights::zero().with(Category::Climate, 10.0);
        store
            .apply_at(
                Command::SavePreset(WeightPreset::new("sunny", "Sunny", weights)),
                now(),
            )
            .unwrap();
        assert_eq!(store.state().presets.len(), 5);

        store.apply_at(Command::ApplyPreset("sunny".into()), now()).unwrap();
        assert_eq!(store.state().weights, weights);

        store.apply_at(Command::DeletePreset("sunny".into()), now()).unwrap();
        let err = store
            .apply_at(Command::ApplyPreset("sunny".into()), now())
            .unwrap_err();
        assert_eq!(err, StoreError::PresetNotFound("sunny".into()));
    }

    #[test]
    fn test_save_preset_replaces_same_id() {
        let mut store = store_with(&[]);
        store
            .apply_at(
                Command::SavePreset(WeightPreset::new("balanced", "Mine", Weights::uniform(1.0))),
                now(),
            )
            .unwrap();
        assert_eq!(store.state().presets.len(), 4);
        assert_eq!(store.state().preset("balanced").unwrap().name, "Mine");
    }

    #[test]
    fn test_toggle_compare_limit() {
        let mut store = store_with(&["a", "b", "c", "d", "e", "f"]);
        for id in ["a", "b", "c", "d", "e"] {
            store.apply_at(Command::ToggleCompare(id.into()), now()).unwrap();
        }
        let err = store
            .apply_at(Command::ToggleCompare("f".into()), now())
            .unwrap_err();
        assert_eq!(err, StoreError::CompareLimitReached(5));

        // Removing still works at the limit
        store.apply_at(Command::ToggleCompare("a".into()), now()).unwrap();
        store.apply_at(Command::ToggleCompare("f".into()), now()).unwrap();
        assert_eq!(store.state().compare_ids.len(), 5);
    }

    #[test]
    fn test_set_compare_ids_validates() {
        let mut store = store_with(&["a", "b"]);
        store
            .apply_at(
                Command::SetCompareIds(vec!["b".into(), "a".into(), "b".into()]),
                now(),
            )
            .unwrap();
        assert_eq!(store.state().compare_ids, vec!["b".to_string(), "a".to_string()]);

        let err = store
            .apply_at(Command::SetCompareIds(vec!["x".into()]), now())
            .unwrap_err();
        assert_eq!(err, StoreError::OptionNotFound("x".into()));
    }

    #[test]
    fn test_checklist_toggle() {
        let mut store = store_with(&["a"]);
        let toggle = || Command::ToggleChecklistItem {
            id: "a".into(),
            item: "visa".into(),
        };
        store.apply_at(toggle(), later()).unwrap();
        let option = store.state().option("a").unwrap();
        assert!(option.checklist.iter().any(|c| c.id == "visa" && c.completed));
        assert_eq!(option.updated_at, later());

        store.apply_at(toggle(), later()).unwrap();
        assert_eq!(store.state().option("a").unwrap().checklist_progress().completed, 0);

        let err = store
            .apply_at(
                Command::ToggleChecklistItem {
                    id: "a".into(),
                    item: "moon".into(),
                },
                now(),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::ChecklistItemNotFound { .. }));
    }

    #[test]
    fn test_diary_add_and_delete() {
        let mut store = store_with(&["a"]);
        store
            .apply_at(
                Command::AddDiaryEntry {
                    id: "a".into(),
                    text: "  first visit  ".into(),
                },
                now(),
            )
            .unwrap();
        store
            .apply_at(
                Command::AddDiaryEntry {
                    id: "a".into(),
                    text: "second".into(),
                },
                later(),
            )
            .unwrap();

        let option = store.state().option("a").unwrap();
        let texts: Vec<_> = option.diary_recent_first().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first visit"]);
        let first_id = option.diary[0].id.clone();
        assert_eq!(first_id, format!("diary-{}", now().timestamp_millis()));

        store
            .apply_at(
                Command::DeleteDiaryEntry {
                    id: "a".into(),
                    entry: first_id.clone(),
                },
                later(),
            )
            .unwrap();
        assert_eq!(store.state().option("a").unwrap().diary.len(), 1);

        let err = store
            .apply_at(
                Command::DeleteDiaryEntry {
                    id: "a".into(),
                    entry: first_id,
                },
                later(),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::DiaryEntryNotFound { .. }));
    }

    #[test]
    fn test_blank_diary_text_is_a_noop() {
        let mut store = store_with(&["a"]);
        store
            .apply_at(
                Command::AddDiaryEntry {
                    id: "a".into(),
                    text: "   ".into(),
                },
                now(),
            )
            .unwrap();
        assert!(store.state().option("a").unwrap().diary.is_empty());
        assert_eq!(store.state().version, 0);
    }

    #[test]
    fn test_set_options_prunes_compare_ids() {
        let mut store = store_with(&["a", "b"]);
        store.apply_at(Command::ToggleCompare("a".into()), now()).unwrap();
        store
            .apply_at(Command::SetOptions(vec![sample_option("b")]), now())
            .unwrap();
        assert!(store.state().compare_ids.is_empty());
    }

    #[test]
    fn test_state_json_uses_camel_case() {
        let state = AppState::new();
        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("compareIds").is_some());
        assert!(json["weights"].get("totalCost").is_some());
    }
}
