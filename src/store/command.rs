use crate::options::{Status, StudyOption};
use crate::scoring::{WeightPreset, Weights};

/// Every mutation the store accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace the whole collection.
    SetOptions(Vec<StudyOption>),
    AddOption(StudyOption),
    /// Replace the option with the same id.
    UpdateOption(StudyOption),
    DeleteOption(String),
    DuplicateOption(String),
    ToggleFavorite(String),
    SetStatus { id: String, status: Status },
    SetWeights(Weights),
    SavePreset(WeightPreset),
    DeletePreset(String),
    ApplyPreset(String),
    SetCompareIds(Vec<String>),
    ToggleCompare(String),
    ToggleChecklistItem { id: String, item: String },
    AddDiaryEntry { id: String, text: String },
    DeleteDiaryEntry { id: String, entry: String },
}

impl Command {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetOptions(_) => "set-options",
            Command::AddOption(_) => "add-option",
            Command::UpdateOption(_) => "update-option",
            Command::DeleteOption(_) => "delete-option",
            Command::DuplicateOption(_) => "duplicate-option",
            Command::ToggleFavorite(_) => "toggle-favorite",
            Command::SetStatus { .. } => "set-status",
            Command::SetWeights(_) => "set-weights",
            Command::SavePreset(_) => "save-preset",
            Command::DeletePreset(_) => "delete-preset",
            Command::ApplyPreset(_) => "apply-preset",
            Command::SetCompareIds(_) => "set-compare-ids",
            Command::ToggleCompare(_) => "toggle-compare",
            Command::ToggleChecklistItem { .. } => "toggle-checklist-item",
            Command::AddDiaryEntry { .. } => "add-diary-entry",
            Command::DeleteDiaryEntry { .. } => "delete-diary-entry",
        }
    }
}
