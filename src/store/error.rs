use thiserror::Error;

/// A command the store could not apply. The state is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no option with id '{0}'")]
    OptionNotFound(String),

    #[error("no weight preset with id '{0}'")]
    PresetNotFound(String),

    #[error("an option with id '{0}' already exists")]
    DuplicateOptionId(String),

    #[error("option '{option}' has no diary entry '{entry}'")]
    DiaryEntryNotFound { option: String, entry: String },

    #[error("option '{option}' has no checklist item '{item}'")]
    ChecklistItemNotFound { option: String, item: String },

    #[error("option '{0}' is discarded and its status can no longer change")]
    TerminalStatus(String),

    #[error("at most {0} options can be compared at once")]
    CompareLimitReached(usize),
}
