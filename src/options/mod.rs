pub mod filter;
pub mod lenient;
pub mod types;

pub use filter::filter_active;
pub use types::{
    default_checklist, ChecklistItem, ChecklistProgress, DiaryEntry, Priority, RegretRisk, Status,
    StudyOption, DEFAULT_CHECKLIST,
};
