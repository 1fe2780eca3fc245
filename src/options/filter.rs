use super::types::StudyOption;

/// Borrow only the active (non-discarded) options, preserving input order
pub fn filter_active(options: &[StudyOption]) -> Vec<&StudyOption> {
    options.iter().filter(|option| option.is_active()).collect()
}
