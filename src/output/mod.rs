pub mod formatter;
pub mod report;

pub use formatter::{
    format_amount, format_json, format_ranked_table, format_score, format_tsv, should_use_colors,
    ScoredOption,
};
pub use report::{
    format_cohort_simulation, format_comparison, format_dashboard, format_deadlines,
    format_option_detail, format_presets, format_simulation, format_weights,
};
