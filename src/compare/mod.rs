pub mod criteria;

pub use criteria::{CellValue, Criterion, Group, ValueKind, CRITERIA};

use crate::options::StudyOption;

/// Most options shown side by side.
pub const MAX_COMPARED: usize = 5;

/// Options preselected when nothing has been picked.
pub const DEFAULT_SELECTION: usize = 3;

/// One evaluated criterion across the compared options.
#[derive(Debug, Clone)]
pub struct ComparisonRow {
    pub criterion: &'static Criterion,
    /// One cell per compared option, in selection order.
    pub values: Vec<CellValue>,
    /// Ids holding the best value.
    pub best: Vec<String>,
    /// Ids holding the worst value; empty unless more than one option is compared.
    pub worst: Vec<String>,
}

impl ComparisonRow {
    pub fn is_best(&self, id: &str) -> bool {
        self.best.iter().any(|b| b == id)
    }

    pub fn is_worst(&self, id: &str) -> bool {
        self.worst.iter().any(|w| w == id)
    }
}

#[derive(Debug, Clone)]
pub struct Comparison<'a> {
    pub options: Vec<&'a StudyOption>,
    pub rows: Vec<ComparisonRow>,
}

/// Resolve which options to compare: explicit ids first, then the stored
/// compare set, then the first few options. Unknown ids are skipped and the
/// result is capped.
pub fn select_options<'a>(
    options: &'a [StudyOption],
    requested: &[String],
    compare_ids: &[String],
) -> Vec<&'a StudyOption> {
    let ids = if !requested.is_empty() {
        requested
    } else {
        compare_ids
    };

    if ids.is_empty() {
        return options.iter().take(DEFAULT_SELECTION).collect();
    }

    let mut selected: Vec<&StudyOption> = Vec::new();
    for id in ids {
        match options.iter().find(|o| &o.id == id) {
            Some(option) if !selected.iter().any(|s| s.id == option.id) => selected.push(option),
            Some(_) => {}
            None => tracing::warn!(id = %id, "skipping unknown option in comparison"),
        }
    }
    selected.truncate(MAX_COMPARED);
    selected
}

fn best_and_worst(
    values: &[CellValue],
    options: &[&StudyOption],
    higher_is_better: bool,
) -> (Vec<String>, Vec<String>) {
    let numeric: Vec<(f64, &str)> = values
        .iter()
        .zip(options)
        .filter_map(|(value, option)| value.as_number().map(|n| (n, option.id.as_str())))
        .collect();
    if numeric.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let (lo, hi) = numeric
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (n, _)| {
            (lo.min(*n), hi.max(*n))
        });
    let (best, worst) = if higher_is_better { (hi, lo) } else { (lo, hi) };

    let holding = |target: f64| -> Vec<String> {
        numeric
            .iter()
            .filter(|(n, _)| *n == target)
            .map(|(_, id)| id.to_string())
            .collect()
    };

    let worst_ids = if numeric.len() > 1 { holding(worst) } else { Vec::new() };
    (holding(best), worst_ids)
}

/// Build the comparison table, optionally limited to one criterion group.
pub fn compare<'a>(options: Vec<&'a StudyOption>, group: Option<Group>) -> Comparison<'a> {
    let rows = CRITERIA
        .iter()
        .filter(|criterion| group.map_or(true, |g| criterion.group == g))
        .map(|criterion| {
            let values: Vec<CellValue> = options.iter().map(|o| (criterion.extract)(o)).collect();
            let (best, worst) = match criterion.higher_is_better {
                Some(higher) => best_and_worst(&values, &options, higher),
                None => (Vec::new(), Vec::new()),
            };
            ComparisonRow {
                criterion,
                values,
                best,
                worst,
            }
        })
        .collect();

    Comparison { options, rows }
}
