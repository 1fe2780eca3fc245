//! Multi-line views: option detail, deadlines, simulator, comparison,
//! dashboard and weights.

use owo_colors::OwoColorize;

use super::formatter::{format_amount, format_score, format_status, get_terminal_width, truncate_name};
use crate::compare::{CellValue, Comparison, ValueKind};
use crate::deadlines::Deadline;
use crate::options::StudyOption;
use crate::ranking::Badge;
use crate::scoring::{monthly_total, one_time_total, six_month_total, Category, ScoreBreakdown, WeightPreset, Weights};
use crate::simulator::{CostLine, Scenario, Simulation};
use crate::summary::DashboardSummary;

const LABEL_WIDTH: usize = 22;

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

/// Ten-cell bar for a 0-10 score
fn score_bar(score: f64) -> String {
    let filled = score.clamp(0.0, 10.0).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(10 - filled))
}

/// Full view of one option: scores, costs, checklist and diary
pub fn format_option_detail(
    option: &StudyOption,
    breakdown: Option<&ScoreBreakdown>,
    weights: &Weights,
    badges: &[Badge],
    use_colors: bool,
) -> String {
    let mut out = Vec::new();

    let mut title = option.display_name();
    if !option.city.is_empty() || !option.country.is_empty() {
        title = format!("{} ({}, {})", title, option.city, option.country);
    }
    out.push(heading(&title, use_colors));
    out.push(format!(
        "  Id: {}  Status: {}{}{}",
        option.id,
        format_status(option.status, use_colors),
        option
            .priority
            .map(|p| format!("  Priority: {:?}", p))
            .unwrap_or_default(),
        if option.is_favorite { "  Favorite" } else { "" }
    ));
    if !option.website.is_empty() {
        out.push(format!("  Website: {}", option.website));
    }
    if !badges.is_empty() {
        let labels: Vec<_> = badges.iter().map(|b| b.label()).collect();
        out.push(format!("  Badges: {}", labels.join(", ")));
    }

    out.push(String::new());
    match breakdown {
        Some(breakdown) => {
            out.push(heading(
                &format!("Score {}", format_score(breakdown.final_score)),
                use_colors,
            ));
            for category in Category::ALL {
                let score = breakdown.get(category);
                out.push(format!(
                    "  {:<width$}{:>5}  {}  (weight {})",
                    category.label(),
                    format_score(score),
                    score_bar(score),
                    weights.get(category),
                    width = LABEL_WIDTH
                ));
            }
        }
        None => out.push("Not ranked (discarded).".to_string()),
    }

    out.push(String::new());
    out.push(heading("Costs", use_colors));
    out.push(format!(
        "  {:<width$}{:>10}",
        "Monthly total",
        format_amount(monthly_total(option)),
        width = LABEL_WIDTH
    ));
    if option.scholarship != 0.0 {
        out.push(format!(
            "  {:<width$}{:>10}",
            "  incl. scholarship",
            format!("-{}", format_amount(option.scholarship)),
            width = LABEL_WIDTH
        ));
    }
    out.push(format!(
        "  {:<width$}{:>10}",
        "Arrival costs",
        format_amount(one_time_total(option)),
        width = LABEL_WIDTH
    ));
    out.push(format!(
        "  {:<width$}{:>10}",
        "6-month total",
        format_amount(six_month_total(option)),
        width = LABEL_WIDTH
    ));

    let progress = option.checklist_progress();
    out.push(String::new());
    out.push(heading(
        &format!(
            "Checklist {}/{} ({}%)",
            progress.completed, progress.total, progress.percent
        ),
        use_colors,
    ));
    for item in &option.checklist {
        let mark = if item.completed { "x" } else { " " };
        out.push(format!("  [{}] {:<12} {}", mark, item.id, item.label));
    }

    if !option.diary.is_empty() {
        out.push(String::new());
        out.push(heading("Diary", use_colors));
        for entry in option.diary_recent_first() {
            out.push(format!(
                "  {}  {}  {}",
                entry.date.format("%Y-%m-%d"),
                entry.text,
                if use_colors {
                    entry.id.dimmed().to_string()
                } else {
                    format!("({})", entry.id)
                }
            ));
        }
    }

    out.join("\n")
}

/// Format deadlines soonest first, overdue ones flagged
pub fn format_deadlines(deadlines: &[Deadline], use_colors: bool) -> String {
    if deadlines.is_empty() {
        return "No upcoming deadlines.".to_string();
    }

    let name_width = get_terminal_width()
        .map(|w| w.saturating_sub(40).max(16))
        .unwrap_or(usize::MAX);

    deadlines
        .iter()
        .map(|deadline| {
            let when = match deadline.days_left {
                d if d < 0 => format!("{}d overdue", -d),
                0 => "today".to_string(),
                d => format!("in {}d", d),
            };
            let name = truncate_name(&deadline.option.display_name(), name_width);
            let line = format!(
                "{}  {:<14}  {:<12}  {}",
                deadline.date.format("%Y-%m-%d"),
                deadline.kind.label(),
                when,
                name
            );
            if !use_colors {
                line
            } else if deadline.days_left < 0 {
                line.red().to_string()
            } else if deadline.days_left <= 30 {
                line.yellow().to_string()
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Profile costs, scenario projection and totals for one option
pub fn format_simulation(
    option: &StudyOption,
    simulation: &Simulation,
    fx_delta_percent: f64,
    active: &[Scenario],
    use_colors: bool,
) -> String {
    let mut out = Vec::new();
    out.push(heading(
        &format!(
            "{}: {} profile, {} months",
            option.display_name(),
            simulation.profile,
            simulation.months
        ),
        use_colors,
    ));

    if active.is_empty() {
        out.push("  No scenarios active.".to_string());
    } else {
        for scenario in active {
            let description = match scenario {
                Scenario::CurrencyShift => format!("Currency shift ({:+}%)", fx_delta_percent),
                other => other.description().to_string(),
            };
            out.push(format!("  + {}", description));
        }
    }

    out.push(String::new());
    out.push(format!(
        "  {:<width$}{:>10}{:>12}",
        "",
        "baseline",
        "scenario",
        width = LABEL_WIDTH
    ));
    for line in CostLine::ALL {
        out.push(format!(
            "  {:<width$}{:>10}{:>12}",
            line.label(),
            format_amount(simulation.baseline.costs.get(line)),
            format_amount(simulation.scenario.costs.get(line)),
            width = LABEL_WIDTH
        ));
    }
    out.push(format!(
        "  {:<width$}{:>10}{:>12}",
        "Income",
        format!("-{}", format_amount(simulation.baseline.income)),
        format!("-{}", format_amount(simulation.scenario.income)),
        width = LABEL_WIDTH
    ));
    out.push(format!(
        "  {:<width$}{:>10}{:>12}",
        "Monthly",
        format_amount(simulation.baseline.total_monthly),
        format_amount(simulation.scenario.total_monthly),
        width = LABEL_WIDTH
    ));

    out.push(String::new());
    out.push(format!(
        "  {:<width$}{:>10}",
        "Arrival costs",
        format_amount(simulation.one_time),
        width = LABEL_WIDTH
    ));
    out.push(format!(
        "  {:<width$}{:>10}",
        "Reserve",
        format_amount(simulation.extra_reserve),
        width = LABEL_WIDTH
    ));
    out.push(format!(
        "  {:<width$}{:>10}{:>12}",
        "Total estimate",
        format_amount(simulation.baseline_total),
        format_amount(simulation.total_estimate),
        width = LABEL_WIDTH
    ));

    let savings = simulation.savings_vs_baseline;
    let verdict = if savings > 0.0 {
        format!("Saves {} vs. baseline", format_amount(savings))
    } else if savings < 0.0 {
        format!("Costs {} more than baseline", format_amount(-savings))
    } else {
        "Same as baseline".to_string()
    };
    out.push(String::new());
    out.push(if use_colors {
        if savings > 0.0 {
            verdict.green().to_string()
        } else if savings < 0.0 {
            verdict.red().to_string()
        } else {
            verdict
        }
    } else {
        verdict
    });

    out.join("\n")
}

/// One line per option: monthly and total under the same scenarios
pub fn format_cohort_simulation(rows: &[(&StudyOption, Simulation)], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No active options to simulate.".to_string();
    }

    let cheapest = rows
        .iter()
        .map(|(_, sim)| sim.total_estimate)
        .fold(f64::INFINITY, f64::min);

    rows.iter()
        .map(|(option, sim)| {
            let line = format!(
                "{:<28}{:>10}/mo{:>12}",
                truncate_name(&option.display_name(), 26),
                format_amount(sim.scenario.total_monthly),
                format_amount(sim.total_estimate)
            );
            if use_colors && sim.total_estimate == cheapest {
                line.green().to_string()
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_cell(value: &CellValue, kind: ValueKind) -> String {
    match (value, kind) {
        (CellValue::Number(n), ValueKind::Currency) => format_amount(*n),
        (CellValue::Number(n), _) => format_score(*n),
        (CellValue::Text(t), _) => t.clone(),
    }
}

/// Criteria as rows, options as columns; best cells green, worst red
pub fn format_comparison(comparison: &Comparison, use_colors: bool) -> String {
    if comparison.options.is_empty() {
        return "No options to compare.".to_string();
    }

    let column_width = 16;
    let mut out = Vec::new();

    let mut header = format!("{:<width$}", "", width = LABEL_WIDTH + 2);
    for option in &comparison.options {
        header.push_str(&format!(
            "{:>width$}",
            truncate_name(&option.name, column_width - 1),
            width = column_width
        ));
    }
    out.push(heading(header.trim_end(), use_colors));

    let mut current_group = None;
    for row in &comparison.rows {
        if current_group != Some(row.criterion.group) {
            current_group = Some(row.criterion.group);
            out.push(heading(row.criterion.group.label(), use_colors));
        }

        let mut line = format!("  {:<width$}", row.criterion.label, width = LABEL_WIDTH);
        for (option, value) in comparison.options.iter().zip(&row.values) {
            let text = truncate_name(&format_cell(value, row.criterion.kind), column_width - 1);
            let marker = if row.is_best(&option.id) {
                "+"
            } else if row.is_worst(&option.id) {
                "-"
            } else {
                " "
            };
            let cell = format!("{:>width$}", format!("{}{}", text, marker), width = column_width);
            let cell = if !use_colors {
                cell
            } else if marker == "+" {
                cell.green().to_string()
            } else if marker == "-" {
                cell.red().to_string()
            } else {
                cell
            };
            line.push_str(&cell);
        }
        out.push(line.trim_end().to_string());
    }

    out.join("\n")
}

/// Headline numbers and the current top options
pub fn format_dashboard(summary: &DashboardSummary, use_colors: bool) -> String {
    let mut out = vec![
        heading("Overview", use_colors),
        format!("  {:<width$}{}", "Options", summary.total_options, width = LABEL_WIDTH),
        format!("  {:<width$}{}", "Candidates", summary.candidates, width = LABEL_WIDTH),
        format!("  {:<width$}{}", "Favorites", summary.favorites, width = LABEL_WIDTH),
        format!(
            "  {:<width$}{} ({} over 6 months)",
            "Average monthly",
            format_amount(summary.average_monthly),
            format_amount(summary.average_six_months),
            width = LABEL_WIDTH
        ),
        format!(
            "  {:<width$}{}",
            "Deadlines in 30 days",
            summary.urgent_deadlines,
            width = LABEL_WIDTH
        ),
    ];

    if !summary.top.is_empty() {
        out.push(String::new());
        out.push(heading("Top ranked", use_colors));
        for (idx, top) in summary.top.iter().enumerate() {
            out.push(format!(
                "  {}. {:>4}  {}",
                idx + 1,
                format_score(top.final_score),
                top.name
            ));
        }
    }

    out.join("\n")
}

/// Current weights, one per line, with their config keys
pub fn format_weights(weights: &Weights) -> String {
    Category::ALL
        .iter()
        .map(|category| {
            format!(
                "  {:<width$}{:>5}  {}",
                category.label(),
                weights.get(*category),
                category.weight_key(),
                width = LABEL_WIDTH
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Saved presets; the one matching the current weights is marked
pub fn format_presets(presets: &[WeightPreset], current: &Weights) -> String {
    if presets.is_empty() {
        return "No presets saved.".to_string();
    }

    presets
        .iter()
        .map(|preset| {
            let active = if preset.weights == *current { "*" } else { " " };
            format!("{} {:<20} {}", active, preset.id, preset.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
