use std::io::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{Width, terminal_size};

use crate::options::{Status, StudyOption};
use crate::ranking::{Badge, RankedOption};
use crate::scoring::{monthly_total, ScoreBreakdown};

/// A ranked option with its badges, ready for display
pub struct ScoredOption<'a> {
    pub rank: usize,
    pub option: &'a StudyOption,
    pub breakdown: ScoreBreakdown,
    pub badges: Vec<Badge>,
}

impl<'a> ScoredOption<'a> {
    pub fn new(ranked: &RankedOption<'a>, badges: Vec<Badge>) -> Self {
        Self {
            rank: ranked.rank,
            option: ranked.option,
            breakdown: ranked.breakdown,
            badges,
        }
    }
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
pub(crate) fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
pub(crate) fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Whole currency units with thousands separators ("1,930", "-200")
pub fn format_amount(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// One-decimal score ("8.4", "10.0")
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// Status as a short colored tag
pub(crate) fn format_status(status: Status, use_colors: bool) -> String {
    let text = status.as_str();
    if !use_colors {
        return text.to_string();
    }
    match status {
        Status::Interested => text.blue().to_string(),
        Status::Candidate => text.green().to_string(),
        Status::Approved => text.cyan().to_string(),
        Status::Discarded => text.dimmed().to_string(),
    }
}

fn format_badges(badges: &[Badge]) -> String {
    if badges.is_empty() {
        String::new()
    } else {
        let labels: Vec<_> = badges.iter().map(|b| b.label()).collect();
        format!("[{}]", labels.join(", "))
    }
}

/// Format ranked options as a table with columns: Index, Score, Name, Monthly, Badges
/// No headers (minimal format)
/// Index column: 3 chars (fits "99."), right-aligned
/// Score column is right-aligned, 4 chars wide (fits "10.0")
pub fn format_ranked_table(options: &[ScoredOption], use_colors: bool) -> String {
    if options.is_empty() {
        return "No options to rank.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 3;
    let score_width = 4;
    let monthly_width = 10;
    let separator = "  ";

    options
        .iter()
        .map(|scored| {
            let index_str = format!("{:>2}.", scored.rank);
            let score_padded = format!(
                "{:>width$}",
                format_score(scored.breakdown.final_score),
                width = score_width
            );
            let monthly = format!(
                "{:>width$}",
                format!("{}/mo", format_amount(monthly_total(scored.option))),
                width = monthly_width
            );
            let badges = format_badges(&scored.badges);
            let star = if scored.option.is_favorite { "*" } else { " " };

            // Name gets whatever the fixed columns leave over
            let fixed_width = index_width
                + 1
                + score_width
                + separator.len() * 3
                + 2
                + monthly_width
                + badges.chars().count();
            let display_name = scored.option.display_name();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&display_name, width - fixed_width)
                }
                Some(_) => truncate_name(&display_name, 20),
                None => display_name,
            };

            let line = if use_colors {
                format!(
                    "{} {}{}{} {}{}{}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    star.yellow(),
                    name,
                    separator,
                    monthly.cyan(),
                    separator,
                    badges.green()
                )
            } else {
                format!(
                    "{} {}{}{} {}{}{}{}{}",
                    index_str, score_padded, separator, star, name, separator, monthly, separator, badges
                )
            };
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format ranked options as tab-separated values for scripting
/// Columns: rank, score, id, name, monthly total, status (no headers, no colors)
pub fn format_tsv(options: &[ScoredOption]) -> String {
    if options.is_empty() {
        return String::new();
    }

    options
        .iter()
        .map(|scored| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                scored.rank,
                format_score(scored.breakdown.final_score),
                scored.option.id,
                scored.option.name,
                monthly_total(scored.option).round() as i64,
                scored.option.status
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonRow<'a> {
    rank: usize,
    id: &'a str,
    name: &'a str,
    status: Status,
    monthly_total: f64,
    breakdown: ScoreBreakdown,
    badges: &'a [Badge],
}

/// Format ranked options as a pretty JSON array
pub fn format_json(options: &[ScoredOption]) -> serde_json::Result<String> {
    let rows: Vec<JsonRow> = options
        .iter()
        .map(|scored| JsonRow {
            rank: scored.rank,
            id: &scored.option.id,
            name: &scored.option.name,
            status: scored.option.status,
            monthly_total: monthly_total(scored.option),
            breakdown: scored.breakdown,
            badges: &scored.badges,
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::rank;
    use crate::scoring::{ScoringConfig, Weights};
    use chrono::Utc;

    fn sample_option(id: &str, name: &str, rent: f64) -> StudyOption {
        let mut option = StudyOption::new(id, name, Utc::now());
        option.monthly_rent = rent;
        option.stem_reputation = 8.0;
        option
    }

    fn scored<'a>(options: &'a [StudyOption]) -> Vec<ScoredOption<'a>> {
        rank(options, &Weights::default(), &ScoringConfig::default())
            .iter()
            .map(|r| ScoredOption::new(r, Vec::new()))
            .collect()
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(1930.0), "1,930");
        assert_eq!(format_amount(1234567.4), "1,234,567");
        assert_eq!(format_amount(-200.0), "-200");
        assert_eq!(format_amount(-1500.0), "-1,500");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(8.4), "8.4");
        assert_eq!(format_score(10.0), "10.0");
        assert_eq!(format_score(0.0), "0.0");
    }

    #[test]
    fn test_truncate_name_short() {
        assert_eq!(truncate_name("Short name", 20), "Short name");
    }

    #[test]
    fn test_truncate_name_exact() {
        assert_eq!(truncate_name("Exact", 5), "Exact");
    }

    #[test]
    fn test_truncate_name_long() {
        assert_eq!(
            truncate_name("Technical University of Munich", 15),
            "Technical Un..."
        );
    }

    #[test]
    fn test_truncate_name_unicode() {
        assert_eq!(truncate_name("Universität Wien", 16), "Universität Wien");
        assert_eq!(truncate_name("Universität Wien", 10), "Univers...");
    }

    #[test]
    fn test_truncate_name_very_narrow() {
        assert_eq!(truncate_name("Lisbon", 3), "Lis");
    }

    #[test]
    fn test_format_ranked_table_empty() {
        assert_eq!(format_ranked_table(&[], false), "No options to rank.");
    }

    #[test]
    fn test_format_ranked_table_rows() {
        let options = vec![
            sample_option("tum", "TU Munich", 900.0),
            sample_option("kth", "KTH Stockholm", 1200.0),
        ];
        let rows = scored(&options);
        let result = format_ranked_table(&rows, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1."));
        assert!(lines[1].starts_with(" 2."));
        assert!(lines[0].contains("TU Munich"));
        assert!(lines[0].contains("900/mo"));
        assert!(lines[1].contains("1,200/mo"));
    }

    #[test]
    fn test_format_ranked_table_badges_and_favorite() {
        let mut favorite = sample_option("tum", "TU Munich", 900.0);
        favorite.is_favorite = true;
        let options = vec![favorite];
        let ranked = rank(&options, &Weights::default(), &ScoringConfig::default());
        let rows = vec![ScoredOption::new(&ranked[0], vec![Badge::Cheapest, Badge::BestStem])];
        let result = format_ranked_table(&rows, false);
        assert!(result.contains("* TU Munich"));
        assert!(result.ends_with("[Cheapest, Best STEM]"));
    }

    #[test]
    fn test_format_tsv_empty() {
        assert_eq!(format_tsv(&[]), "");
    }

    #[test]
    fn test_format_tsv_columns() {
        let options = vec![sample_option("tum", "TU Munich", 900.4)];
        let rows = scored(&options);
        let result = format_tsv(&rows);
        let fields: Vec<&str> = result.split('\t').collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[0], "1");
        assert_eq!(fields[2], "tum");
        assert_eq!(fields[3], "TU Munich");
        assert_eq!(fields[4], "900");
        assert_eq!(fields[5], "interested");
    }

    #[test]
    fn test_format_json() {
        let options = vec![sample_option("tum", "TU Munich", 900.0)];
        let ranked = rank(&options, &Weights::default(), &ScoringConfig::default());
        let rows = vec![ScoredOption::new(&ranked[0], vec![Badge::BestOverall])];
        let json = format_json(&rows).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], "tum");
        assert_eq!(value[0]["rank"], 1);
        assert_eq!(value[0]["monthlyTotal"], 900.0);
        assert_eq!(value[0]["badges"][0], "best-overall");
        assert!(value[0]["breakdown"]["finalScore"].is_number());
    }
}
