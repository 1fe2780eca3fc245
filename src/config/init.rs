use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{get_config_path, Config};
use crate::deadlines::{DeadlineConfig, DEFAULT_HORIZON_DAYS, DEFAULT_OVERDUE_DAYS};
use crate::scoring::{ScoringConfig, DEFAULT_BUREAUCRACY_SCORE};
use crate::simulator::config::{
    DEFAULT_EXTRA_RESERVE, DEFAULT_FX_DELTA_PERCENT, DEFAULT_MONTHS, MAX_MONTHS, MIN_MONTHS,
};
use crate::simulator::{SimulatorConfig, SpendingProfile};
use crate::store::get_state_path;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Keep asking until the answer parses and passes `check`.
fn prompt_parsed<T, F>(message: &str, default: &str, check: F) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&T) -> Result<(), String>,
{
    loop {
        let input = prompt_with_default(message, default)?;
        match input.parse::<T>() {
            Ok(value) => match check(&value) {
                Ok(()) => return Ok(value),
                Err(e) => println!("  Invalid: {}. Try again.", e),
            },
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(18));
    }
    println!();
}

fn ask_scoring() -> Result<ScoringConfig> {
    typewriter("Bureaucracy ease has no per-option input yet, so every option gets the same score.");
    let bureaucracy_score: f64 = prompt_parsed(
        "Bureaucracy score (0-10)",
        &DEFAULT_BUREAUCRACY_SCORE.to_string(),
        |v: &f64| {
            if (0.0..=10.0).contains(v) {
                Ok(())
            } else {
                Err("must be between 0 and 10".to_string())
            }
        },
    )?;

    Ok(ScoringConfig {
        bureaucracy_score: Some(bureaucracy_score),
        ..ScoringConfig::default()
    })
}

fn ask_deadlines() -> Result<DeadlineConfig> {
    typewriter("Deadlines are listed from a little in the past to a while into the future.");
    let non_negative = |v: &i64| {
        if *v >= 0 {
            Ok(())
        } else {
            Err("must be non-negative".to_string())
        }
    };
    let overdue_days: i64 = prompt_parsed(
        "Keep overdue deadlines visible for how many days?",
        &DEFAULT_OVERDUE_DAYS.to_string(),
        non_negative,
    )?;
    let horizon_days: i64 = prompt_parsed(
        "Hide deadlines further out than how many days?",
        &DEFAULT_HORIZON_DAYS.to_string(),
        non_negative,
    )?;

    Ok(DeadlineConfig {
        overdue_days: Some(overdue_days),
        horizon_days: Some(horizon_days),
    })
}

fn ask_simulator() -> Result<SimulatorConfig> {
    typewriter("The budget simulator projects a stay under a spending profile and what-if scenarios.");
    typewriter("  frugal       -- tight budget, less leisure and travel");
    typewriter("  realistic    -- the costs exactly as entered");
    typewriter("  comfortable  -- more room for housing, leisure and trips");
    let profile: SpendingProfile = prompt_parsed(
        "Default spending profile",
        SpendingProfile::default().as_str(),
        |_| Ok(()),
    )?;
    let months: u32 = prompt_parsed(
        "Default stay length in months (1-12)",
        &DEFAULT_MONTHS.to_string(),
        |v: &u32| {
            if (MIN_MONTHS..=MAX_MONTHS).contains(v) {
                Ok(())
            } else {
                Err("must be between 1 and 12".to_string())
            }
        },
    )?;
    let extra_reserve: f64 = prompt_parsed(
        "Emergency reserve added to every estimate",
        &DEFAULT_EXTRA_RESERVE.to_string(),
        |v: &f64| {
            if *v >= 0.0 {
                Ok(())
            } else {
                Err("must be non-negative".to_string())
            }
        },
    )?;
    let fx_delta_percent: f64 = prompt_parsed(
        "Currency shift for the exchange-rate scenario (percent)",
        &DEFAULT_FX_DELTA_PERCENT.to_string(),
        |v: &f64| {
            if v.is_finite() {
                Ok(())
            } else {
                Err("must be a number".to_string())
            }
        },
    )?;

    Ok(SimulatorConfig {
        months: Some(months),
        extra_reserve: Some(extra_reserve),
        fx_delta_percent: Some(fx_delta_percent),
        profile: Some(profile),
    })
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("mobimap Configuration Wizard");
    println!("============================");
    println!();

    // 1. Data file
    let default_state = get_state_path();
    let data_str = prompt_with_default(
        "Where should your options be stored?",
        &default_state.display().to_string(),
    )?;
    let data_path = PathBuf::from(&data_str);
    let data_file = if data_path == default_state {
        None
    } else {
        Some(data_path)
    };

    // 2. Scoring
    println!();
    let scoring = if prompt_yes_no("Configure scoring? (n accepts defaults)", false)? {
        ask_scoring()?
    } else {
        ScoringConfig::default()
    };

    // 3. Deadlines
    println!();
    let deadlines = if prompt_yes_no("Configure the deadline window? (n accepts defaults)", false)? {
        ask_deadlines()?
    } else {
        DeadlineConfig::default()
    };

    // 4. Simulator
    println!();
    let simulator = if prompt_yes_no("Configure simulator defaults? (n accepts defaults)", true)? {
        ask_simulator()?
    } else {
        SimulatorConfig::default()
    };

    // 5. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 6. Write config
    let config = Config {
        data_file,
        scoring: Some(scoring),
        deadlines: Some(deadlines),
        simulator: Some(simulator),
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    tracing::info!(path = %config_path.display(), "wrote config");
    println!();
    println!("Config written to {}", config_path.display());
    typewriter("Weights and presets live with your options and can be changed any time with `mobimap weights`.");
    println!("Run `mobimap import <FILE>` to load your options, then `mobimap` to see the ranking.");

    Ok(())
}
