use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use mobimap::compare::{compare, select_options, Group};
use mobimap::config::{self, Config};
use mobimap::deadlines::upcoming_deadlines;
use mobimap::options::{Status, StudyOption};
use mobimap::output::{self, ScoredOption};
use mobimap::ranking::{badges_for, rank, resolve};
use mobimap::scoring::{validate_weights, Category, WeightPreset, Weights};
use mobimap::simulator::{
    simulate, simulate_cohort, Scenario, ScenarioSet, SimulationInput, SpendingProfile,
};
use mobimap::store::{import_options, load_state, save_state, Command, Store, StoreError};
use mobimap::summary::summarize;

const EXIT_SUCCESS: i32 = 0;
const EXIT_NOT_FOUND: i32 = 1;
const EXIT_IO: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Format {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List options ranked by weighted score (default if no subcommand)
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
        /// Rank with a saved preset's weights without applying it
        #[arg(short, long)]
        preset: Option<String>,
    },
    /// Show scores, costs, checklist and diary of one option
    Show {
        /// Option id, or its rank as shown in list
        option: String,
    },
    /// Compare options side by side (stored compare set if no ids given)
    Compare {
        /// Option ids or ranks, at most five
        ids: Vec<String>,
        /// Only show one criteria group
        #[arg(short, long)]
        group: Option<Group>,
    },
    /// List upcoming application and document deadlines
    Deadlines,
    /// Summary counts, averages and the current top three
    Dashboard,
    /// Project the cost of a stay under a spending profile and scenarios
    Simulate {
        /// Option id or rank (omit with --cohort)
        option: Option<String>,
        /// Spending profile: frugal, realistic or comfortable
        #[arg(short, long)]
        profile: Option<SpendingProfile>,
        /// Scenario to apply; repeatable (dormitory, sharedRoom, scholarship, partTime, betterCity, euroBrl)
        #[arg(short, long = "scenario")]
        scenarios: Vec<String>,
        /// Currency shift in percent for the euroBrl scenario
        #[arg(long, allow_hyphen_values = true)]
        fx: Option<f64>,
        /// Stay length in months (1-12)
        #[arg(short, long)]
        months: Option<u32>,
        /// Emergency reserve added to the estimate
        #[arg(short, long)]
        reserve: Option<f64>,
        /// Run the simulation over the first active options instead
        #[arg(long, conflicts_with = "option")]
        cohort: bool,
    },
    /// Open an option's website in the browser
    Open {
        /// Option id or rank
        option: String,
    },
    /// Show or change the scoring weights and presets
    Weights {
        #[command(subcommand)]
        action: Option<WeightsAction>,
    },
    /// Change one option: favorite, status, duplicate, delete, compare set
    #[command(name = "option")]
    Manage {
        #[command(subcommand)]
        action: OptionAction,
    },
    /// Toggle a checklist item of an option
    Checklist {
        /// Option id or rank
        option: String,
        /// Checklist item id
        item: String,
    },
    /// Add or remove diary entries
    Diary {
        #[command(subcommand)]
        action: DiaryAction,
    },
    /// Replace all options with the ones in a JSON file
    Import {
        /// JSON array of options
        file: PathBuf,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Subcommand, Debug)]
enum WeightsAction {
    /// Print the current weights (default)
    Show,
    /// Set weights, e.g. `totalCost=9 climate=2`
    Set {
        #[arg(required = true)]
        assignments: Vec<String>,
    },
    /// List saved presets
    Presets,
    /// Save the current weights as a preset
    Save {
        name: String,
        /// Preset id (generated if omitted; an existing id is replaced)
        #[arg(long)]
        id: Option<String>,
    },
    /// Replace the current weights with a preset's
    Apply { preset: String },
    /// Delete a preset
    Delete { preset: String },
}

#[derive(Subcommand, Debug)]
enum OptionAction {
    /// Toggle the favorite flag
    Favorite { option: String },
    /// Move an option to another status
    Status { option: String, status: Status },
    /// Copy an option under a fresh id
    Duplicate { option: String },
    /// Delete an option
    Delete { option: String },
    /// Add to or remove from the compare set
    Compare { option: String },
}

#[derive(Subcommand, Debug)]
enum DiaryAction {
    /// Add an entry dated now
    Add {
        option: String,
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Delete an entry by id
    Delete { option: String, entry: String },
}

#[derive(Parser, Debug)]
#[command(name = "mobimap")]
#[command(about = "Compare and rank study-abroad destinations", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/mobimap/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the state file (overrides data_file from config)
    #[arg(short, long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Log to stderr; RUST_LOG wins over --verbose.
fn init_logging(verbose: bool) {
    let default = if verbose { "mobimap=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code_for(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<StoreError>().is_some() {
        return EXIT_NOT_FOUND;
    }
    let io_failure = error.chain().any(|cause| {
        cause.downcast_ref::<std::io::Error>().is_some()
            || cause.downcast_ref::<serde_json::Error>().is_some()
    });
    if io_failure {
        EXIT_IO
    } else {
        EXIT_NOT_FOUND
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let command = cli.command.unwrap_or(Commands::List {
        format: Format::default(),
        preset: None,
    });
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = command {
        if let Err(e) = config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_IO);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let state_path = config.data_path(cli.data.map(PathBuf::from));
    let state = match load_state(&state_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("State error: {:#}", e);
            std::process::exit(EXIT_IO);
        }
    };
    tracing::debug!(
        path = %state_path.display(),
        options = state.options.len(),
        version = state.version,
        "loaded state"
    );

    let mut app = App {
        config,
        store: Store::new(state),
        state_path,
        use_colors: output::should_use_colors(),
    };

    if let Err(e) = app.run(command) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for(&e));
    }
    std::process::exit(EXIT_SUCCESS);
}

struct App {
    config: Config,
    store: Store,
    state_path: PathBuf,
    use_colors: bool,
}

impl App {
    fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::List { format, preset } => self.list(format, preset),
            Commands::Show { option } => self.show(&option),
            Commands::Compare { ids, group } => self.compare(&ids, group),
            Commands::Deadlines => {
                let state = self.store.state();
                let deadlines =
                    upcoming_deadlines(&state.options, Utc::now(), &self.config.deadlines());
                println!("{}", output::format_deadlines(&deadlines, self.use_colors));
                Ok(())
            }
            Commands::Dashboard => {
                let state = self.store.state();
                let summary = summarize(
                    &state.options,
                    &state.weights,
                    &self.config.scoring(),
                    &self.config.deadlines(),
                    Utc::now(),
                );
                println!("{}", output::format_dashboard(&summary, self.use_colors));
                Ok(())
            }
            Commands::Simulate {
                option,
                profile,
                scenarios,
                fx,
                months,
                reserve,
                cohort,
            } => {
                let mut input = SimulationInput::from_config(&self.config.simulator());
                if let Some(profile) = profile {
                    input.profile = profile;
                }
                input.scenarios = ScenarioSet::from_keys(&scenarios);
                if let Some(fx) = fx {
                    input.fx_delta_percent = fx;
                }
                if let Some(months) = months {
                    input.months = months;
                    if input.clamped_months() != months {
                        tracing::warn!(months, used = input.clamped_months(), "months out of range");
                    }
                }
                if let Some(reserve) = reserve {
                    input.extra_reserve = reserve;
                }
                self.simulate(option.as_deref(), &input, cohort)
            }
            Commands::Open { option } => {
                let id = self.resolve_id(&option)?;
                let option = self.option(&id)?;
                let url = mobimap::browser::website_url(option)
                    .ok_or_else(|| anyhow!("Option '{}' has no website on record", id))?;
                mobimap::browser::open_url(&url)?;
                println!("Opening {} in browser: {}", option.display_name(), url);
                Ok(())
            }
            Commands::Weights { action } => self.weights(action.unwrap_or(WeightsAction::Show)),
            Commands::Manage { action } => self.manage(action),
            Commands::Checklist { option, item } => {
                let id = self.resolve_id(&option)?;
                self.apply(Command::ToggleChecklistItem {
                    id: id.clone(),
                    item: item.clone(),
                })?;
                let option = self.option(&id)?;
                let progress = option.checklist_progress();
                let done = option
                    .checklist
                    .iter()
                    .find(|c| c.id == item)
                    .map(|c| c.completed)
                    .unwrap_or(false);
                println!(
                    "{} '{}' ({}/{} done)",
                    if done { "Checked" } else { "Unchecked" },
                    item,
                    progress.completed,
                    progress.total
                );
                Ok(())
            }
            Commands::Diary { action } => self.diary(action),
            Commands::Import { file } => {
                let options = import_options(&file)?;
                let count = options.len();
                self.apply(Command::SetOptions(options))?;
                println!("Imported {} options from {}", count, file.display());
                Ok(())
            }
            Commands::Init => Ok(()),
        }
    }

    /// Apply a command and persist when it changed the state.
    fn apply(&mut self, command: Command) -> Result<()> {
        let before = self.store.state().version;
        self.store.apply(command)?;
        if self.store.state().version != before {
            save_state(&self.state_path, self.store.state())
                .with_context(|| format!("Failed to save state to {}", self.state_path.display()))?;
        }
        Ok(())
    }

    /// Id of the option `key` names, by id or by current rank.
    fn resolve_id(&self, key: &str) -> Result<String> {
        let state = self.store.state();
        let ranked = rank(&state.options, &state.weights, &self.config.scoring());
        resolve(&state.options, &ranked, key)
            .map(|option| option.id.clone())
            .ok_or_else(|| StoreError::OptionNotFound(key.to_string()).into())
    }

    fn option(&self, id: &str) -> Result<&StudyOption> {
        self.store
            .state()
            .option(id)
            .ok_or_else(|| StoreError::OptionNotFound(id.to_string()).into())
    }

    fn list(&self, format: Format, preset: Option<String>) -> Result<()> {
        let state = self.store.state();
        let weights: Weights = match preset {
            Some(id) => {
                state
                    .preset(&id)
                    .ok_or(StoreError::PresetNotFound(id.clone()))?
                    .weights
            }
            None => state.weights,
        };
        let scoring = self.config.scoring();

        let ranked = rank(&state.options, &weights, &scoring);
        let scored: Vec<ScoredOption> = ranked
            .iter()
            .map(|r| ScoredOption::new(r, badges_for(r.option, &state.options, &weights, &scoring)))
            .collect();

        match format {
            Format::Table => println!("{}", output::format_ranked_table(&scored, self.use_colors)),
            Format::Tsv => {
                let tsv = output::format_tsv(&scored);
                if !tsv.is_empty() {
                    println!("{}", tsv);
                }
            }
            Format::Json => println!("{}", output::format_json(&scored)?),
        }
        Ok(())
    }

    fn show(&self, key: &str) -> Result<()> {
        let state = self.store.state();
        let scoring = self.config.scoring();
        let ranked = rank(&state.options, &state.weights, &scoring);
        let option = resolve(&state.options, &ranked, key)
            .ok_or_else(|| StoreError::OptionNotFound(key.to_string()))?;

        // Discarded options are outside the cohort and carry no scores
        let breakdown = ranked
            .iter()
            .find(|r| r.option.id == option.id)
            .map(|r| r.breakdown);
        let badges = if option.is_active() {
            badges_for(option, &state.options, &state.weights, &scoring)
        } else {
            Vec::new()
        };

        println!(
            "{}",
            output::format_option_detail(
                option,
                breakdown.as_ref(),
                &state.weights,
                &badges,
                self.use_colors
            )
        );
        Ok(())
    }

    fn compare(&self, keys: &[String], group: Option<Group>) -> Result<()> {
        let state = self.store.state();
        let ranked = rank(&state.options, &state.weights, &self.config.scoring());
        let requested: Vec<String> = keys
            .iter()
            .map(|key| {
                resolve(&state.options, &ranked, key)
                    .map(|option| option.id.clone())
                    .unwrap_or_else(|| key.clone())
            })
            .collect();

        let selected = select_options(&state.options, &requested, &state.compare_ids);
        if selected.is_empty() {
            println!("No options to compare.");
            return Ok(());
        }
        let comparison = compare(selected, group);
        println!("{}", output::format_comparison(&comparison, self.use_colors));
        Ok(())
    }

    fn simulate(&self, key: Option<&str>, input: &SimulationInput, cohort: bool) -> Result<()> {
        let state = self.store.state();
        if cohort {
            let rows = simulate_cohort(&state.options, input);
            println!("{}", output::format_cohort_simulation(&rows, self.use_colors));
            return Ok(());
        }

        let key = key.ok_or_else(|| anyhow!("Name an option to simulate, or pass --cohort"))?;
        let id = self.resolve_id(key)?;
        let option = self.option(&id)?;
        let simulation = simulate(option, input);
        let active: Vec<Scenario> = input.scenarios.iter().collect();
        println!(
            "{}",
            output::format_simulation(
                option,
                &simulation,
                input.fx_delta_percent,
                &active,
                self.use_colors
            )
        );
        Ok(())
    }

    fn weights(&mut self, action: WeightsAction) -> Result<()> {
        match action {
            WeightsAction::Show => {
                println!("{}", output::format_weights(&self.store.state().weights));
            }
            WeightsAction::Set { assignments } => {
                let mut weights = self.store.state().weights;
                for assignment in &assignments {
                    let (key, value) = assignment
                        .split_once('=')
                        .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", assignment))?;
                    let category: Category = key.parse().map_err(|e: String| anyhow!(e))?;
                    let value: f64 = value
                        .trim()
                        .parse()
                        .with_context(|| format!("Invalid weight value '{}'", value))?;
                    weights.set(category, value);
                }
                if let Err(errors) = validate_weights(&weights) {
                    for error in &errors {
                        eprintln!("  - {}", error);
                    }
                    bail!("Invalid weights, nothing changed");
                }
                self.apply(Command::SetWeights(weights))?;
                println!("{}", output::format_weights(&weights));
            }
            WeightsAction::Presets => {
                let state = self.store.state();
                println!("{}", output::format_presets(&state.presets, &state.weights));
            }
            WeightsAction::Save { name, id } => {
                let id = id.unwrap_or_else(|| format!("preset-{}", Utc::now().timestamp_millis()));
                let preset = WeightPreset::new(id.clone(), name.clone(), self.store.state().weights);
                self.apply(Command::SavePreset(preset))?;
                println!("Saved preset '{}' as {}", name, id);
            }
            WeightsAction::Apply { preset } => {
                self.apply(Command::ApplyPreset(preset))?;
                println!("{}", output::format_weights(&self.store.state().weights));
            }
            WeightsAction::Delete { preset } => {
                self.apply(Command::DeletePreset(preset.clone()))?;
                println!("Deleted preset {}", preset);
            }
        }
        Ok(())
    }

    fn manage(&mut self, action: OptionAction) -> Result<()> {
        match action {
            OptionAction::Favorite { option } => {
                let id = self.resolve_id(&option)?;
                self.apply(Command::ToggleFavorite(id.clone()))?;
                let option = self.option(&id)?;
                if option.is_favorite {
                    println!("Marked {} as favorite", option.display_name());
                } else {
                    println!("Removed {} from favorites", option.display_name());
                }
            }
            OptionAction::Status { option, status } => {
                let id = self.resolve_id(&option)?;
                self.apply(Command::SetStatus {
                    id: id.clone(),
                    status,
                })?;
                println!("{} is now {}", self.option(&id)?.display_name(), status);
            }
            OptionAction::Duplicate { option } => {
                let id = self.resolve_id(&option)?;
                self.apply(Command::DuplicateOption(id.clone()))?;
                if let Some(copy) = self.store.state().options.last() {
                    println!("Duplicated {} as {}", id, copy.id);
                }
            }
            OptionAction::Delete { option } => {
                let id = self.resolve_id(&option)?;
                self.apply(Command::DeleteOption(id.clone()))?;
                println!("Deleted {}", id);
            }
            OptionAction::Compare { option } => {
                let id = self.resolve_id(&option)?;
                self.apply(Command::ToggleCompare(id.clone()))?;
                let state = self.store.state();
                if state.compare_ids.contains(&id) {
                    println!("Added {} to the compare set ({} selected)", id, state.compare_ids.len());
                } else {
                    println!("Removed {} from the compare set ({} selected)", id, state.compare_ids.len());
                }
            }
        }
        Ok(())
    }

    fn diary(&mut self, action: DiaryAction) -> Result<()> {
        match action {
            DiaryAction::Add { option, text } => {
                let id = self.resolve_id(&option)?;
                let before = self.store.state().version;
                self.apply(Command::AddDiaryEntry {
                    id: id.clone(),
                    text: text.join(" "),
                })?;
                if self.store.state().version == before {
                    println!("Nothing to add.");
                } else if let Some(entry) = self.option(&id)?.diary.last() {
                    println!("Added diary entry {} to {}", entry.id, id);
                }
            }
            DiaryAction::Delete { option, entry } => {
                let id = self.resolve_id(&option)?;
                self.apply(Command::DeleteDiaryEntry {
                    id: id.clone(),
                    entry: entry.clone(),
                })?;
                println!("Deleted diary entry {} from {}", entry, id);
            }
        }
        Ok(())
    }
}
