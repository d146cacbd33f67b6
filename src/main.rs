use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use palmscan::core::config::Config;
use palmscan::core::Filter;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "palmscan", version, about = "Clean and explore palm pest-inspection records")]
struct Cli {
    /// Config file to use instead of ~/.config/palmscan/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Rule table replacing the built-in pest and severity vocabulary.
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Write debug logs to /tmp/palmscan-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    /// Log to stderr; repeat for more detail (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a table and write it with derived columns.
    Clean {
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Defaults to data.output, then <input>_clean.csv.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print headline metrics and ranked counts.
    Summary {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[command(flatten)]
        filter: FilterArgs,
        /// Length of the ranked lists (defaults to dashboard.top_n).
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Forecast daily inspections of one pest.
    Forecast {
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Canonical pest label, as shown by `summary`.
        #[arg(long)]
        pest: String,
        #[arg(long)]
        sector: Option<String>,
        /// Days to predict (defaults to forecast.periods).
        #[arg(long)]
        periods: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Open the terminal dashboard (the default).
    Dashboard {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    sector: Option<String>,
    /// Sub-area (المحبس), usually combined with --sector.
    #[arg(long)]
    sub_area: Option<String>,
    #[arg(long)]
    pest: Option<String>,
    /// First inspection date, YYYY-MM-DD.
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last inspection date, YYYY-MM-DD.
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    fn into_filter(self) -> Filter {
        Filter {
            sector: self.sector,
            sub_area: self.sub_area,
            pest: self.pest,
            from: self.from,
            to: self.to,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Dashboard { .. }));
    init_logging(cli.debug, cli.verbose, interactive)?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "config unreadable, using defaults");
            Config::defaults()
        }),
    };
    if let Some(rules) = cli.rules {
        config.normalizer.rules_file = Some(rules);
    }
    let normalizer = palmscan::normalizer_for(&config)?;

    match cli.command.unwrap_or(Commands::Dashboard { input: None }) {
        Commands::Clean { input, output } => {
            let input = resolve_input(input, &config)?;
            let output = output
                .or_else(|| config.data.output.clone())
                .unwrap_or_else(|| palmscan::default_output_path(&input));
            let report = palmscan::clean_file(&input, &output, &config, &normalizer)?;
            println!(
                "cleaned {} rows -> {} ({} undated, {} unmatched pests)",
                report.rows,
                report.output.display(),
                report.undated,
                report.unmatched_pests
            );
        }
        Commands::Summary { input, filter, top, json } => {
            let input = resolve_input(input, &config)?;
            let store = palmscan::load_store(&input, &config, &normalizer)?;
            let top = top.unwrap_or(config.dashboard.top_n);
            let report = palmscan::summarize(&store, &filter.into_filter(), normalizer.none_marker(), top);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", palmscan::render_summary(&report));
            }
        }
        Commands::Forecast { input, pest, sector, periods, json } => {
            let input = resolve_input(input, &config)?;
            let store = palmscan::load_store(&input, &config, &normalizer)?;
            let filter = Filter { sector, ..Filter::default() };
            let periods = periods.unwrap_or(config.forecast.periods);
            let forecast = palmscan::forecast(&store, &filter, &pest, periods)
                .with_context(|| format!("no dated records for pest {pest:?}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&forecast)?);
            } else {
                print!("{}", palmscan::render_forecast(&pest, &forecast));
            }
        }
        Commands::Dashboard { input } => {
            let input = resolve_input(input, &config)?;
            let store = palmscan::load_store(&input, &config, &normalizer)?;
            let source = display_name(&input);
            let none_marker = normalizer.none_marker().to_string();
            palmscan_tui::run(store, config, &none_marker, &source)?;
        }
    }
    Ok(())
}

fn resolve_input(input: Option<PathBuf>, config: &Config) -> anyhow::Result<PathBuf> {
    input
        .or_else(|| config.data.input.clone())
        .context("no input table: pass --input or set data.input in the config")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `--debug` logs to a file at debug level. Otherwise batch commands log
/// warnings to stderr (more with `-v`); the dashboard stays silent unless
/// `-v` is given, since stderr shares the terminal.
fn init_logging(debug: bool, verbose: u8, interactive: bool) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/palmscan-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("palmscan debug log started, tail -f /tmp/palmscan-debug.log");
        return Ok(());
    }

    let level = match (verbose, interactive) {
        (0, true) => return Ok(()),
        (0, false) => "warn",
        (1, _) => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
    Ok(())
}
