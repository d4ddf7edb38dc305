//! ddg-search: run one DuckDuckGo text search and print it as JSON
//!
//! Exactly one JSON line goes to stdout. Usage errors exit with status 1;
//! every search outcome, including a failed search, exits with 0.

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use ddg_search::{
    config::{self, Settings},
    engines::{DuckDuckGo, SafeSearch, TimeLimit},
    results::{to_json_line, UsageError},
    search,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command-line arguments accepted by the `ddg-search` binary.
#[derive(Parser, Debug)]
#[command(
    name = "ddg-search",
    version,
    about = "Search DuckDuckGo and print the results as a single JSON line",
    allow_negative_numbers = true
)]
struct Cli {
    #[arg(value_name = "QUERY", allow_hyphen_values = true, help = "Search terms")]
    query: Option<String>,
    #[arg(
        value_name = "MAX_RESULTS",
        help = "Maximum number of results (default: search.max_results, 20)"
    )]
    max_results: Option<i64>,
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = config::CONFIG_ENV,
        help = "Settings file to load instead of the default locations"
    )]
    config: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "REGION",
        help = "Region code such as us-en (default: wt-wt, no region)"
    )]
    region: Option<String>,
    #[arg(
        long,
        value_name = "LEVEL",
        help = "Safe search level: on, moderate or off (default: moderate)"
    )]
    safesearch: Option<SafeSearch>,
    #[arg(
        short,
        long,
        value_name = "LIMIT",
        help = "Only show results from the last day (d), week (w), month (m) or year (y)"
    )]
    timelimit: Option<TimeLimit>,
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Log more to stderr (-v debug, -vv trace)"
    )]
    verbose: u8,
    /// Anything after MAX_RESULTS is ignored
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    ignored: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => return usage_error(clap_message(&e)),
        },
    };

    let Some(query) = cli.query.as_deref() else {
        return usage_error("No query provided");
    };

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => return usage_error(format!("{:#}", e)),
    };

    init_logging(&settings, cli.verbose);
    info!("Starting ddg-search v{}", ddg_search::VERSION);
    if !cli.ignored.is_empty() {
        debug!("Ignoring extra arguments: {:?}", cli.ignored);
    }

    let max_results = cli.max_results.unwrap_or(settings.search.max_results);
    let backend = DuckDuckGo::from_settings(&settings);
    debug!(
        "Searching '{}' (max_results: {}, options: {:?})",
        query,
        max_results,
        backend.options()
    );

    let response = search(&backend, query, max_results).await;
    emit(&response);

    ExitCode::SUCCESS
}

/// Load settings and apply command-line overrides
fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = config::load(cli.config.as_deref())?;

    if let Some(region) = &cli.region {
        settings.search.region = region.clone();
    }
    if let Some(safesearch) = cli.safesearch {
        settings.search.safesearch = safesearch;
    }
    if let Some(timelimit) = cli.timelimit {
        settings.search.timelimit = Some(timelimit);
    }

    Ok(settings)
}

/// Logs go to stderr so stdout only ever carries the JSON line
fn init_logging(settings: &Settings, verbose: u8) {
    let default_filter = match verbose {
        0 => settings.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn usage_error(message: impl Into<String>) -> ExitCode {
    emit(&UsageError::new(message));
    ExitCode::from(1)
}

/// First line of a clap error, without its `error: ` prefix
fn clap_message(error: &clap::Error) -> String {
    let rendered = error.to_string();
    let line = rendered.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).trim().to_string()
}

fn emit<T: Serialize>(value: &T) {
    match to_json_line(value) {
        Ok(line) => println!("{}", line),
        Err(e) => eprintln!("failed to encode output: {:#}", e),
    }
}
