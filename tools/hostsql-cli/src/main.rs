///
/// hostsql - run SQL against SQLite with host-typed parameter batches
///
/// Usage:
/// - hostsql app.db "SELECT id, name FROM users"
/// - hostsql app.db "INSERT INTO users VALUES (?, ?)" --params rows.json
/// - hostsql app.db "SELECT * FROM users WHERE id = ?" --params-json '[{"id": 1}]'
///
/// Settings come from `hostsql.toml` in the working directory (or the file
/// named by `--config`); flags override them.
///

mod config;
mod errors;
mod output;
mod params;

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::debug;

use hostsql_core::RecordArray;
use hostsql_sqlite3::OpenOptions;

use config::{load_config, Config, LogLevel, OutputFormat};
use errors::CliError;
use output::render_outcome;
use params::parse_batch;

#[derive(Parser)]
#[command(name = "hostsql")]
#[command(author, version, about = "Run SQL against SQLite with host-typed parameters", long_about = None)]
struct Cli {
    /// Database file to open
    target: String,

    /// The SQL statement to run
    query: String,

    /// JSON file with the parameter batch
    #[arg(long, conflicts_with = "params_json")]
    params: Option<PathBuf>,

    /// Parameter batch given inline as JSON
    #[arg(long)]
    params_json: Option<String>,

    /// Config file (defaults to ./hostsql.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Open the database read-only
    #[arg(long)]
    read_only: bool,

    /// Milliseconds to wait on a locked database
    #[arg(long, value_name = "MS")]
    busy_timeout: Option<u64>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = match load_config(cli.config.as_deref(), &cwd) {
        Ok(config) => config,
        Err(e) => report_fatal(&e),
    };
    init_logging(config.log.level.raised(cli.verbose));

    match run(&cli, &config) {
        Ok(rendered) => print!("{}", rendered),
        Err(e) => report_fatal(&e),
    }
}

fn init_logging(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level.to_tracing())
        .init();
}

fn run(cli: &Cli, config: &Config) -> Result<String, CliError> {
    let (options, format) = settings(cli, config);

    let batch = load_params(cli)?;
    if let Some(batch) = &batch {
        debug!(rows = batch.len(), fields = batch.field_count(), "loaded parameter batch");
    }

    let outcome = hostsql_sqlite3::run(
        &cli.target,
        &cli.query,
        batch.as_ref(),
        &options,
    )?;
    Ok(render_outcome(&outcome, format))
}

/// Connection options and output format, with flags taking precedence
/// over the config file.
fn settings(cli: &Cli, config: &Config) -> (OpenOptions, OutputFormat) {
    let mut connection = config.connection.clone();
    if cli.read_only {
        connection.read_only = true;
    }
    if let Some(ms) = cli.busy_timeout {
        connection.busy_timeout_ms = Some(ms);
    }
    let format = cli.format.unwrap_or(config.output.format);
    (connection.open_options(), format)
}

fn load_params(cli: &Cli) -> Result<Option<RecordArray>, CliError> {
    if let Some(json) = &cli.params_json {
        return parse_batch(json).map(Some);
    }
    let Some(path) = &cli.params else {
        return Ok(None);
    };
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;
    parse_batch(&json).map(Some)
}

fn report_fatal(err: &CliError) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1);
}
