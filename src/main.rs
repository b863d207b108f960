//! ptyredact - run a command on a PTY and scrub secrets from its output
//!
//! Usage: `ptyredact [OPTIONS] <REDACTIONS> <COMMAND> [ARGS]...`
//!
//! `REDACTIONS` is a single argument holding newline-separated secrets.
//! The exit status is the child's, or 1 if the child was killed by a
//! signal or could not be started.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use tracing::{debug, error, warn};

use ptyredact::{
    exit_status, logging, ConfigLoader, RedactionSet, Session, SessionConfig, SpawnConfig,
    FAILURE_EXIT_CODE,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "ptyredact")]
#[command(version)]
#[command(about = "Run a command in a pseudoterminal and redact secrets from its output")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "PTYREDACT_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `ptyredact=trace` (PTYREDACT_LOG takes precedence)
    #[arg(long)]
    log_level: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Newline-separated secrets to redact
    #[arg(allow_hyphen_values = true)]
    redactions: String,

    /// Command to run
    command: String,

    /// Arguments for the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => FAILURE_EXIT_CODE,
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ptyredact: {:#}", e);
            FAILURE_EXIT_CODE
        }
    };

    process::exit(code);
}

/// Everything that must drop before `process::exit`
fn run(cli: Cli) -> anyhow::Result<i32> {
    let (mut config, config_path) = ConfigLoader::new()
        .load(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(file) = cli.log_file {
        config.logging.file = Some(file);
    }
    config.validate()?;

    logging::init(&config.logging).context("Failed to initialize logging")?;
    if let Some(path) = config_path {
        debug!("Loaded configuration from {}", path.display());
    }

    let redactions = RedactionSet::parse(&cli.redactions);
    if redactions.is_empty() {
        warn!("No redactions given; output passes through unchanged");
    }

    let spawn = SpawnConfig::new(cli.command, cli.args)
        .with_size(config.pty.default_rows, config.pty.default_cols);
    let mut session_config = SessionConfig::new(redactions, spawn);
    session_config.read_buffer_size = config.pty.read_buffer_size;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let result = runtime.block_on(Session::new(session_config).run());

    if let Err(e) = &result {
        if e.is_startup() {
            error!("Could not start command: {}", e);
        } else {
            error!("Session failed: {}", e);
        }
        eprintln!("ptyredact: {}", e);
    }

    Ok(exit_status(&result))
}
