#![forbid(unsafe_code)]

mod output;

use anyhow::Context;
use clap::Parser;
use output::{CliError, OutputMode};
use sieve_core::config::{self, ConfigError, ReviewConfig};
use sieve_core::console::IoConsole;
use sieve_core::error::ErrorCode;
use sieve_core::report::ReviewProgress;
use sieve_core::store::StoreError;
use sieve_core::trash::{Trash, TrashError};
use sieve_core::viewer::CommandViewer;
use sieve_core::{Outcome, ReviewPaths, ReviewSession, SessionError};
use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sieve: review a directory of downloaded documents one by one",
    long_about = None
)]
struct Cli {
    /// Directory holding the documents and their metadata file.
    #[arg(required_unless_present = "commands")]
    data_dir: Option<PathBuf>,

    /// Print the reviewer command vocabulary and exit.
    #[arg(long)]
    commands: bool,

    /// Print review progress for DATA_DIR instead of starting a session.
    #[arg(long)]
    status: bool,

    /// Emit JSON for --commands, --status and errors.
    #[arg(long)]
    json: bool,

    /// Config file to use instead of the user config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging for sieve.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    const fn output_mode(&self) -> OutputMode {
        OutputMode::from_json_flag(self.json)
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SIEVE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "sieve=debug,info"
        } else {
            "sieve=info,warn"
        })
    });

    let format = env::var("SIEVE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let mode = cli.output_mode();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let cli_error = match error_code(&err) {
                Some(code) => CliError::new(code, err.to_string()),
                None => CliError::uncoded(format!("{err:#}")),
            };
            let _ = output::render_error(&mut io::stderr().lock(), mode, &cli_error);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mode = cli.output_mode();
    if cli.commands {
        return output::render_vocabulary(&mut io::stdout().lock(), mode);
    }

    let data_dir = cli
        .data_dir
        .as_deref()
        .context("DATA_DIR is required")?;
    let config = config::load_config(cli.config.as_deref())?;
    let paths = ReviewPaths::new(data_dir, &config.metadata);

    if cli.status {
        let progress = ReviewProgress::load(&paths)?;
        return output::render_progress(&mut io::stdout().lock(), mode, &progress);
    }

    review(paths, &config)
}

fn review(paths: ReviewPaths, config: &ReviewConfig) -> anyhow::Result<()> {
    let trash = Trash::open(config.trash.resolve_dir()?)?;
    info!(trash = %trash.dir().display(), "using trash directory");

    let viewer = CommandViewer::new(config.viewer.program.clone(), config.viewer.args.clone());
    let console = IoConsole::new(io::stdin().lock(), io::stdout());

    let mut session = ReviewSession::open(paths, trash, console, viewer)?;
    match session.run_guarded()? {
        Outcome::Completed => info!("review complete"),
        Outcome::Quit => info!("review paused"),
    }
    Ok(())
}

/// Stable error code for the first sieve error in `err`'s chain.
fn error_code(err: &anyhow::Error) -> Option<ErrorCode> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<SessionError>() {
            Some(e.code())
        } else if let Some(e) = cause.downcast_ref::<StoreError>() {
            Some(e.code())
        } else if let Some(e) = cause.downcast_ref::<TrashError>() {
            Some(e.code())
        } else {
            cause.downcast_ref::<ConfigError>().map(ConfigError::code)
        }
    })
}
