use clap::Parser;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{Level, error, info};
use verbatim_http::Disambiguation;

mod config;
mod error;
mod harness;

use config::HarnessConfig;
use error::HarnessError;
use harness::{verify_round_trip, write_report};

#[derive(Debug, Parser)]
#[command(
    name = "verbatim-cli",
    about = "Parse a message and check that it serializes back to the same bytes"
)]
struct Cli {
    /// Read the message from this file instead of stdin.
    #[arg(long)]
    input: Option<PathBuf>,
    /// TOML harness configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Reread a failed request as a Simple-Response.
    #[arg(long)]
    fallback: bool,
    #[arg(long = "no-echo")]
    no_echo: bool,
    /// Print the effective configuration and exit.
    #[arg(long = "print-config")]
    print_config: bool,
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), HarnessError> {
    let config = effective_config(cli)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cli.print_config {
        out.write_all(config.to_toml()?.as_bytes())?;
        return Ok(());
    }

    let input = read_input(cli.input.as_deref())?;
    info!(bytes = input.len(), "read input");

    let round_trip = verify_round_trip(&input, &config.parse)?;
    info!(kind = %round_trip.message.kind(), "round trip verified");

    write_report(&mut out, &round_trip, &config.report)?;
    out.flush()?;
    Ok(())
}

fn effective_config(cli: &Cli) -> Result<HarnessConfig, HarnessError> {
    let mut config = match &cli.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if cli.fallback {
        config.parse.disambiguation = Disambiguation::Fallback;
    }
    if cli.no_echo {
        config.report.echo_message = false;
    }
    Ok(config)
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>, HarnessError> {
    match path {
        Some(path) => Ok(std::fs::read(path)?),
        None => {
            let mut input = Vec::new();
            std::io::stdin().lock().read_to_end(&mut input)?;
            Ok(input)
        }
    }
}
