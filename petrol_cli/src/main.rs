use anyhow::Result;
use clap::Parser;
use petrol_cli::args::{Args, Command};
use petrol_cli::commands;
use std::process::ExitCode;
use tracing::{debug, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let common = args.common();
    let json = common.json();

    let config = commands::resolve_config(common)?;
    let dashboard = commands::open(config)?;

    match args.command() {
        Command::Summary => commands::summary(&dashboard, common)?.print(json),
        Command::Insights => commands::insights(&dashboard, common)?.print(json),
        Command::Forecast(forecast_args) => {
            commands::forecast(&dashboard, common, forecast_args)?.print(json)
        }
        Command::Options => commands::options(&dashboard, common)?.print(json),
        Command::Charts => commands::charts(&dashboard, common)?.print(json),
        Command::Export(export_args) => {
            commands::export(&dashboard, common, export_args)?.print(json)
        }
    }
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        // RUST_LOG does not exist; use the requested level for our crates only.
        None => EnvFilter::new(format!(
            "{bin}={level},{pkg}={level},petrol_analytics={level}",
            bin = env!("CARGO_BIN_NAME"),
            pkg = env!("CARGO_PKG_NAME"),
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
