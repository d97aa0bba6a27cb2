//! Command line runner for the trafflow pipeline.
//!
//! `trafflow run` solves one density run per exponent, writes each snapshot
//! table, rebuilds the density field from it and integrates tracers through
//! the resulting speed field. `trafflow validate` checks a scenario and
//! reports the Courant number of every run without solving anything.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Traffic density on a single road.
#[derive(Parser)]
#[command(name = "trafflow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "LWR traffic density solver and tracer integrator", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve, export and trace a scenario
    Run(commands::run::RunArgs),
    /// Check a scenario without solving it
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(&args),
        Commands::Validate(args) => commands::validate::execute(&args),
    }
}
