pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rewards_core::config::{LogFormat, LoggingConfig};

#[derive(Debug, Parser)]
#[command(
    name = "rewards",
    about = "Customer rewards points CLI",
    long_about = "Calculate customer rewards points over monthly windows, export demo data, and inspect configuration.",
    after_help = "Examples:\n  rewards points 1 --months 3\n  rewards seed --as-of 2024-06-15\n  rewards config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Calculate rewards points for one customer and print the JSON response")]
    Points(commands::points::PointsArgs),
    #[command(about = "Print or write the deterministic demo dataset as JSON")]
    Seed {
        #[arg(long, help = "Anchor date for the demo purchases (defaults to today, UTC)")]
        as_of: Option<NaiveDate>,
        #[arg(long, help = "Write the dataset to this path instead of stdout")]
        output: Option<PathBuf>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Points(args) => commands::points::run(args),
        Command::Seed { as_of, output } => commands::seed::run(as_of, output),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Installs the global subscriber on stderr. Later calls are no-ops.
pub fn init_logging(config: &LoggingConfig) {
    use tracing::Level;

    let log_level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let _ = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
