mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "valarm")]
#[command(about = "Render event reminders as iCalendar VALARM components")]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the VALARM blocks of an alarm document (TOML or JSON)
    Render { file: PathBuf },

    /// Print the alarms of a document as JSON
    Json { file: PathBuf },

    /// Build a single alarm from flags and print its VALARM block
    New(commands::new::NewArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Render { file } => commands::render::run(&file),
        Commands::Json { file } => commands::json::run(&file),
        Commands::New(args) => commands::new::run(args),
    }
}
