mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, create, init, inspect, migrate, ApplyArgs, InitArgs, InspectArgs, MigrateArgs, NewArgs,
};
use tracing_subscriber::EnvFilter;

/// Proposal CLI - create, inspect and edit proposal documents
#[derive(Parser, Debug)]
#[command(name = "proposal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log every edit decision (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a proposal.config.json
    Init(InitArgs),

    /// Create a blank proposal
    New(NewArgs),

    /// Print a proposal's sections, columns and blocks
    Inspect(InspectArgs),

    /// Upgrade a stored proposal to the sectioned format
    Migrate(MigrateArgs),

    /// Apply a JSON script of edit actions to a proposal
    Apply(ApplyArgs),
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::New(args) => create(args, &cwd),
                Command::Inspect(args) => inspect(args, &cwd),
                Command::Migrate(args) => migrate(args, &cwd),
                Command::Apply(args) => apply(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
