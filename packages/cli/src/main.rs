mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{apply, check, get, init, load, ApplyArgs, CheckArgs, GetArgs, InitArgs, LoadArgs};
use tracing_subscriber::EnvFilter;

/// GeoStory CLI - inspect and edit story documents by path
#[derive(Parser, Debug)]
#[command(name = "geostory")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a geostory.config.json with default settings
    Init(InitArgs),

    /// Print the value at a path of a story file
    Get(GetArgs),

    /// Apply a list of mutations to a story file
    Apply(ApplyArgs),

    /// Validate a path expression
    Check(CheckArgs),

    /// Load a story through the engine and report the outcome
    Load(LoadArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Get(args) => get(args),
        Command::Apply(args) => apply(args),
        Command::Check(args) => check(args),
        Command::Load(args) => load(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
