mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{init, replay, InitArgs, ReplayArgs};
use config::Config;
use tracing_subscriber::EnvFilter;

/// Dropzone CLI - replay drag-and-drop edits against a document
#[derive(Parser, Debug)]
#[command(name = "dropzone")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default dropzone.config.json
    Init(InitArgs),

    /// Replay a script of editor events against a document
    Replay(ReplayArgs),
}

fn init_tracing(cwd: &str) {
    let level = Config::load(cwd)
        .map(|config| config.log_level)
        .unwrap_or_else(|_| "warn".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let cwd = std::env::current_dir()
        .expect("Cannot get current directory")
        .display()
        .to_string();

    init_tracing(&cwd);

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Replay(args) => replay(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
