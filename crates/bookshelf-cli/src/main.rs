//! Bookshelf CLI
//!
//! Command-line interface for Bookshelf - an interactive library menu plus a
//! few one-shot commands over the same data file.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bookshelf_core::{Catalog, Config};

mod commands;
mod output;
mod prompt;
mod shell;

use output::{Output, OutputFormat};
use shell::Shell;

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(about = "Bookshelf - a small library catalog with borrowing")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data file to use instead of the configured one
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu (default)
    Shell,
    /// List all books
    #[command(alias = "ls")]
    List,
    /// Show a single book
    Show {
        /// Book ID
        id: String,
    },
    /// Add a book
    Add {
        /// Book ID
        id: String,
        /// Title
        title: String,
        /// Author
        author: String,
    },
    /// Remove a book
    #[command(alias = "rm")]
    Remove {
        /// Book ID
        id: String,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_file, log_file, log_level)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work on the config file itself
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())?;
    init_logging(&config);

    let data_file = cli.data_file.clone().unwrap_or_else(|| config.data_file.clone());
    info!(data_file = %data_file.display(), "Using data file");

    match cli.command {
        None | Some(Commands::Shell) => run_shell(data_file),
        Some(Commands::List) => commands::book::list(&data_file, &output),
        Some(Commands::Show { id }) => commands::book::show(&data_file, id, &output),
        Some(Commands::Add { id, title, author }) => {
            commands::book::add(&data_file, id, title, author, &output)
        }
        Some(Commands::Remove { id, yes }) => commands::book::remove(&data_file, id, yes, &output),
        Some(Commands::Config { .. }) => unreachable!(), // Handled above
    }
}

/// Run the interactive menu on stdin/stdout
///
/// The catalog lives for exactly one session and is handed to the shell.
fn run_shell(data_file: PathBuf) -> Result<()> {
    let mut catalog = Catalog::new();
    let stdin = io::stdin();
    let stdout = io::stdout();

    Shell::new(&mut catalog, data_file, stdin.lock(), stdout.lock()).run()
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Install the tracing subscriber
///
/// Logs go to the configured log file, or to stderr so they never mix with
/// the menu on stdout.
fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_env("BOOKSHELF_LOG").unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "bookshelf_core={level},bookshelf={level}",
            level = config.log_level
        ))
    });

    match &config.log_file {
        Some(log_path) => {
            let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
                    return;
                }
            };

            // Ignore error if already initialized
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(log_file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(io::stderr)
                .try_init();
        }
    }
}
