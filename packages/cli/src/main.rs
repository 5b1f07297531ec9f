mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{materials, render, validate, MaterialsArgs, RenderArgs, ValidateArgs};
use tracing_subscriber::EnvFilter;

/// Lowcode CLI - validate, render and inspect low-code pages
#[derive(Parser, Debug)]
#[command(name = "lowcode")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a page schema against the registered materials
    Validate(ValidateArgs),

    /// Render a page schema to a VNode tree (JSON)
    Render(RenderArgs),

    /// List the materials of a materials directory
    Materials(MaterialsArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Validate(args) => validate(args, &cwd),
                Command::Render(args) => render(args, &cwd),
                Command::Materials(args) => materials(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), format!("{:#}", err));
        eprintln!();
        std::process::exit(1);
    }
}
