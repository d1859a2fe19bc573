mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{extract, init, span, styles, ExtractArgs, InitArgs, SpanArgs, StylesArgs};
use tracing_subscriber::EnvFilter;

/// Designlens - simplify design documents for agents
#[derive(Parser, Debug)]
#[command(name = "designlens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a designlens.config.json
    Init(InitArgs),

    /// Simplify a snapshot into a deduplicated tree
    Extract(ExtractArgs),

    /// Compute a node's column span within its enclosing grid
    Span(SpanArgs),

    /// Build the design-wide style catalog
    Styles(StylesArgs),
}

#[tokio::main]
async fn main() {
    // stdout carries JSON output, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match std::env::current_dir() {
        Ok(cwd) => match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Extract(args) => extract(args, &cwd).await,
            Command::Span(args) => span(args, &cwd).await,
            Command::Styles(args) => styles(args, &cwd).await,
        },
        Err(err) => Err(anyhow::anyhow!("Cannot get current directory: {}", err)),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
