use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use designlens_extractor::FilterMode;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Snapshot directory
    #[arg(short, long, default_value = "snapshots")]
    pub snapshot_dir: String,

    /// Default maximum depth
    #[arg(short, long)]
    pub max_depth: Option<usize>,

    /// Splice children of filtered nodes into their parent instead of dropping them
    #[arg(long)]
    pub hoist: bool,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing designlens...".bright_blue().bold());

    let snapshot_dir = cwd.join(&args.snapshot_dir);
    if !snapshot_dir.exists() {
        fs::create_dir_all(&snapshot_dir)?;
        println!("  {} Created {}/", "✓".green(), args.snapshot_dir);
    }

    let config = Config {
        snapshot_dir: args.snapshot_dir.clone(),
        max_depth: args.max_depth,
        filter_mode: if args.hoist {
            FilterMode::Hoist
        } else {
            FilterMode::Prune
        },
        ..Config::default()
    };

    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("Next steps:");
    println!("  1. Save a file response as {}/<fileKey>.json", args.snapshot_dir);
    println!("  2. Run: designlens extract <fileKey>");

    Ok(())
}
