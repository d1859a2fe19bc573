use super::emit_json;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use designlens_model::DesignResponse;
use designlens_resolver::{extract_design_styles, DesignSource, FileDesignSource};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct StylesArgs {
    /// File key of the snapshot
    pub file_key: String,

    /// Nodes fetched per batch (overrides config)
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub async fn styles(args: StylesArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let source = FileDesignSource::new(config.snapshot_dir(cwd));
    let response = DesignResponse::from(source.fetch_document(&args.file_key).await?);
    let styles = response.styles();

    let batch_size = args.batch_size.unwrap_or(config.style_batch_size);
    let catalog = extract_design_styles(&source, &args.file_key, &styles, batch_size).await;

    let missing = styles.len().saturating_sub(catalog.len());
    if missing > 0 {
        eprintln!(
            "{} {} of {} styles could not be resolved",
            "⚠️".yellow(),
            missing,
            styles.len()
        );
    }

    emit_json(&catalog, config.pretty, args.out.as_deref())
}
