use super::emit_json;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use designlens_extractor::{
    all_extractors, content_only, layout_and_text, layout_only, visuals_only,
    AmbientGridExtractor, ExtractOptions, ExtractorPipeline, FilterMode, GridSpanExtractor,
    NodeWalker,
};
use designlens_model::{to_internal_id, DesignResponse};
use designlens_resolver::{
    simplify_with_grid_context, DesignSource, FileDesignSource, GridResolver, NodeCache,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    All,
    LayoutText,
    Content,
    Visuals,
    Layout,
}

impl Preset {
    fn pipeline(self) -> ExtractorPipeline {
        match self {
            Preset::All => all_extractors(),
            Preset::LayoutText => layout_and_text(),
            Preset::Content => content_only(),
            Preset::Visuals => visuals_only(),
            Preset::Layout => layout_only(),
        }
    }
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// File key of the snapshot to simplify
    pub file_key: String,

    /// Only extract this node (dash form, e.g. 12-34); its span is computed
    /// against the enclosing grid
    #[arg(short, long)]
    pub node: Option<String>,

    /// Maximum depth (overrides config)
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Include hidden nodes
    #[arg(long)]
    pub include_hidden: bool,

    /// Extractor preset
    #[arg(short, long, value_enum, default_value = "all")]
    pub preset: Preset,

    /// Compute spans for every node in a single pass
    #[arg(long)]
    pub spans: bool,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub async fn extract(args: ExtractArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let source = Arc::new(FileDesignSource::new(config.snapshot_dir(cwd)));

    let mut options = ExtractOptions::default()
        .with_include_hidden(args.include_hidden || config.include_hidden)
        .with_filter_mode(config.filter_mode);
    if let Some(depth) = args.depth.or(config.max_depth) {
        options = options.with_max_depth(depth);
    }

    let mut pipeline = args.preset.pipeline();
    if args.spans {
        pipeline = pipeline
            .with(AmbientGridExtractor::new())
            .with(GridSpanExtractor::all());
    }

    eprintln!(
        "{} {}",
        "Extracting".bright_blue().bold(),
        args.file_key.bright_white()
    );

    let design = match &args.node {
        Some(node_id) => {
            let internal = to_internal_id(node_id.trim());
            let nodes = source.fetch_nodes(&args.file_key, &[internal.clone()]).await?;
            if nodes.node(&internal).is_none() {
                return Err(anyhow!("Node {} not found in {}", node_id, args.file_key));
            }

            let resolver = GridResolver::new(source.clone(), NodeCache::new(config.eviction_policy()));
            let response = DesignResponse::from(nodes);
            let result = simplify_with_grid_context(
                &resolver,
                &args.file_key,
                node_id,
                &response,
                pipeline,
                &options,
            )
            .await?;
            result.design
        }
        None => {
            let document = source.fetch_document(&args.file_key).await?;
            NodeWalker::new(&pipeline, &options).extract(&DesignResponse::from(document))?
        }
    };

    info!(
        roots = design.nodes.len(),
        styles = design.global_vars.styles.len(),
        "Simplified design ready"
    );
    emit_json(&design, config.pretty, args.out.as_deref())?;

    if let Some(out) = &args.out {
        eprintln!("  {} Wrote {}", "✓".green(), out.display());
    }
    Ok(())
}
