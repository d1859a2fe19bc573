use super::emit_json;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use designlens_extractor::{compute_span, SpanResult};
use designlens_model::{to_external_id, NodeId};
use designlens_resolver::{DesignSource, FileDesignSource, GridResolver, NodeCache};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct SpanArgs {
    /// File key of the snapshot
    pub file_key: String,

    /// Node id in dash form (e.g. 12-34)
    pub node_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpanReport {
    node_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    artboard_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artboard_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    span: Option<SpanResult>,
}

pub async fn span(args: SpanArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let source = Arc::new(FileDesignSource::new(config.snapshot_dir(cwd)));
    let document = source.fetch_document(&args.file_key).await?;

    let target = NodeId::from_external(&args.node_id);
    let resolver = GridResolver::new(source.clone(), NodeCache::new(config.eviction_policy()));
    let lookup = resolver
        .resolve(&args.file_key, &target, &[], Some(&document))
        .await?;

    if !lookup.target_found {
        return Err(anyhow!("Node {} not found in {}", args.node_id, args.file_key));
    }

    let bounds = document
        .document
        .find_id(&target)
        .and_then(|node| node.absolute_bounding_box);
    let span = match (&lookup.artboard, bounds) {
        (Some(artboard), Some(bounds)) => compute_span(&bounds, artboard),
        _ => None,
    };

    if span.is_none() {
        eprintln!(
            "{} {} has no enclosing column grid",
            "⚠️".yellow(),
            args.node_id
        );
    }

    let report = SpanReport {
        node_id: target.external(),
        artboard_id: lookup.artboard.as_ref().map(|a| to_external_id(&a.node_id)),
        artboard_name: lookup.artboard.as_ref().map(|a| a.name.clone()),
        span,
    };
    emit_json(&report, config.pretty, None)
}
