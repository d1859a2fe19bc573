use crate::grid_resolver::{GridLookup, GridResolver};
use designlens_extractor::{
    ExtractOptions, ExtractResult, ExtractorPipeline, NodeWalker, ResolvedGridSpanExtractor,
};
use designlens_model::{DesignResponse, NodeId, SimplifiedDesign};
use tracing::{instrument, warn};

/// A simplified design plus the grid lookup its target span was computed from
#[derive(Debug, Clone, PartialEq)]
pub struct GridContextDesign {
    pub design: SimplifiedDesign,
    pub lookup: GridLookup,
}

/// Two-phase extraction: resolve the target's grid artboard, bind it into a
/// [`ResolvedGridSpanExtractor`], then run the synchronous walker.
///
/// `node_id` is in dash form. All remote access happens before traversal.
#[instrument(skip(resolver, response, pipeline, options))]
pub async fn simplify_with_grid_context(
    resolver: &GridResolver,
    file_key: &str,
    node_id: &str,
    response: &DesignResponse,
    pipeline: ExtractorPipeline,
    options: &ExtractOptions,
) -> ExtractResult<GridContextDesign> {
    let target = NodeId::from_external(node_id);
    // A node subset lacks the target's ancestors, so the resolver must fetch the document
    let roots = match response {
        DesignResponse::Document(_) => response.roots(),
        DesignResponse::Nodes(_) => Vec::new(),
    };

    let lookup = resolver.resolve(file_key, &target, &roots, None).await?;
    if !lookup.target_found {
        warn!(node_id, "Target node not found, no span will be computed");
    }

    let pipeline = pipeline.with(ResolvedGridSpanExtractor::new(target, lookup.artboard.clone()));
    let design = NodeWalker::new(&pipeline, options).extract(response)?;

    Ok(GridContextDesign { design, lookup })
}
