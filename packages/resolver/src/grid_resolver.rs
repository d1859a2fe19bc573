//! Grid-context resolution.
//!
//! Finds the grid artboard enclosing a target node before any traversal
//! starts. The search is a preorder walk carrying the chain of candidate grid
//! frames seen so far; the target receives the frames inherited from its
//! ancestors, never its own. A frame may embed its grids or reference a grid
//! style, in which case the style's defining node is fetched through the
//! [`DesignSource`] and cached in the resolver's [`NodeCache`]. Candidates
//! are tried nearest first; a frame whose grids turn out to have no columns
//! pattern defers to the next enclosing one.
//!
//! Remote failures never escape: they are logged and the lookup degrades to
//! "no artboard".

use crate::cache::NodeCache;
use crate::error::SourceResult;
use crate::source::DesignSource;
use designlens_extractor::{ExtractError, ExtractResult, GridArtboard};
use designlens_model::{DocumentResponse, NodeId, RawNode};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Outcome of a grid lookup.
///
/// `target_found` separates "the node has no enclosing grid" from "the node
/// does not exist".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLookup {
    pub artboard: Option<GridArtboard>,
    pub target_found: bool,
}

impl GridLookup {
    pub fn not_found() -> Self {
        Self {
            artboard: None,
            target_found: false,
        }
    }

    fn found(artboard: Option<GridArtboard>) -> Self {
        Self {
            artboard,
            target_found: true,
        }
    }
}

pub struct GridResolver {
    source: Arc<dyn DesignSource>,
    cache: NodeCache,
}

impl GridResolver {
    pub fn new(source: Arc<dyn DesignSource>, cache: NodeCache) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &NodeCache {
        &self.cache
    }

    /// Resolve the grid artboard enclosing `target`.
    ///
    /// Searches `prefetched` when given, otherwise `roots`. When the target is
    /// not in `roots` and nothing was prefetched, the whole document is
    /// fetched and searched once.
    #[instrument(skip(self, target, roots, prefetched), fields(node_id = %target.external()))]
    pub async fn resolve(
        &self,
        file_key: &str,
        target: &NodeId,
        roots: &[&RawNode],
        prefetched: Option<&DocumentResponse>,
    ) -> ExtractResult<GridLookup> {
        if file_key.trim().is_empty() {
            return Err(ExtractError::configuration("file key is required"));
        }
        if target.is_empty() {
            return Err(ExtractError::configuration("target node id is required"));
        }

        let search_roots: Vec<&RawNode> = match prefetched {
            Some(document) => vec![&document.document],
            None => roots.to_vec(),
        };
        if let Some(frames) = find_grid_frames(&search_roots, target) {
            return Ok(self.lookup(file_key, frames).await);
        }
        if prefetched.is_some() {
            debug!("Target not present in prefetched document");
            return Ok(GridLookup::not_found());
        }

        debug!("Target not in supplied roots, fetching document");
        let document = match self.source.fetch_document(file_key).await {
            Ok(document) => document,
            Err(err) => {
                warn!(file_key, error = %err, "Document fetch failed during grid lookup");
                return Ok(GridLookup::not_found());
            }
        };
        match find_grid_frames(&[&document.document], target) {
            Some(frames) => Ok(self.lookup(file_key, frames).await),
            None => Ok(GridLookup::not_found()),
        }
    }

    /// Try each enclosing grid frame, nearest first, until one yields a
    /// columns grid. A failed style fetch stops the search.
    async fn lookup(&self, file_key: &str, frames: Vec<&RawNode>) -> GridLookup {
        for frame in frames {
            match self.frame_grid(file_key, frame).await {
                FrameGrid::Columns(artboard) => {
                    info!(artboard = %artboard.name, "Resolved grid artboard");
                    return GridLookup::found(Some(artboard));
                }
                FrameGrid::Unusable => {
                    debug!(frame_id = %frame.id, "Frame has no usable columns grid, trying outer frame");
                }
                FrameGrid::Unavailable => return GridLookup::found(None),
            }
        }
        GridLookup::found(None)
    }

    async fn frame_grid(&self, file_key: &str, frame: &RawNode) -> FrameGrid {
        if let Some(artboard) = GridArtboard::from_node(frame) {
            return FrameGrid::Columns(artboard);
        }
        let Some(style_id) = frame.grid_style_id().filter(|_| frame.kind.is_frame_like()) else {
            return FrameGrid::Unusable;
        };
        match self.style_node(file_key, style_id).await {
            Ok(Some(style_node)) => GridArtboard::with_grids(frame, style_node.layout_grids.clone())
                .map_or(FrameGrid::Unusable, FrameGrid::Columns),
            Ok(None) => FrameGrid::Unusable,
            Err(err) => {
                warn!(file_key, style_id, error = %err, "Grid style fetch failed");
                FrameGrid::Unavailable
            }
        }
    }

    /// The node defining a grid style. Style ids are the defining nodes' ids.
    async fn style_node(&self, file_key: &str, style_id: &str) -> SourceResult<Option<Arc<RawNode>>> {
        if let Some(node) = self.cache.get(file_key, style_id) {
            debug!(style_id, "Grid style cache hit");
            return Ok(Some(node));
        }

        let response = self.source.fetch_nodes(file_key, &[style_id.to_string()]).await?;
        match response.node(style_id) {
            Some(node) => Ok(Some(self.cache.insert(file_key, style_id, node.clone()))),
            None => {
                warn!(file_key, style_id, "Grid style node missing from response");
                Ok(None)
            }
        }
    }
}

/// What an enclosing frame contributes to a lookup
enum FrameGrid {
    Columns(GridArtboard),
    /// Rows-only grids, missing bounds or a style without columns
    Unusable,
    /// The grid style could not be fetched
    Unavailable,
}

/// A frame embedding a columns grid or referencing a grid style
fn qualifies(node: &RawNode) -> bool {
    node.has_column_grid() || (node.kind.is_frame_like() && node.grid_style_id().is_some())
}

/// Candidate grid frames on the path to the current node
struct Enclosing<'f, 'a> {
    frame: &'a RawNode,
    outer: Option<&'f Enclosing<'f, 'a>>,
}

impl<'a> Enclosing<'_, 'a> {
    /// Nearest first
    fn frames(&self) -> Vec<&'a RawNode> {
        let mut frames = vec![self.frame];
        let mut outer = self.outer;
        while let Some(next) = outer {
            frames.push(next.frame);
            outer = next.outer;
        }
        frames
    }
}

/// `Some(frames)` when the target is found, carrying the candidate grid
/// frames among its ancestors, nearest first
fn find_grid_frames<'a>(roots: &[&'a RawNode], target: &NodeId) -> Option<Vec<&'a RawNode>> {
    roots.iter().find_map(|root| search(root, target, None))
}

fn search<'a>(
    node: &'a RawNode,
    target: &NodeId,
    enclosing: Option<&Enclosing<'_, 'a>>,
) -> Option<Vec<&'a RawNode>> {
    if target.matches(&node.id) {
        return Some(enclosing.map(Enclosing::frames).unwrap_or_default());
    }
    let own;
    let enclosing = if qualifies(node) {
        own = Enclosing {
            frame: node,
            outer: enclosing,
        };
        Some(&own)
    } else {
        enclosing
    };
    node.children
        .iter()
        .find_map(|child| search(child, target, enclosing))
}
