//! # Designlens Extractor
//!
//! Turns a raw design tree into a simplified, deduplicated tree.
//!
//! ## Pipeline
//!
//! [`NodeWalker`] performs one synchronous preorder pass over the raw roots.
//! For every accepted node it builds a [`SimplifiedNode`] and runs each
//! [`Extractor`] of the [`ExtractorPipeline`] against it, in registration
//! order. Extractors write style payloads into the [`GlobalVarStore`] and keep
//! only the returned ids on the node.
//!
//! ## Fail-fast
//!
//! An error raised by any extractor aborts the whole extraction. A half-built
//! tree is never returned.
//!
//! ## Grid spans
//!
//! Two strategies are available:
//!
//! - **Pre-resolved** (preferred): the grid artboard for a target node is
//!   resolved before traversal (see `designlens-resolver`) and bound into a
//!   [`ResolvedGridSpanExtractor`]. Pipeline order does not matter.
//! - **Single pass** (opt-in): [`AmbientGridExtractor`] publishes grid frames
//!   to their descendants while walking, and [`GridSpanExtractor`] reads the
//!   ambient artboard. The span extractor must be registered after the
//!   ambient one; [`ExtractorPipeline::validate`] enforces this.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use designlens_extractor::{all_extractors, ExtractOptions, NodeWalker};
//!
//! let pipeline = all_extractors();
//! let options = ExtractOptions::default().with_max_depth(3);
//! let design = NodeWalker::new(&pipeline, &options).extract(&response)?;
//! ```

pub mod artboard;
pub mod context;
pub mod error;
pub mod extractor;
pub mod extractors;
pub mod global_vars;
pub mod span;
pub mod walker;

pub use artboard::GridArtboard;
pub use context::{ContextField, TraversalContext};
pub use error::{ExtractError, ExtractResult};
pub use extractor::{Extractor, ExtractorPipeline};
pub use extractors::{
    all_extractors, content_only, layout_and_text, layout_only, visuals_only,
    AmbientGridExtractor, ComponentExtractor, GridSpanExtractor, LayoutExtractor,
    ResolvedGridSpanExtractor, TextExtractor, VisualsExtractor,
};
pub use global_vars::GlobalVarStore;
pub use span::{compute_span, SpanResult};
pub use walker::{simplify_design, ExtractOptions, ExtractedTree, FilterMode, NodeFilter, NodeWalker};

pub use designlens_model::SimplifiedNode;
