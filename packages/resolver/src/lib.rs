//! # Designlens Resolver
//!
//! Everything that talks to a [`DesignSource`]:
//!
//! - [`GridResolver`] finds the grid artboard enclosing a node, following
//!   grid-style references through a cached remote fetch.
//! - [`fetch_style_nodes`] and [`extract_design_styles`] build the
//!   design-wide style catalog from batched fetches.
//! - [`simplify_with_grid_context`] runs the two-phase extraction: every
//!   suspension happens up front, then the synchronous walker runs with the
//!   resolved artboard bound into the pipeline.
//!
//! Source failures are recoverable. They are logged and degrade results;
//! only configuration errors and extractor faults are returned.

pub mod cache;
pub mod error;
pub mod grid_resolver;
pub mod orchestrate;
pub mod source;
pub mod styles;

pub use cache::{CacheStats, EvictionPolicy, NodeCache};
pub use error::{SourceError, SourceResult};
pub use grid_resolver::{GridLookup, GridResolver};
pub use orchestrate::{simplify_with_grid_context, GridContextDesign};
pub use source::{DesignSource, FileDesignSource, MemoryDesignSource};
pub use styles::{
    extract_design_styles, fetch_style_nodes, DesignStyle, StyleNodes, DEFAULT_STYLE_BATCH_SIZE,
};
