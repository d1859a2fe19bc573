//! # Designlens Model
//!
//! Shared data types for the designlens extraction engine.
//!
//! - [`raw`]: the node tree as returned by the design platform API. Node kinds
//!   are a closed enum with a catch-all variant, and unknown attributes are
//!   retained in `RawNode::extra`.
//! - [`response`]: whole-document and node-subset responses, unified behind
//!   [`DesignResponse`].
//! - [`simplified`]: the output tree handed to downstream consumers.
//! - [`id`]: conversion between the platform's colon-delimited node ids and the
//!   dash-delimited ids used at every public boundary.

pub mod id;
pub mod raw;
pub mod response;
pub mod simplified;

pub use id::{to_external_id, to_internal_id, NodeId};
pub use raw::{
    AxisAlign, Color, ColorStop, ComponentProperty, Effect, EffectType, GridAlignment,
    GridPattern, LayoutGrid, LayoutMode, LayoutSizing, NodeKind, Paint, PaintType, RawNode, Rect,
    TypeStyle, Vector,
};
pub use response::{
    ComponentMeta, ComponentSetMeta, DesignResponse, DocumentResponse, NodeEntry,
    NodeMapResponse, StyleMeta, StyleType,
};
pub use simplified::{
    GlobalVars, SimplifiedComponent, SimplifiedComponentSet, SimplifiedDesign, SimplifiedNode,
    VarId,
};
