use crate::artboard::GridArtboard;
use crate::context::{ContextField, TraversalContext};
use crate::error::ExtractResult;
use crate::extractor::Extractor;
use crate::span::compute_span;
use designlens_model::{LayoutGrid, NodeId, RawNode, SimplifiedNode};
use std::collections::BTreeMap;

/// Publishes grid-bearing frames as the ambient artboard of their
/// descendants (single-pass strategy).
///
/// Frames embedding a columns grid qualify directly. Frames that only
/// reference a grid style qualify when the style's grids were supplied
/// through [`AmbientGridExtractor::with_grid_styles`].
#[derive(Debug, Default)]
pub struct AmbientGridExtractor {
    grid_styles: BTreeMap<String, Vec<LayoutGrid>>,
}

impl AmbientGridExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid definitions keyed by style id
    pub fn with_grid_styles(grid_styles: BTreeMap<String, Vec<LayoutGrid>>) -> Self {
        Self { grid_styles }
    }

    fn artboard_for(&self, node: &RawNode) -> Option<GridArtboard> {
        if let Some(artboard) = GridArtboard::from_node(node) {
            return Some(artboard);
        }
        if !node.kind.is_frame_like() {
            return None;
        }
        let grids = self.grid_styles.get(node.grid_style_id()?)?;
        GridArtboard::with_grids(node, grids.clone())
    }
}

impl Extractor for AmbientGridExtractor {
    fn name(&self) -> &'static str {
        "ambient-grid"
    }

    fn provides(&self) -> &'static [ContextField] {
        &[ContextField::AmbientGrid]
    }

    fn apply(
        &self,
        node: &RawNode,
        _output: &mut SimplifiedNode,
        context: &mut TraversalContext<'_>,
    ) -> ExtractResult<()> {
        if let Some(artboard) = self.artboard_for(node) {
            context.set_descendant_grid(artboard);
        }
        Ok(())
    }
}

/// Computes column spans against the ambient artboard.
///
/// Must run after [`AmbientGridExtractor`] in the same pipeline.
#[derive(Debug, Clone)]
pub struct GridSpanExtractor {
    target: Option<NodeId>,
}

impl GridSpanExtractor {
    /// Span every node that sits inside a grid artboard
    pub fn all() -> Self {
        Self { target: None }
    }

    /// Span only the given node
    pub fn for_target(target: NodeId) -> Self {
        Self {
            target: Some(target),
        }
    }
}

impl Extractor for GridSpanExtractor {
    fn name(&self) -> &'static str {
        "grid-span"
    }

    fn requires(&self) -> &'static [ContextField] {
        &[ContextField::AmbientGrid]
    }

    fn apply(
        &self,
        node: &RawNode,
        output: &mut SimplifiedNode,
        context: &mut TraversalContext<'_>,
    ) -> ExtractResult<()> {
        if let Some(target) = &self.target {
            if !target.matches(&node.id) {
                return Ok(());
            }
        }

        let span = match (node.absolute_bounding_box, context.ambient_grid()) {
            (Some(bounds), Some(artboard)) => compute_span(&bounds, artboard),
            _ => None,
        };
        if let Some(span) = span {
            output.span = Some(context.globals.find_or_create(&span, "span")?);
        }
        Ok(())
    }
}

/// Computes the span of one target node against an artboard resolved
/// before traversal (two-phase strategy). Independent of pipeline order.
#[derive(Debug, Clone)]
pub struct ResolvedGridSpanExtractor {
    target: NodeId,
    artboard: Option<GridArtboard>,
}

impl ResolvedGridSpanExtractor {
    pub fn new(target: NodeId, artboard: Option<GridArtboard>) -> Self {
        Self { target, artboard }
    }

    pub fn artboard(&self) -> Option<&GridArtboard> {
        self.artboard.as_ref()
    }
}

impl Extractor for ResolvedGridSpanExtractor {
    fn name(&self) -> &'static str {
        "resolved-grid-span"
    }

    fn apply(
        &self,
        node: &RawNode,
        output: &mut SimplifiedNode,
        context: &mut TraversalContext<'_>,
    ) -> ExtractResult<()> {
        if !self.target.matches(&node.id) {
            return Ok(());
        }
        let (Some(artboard), Some(bounds)) = (&self.artboard, node.absolute_bounding_box) else {
            return Ok(());
        };
        if let Some(span) = compute_span(&bounds, artboard) {
            output.span = Some(context.globals.find_or_create(&span, "span")?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SpanResult;
    use designlens_model::NodeKind;

    fn grid_frame() -> RawNode {
        RawNode::new("1:1", "Desktop", NodeKind::Frame)
            .with_bounds(0.0, 0.0, 1200.0, 800.0)
            .with_grid(LayoutGrid::columns(12, 20.0, 0.0))
    }

    fn span_of(output: &SimplifiedNode, ctx: &TraversalContext<'_>) -> SpanResult {
        let value = ctx.globals.get(output.span.as_ref().unwrap()).unwrap();
        serde_json::from_value(value.clone()).unwrap()
    }

    #[test]
    fn test_resolved_span_only_applies_to_target() {
        let frame = grid_frame();
        let extractor = ResolvedGridSpanExtractor::new(
            NodeId::from_external("1-2"),
            GridArtboard::from_node(&frame),
        );
        let mut ctx = TraversalContext::new();

        let card = RawNode::new("1:2", "Card", NodeKind::Frame).with_bounds(0.0, 40.0, 400.0, 200.0);
        let mut card_out = SimplifiedNode::new("1-2", "Card", "FRAME");
        extractor.apply(&card, &mut card_out, &mut ctx).unwrap();

        let other = RawNode::new("1:3", "Other", NodeKind::Frame).with_bounds(0.0, 40.0, 400.0, 200.0);
        let mut other_out = SimplifiedNode::new("1-3", "Other", "FRAME");
        extractor.apply(&other, &mut other_out, &mut ctx).unwrap();

        let span = span_of(&card_out, &ctx);
        assert_eq!(span.start_column, 0);
        assert_eq!(span.width, 400.0);
        assert!(other_out.span.is_none());
    }

    #[test]
    fn test_resolved_span_without_artboard_is_absent() {
        let extractor = ResolvedGridSpanExtractor::new(NodeId::from_external("1-2"), None);
        let node = RawNode::new("1:2", "Card", NodeKind::Frame).with_bounds(0.0, 0.0, 100.0, 100.0);
        let mut output = SimplifiedNode::new("1-2", "Card", "FRAME");
        let mut ctx = TraversalContext::new();

        extractor.apply(&node, &mut output, &mut ctx).unwrap();
        assert!(output.span.is_none());
        assert!(ctx.globals.is_empty());
    }

    #[test]
    fn test_ambient_grid_from_style_reference() {
        let mut frame = RawNode::new("1:1", "Desktop", NodeKind::Frame).with_bounds(0.0, 0.0, 1200.0, 800.0);
        frame.styles.insert("grid".to_string(), "S:grid12".to_string());

        let mut grid_styles = BTreeMap::new();
        grid_styles.insert("S:grid12".to_string(), vec![LayoutGrid::columns(12, 20.0, 0.0)]);
        let extractor = AmbientGridExtractor::with_grid_styles(grid_styles);

        let artboard = extractor.artboard_for(&frame).unwrap();
        assert_eq!(artboard.node_id, "1:1");
        assert!(AmbientGridExtractor::new().artboard_for(&frame).is_none());
    }

    #[test]
    fn test_span_reader_sees_only_inherited_grid() {
        let frame = grid_frame();
        let ambient = AmbientGridExtractor::new();
        let span = GridSpanExtractor::all();
        let mut ctx = TraversalContext::new();

        // The grid frame itself gets no span: its grid is for descendants
        let mut frame_out = SimplifiedNode::new("1-1", "Desktop", "FRAME");
        ctx.begin_node();
        ambient.apply(&frame, &mut frame_out, &mut ctx).unwrap();
        span.apply(&frame, &mut frame_out, &mut ctx).unwrap();
        assert!(frame_out.span.is_none());

        let scope = ctx.enter_children(&frame);
        let child = RawNode::new("1:2", "Card", NodeKind::Rectangle).with_bounds(0.0, 0.0, 400.0, 100.0);
        let mut child_out = SimplifiedNode::new("1-2", "Card", "RECTANGLE");
        ctx.begin_node();
        ambient.apply(&child, &mut child_out, &mut ctx).unwrap();
        span.apply(&child, &mut child_out, &mut ctx).unwrap();
        ctx.exit_children(scope);

        assert_eq!(span_of(&child_out, &ctx).start_column, 0);
    }

    #[test]
    fn test_targeted_span_skips_other_nodes() {
        let frame = grid_frame();
        let span = GridSpanExtractor::for_target(NodeId::from_external("1-9"));
        let mut ctx = TraversalContext::new();
        ctx.begin_node();
        ctx.set_descendant_grid(GridArtboard::from_node(&frame).unwrap());
        let scope = ctx.enter_children(&frame);

        let child = RawNode::new("1:2", "Card", NodeKind::Rectangle).with_bounds(0.0, 0.0, 400.0, 100.0);
        let mut output = SimplifiedNode::new("1-2", "Card", "RECTANGLE");
        span.apply(&child, &mut output, &mut ctx).unwrap();
        ctx.exit_children(scope);

        assert!(output.span.is_none());
    }
}
