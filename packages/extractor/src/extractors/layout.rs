use super::{px, round2};
use crate::context::{ContextField, TraversalContext};
use crate::error::ExtractResult;
use crate::extractor::Extractor;
use designlens_model::{AxisAlign, LayoutMode, LayoutSizing, RawNode, SimplifiedNode, Vector};
use serde::Serialize;

/// Layout descriptor registered under the `layout` kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedLayout {
    pub mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_items: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizing: Option<Sizing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_relative_to_parent: Option<Vector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sizing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimensions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// Derives a layout descriptor from auto-layout settings and geometry
pub struct LayoutExtractor;

impl Extractor for LayoutExtractor {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn requires(&self) -> &'static [ContextField] {
        &[ContextField::Parent]
    }

    fn apply(
        &self,
        node: &RawNode,
        output: &mut SimplifiedNode,
        context: &mut TraversalContext<'_>,
    ) -> ExtractResult<()> {
        let layout = build_layout(node, context.parent());
        if layout.is_empty() {
            return Ok(());
        }
        output.layout = Some(context.globals.find_or_create(&layout, "layout")?);
        Ok(())
    }
}

impl SimplifiedLayout {
    fn is_empty(&self) -> bool {
        self.mode == "none"
            && self.dimensions.is_none()
            && self.location_relative_to_parent.is_none()
            && self.sizing.is_none()
            && self.position.is_none()
    }
}

fn mode_name(mode: Option<LayoutMode>) -> &'static str {
    match mode {
        Some(LayoutMode::Horizontal) => "row",
        Some(LayoutMode::Vertical) => "column",
        Some(LayoutMode::None) | Some(LayoutMode::Other) | None => "none",
    }
}

fn justify(align: Option<AxisAlign>) -> Option<&'static str> {
    match align? {
        AxisAlign::Min => None,
        AxisAlign::Center => Some("center"),
        AxisAlign::Max => Some("flex-end"),
        AxisAlign::SpaceBetween => Some("space-between"),
        AxisAlign::Baseline => Some("baseline"),
        AxisAlign::Other => None,
    }
}

fn sizing_name(sizing: Option<LayoutSizing>) -> Option<&'static str> {
    match sizing? {
        LayoutSizing::Fixed => Some("fixed"),
        LayoutSizing::Hug => Some("hug"),
        LayoutSizing::Fill => Some("fill"),
        LayoutSizing::Other => None,
    }
}

fn padding(node: &RawNode) -> Option<String> {
    let top = node.padding_top.unwrap_or(0.0);
    let right = node.padding_right.unwrap_or(0.0);
    let bottom = node.padding_bottom.unwrap_or(0.0);
    let left = node.padding_left.unwrap_or(0.0);

    if top == 0.0 && right == 0.0 && bottom == 0.0 && left == 0.0 {
        return None;
    }
    if top == bottom && left == right {
        if top == left {
            return Some(px(top));
        }
        return Some(format!("{} {}", px(top), px(left)));
    }
    Some(format!("{} {} {} {}", px(top), px(right), px(bottom), px(left)))
}

fn is_auto_layout(node: &RawNode) -> bool {
    matches!(
        node.layout_mode,
        Some(LayoutMode::Horizontal) | Some(LayoutMode::Vertical)
    )
}

fn build_layout(node: &RawNode, parent: Option<&RawNode>) -> SimplifiedLayout {
    let auto_layout = is_auto_layout(node);
    let absolute = node.layout_positioning.as_deref() == Some("ABSOLUTE");
    let in_flow = parent.map(is_auto_layout).unwrap_or(false) && !absolute;

    let sizing = Sizing {
        horizontal: sizing_name(node.layout_sizing_horizontal),
        vertical: sizing_name(node.layout_sizing_vertical),
    };

    // Hug/fill axes are determined by the layout engine, not fixed pixels
    let dimensions = node.absolute_bounding_box.and_then(|bounds| {
        let width = match node.layout_sizing_horizontal {
            Some(LayoutSizing::Hug) | Some(LayoutSizing::Fill) => None,
            _ => Some(round2(bounds.width)),
        };
        let height = match node.layout_sizing_vertical {
            Some(LayoutSizing::Hug) | Some(LayoutSizing::Fill) => None,
            _ => Some(round2(bounds.height)),
        };
        (width.is_some() || height.is_some()).then_some(Dimensions { width, height })
    });

    let location_relative_to_parent = if in_flow {
        None
    } else {
        match (node.absolute_bounding_box, parent.and_then(|p| p.absolute_bounding_box)) {
            (Some(bounds), Some(parent_bounds)) => Some(Vector {
                x: round2(bounds.x - parent_bounds.x),
                y: round2(bounds.y - parent_bounds.y),
            }),
            _ => None,
        }
    };

    SimplifiedLayout {
        mode: mode_name(node.layout_mode),
        justify_content: if auto_layout {
            justify(node.primary_axis_align_items)
        } else {
            None
        },
        align_items: if auto_layout {
            justify(node.counter_axis_align_items)
        } else {
            None
        },
        wrap: (auto_layout && node.layout_wrap.as_deref() == Some("WRAP")).then_some(true),
        gap: node
            .item_spacing
            .filter(|spacing| auto_layout && *spacing != 0.0)
            .map(px),
        padding: if auto_layout { padding(node) } else { None },
        sizing: (sizing.horizontal.is_some() || sizing.vertical.is_some()).then_some(sizing),
        dimensions,
        location_relative_to_parent,
        position: absolute.then_some("absolute"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use designlens_model::NodeKind;

    #[test]
    fn test_row_layout() {
        let mut node = RawNode::new("1:1", "Row", NodeKind::Frame).with_bounds(0.0, 0.0, 300.0, 40.0);
        node.layout_mode = Some(LayoutMode::Horizontal);
        node.primary_axis_align_items = Some(AxisAlign::SpaceBetween);
        node.counter_axis_align_items = Some(AxisAlign::Center);
        node.item_spacing = Some(8.0);
        node.padding_top = Some(4.0);
        node.padding_bottom = Some(4.0);
        node.padding_left = Some(12.0);
        node.padding_right = Some(12.0);

        let layout = build_layout(&node, None);
        assert_eq!(layout.mode, "row");
        assert_eq!(layout.justify_content, Some("space-between"));
        assert_eq!(layout.align_items, Some("center"));
        assert_eq!(layout.gap.as_deref(), Some("8px"));
        assert_eq!(layout.padding.as_deref(), Some("4px 12px"));
    }

    #[test]
    fn test_location_relative_to_static_parent() {
        let parent = RawNode::new("1:1", "Parent", NodeKind::Frame).with_bounds(100.0, 50.0, 500.0, 500.0);
        let child = RawNode::new("1:2", "Child", NodeKind::Rectangle).with_bounds(130.0, 90.0, 20.0, 20.0);

        let layout = build_layout(&child, Some(&parent));
        assert_eq!(layout.location_relative_to_parent, Some(Vector { x: 30.0, y: 40.0 }));
        assert_eq!(
            layout.dimensions,
            Some(Dimensions {
                width: Some(20.0),
                height: Some(20.0)
            })
        );
    }

    #[test]
    fn test_auto_layout_children_have_no_location() {
        let mut parent = RawNode::new("1:1", "Stack", NodeKind::Frame).with_bounds(0.0, 0.0, 200.0, 200.0);
        parent.layout_mode = Some(LayoutMode::Vertical);
        let mut child = RawNode::new("1:2", "Item", NodeKind::Frame).with_bounds(0.0, 10.0, 200.0, 20.0);
        child.layout_sizing_horizontal = Some(LayoutSizing::Fill);

        let layout = build_layout(&child, Some(&parent));
        assert!(layout.location_relative_to_parent.is_none());
        assert_eq!(layout.dimensions.unwrap().width, None);
        assert_eq!(layout.sizing.unwrap().horizontal, Some("fill"));
    }

    #[test]
    fn test_absolute_child_of_auto_layout_keeps_location() {
        let mut parent = RawNode::new("1:1", "Stack", NodeKind::Frame).with_bounds(0.0, 0.0, 200.0, 200.0);
        parent.layout_mode = Some(LayoutMode::Vertical);
        let mut badge = RawNode::new("1:2", "Badge", NodeKind::Frame).with_bounds(180.0, -5.0, 24.0, 24.0);
        badge.layout_positioning = Some("ABSOLUTE".to_string());

        let layout = build_layout(&badge, Some(&parent));
        assert_eq!(layout.position, Some("absolute"));
        assert_eq!(layout.location_relative_to_parent, Some(Vector { x: 180.0, y: -5.0 }));
    }

    #[test]
    fn test_bare_node_registers_nothing() {
        let node = RawNode::new("1:1", "Group", NodeKind::Group);
        let mut output = SimplifiedNode::new("1-1", "Group", "GROUP");
        let mut ctx = TraversalContext::new();

        LayoutExtractor.apply(&node, &mut output, &mut ctx).unwrap();
        assert!(output.layout.is_none());
        assert!(ctx.globals.is_empty());
    }
}
