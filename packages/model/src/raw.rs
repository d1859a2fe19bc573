//! Raw node tree as returned by the design platform.
//!
//! Field names follow the platform's camelCase JSON. Only the attributes the
//! extractors read are typed; everything else lands in [`RawNode::extra`] so a
//! node survives a round trip even when the platform adds fields.

use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node kind (the platform's `type` field)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Component,
    ComponentSet,
    Instance,
    Text,
    Rectangle,
    Ellipse,
    Vector,
    Line,
    BooleanOperation,
    /// Any kind this crate does not know yet, keeping the platform's name
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Document => "DOCUMENT",
            NodeKind::Canvas => "CANVAS",
            NodeKind::Frame => "FRAME",
            NodeKind::Group => "GROUP",
            NodeKind::Section => "SECTION",
            NodeKind::Component => "COMPONENT",
            NodeKind::ComponentSet => "COMPONENT_SET",
            NodeKind::Instance => "INSTANCE",
            NodeKind::Text => "TEXT",
            NodeKind::Rectangle => "RECTANGLE",
            NodeKind::Ellipse => "ELLIPSE",
            NodeKind::Vector => "VECTOR",
            NodeKind::Line => "LINE",
            NodeKind::BooleanOperation => "BOOLEAN_OPERATION",
            NodeKind::Other(name) => name,
        }
    }

    /// Kinds that can carry layout grids and act as an artboard
    pub fn is_frame_like(&self) -> bool {
        matches!(
            self,
            NodeKind::Frame
                | NodeKind::Component
                | NodeKind::ComponentSet
                | NodeKind::Instance
                | NodeKind::Section
        )
    }
}

impl From<String> for NodeKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "DOCUMENT" => NodeKind::Document,
            "CANVAS" => NodeKind::Canvas,
            "FRAME" => NodeKind::Frame,
            "GROUP" => NodeKind::Group,
            "SECTION" => NodeKind::Section,
            "COMPONENT" => NodeKind::Component,
            "COMPONENT_SET" => NodeKind::ComponentSet,
            "INSTANCE" => NodeKind::Instance,
            "TEXT" => NodeKind::Text,
            "RECTANGLE" => NodeKind::Rectangle,
            "ELLIPSE" => NodeKind::Ellipse,
            "VECTOR" => NodeKind::Vector,
            "LINE" => NodeKind::Line,
            "BOOLEAN_OPERATION" => NodeKind::BooleanOperation,
            _ => NodeKind::Other(name),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

/// RGBA color with channels in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

fn visible() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GridPattern {
    Columns,
    Rows,
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GridAlignment {
    #[default]
    Min,
    Max,
    Stretch,
    Center,
}

/// A layout grid attached to a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutGrid {
    pub pattern: GridPattern,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub gutter_size: Option<f64>,
    #[serde(default)]
    pub section_size: Option<f64>,
    /// Margin for stretch grids, offset from the aligned edge otherwise
    #[serde(default)]
    pub offset: Option<f64>,
    #[serde(default)]
    pub alignment: GridAlignment,
    #[serde(default = "visible")]
    pub visible: bool,
}

impl LayoutGrid {
    pub fn columns(count: i64, gutter: f64, margin: f64) -> Self {
        Self {
            pattern: GridPattern::Columns,
            count: Some(count),
            gutter_size: Some(gutter),
            section_size: None,
            offset: Some(margin),
            alignment: GridAlignment::Stretch,
            visible: true,
        }
    }

    pub fn is_columns(&self) -> bool {
        self.pattern == GridPattern::Columns
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintType {
    Solid,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

/// Fill or stroke paint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub kind: PaintType,
    #[serde(default = "visible")]
    pub visible: bool,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub gradient_stops: Vec<ColorStop>,
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub scale_mode: Option<String>,
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Self {
            kind: PaintType::Solid,
            visible: true,
            opacity: None,
            color: Some(color),
            gradient_stops: Vec::new(),
            image_ref: None,
            scale_mode: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    DropShadow,
    InnerShadow,
    LayerBlur,
    BackgroundBlur,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub kind: EffectType,
    #[serde(default = "visible")]
    pub visible: bool,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub offset: Option<Vector>,
    #[serde(default)]
    pub spread: Option<f64>,
}

/// Text style as carried on TEXT nodes and TEXT style definitions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_weight: Option<f64>,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub italic: Option<bool>,
    #[serde(default)]
    pub line_height_px: Option<f64>,
    #[serde(default)]
    pub letter_spacing: Option<f64>,
    #[serde(default)]
    pub text_case: Option<String>,
    #[serde(default)]
    pub text_decoration: Option<String>,
    #[serde(default)]
    pub text_align_horizontal: Option<String>,
    #[serde(default)]
    pub text_align_vertical: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentProperty {
    pub value: serde_json::Value,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    None,
    Horizontal,
    Vertical,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisAlign {
    Min,
    Center,
    Max,
    SpaceBetween,
    Baseline,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutSizing {
    Fixed,
    Hug,
    Fill,
    #[serde(other)]
    Other,
}

/// A node of the raw design tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    /// Colon-delimited platform id
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default = "visible")]
    pub visible: bool,
    #[serde(default)]
    pub absolute_bounding_box: Option<Rect>,

    #[serde(default)]
    pub layout_grids: Vec<LayoutGrid>,
    /// Style references by kind (`fill`, `text`, `effect`, `grid`, ...)
    #[serde(default)]
    pub styles: BTreeMap<String, String>,

    #[serde(default)]
    pub fills: Vec<Paint>,
    #[serde(default)]
    pub strokes: Vec<Paint>,
    #[serde(default)]
    pub stroke_weight: Option<f64>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub corner_radius: Option<f64>,
    #[serde(default)]
    pub rectangle_corner_radii: Option<[f64; 4]>,

    #[serde(default)]
    pub characters: Option<String>,
    #[serde(default)]
    pub style: Option<TypeStyle>,

    #[serde(default)]
    pub component_id: Option<String>,
    #[serde(default)]
    pub component_properties: BTreeMap<String, ComponentProperty>,

    #[serde(default)]
    pub layout_mode: Option<LayoutMode>,
    #[serde(default)]
    pub primary_axis_align_items: Option<AxisAlign>,
    #[serde(default)]
    pub counter_axis_align_items: Option<AxisAlign>,
    #[serde(default)]
    pub item_spacing: Option<f64>,
    #[serde(default)]
    pub padding_left: Option<f64>,
    #[serde(default)]
    pub padding_right: Option<f64>,
    #[serde(default)]
    pub padding_top: Option<f64>,
    #[serde(default)]
    pub padding_bottom: Option<f64>,
    #[serde(default)]
    pub layout_wrap: Option<String>,
    #[serde(default)]
    pub layout_sizing_horizontal: Option<LayoutSizing>,
    #[serde(default)]
    pub layout_sizing_vertical: Option<LayoutSizing>,
    #[serde(default)]
    pub layout_positioning: Option<String>,

    #[serde(default)]
    pub children: Vec<RawNode>,

    /// Attributes not modelled above
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RawNode {
    /// Bare node of the given kind, used by builders and tests
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            visible: true,
            absolute_bounding_box: None,
            layout_grids: Vec::new(),
            styles: BTreeMap::new(),
            fills: Vec::new(),
            strokes: Vec::new(),
            stroke_weight: None,
            effects: Vec::new(),
            opacity: None,
            corner_radius: None,
            rectangle_corner_radii: None,
            characters: None,
            style: None,
            component_id: None,
            component_properties: BTreeMap::new(),
            layout_mode: None,
            primary_axis_align_items: None,
            counter_axis_align_items: None,
            item_spacing: None,
            padding_left: None,
            padding_right: None,
            padding_top: None,
            padding_bottom: None,
            layout_wrap: None,
            layout_sizing_horizontal: None,
            layout_sizing_vertical: None,
            layout_positioning: None,
            children: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_bounds(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.absolute_bounding_box = Some(Rect::new(x, y, width, height));
        self
    }

    pub fn with_grid(mut self, grid: LayoutGrid) -> Self {
        self.layout_grids.push(grid);
        self
    }

    pub fn with_child(mut self, child: RawNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<RawNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// First columns-pattern grid embedded on this node
    pub fn column_grid(&self) -> Option<&LayoutGrid> {
        self.layout_grids.iter().find(|grid| grid.is_columns())
    }

    pub fn has_column_grid(&self) -> bool {
        self.kind.is_frame_like() && self.column_grid().is_some()
    }

    /// Style id this node references for its layout grids, if any
    pub fn grid_style_id(&self) -> Option<&str> {
        self.styles.get("grid").map(String::as_str)
    }

    /// Preorder search for a descendant (or self) by colon-form id
    pub fn find(&self, internal_id: &str) -> Option<&RawNode> {
        if self.id == internal_id {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find(internal_id))
    }

    /// Like [`RawNode::find`], matching through [`NodeId::matches`]
    pub fn find_id(&self, id: &NodeId) -> Option<&RawNode> {
        if id.matches(&self.id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_id(id))
    }

    /// Height of the subtree rooted here (a leaf has depth 0)
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_is_retained() {
        let json = r#"{ "id": "1:2", "name": "Sticky", "type": "STICKY" }"#;
        let node: RawNode = serde_json::from_str(json).unwrap();

        assert_eq!(node.kind, NodeKind::Other("STICKY".to_string()));
        assert_eq!(node.kind.as_str(), "STICKY");
        assert!(node.visible);
    }

    #[test]
    fn test_unmodelled_fields_land_in_extra() {
        let json = r#"{
            "id": "1:2",
            "type": "FRAME",
            "blendMode": "PASS_THROUGH",
            "clipsContent": true
        }"#;
        let node: RawNode = serde_json::from_str(json).unwrap();

        assert_eq!(node.extra.get("blendMode"), Some(&serde_json::json!("PASS_THROUGH")));
        assert_eq!(node.extra.get("clipsContent"), Some(&serde_json::json!(true)));
    }

    #[test]
    fn test_layout_grid_parsing() {
        let json = r#"{
            "id": "1:1",
            "type": "FRAME",
            "layoutGrids": [
                { "pattern": "ROWS", "count": 4, "gutterSize": 10, "alignment": "STRETCH" },
                { "pattern": "COLUMNS", "count": 12, "gutterSize": 20, "offset": 0, "alignment": "STRETCH", "sectionSize": 81.6 }
            ]
        }"#;
        let node: RawNode = serde_json::from_str(json).unwrap();

        assert!(node.has_column_grid());
        let grid = node.column_grid().unwrap();
        assert_eq!(grid.count, Some(12));
        assert_eq!(grid.alignment, GridAlignment::Stretch);
    }

    #[test]
    fn test_rows_only_grid_is_not_a_column_grid() {
        let node = RawNode::new("1:1", "Rows", NodeKind::Frame).with_grid(LayoutGrid {
            pattern: GridPattern::Rows,
            count: Some(6),
            gutter_size: Some(8.0),
            section_size: None,
            offset: None,
            alignment: GridAlignment::Stretch,
            visible: true,
        });

        assert!(!node.has_column_grid());
    }

    #[test]
    fn test_find_and_depth() {
        let tree = RawNode::new("0:1", "Root", NodeKind::Frame).with_child(
            RawNode::new("0:2", "A", NodeKind::Frame)
                .with_child(RawNode::new("0:3", "B", NodeKind::Text)),
        );

        assert_eq!(tree.find("0:3").map(|n| n.name.as_str()), Some("B"));
        assert!(tree.find("9:9").is_none());
        assert_eq!(tree.depth(), 2);
    }
}
