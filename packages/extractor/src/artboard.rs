use designlens_model::{LayoutGrid, RawNode, Rect};
use serde::{Deserialize, Serialize};

/// A frame whose layout grids include a columns pattern, used as the
/// reference for computing descendants' column spans.
///
/// Grids are owned so an artboard can also be assembled from a grid style
/// definition fetched separately from the frame itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridArtboard {
    /// Colon-form id of the frame
    pub node_id: String,
    pub name: String,
    pub bounds: Rect,
    pub grids: Vec<LayoutGrid>,
}

impl GridArtboard {
    /// Artboard from a frame with an embedded columns grid
    pub fn from_node(node: &RawNode) -> Option<Self> {
        if !node.has_column_grid() {
            return None;
        }
        Self::with_grids(node, node.layout_grids.clone())
    }

    /// Artboard from a frame and grids defined elsewhere (a grid style)
    pub fn with_grids(node: &RawNode, grids: Vec<LayoutGrid>) -> Option<Self> {
        let bounds = node.absolute_bounding_box?;
        if !grids.iter().any(LayoutGrid::is_columns) {
            return None;
        }
        Some(Self {
            node_id: node.id.clone(),
            name: node.name.clone(),
            bounds,
            grids,
        })
    }

    /// The first columns grid; later ones are ignored
    pub fn column_grid(&self) -> Option<&LayoutGrid> {
        self.grids.iter().find(|grid| grid.is_columns())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use designlens_model::{GridAlignment, GridPattern, NodeKind};

    #[test]
    fn test_frame_with_column_grid_is_an_artboard() {
        let frame = RawNode::new("1:1", "Desktop", NodeKind::Frame)
            .with_bounds(0.0, 0.0, 1440.0, 900.0)
            .with_grid(LayoutGrid::columns(12, 24.0, 80.0));

        let artboard = GridArtboard::from_node(&frame).unwrap();
        assert_eq!(artboard.node_id, "1:1");
        assert_eq!(artboard.column_grid().unwrap().count, Some(12));
    }

    #[test]
    fn test_text_node_is_never_an_artboard() {
        let text = RawNode::new("1:2", "Label", NodeKind::Text)
            .with_bounds(0.0, 0.0, 100.0, 20.0)
            .with_grid(LayoutGrid::columns(4, 8.0, 0.0));

        assert!(GridArtboard::from_node(&text).is_none());
    }

    #[test]
    fn test_frame_without_bounds_is_not_an_artboard() {
        let frame = RawNode::new("1:1", "Detached", NodeKind::Frame)
            .with_grid(LayoutGrid::columns(12, 20.0, 0.0));

        assert!(GridArtboard::from_node(&frame).is_none());
    }

    #[test]
    fn test_first_column_grid_wins() {
        let frame = RawNode::new("1:1", "Frame", NodeKind::Frame)
            .with_bounds(0.0, 0.0, 1200.0, 800.0)
            .with_grid(LayoutGrid {
                pattern: GridPattern::Rows,
                count: Some(8),
                gutter_size: Some(10.0),
                section_size: None,
                offset: None,
                alignment: GridAlignment::Stretch,
                visible: true,
            })
            .with_grid(LayoutGrid::columns(12, 20.0, 0.0))
            .with_grid(LayoutGrid::columns(4, 40.0, 0.0));

        let artboard = GridArtboard::from_node(&frame).unwrap();
        assert_eq!(artboard.column_grid().unwrap().count, Some(12));
    }
}
