//! Column span computation.
//!
//! Given a node's absolute bounding box and the grid artboard enclosing it,
//! work out which columns of the artboard's first columns grid the node
//! covers. Nodes outside the grid are clamped into `[0, count - 1]`, never
//! dropped.

use crate::artboard::GridArtboard;
use designlens_model::{GridAlignment, LayoutGrid, Rect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanResult {
    /// Node width in pixels
    pub width: f64,
    pub start_column: u32,
    pub end_column: u32,
}

/// Resolved column geometry in artboard-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
struct ColumnGeometry {
    count: u32,
    /// Local x where the first column starts
    origin: f64,
    section: f64,
    gutter: f64,
}

impl ColumnGeometry {
    fn resolve(grid: &LayoutGrid, artboard_width: f64) -> Option<Self> {
        let count = u32::try_from(grid.count?).ok().filter(|count| *count > 0)?;
        let columns = f64::from(count);
        let margin = grid.offset.unwrap_or(0.0);

        // (width - 2 * margin - (count - 1) * gutter) / count = section
        let (section, gutter) = match (grid.section_size, grid.gutter_size) {
            (Some(section), Some(gutter)) if section > 0.0 => (section, gutter),
            (Some(section), None) if section > 0.0 => {
                let gutter = if count > 1 {
                    (artboard_width - 2.0 * margin - columns * section) / (columns - 1.0)
                } else {
                    0.0
                };
                (section, gutter.max(0.0))
            }
            (_, gutter) => {
                let gutter = gutter.unwrap_or(0.0);
                let section =
                    (artboard_width - 2.0 * margin - (columns - 1.0) * gutter) / columns;
                (section, gutter)
            }
        };

        let total = columns * section + (columns - 1.0) * gutter;
        let origin = match grid.alignment {
            GridAlignment::Min | GridAlignment::Stretch => margin,
            GridAlignment::Max => artboard_width - margin - total,
            GridAlignment::Center => (artboard_width - total) / 2.0,
        };

        Some(Self {
            count,
            origin,
            section,
            gutter,
        })
    }

    fn pitch(&self) -> f64 {
        self.section + self.gutter
    }
}

/// Compute the column range `bounds` occupies within `artboard`.
///
/// Column pitch is `section + gutter`, so a 400px node on a 1200px, 12 column,
/// 20px gutter grid ends in column 4.
///
/// Returns `None` when the artboard carries no usable columns grid.
pub fn compute_span(bounds: &Rect, artboard: &GridArtboard) -> Option<SpanResult> {
    let grid = artboard.column_grid()?;
    let geometry = ColumnGeometry::resolve(grid, artboard.bounds.width)?;

    let pitch = geometry.pitch();
    if !pitch.is_finite() || pitch <= 0.0 {
        return None;
    }

    let local_x = bounds.x - artboard.bounds.x;
    let start = ((local_x - geometry.origin) / pitch).floor();
    let end = ((local_x + bounds.width - geometry.origin) / pitch).ceil();

    let last = f64::from(geometry.count - 1);
    Some(SpanResult {
        width: bounds.width,
        start_column: clamp_column(start, last),
        end_column: clamp_column(end, last),
    })
}

fn clamp_column(column: f64, last: f64) -> u32 {
    if column.is_nan() {
        return 0;
    }
    column.clamp(0.0, last) as u32
}
