//! Selection highlight geometry.
//!
//! A highlight is an overlay drawn around a selected object: an outline
//! plus the handles the user grabs to resize, rotate or re-point it. The
//! geometry is expressed relative to the object's origin and follows the
//! object's rotation about its center.

use glabels_core::{Point, Size};
use serde::{Deserialize, Serialize};

/// Distance of the rotate handle above the top edge, in points.
pub const ROTATE_HANDLE_OFFSET: f64 = 12.0;

/// Which affordances the highlight offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HighlightStyle {
    /// Outline with corner and edge resize handles.
    ResizeHandles,
    /// Outline with corner handles and a rotate handle above the top edge.
    RotateHandles,
    /// Line between the two end points with one handle per end.
    LineOnly,
    /// Plain outline, no handles.
    Outline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleRole {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    /// Line start point.
    Start,
    /// Line end point.
    End,
    Rotate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub role: HandleRole,
    pub position: Point,
}

/// Outline and handles of a highlight, relative to the object origin.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightGeometry {
    pub style: HighlightStyle,
    /// Closed polygon for boxes, two points for lines.
    pub outline: Vec<Point>,
    pub handles: Vec<Handle>,
}

impl HighlightGeometry {
    pub fn compute(style: HighlightStyle, size: Size, rotation: f64) -> Self {
        let (w, h) = (size.w, size.h);
        let center = Point::new(w / 2.0, h / 2.0);
        let rotate = |x: f64, y: f64| Point::new(x, y).rotate_about(center, rotation);

        let outline = match style {
            HighlightStyle::LineOnly => vec![rotate(0.0, 0.0), rotate(w, h)],
            _ => vec![rotate(0.0, 0.0), rotate(w, 0.0), rotate(w, h), rotate(0.0, h)],
        };

        let placements: Vec<(HandleRole, f64, f64)> = match style {
            HighlightStyle::ResizeHandles => vec![
                (HandleRole::NorthWest, 0.0, 0.0),
                (HandleRole::North, w / 2.0, 0.0),
                (HandleRole::NorthEast, w, 0.0),
                (HandleRole::East, w, h / 2.0),
                (HandleRole::SouthEast, w, h),
                (HandleRole::South, w / 2.0, h),
                (HandleRole::SouthWest, 0.0, h),
                (HandleRole::West, 0.0, h / 2.0),
            ],
            HighlightStyle::RotateHandles => vec![
                (HandleRole::NorthWest, 0.0, 0.0),
                (HandleRole::NorthEast, w, 0.0),
                (HandleRole::SouthEast, w, h),
                (HandleRole::SouthWest, 0.0, h),
                (HandleRole::Rotate, w / 2.0, -ROTATE_HANDLE_OFFSET),
            ],
            HighlightStyle::LineOnly => {
                vec![(HandleRole::Start, 0.0, 0.0), (HandleRole::End, w, h)]
            }
            HighlightStyle::Outline => Vec::new(),
        };

        let handles = placements
            .into_iter()
            .map(|(role, x, y)| Handle {
                role,
                position: rotate(x, y),
            })
            .collect();

        Self {
            style,
            outline,
            handles,
        }
    }

    /// The handle within `tolerance` of `point` (object-relative), if any.
    /// When handles overlap the one listed last wins, matching draw order.
    pub fn handle_at(&self, point: Point, tolerance: f64) -> Option<HandleRole> {
        self.handles
            .iter()
            .rev()
            .find(|h| {
                (h.position.x - point.x).abs() <= tolerance
                    && (h.position.y - point.y).abs() <= tolerance
            })
            .map(|h| h.role)
    }
}
