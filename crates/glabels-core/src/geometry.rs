//! Plain geometry value types shared by the label model and the views.
//!
//! All lengths are in points (1/72 inch).

use serde::{Deserialize, Serialize};

/// A position in label coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point translated by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Rotates this point about `center` by `degrees`.
    pub fn rotate_about(self, center: Point, degrees: f64) -> Self {
        if degrees == 0.0 {
            return self;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let x = self.x - center.x;
        let y = self.y - center.y;
        Self::new(
            center.x + x * cos - y * sin,
            center.y + x * sin + y * cos,
        )
    }
}

/// Width and height of an object.
///
/// Line objects use signed components for the end point relative to the
/// start point, so negative values are valid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0.0 && self.h == 0.0
    }
}
