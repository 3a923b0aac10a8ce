//! Wall section definition: one named polygon extracted from the drawing.

use serde::{Deserialize, Serialize};

use super::Point;

/// A named wall section with its boundary polygon in absolute coordinates.
///
/// The point sequence is not guaranteed to be closed; the renderer closes
/// it implicitly when filling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WallSection {
    /// Identifier, unique within a drawing (the originating block name).
    pub name: String,
    /// Ordered boundary points in absolute drawing coordinates.
    pub points: Vec<Point>,
    /// Insertion point of the originating block reference.
    pub insert: Point,
}

impl WallSection {
    /// Create a new wall section.
    pub fn new(name: impl Into<String>, points: Vec<Point>, insert: Point) -> Self {
        Self {
            name: name.into(),
            points,
            insert,
        }
    }

    /// Whether the point list forms a drawable polygon (at least 3 points).
    pub fn is_polygon(&self) -> bool {
        self.points.len() >= 3
    }

    /// Arithmetic mean of the boundary points, used for label placement.
    pub fn centroid(&self) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let sx: f64 = self.points.iter().map(|p| p.x).sum();
        let sy: f64 = self.points.iter().map(|p| p.y).sum();
        Some(Point::new(sx / n, sy / n))
    }

    /// Recover the local-coordinate polygon by undoing the insertion offset.
    pub fn local_points(&self) -> Vec<Point> {
        self.points
            .iter()
            .map(|p| p.translated(-self.insert.x, -self.insert.y))
            .collect()
    }
}
