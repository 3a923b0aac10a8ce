//! 2-D point in drawing coordinates.

use serde::{Deserialize, Serialize};

use crate::config::float_cmp;

/// A 2-D point in absolute drawing coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by an offset.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Check approximate equality within the geometry epsilon.
    pub fn approx_eq(&self, other: &Point) -> bool {
        float_cmp::approx_eq(self.x, other.x) && float_cmp::approx_eq(self.y, other.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_round_trip() {
        let p = Point::new(3.25, -1.5);
        let back = p.translated(10.0, 10.0).translated(-10.0, -10.0);
        assert!(p.approx_eq(&back));
    }

    #[test]
    fn test_display_format() {
        let p = Point::new(10.0, 11.5);
        assert_eq!(p.to_string(), "10, 11.5");
    }
}
