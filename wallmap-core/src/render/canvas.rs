//! Canvas sizing and drawing-to-pixel transformation.

use image::RgbImage;

use crate::config::RenderConfig;
use crate::error::{Result, WallmapError};
use crate::model::{Point, Rgb, WallSection};

use super::font;

/// Bounding box over all polygon vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Compute the bounding box over every point of every section.
    /// Fails when no section has any points.
    pub fn of_sections(sections: &[WallSection]) -> Result<Self> {
        let mut bounds: Option<Bounds> = None;
        for section in sections {
            for p in &section.points {
                bounds = Some(match bounds {
                    None => Bounds {
                        min_x: p.x,
                        min_y: p.y,
                        max_x: p.x,
                        max_y: p.y,
                    },
                    Some(b) => Bounds {
                        min_x: b.min_x.min(p.x),
                        min_y: b.min_y.min(p.y),
                        max_x: b.max_x.max(p.x),
                        max_y: b.max_y.max(p.y),
                    },
                });
            }
        }
        bounds.ok_or(WallmapError::NoGeometry)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// White canvas with the coordinate shift that keeps all shapes inside
/// positive pixel bounds.
pub struct Canvas {
    pub image: RgbImage,
    bounds: Bounds,
    offset: f64,
}

impl Canvas {
    /// Allocate a canvas sized `(extent + padding)` per dimension, with the
    /// minimum coordinate mapped to `padding / 2`.
    pub fn new(bounds: Bounds, config: &RenderConfig) -> Self {
        let width = bounds.width().ceil() as u32 + config.padding;
        let height = bounds.height().ceil() as u32 + config.padding;
        let image = RgbImage::from_pixel(width.max(1), height.max(1), Rgb::WHITE.to_pixel());
        Self {
            image,
            bounds,
            offset: config.offset(),
        }
    }

    /// Transform a drawing coordinate to pixel space.
    pub fn to_pixel(&self, p: Point) -> (i32, i32) {
        let x = p.x - self.bounds.min_x + self.offset;
        let y = p.y - self.bounds.min_y + self.offset;
        (x.round() as i32, y.round() as i32)
    }

    /// Fill a polygon and stroke its outline.
    ///
    /// The point list is treated as closed; a repeated closing vertex is
    /// dropped before filling.
    pub fn fill_polygon(&mut self, points: &[Point], fill: Rgb, outline: Rgb) {
        let mut pixels: Vec<imageproc::point::Point<i32>> = points
            .iter()
            .map(|p| {
                let (x, y) = self.to_pixel(*p);
                imageproc::point::Point::new(x, y)
            })
            .collect();
        pixels.dedup();
        if pixels.len() > 1 && pixels.first() == pixels.last() {
            pixels.pop();
        }
        if pixels.len() < 3 {
            return;
        }

        imageproc::drawing::draw_polygon_mut(&mut self.image, &pixels, fill.to_pixel());

        for i in 0..pixels.len() {
            let a = pixels[i];
            let b = pixels[(i + 1) % pixels.len()];
            imageproc::drawing::draw_line_segment_mut(
                &mut self.image,
                (a.x as f32, a.y as f32),
                (b.x as f32, b.y as f32),
                outline.to_pixel(),
            );
        }
    }

    /// Draw a text label centered on a drawing coordinate.
    pub fn label(&mut self, at: Point, text: &str, color: Rgb) {
        let (x, y) = self.to_pixel(at);
        font::draw_text_centered(
            &mut self.image,
            x as i64,
            y as i64 - (font::CHAR_H / 2) as i64,
            text,
            color,
        );
    }

    /// Paste another image at a pixel origin, clipping at the canvas edge.
    pub fn paste(&mut self, overlay: &RgbImage, origin: (u32, u32)) {
        for (x, y, pixel) in overlay.enumerate_pixels() {
            let px = origin.0 + x;
            let py = origin.1 + y;
            if px < self.image.width() && py < self.image.height() {
                self.image.put_pixel(px, py, *pixel);
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use pretty_assertions::assert_eq;

    fn sections_with_bounds() -> Vec<WallSection> {
        vec![
            WallSection::new(
                "A",
                vec![
                    Point::new(10.0, 20.0),
                    Point::new(110.0, 20.0),
                    Point::new(110.0, 80.0),
                ],
                Point::default(),
            ),
            WallSection::new(
                "B",
                vec![
                    Point::new(50.0, 60.0),
                    Point::new(70.0, 60.0),
                    Point::new(70.0, 120.0),
                ],
                Point::default(),
            ),
        ]
    }

    #[test]
    fn test_bounds_over_all_sections() {
        let bounds = Bounds::of_sections(&sections_with_bounds()).unwrap();
        assert_eq!(bounds.min_x, 10.0);
        assert_eq!(bounds.max_x, 110.0);
        assert_eq!(bounds.min_y, 20.0);
        assert_eq!(bounds.max_y, 120.0);
    }

    #[test]
    fn test_bounds_empty_is_error() {
        let sections = vec![WallSection::new("E", vec![], Point::default())];
        assert!(matches!(
            Bounds::of_sections(&sections),
            Err(WallmapError::NoGeometry)
        ));
    }

    #[test]
    fn test_canvas_dimensions_are_extent_plus_padding() {
        let bounds = Bounds::of_sections(&sections_with_bounds()).unwrap();
        let config = RenderConfig::with_padding(100);
        let canvas = Canvas::new(bounds, &config);
        assert_eq!(canvas.width(), 100 + 100);
        assert_eq!(canvas.height(), 100 + 100);
    }

    #[test]
    fn test_transformed_points_fall_within_canvas() {
        let sections = sections_with_bounds();
        let bounds = Bounds::of_sections(&sections).unwrap();
        let canvas = Canvas::new(bounds, &RenderConfig::with_padding(100));

        for section in &sections {
            for p in &section.points {
                let (x, y) = canvas.to_pixel(*p);
                assert!(x >= 0 && (x as u32) <= canvas.width());
                assert!(y >= 0 && (y as u32) <= canvas.height());
            }
        }
    }

    #[test]
    fn test_minimum_maps_to_half_padding() {
        let bounds = Bounds::of_sections(&sections_with_bounds()).unwrap();
        let canvas = Canvas::new(bounds, &RenderConfig::with_padding(100));
        assert_eq!(canvas.to_pixel(Point::new(10.0, 20.0)), (50, 50));
    }

    #[test]
    fn test_fill_polygon_with_closing_vertex() {
        let bounds = Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 10.0,
            max_y: 10.0,
        };
        let mut canvas = Canvas::new(bounds, &RenderConfig::with_padding(10));
        // Explicitly closed square must not panic and must fill.
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 0.0),
        ];
        canvas.fill_polygon(&square, Rgb::RED, Rgb::BLACK);
        let red = canvas
            .image
            .pixels()
            .filter(|p| p.0 == [255, 0, 0])
            .count();
        assert!(red > 0);
    }
}
