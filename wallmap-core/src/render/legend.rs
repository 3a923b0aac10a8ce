//! Legend strip for discrete and binary features.

use image::RgbImage;

use crate::config::{LEGEND_ROW_HEIGHT, LEGEND_SWATCH};
use crate::model::Rgb;

use super::font;

/// Legend entries in first-seen order, one per distinct value actually
/// present in the data.
#[derive(Debug, Default)]
pub struct LegendBuilder {
    entries: Vec<(Rgb, String)>,
}

impl LegendBuilder {
    /// Record a (color, label) pair; repeats of the same pair are ignored.
    /// Distinct labels sharing a color stay separate rows.
    pub fn record(&mut self, color: Rgb, label: &str) {
        if !self.entries.iter().any(|(c, l)| *c == color && l == label) {
            self.entries.push((color, label.to_string()));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in recorded order.
    pub fn entries(&self) -> &[(Rgb, String)] {
        &self.entries
    }

    /// Render the legend as its own image for pasting onto the canvas.
    pub fn build_image(&self) -> RgbImage {
        let swatch = LEGEND_SWATCH;
        let row_h = LEGEND_ROW_HEIGHT;
        let text_w = self
            .entries
            .iter()
            .map(|(_, label)| font::text_width(label))
            .max()
            .unwrap_or(0);
        let width = (swatch + 10 + text_w + 10).max(60);
        let height = (self.entries.len() as u32 * row_h).max(row_h);

        let mut image = RgbImage::from_pixel(width, height, Rgb::WHITE.to_pixel());
        for (i, (color, label)) in self.entries.iter().enumerate() {
            let y0 = i as u32 * row_h + (row_h - swatch) / 2;
            fill_rect(&mut image, 2, y0, swatch, swatch, *color);
            outline_rect(&mut image, 2, y0, swatch, swatch, Rgb::BLACK);
            font::draw_text(
                &mut image,
                (swatch + 10) as i64,
                (y0 + swatch / 2 - font::CHAR_H / 2) as i64,
                label,
                Rgb::BLACK,
            );
        }
        image
    }
}

pub(crate) fn fill_rect(image: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb) {
    for dy in 0..h {
        for dx in 0..w {
            let px = x + dx;
            let py = y + dy;
            if px < image.width() && py < image.height() {
                image.put_pixel(px, py, color.to_pixel());
            }
        }
    }
}

pub(crate) fn outline_rect(image: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb) {
    fill_rect(image, x, y, w, 1, color);
    fill_rect(image, x, y + h.saturating_sub(1), w, 1, color);
    fill_rect(image, x, y, 1, h, color);
    fill_rect(image, x + w.saturating_sub(1), y, 1, h, color);
}
