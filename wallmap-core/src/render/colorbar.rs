//! Vertical colorbar for continuous features.

use image::RgbImage;

use crate::config::{COLORBAR_HEIGHT, COLORBAR_WIDTH};
use crate::model::{ColorScale, Rgb};

use super::font;
use super::legend::{fill_rect, outline_rect};

/// Build a colorbar image: gradient strip with a black border, the feature
/// name above it, the maximum tick label at the top and the minimum at the
/// bottom.
pub fn build_colorbar(scale: ColorScale, min: f64, max: f64, title: &str) -> RgbImage {
    let strip_w = COLORBAR_WIDTH;
    let strip_h = COLORBAR_HEIGHT;
    let title_h = font::CHAR_H + 6;

    let max_label = format_tick(max);
    let min_label = format_tick(min);
    let label_w = font::text_width(&max_label)
        .max(font::text_width(&min_label))
        .max(font::text_width(title));
    let width = (strip_w + 8 + label_w + 4).max(strip_w + 20);
    let height = title_h + strip_h + 4;

    let mut image = RgbImage::from_pixel(width, height, Rgb::WHITE.to_pixel());

    font::draw_text(&mut image, 0, 2, title, Rgb::BLACK);

    let strip_y = title_h;
    for dy in 0..strip_h {
        // Top row is the maximum.
        let t = 1.0 - dy as f64 / (strip_h - 1) as f64;
        let color = scale.sample(t);
        fill_rect(&mut image, 0, strip_y + dy, strip_w, 1, color);
    }
    outline_rect(&mut image, 0, strip_y, strip_w, strip_h, Rgb::BLACK);

    font::draw_text(
        &mut image,
        (strip_w + 8) as i64,
        strip_y as i64,
        &max_label,
        Rgb::BLACK,
    );
    font::draw_text(
        &mut image,
        (strip_w + 8) as i64,
        (strip_y + strip_h - font::CHAR_H) as i64,
        &min_label,
        Rgb::BLACK,
    );

    image
}

/// Format a tick value, trimming a trailing `.0`.
fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
