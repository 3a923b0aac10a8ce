//! Feature-driven map rendering.

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::config::{RenderConfig, TITLE_BG_HEIGHT, TITLE_BG_WIDTH};
use crate::error::{Result, WallmapError};
use crate::model::{
    FeatureClassification, FeatureKind, FeatureTable, Rgb, WallSection,
};

use super::canvas::{Bounds, Canvas};
use super::colorbar::build_colorbar;
use super::font;
use super::legend::{fill_rect, LegendBuilder};

/// Per-run record of rendered and skipped features.
#[derive(Debug, Default)]
pub struct RenderSummary {
    /// Output paths of rendered features.
    pub rendered: Vec<PathBuf>,
    /// (feature, reason) pairs for skipped features.
    pub skipped: Vec<(String, String)>,
}

impl RenderSummary {
    /// Log the summary at the end of a run.
    pub fn report(&self) {
        tracing::info!("rendered {} feature map(s)", self.rendered.len());
        for (feature, reason) in &self.skipped {
            tracing::warn!("skipped feature '{}': {}", feature, reason);
        }
    }
}

/// Render one feature map into an image.
///
/// Fails on an unclassified feature, a join miss, a missing value, or an
/// integer code absent from the classification mapping.
pub fn render_feature(
    sections: &[WallSection],
    features: &FeatureTable,
    classification: &FeatureClassification,
    feature: &str,
    config: &RenderConfig,
) -> Result<RgbImage> {
    // Zero-point sections cannot be drawn; filter them up front.
    let drawable: Vec<&WallSection> = sections.iter().filter(|s| s.is_polygon()).collect();
    for section in sections.iter().filter(|s| !s.is_polygon()) {
        tracing::warn!(
            "wall section '{}' has {} point(s); not drawable",
            section.name,
            section.points.len()
        );
    }

    let bounds = Bounds::of_sections(sections)?;
    let mut canvas = Canvas::new(bounds, config);

    match classification.kind_of(feature)? {
        FeatureKind::Discrete(map) => {
            let mut legend = LegendBuilder::default();
            for section in &drawable {
                let value = lookup_code(features, section, feature)?;
                let entry = map.get(&value).ok_or(WallmapError::UnmappedValue {
                    feature: feature.to_string(),
                    value,
                })?;
                legend.record(entry.color, &entry.legend);
                draw_section(&mut canvas, section, entry.color);
            }
            let legend_image = legend.build_image();
            paste_top_right(&mut canvas, &legend_image, config.legend_inset);
        }
        FeatureKind::Binary(map) => {
            let mut legend = LegendBuilder::default();
            for section in &drawable {
                let value = lookup_code(features, section, feature)?;
                let color = *map.get(&value).ok_or(WallmapError::UnmappedValue {
                    feature: feature.to_string(),
                    value,
                })?;
                legend.record(color, &value.to_string());
                draw_section(&mut canvas, section, color);
            }
            let legend_image = legend.build_image();
            paste_top_right(&mut canvas, &legend_image, config.legend_inset);
        }
        FeatureKind::Continuous(scale) => {
            let scale = *scale;
            let (min, max) = continuous_range(features, &drawable, feature)?;
            let range = max - min;
            for section in &drawable {
                let value = features.value(&section.name, feature)?;
                let value = value.as_f64().ok_or_else(|| WallmapError::MissingValue {
                    section: section.name.clone(),
                    feature: feature.to_string(),
                })?;
                // Zero range renders uniformly at the scale minimum.
                let normalized = if range > 0.0 { (value - min) / range } else { 0.0 };
                draw_section(&mut canvas, section, scale.sample(normalized));
            }
            let bar = build_colorbar(scale, min, max, feature);
            paste_top_right(&mut canvas, &bar, config.colorbar_inset);
        }
    }

    draw_title(&mut canvas.image, feature);
    Ok(canvas.image)
}

/// Render a batch of features, writing one PNG per feature.
///
/// Per-feature failures are recorded and the batch continues; no error
/// terminates the run early.
pub fn render_feature_maps(
    sections: &[WallSection],
    features: &FeatureTable,
    classification: &FeatureClassification,
    feature_names: &[String],
    out_dir: &Path,
    config: &RenderConfig,
) -> Result<RenderSummary> {
    std::fs::create_dir_all(out_dir)?;
    let mut summary = RenderSummary::default();

    for feature in feature_names {
        match render_feature(sections, features, classification, feature, config) {
            Ok(image) => {
                let path = out_dir.join(format!("{}.png", feature));
                write_png(&image, &path)?;
                tracing::info!("wrote {}", path.display());
                summary.rendered.push(path);
            }
            Err(err) => {
                summary.skipped.push((feature.clone(), err.to_string()));
            }
        }
    }

    Ok(summary)
}

/// Encode a PNG fully in memory, then write via a temp file and rename so
/// a crash never leaves a truncated image behind.
pub fn write_png(image: &RgbImage, path: &Path) -> Result<()> {
    use std::io::Cursor;

    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

    let tmp = path.with_extension("png.tmp");
    std::fs::write(&tmp, &buf)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

fn lookup_code(features: &FeatureTable, section: &WallSection, feature: &str) -> Result<i64> {
    features
        .value(&section.name, feature)?
        .as_code()
        .ok_or_else(|| WallmapError::MissingValue {
            section: section.name.clone(),
            feature: feature.to_string(),
        })
}

/// Min and max of a continuous feature over the drawable sections.
fn continuous_range(
    features: &FeatureTable,
    drawable: &[&WallSection],
    feature: &str,
) -> Result<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for section in drawable {
        let value = features.value(&section.name, feature)?;
        let value = value.as_f64().ok_or_else(|| WallmapError::MissingValue {
            section: section.name.clone(),
            feature: feature.to_string(),
        })?;
        min = min.min(value);
        max = max.max(value);
    }
    if drawable.is_empty() {
        return Err(WallmapError::NoGeometry);
    }
    Ok((min, max))
}

/// Paste an overlay inset from the canvas's top-right corner, keeping it
/// off the drawing area on the left.
fn paste_top_right(canvas: &mut Canvas, overlay: &RgbImage, inset: (u32, u32)) {
    let x = canvas.width().saturating_sub(overlay.width() + inset.0);
    canvas.paste(overlay, (x, inset.1));
}

fn draw_section(canvas: &mut Canvas, section: &WallSection, fill: Rgb) {
    canvas.fill_polygon(&section.points, fill, Rgb::BLACK);
    if let Some(center) = section.centroid() {
        canvas.label(center, &section.name, Rgb::BLACK);
    }
}

/// Title overlay: filled background rectangle, then the feature name, so
/// the text stays legible over arbitrary polygon fills.
fn draw_title(image: &mut RgbImage, feature: &str) {
    fill_rect(image, 0, 0, TITLE_BG_WIDTH, TITLE_BG_HEIGHT, Rgb::WHITE);
    font::draw_text(
        image,
        10,
        ((TITLE_BG_HEIGHT - font::CHAR_H) / 2) as i64,
        &format!("Feature of Interest: {}", feature),
        Rgb::BLACK,
    );
}
