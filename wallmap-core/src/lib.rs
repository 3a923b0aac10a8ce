//! wallmap-core - Core library for adobe wall-section mapping.
//!
//! This library extracts wall-section geometry from architectural DXF
//! drawings, joins it with a degradation feature table, and renders
//! feature-of-interest maps as PNG images. It also provides correlation
//! statistics over the feature table and a synthetic dataset generator.
//!
//! # Example
//!
//! ```no_run
//! use wallmap_core::{extract_dxf_to_csv, ExtractOptions};
//! use std::path::Path;
//!
//! let summary = extract_dxf_to_csv(
//!     Path::new("site_plan.dxf"),
//!     Path::new("geometry.csv"),
//!     &ExtractOptions::default(),
//! ).unwrap();
//! println!("extracted {} wall sections", summary.extracted);
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;
pub mod stats;
pub mod synth;
pub mod validation;

// Re-exports for convenience
pub use config::{DuplicatePolicy, RenderConfig};
pub use error::{Result, WallmapError};
pub use extract::{extract_sections, ExtractOptions, ExtractSummary};
pub use model::{
    FeatureClassification, FeatureKind, FeatureTable, FeatureValue, Point, Rgb, WallSection,
};
pub use parser::{
    load_classification, parse_dxf_file, read_feature_table, read_geometry_csv,
    write_geometry_csv,
};
pub use render::{render_feature, render_feature_maps, RenderSummary};
pub use stats::{run_stats, StatsOptions};
pub use synth::{write_synthetic_csv, SynthOptions};
pub use validation::{validate_for_render, ValidationResult};

/// Extract wall-section geometry from a DXF file into a geometry CSV.
///
/// This is the main high-level extraction pipeline:
/// 1. Parse the DXF file into block definitions and inserts
/// 2. Resolve each insert and translate its polyline vertices
/// 3. Write the geometry CSV
pub fn extract_dxf_to_csv(
    input_path: &std::path::Path,
    output_path: &std::path::Path,
    options: &ExtractOptions,
) -> Result<ExtractSummary> {
    let drawing = parse_dxf_file(input_path)?;
    let (sections, summary) = extract_sections(&drawing, options)?;
    write_geometry_csv(&sections, output_path)?;
    Ok(summary)
}

/// Render feature maps from a geometry CSV and a feature table CSV.
///
/// Validates the join first; in lenient mode unmatched rows only warn.
pub fn render_maps_from_files(
    geometry_path: &std::path::Path,
    features_path: &std::path::Path,
    classification: &FeatureClassification,
    feature_names: &[String],
    out_dir: &std::path::Path,
    config: &RenderConfig,
) -> Result<RenderSummary> {
    let sections = read_geometry_csv(geometry_path)?;
    let features = read_feature_table(features_path)?;
    validate_for_render(&sections, &features, false)?;
    render_feature_maps(
        &sections,
        &features,
        classification,
        feature_names,
        out_dir,
        config,
    )
}
