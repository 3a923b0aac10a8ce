//! Error types for extraction, rendering, and statistics.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for wallmap operations.
#[derive(Debug, Error)]
pub enum WallmapError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Empty file: {path}")]
    EmptyFile { path: PathBuf },

    #[error("DXF parse error at line {line}: {message}")]
    DxfParse { line: usize, message: String },

    #[error("No {section} section found in drawing")]
    MissingSection { section: String },

    #[error("CSV shape error at row {row}: {message}")]
    CsvShape { row: usize, message: String },

    #[error("Block '{name}' referenced more than once in the drawing")]
    DuplicateBlock { name: String },

    #[error("No feature value for wall section '{section}' (feature '{feature}')")]
    JoinMiss { section: String, feature: String },

    #[error("Feature '{feature}' is not classified as discrete, continuous, or binary")]
    UnclassifiedFeature { feature: String },

    #[error("Feature '{feature}' has no classification entry for value {value}")]
    UnmappedValue { feature: String, value: i64 },

    #[error("Wall section '{section}' has a missing value for feature '{feature}'")]
    MissingValue { section: String, feature: String },

    #[error("Geometry table contains no points")]
    NoGeometry,

    #[error("Unrecognized color '{value}'")]
    BadColor { value: String },

    #[error("Unrecognized color scale '{value}'")]
    UnknownColorScale { value: String },

    #[error("Not enough data for statistics: {message}")]
    InsufficientData { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for wallmap operations.
pub type Result<T> = std::result::Result<T, WallmapError>;
