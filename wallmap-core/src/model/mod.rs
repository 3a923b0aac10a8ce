//! Data model for wall sections, feature tables, and classification.

mod classification;
mod color;
mod feature;
mod point;
mod section;

pub use classification::{ClassEntry, FeatureClassification, FeatureKind};
pub use color::{ColorScale, Rgb};
pub use feature::{FeatureTable, FeatureValue};
pub use point::Point;
pub use section::WallSection;
