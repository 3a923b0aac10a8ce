//! Parsers for the DXF drawing and the tabular interchange formats.

pub mod classification;
pub mod dxf;
pub mod features;
pub mod geometry;

pub use classification::load_classification;
pub use dxf::{parse_dxf_file, BlockDef, Drawing, DxfParser, Insert, Polyline};
pub use features::read_feature_table;
pub use geometry::{read_geometry_csv, write_geometry_csv};
