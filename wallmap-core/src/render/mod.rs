//! Rasterization of wall-section geometry into feature maps.

pub mod canvas;
pub mod colorbar;
pub mod font;
pub mod legend;
pub mod renderer;

pub use canvas::{Bounds, Canvas};
pub use colorbar::build_colorbar;
pub use legend::LegendBuilder;
pub use renderer::{render_feature, render_feature_maps, write_png, RenderSummary};
