//! Configuration constants and settings shared across the pipeline.

use serde::{Deserialize, Serialize};

/// Floating-point comparison epsilon for geometry round-trips.
pub const EPS: f64 = 1e-6;

/// Default canvas padding in drawing units (split evenly on each side).
pub const DEFAULT_PADDING: u32 = 100;

/// Legend swatch size in pixels.
pub const LEGEND_SWATCH: u32 = 20;

/// Legend row height in pixels.
pub const LEGEND_ROW_HEIGHT: u32 = 30;

/// Colorbar gradient strip width in pixels.
pub const COLORBAR_WIDTH: u32 = 30;

/// Colorbar gradient strip height in pixels.
pub const COLORBAR_HEIGHT: u32 = 200;

/// Title overlay background width in pixels.
pub const TITLE_BG_WIDTH: u32 = 300;

/// Title overlay background height in pixels.
pub const TITLE_BG_HEIGHT: u32 = 30;

/// Default significance level for correlation analysis.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Default sample count for the synthetic dataset.
pub const DEFAULT_SYNTH_SAMPLES: usize = 67;

/// Default RNG seed for the synthetic dataset.
pub const DEFAULT_SYNTH_SEED: u64 = 42;

/// Policy for a block name appearing on more than one reference.
///
/// Which behavior is wanted for legitimately multi-part walls is an open
/// product question, so all candidates are selectable; last-wins matches
/// the surveyed drawings in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Keep the points of the last reference seen.
    #[default]
    LastWins,
    /// Keep the points of the first reference seen.
    FirstWins,
    /// Append every reference's points to the same section.
    Merge,
    /// Abort extraction with a typed error.
    FailFast,
}

impl DuplicatePolicy {
    /// Parse a policy from a CLI string.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "last-wins" | "last" => Some(DuplicatePolicy::LastWins),
            "first-wins" | "first" => Some(DuplicatePolicy::FirstWins),
            "merge" => Some(DuplicatePolicy::Merge),
            "fail" | "fail-fast" => Some(DuplicatePolicy::FailFast),
            _ => None,
        }
    }
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicatePolicy::LastWins => write!(f, "last-wins"),
            DuplicatePolicy::FirstWins => write!(f, "first-wins"),
            DuplicatePolicy::Merge => write!(f, "merge"),
            DuplicatePolicy::FailFast => write!(f, "fail-fast"),
        }
    }
}

/// Rendering configuration, constructed per render call and passed
/// explicitly rather than held as module state.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Total padding added to each canvas dimension, in drawing units.
    pub padding: u32,
    /// Legend inset from the top-right canvas corner, in pixels
    /// (x measured from the right edge, y from the top).
    pub legend_inset: (u32, u32),
    /// Colorbar inset from the top-right canvas corner, in pixels.
    pub colorbar_inset: (u32, u32),
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            legend_inset: (10, 40),
            colorbar_inset: (10, 40),
        }
    }
}

impl RenderConfig {
    /// Create a configuration with a custom padding.
    pub fn with_padding(padding: u32) -> Self {
        Self {
            padding,
            ..Default::default()
        }
    }

    /// Per-side canvas offset in drawing units.
    pub fn offset(&self) -> f64 {
        self.padding as f64 / 2.0
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    /// Check if a float is approximately zero.
    #[inline]
    pub fn approx_zero(a: f64) -> bool {
        a.abs() < EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_policy_from_str() {
        assert_eq!(
            DuplicatePolicy::from_str_opt("last-wins"),
            Some(DuplicatePolicy::LastWins)
        );
        assert_eq!(
            DuplicatePolicy::from_str_opt("MERGE"),
            Some(DuplicatePolicy::Merge)
        );
        assert_eq!(DuplicatePolicy::from_str_opt("bogus"), None);
    }

    #[test]
    fn test_render_config_offset() {
        let config = RenderConfig::with_padding(100);
        assert!(float_cmp::approx_eq(config.offset(), 50.0));
    }
}
