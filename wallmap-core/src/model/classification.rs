//! Feature classification: which rendering path a feature takes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ColorScale, Rgb};
use crate::error::{Result, WallmapError};

/// Display color and legend text for one discrete value code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub color: Rgb,
    pub legend: String,
}

/// How a feature is rendered.
///
/// A tagged variant keyed by feature name, so every rendering path is
/// matched exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Integer code -> color and legend text.
    Discrete(BTreeMap<i64, ClassEntry>),
    /// Named color scale for normalized values.
    Continuous(ColorScale),
    /// 0/1 code -> color.
    Binary(BTreeMap<i64, Rgb>),
}

/// Read-only classification reference data, loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct FeatureClassification {
    kinds: BTreeMap<String, FeatureKind>,
}

impl FeatureClassification {
    /// Register a feature's kind. The first registration wins; lookup
    /// precedence follows the load order (discrete, continuous, binary),
    /// and a repeat across tables is reported.
    pub fn insert(&mut self, feature: impl Into<String>, kind: FeatureKind) {
        let feature = feature.into();
        if self.kinds.contains_key(&feature) {
            tracing::warn!(
                "feature '{}' classified more than once; keeping the first entry",
                feature
            );
            return;
        }
        self.kinds.insert(feature, kind);
    }

    /// Look up a feature's kind, failing explicitly when unclassified.
    pub fn kind_of(&self, feature: &str) -> Result<&FeatureKind> {
        self.kinds
            .get(feature)
            .ok_or_else(|| WallmapError::UnclassifiedFeature {
                feature: feature.to_string(),
            })
    }

    /// Whether any feature is classified.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Number of classified features.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Classified feature names, sorted.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(|k| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sill_kind() -> FeatureKind {
        let mut map = BTreeMap::new();
        map.insert(
            0,
            ClassEntry {
                color: Rgb::GREEN,
                legend: "none".to_string(),
            },
        );
        map.insert(
            1,
            ClassEntry {
                color: Rgb::RED,
                legend: "damaged".to_string(),
            },
        );
        FeatureKind::Discrete(map)
    }

    #[test]
    fn test_lookup_present() {
        let mut classification = FeatureClassification::default();
        classification.insert("Sill", sill_kind());
        assert!(matches!(
            classification.kind_of("Sill").unwrap(),
            FeatureKind::Discrete(_)
        ));
    }

    #[test]
    fn test_lookup_unclassified() {
        let classification = FeatureClassification::default();
        let err = classification.kind_of("Sill").unwrap_err();
        assert!(matches!(err, WallmapError::UnclassifiedFeature { .. }));
    }

    #[test]
    fn test_first_registration_wins() {
        let mut classification = FeatureClassification::default();
        classification.insert("Sill", sill_kind());
        classification.insert("Sill", FeatureKind::Continuous(ColorScale::Gray));
        assert!(matches!(
            classification.kind_of("Sill").unwrap(),
            FeatureKind::Discrete(_)
        ));
    }
}
