//! Pre-render validation of wall sections and feature joins.

use std::collections::HashSet;

use crate::error::{Result, WallmapError};
use crate::model::{FeatureTable, WallSection};

/// Validation result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Create a failing result with an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            errors: vec![message.into()],
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        if !other.passed {
            self.passed = false;
        }
    }
}

/// Validate extracted wall sections.
pub fn validate_sections(sections: &[WallSection]) -> Result<ValidationResult> {
    if sections.is_empty() {
        return Err(WallmapError::NoGeometry);
    }

    let mut result = ValidationResult::ok();
    let mut seen: HashSet<&str> = HashSet::new();

    for section in sections {
        if !seen.insert(section.name.as_str()) {
            result.add_error(format!("duplicate wall section name '{}'", section.name));
        }
        match section.points.len() {
            0 => result.add_error(format!("wall section '{}' has no points", section.name)),
            1 | 2 => result.add_warning(format!(
                "wall section '{}' has {} point(s); it will not be drawn",
                section.name,
                section.points.len()
            )),
            _ => {}
        }
    }

    Ok(result)
}

/// Check that geometry and feature table join cleanly.
///
/// Sections without a feature row are errors in strict mode and warnings
/// otherwise; feature rows without geometry are always warnings.
pub fn validate_join(
    sections: &[WallSection],
    features: &FeatureTable,
    strict: bool,
) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for section in sections {
        if !features.contains_id(&section.name) {
            let message = format!(
                "wall section '{}' has no row in the feature table",
                section.name
            );
            if strict {
                result.add_error(message);
            } else {
                result.add_warning(message);
            }
        }
    }

    let section_names: HashSet<&str> = sections.iter().map(|s| s.name.as_str()).collect();
    for id in &features.ids {
        if !section_names.contains(id.as_str()) {
            result.add_warning(format!("feature row '{}' has no geometry", id));
        }
    }

    result
}

/// Validate sections and join, logging findings.
pub fn validate_for_render(
    sections: &[WallSection],
    features: &FeatureTable,
    strict: bool,
) -> Result<ValidationResult> {
    let mut result = validate_sections(sections)?;
    result.merge(validate_join(sections, features, strict));

    for warning in &result.warnings {
        tracing::warn!("{}", warning);
    }
    for error in &result.errors {
        tracing::error!("{}", error);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeatureValue, Point};
    use pretty_assertions::assert_eq;

    fn section(name: &str, n_points: usize) -> WallSection {
        let points = (0..n_points)
            .map(|i| Point::new(i as f64, (i * i) as f64))
            .collect();
        WallSection::new(name, points, Point::default())
    }

    fn features_for(ids: &[&str]) -> FeatureTable {
        FeatureTable::new(
            vec!["Sill".to_string()],
            ids.iter().map(|s| s.to_string()).collect(),
            ids.iter().map(|_| vec![FeatureValue::Int(0)]).collect(),
        )
    }

    #[test]
    fn test_validation_result_ok() {
        let result = ValidationResult::ok();
        assert!(result.passed);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validation_result_add_warning_keeps_passed() {
        let mut result = ValidationResult::ok();
        result.add_warning("something minor");
        assert!(result.passed);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_validation_result_add_error_fails() {
        let mut result = ValidationResult::ok();
        result.add_error("something fatal");
        assert!(!result.passed);
    }

    #[test]
    fn test_validation_result_merge() {
        let mut a = ValidationResult::ok();
        a.add_warning("w1");
        let mut b = ValidationResult::ok();
        b.add_error("e1");
        b.add_warning("w2");
        a.merge(b);
        assert!(!a.passed);
        assert_eq!(a.warnings.len(), 2);
        assert_eq!(a.errors.len(), 1);
    }

    #[test]
    fn test_empty_sections_is_error() {
        assert!(matches!(
            validate_sections(&[]),
            Err(WallmapError::NoGeometry)
        ));
    }

    #[test]
    fn test_thin_section_warns() {
        let result = validate_sections(&[section("WALL_A", 2), section("WALL_B", 4)]).unwrap();
        assert!(result.passed);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("WALL_A"));
    }

    #[test]
    fn test_zero_point_section_fails() {
        let result = validate_sections(&[section("WALL_A", 0)]).unwrap();
        assert!(!result.passed);
    }

    #[test]
    fn test_duplicate_names_fail() {
        let result = validate_sections(&[section("WALL_A", 4), section("WALL_A", 4)]).unwrap();
        assert!(!result.passed);
        assert!(result.errors[0].contains("duplicate"));
    }

    #[test]
    fn test_join_miss_strictness() {
        let sections = vec![section("WALL_A", 4), section("WALL_B", 4)];
        let features = features_for(&["WALL_A", "WALL_C"]);

        let lenient = validate_join(&sections, &features, false);
        assert!(lenient.passed);
        assert_eq!(lenient.warnings.len(), 2);

        let strict = validate_join(&sections, &features, true);
        assert!(!strict.passed);
        assert_eq!(strict.errors.len(), 1);
        assert!(strict.errors[0].contains("WALL_B"));
    }

    #[test]
    fn test_clean_join_passes() {
        let sections = vec![section("WALL_A", 4)];
        let features = features_for(&["WALL_A"]);
        let result = validate_for_render(&sections, &features, true).unwrap();
        assert!(result.passed);
        assert!(result.warnings.is_empty());
    }
}
