//! Feature value table keyed by wall section identifier.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WallmapError};

/// A single feature cell value.
///
/// Discrete and binary features carry integer codes, continuous features
/// floats. Missing values (empty cells or the `-` placeholder) are kept
/// explicit rather than defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
    Missing,
}

impl FeatureValue {
    /// Parse a cell as the survey sheets encode it: empty or `-`
    /// means missing, a decimal point means float, otherwise integer.
    pub fn parse(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.is_empty() || cell == "-" {
            return FeatureValue::Missing;
        }
        if cell.contains('.') {
            match cell.parse::<f64>() {
                Ok(v) => FeatureValue::Float(v),
                Err(_) => FeatureValue::Missing,
            }
        } else {
            match cell.parse::<i64>() {
                Ok(v) => FeatureValue::Int(v),
                Err(_) => FeatureValue::Missing,
            }
        }
    }

    /// Numeric view, if present.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Int(v) => Some(*v as f64),
            FeatureValue::Float(v) => Some(*v),
            FeatureValue::Missing => None,
        }
    }

    /// Integer code view for discrete/binary lookups. Floats are
    /// truncated toward zero.
    pub fn as_code(&self) -> Option<i64> {
        match self {
            FeatureValue::Int(v) => Some(*v),
            FeatureValue::Float(v) => Some(*v as i64),
            FeatureValue::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FeatureValue::Missing)
    }
}

/// Wide feature table: one row per wall identifier, one column per feature.
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    /// Feature column names, in file order (identifier column excluded).
    pub columns: Vec<String>,
    /// Row identifiers in file order.
    pub ids: Vec<String>,
    /// Row values, parallel to `ids`; each row parallel to `columns`.
    pub rows: Vec<Vec<FeatureValue>>,
    /// Identifier -> row index.
    index: HashMap<String, usize>,
}

impl FeatureTable {
    /// Build a table from parsed parts.
    pub fn new(columns: Vec<String>, ids: Vec<String>, rows: Vec<Vec<FeatureValue>>) -> Self {
        let index = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Self {
            columns,
            ids,
            rows,
            index,
        }
    }

    /// Column index for a feature name.
    pub fn column_index(&self, feature: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == feature)
    }

    /// Look up a value by wall identifier and feature name.
    ///
    /// A missing row or column is a join miss and fails explicitly.
    pub fn value(&self, id: &str, feature: &str) -> Result<FeatureValue> {
        let col = self
            .column_index(feature)
            .ok_or_else(|| WallmapError::JoinMiss {
                section: id.to_string(),
                feature: feature.to_string(),
            })?;
        let row = self.index.get(id).ok_or_else(|| WallmapError::JoinMiss {
            section: id.to_string(),
            feature: feature.to_string(),
        })?;
        Ok(self.rows[*row][col])
    }

    /// Whether an identifier has a row.
    pub fn contains_id(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All present (non-missing) numeric values of one feature column.
    pub fn column_values(&self, feature: &str) -> Vec<f64> {
        match self.column_index(feature) {
            Some(col) => self
                .rows
                .iter()
                .filter_map(|row| row[col].as_f64())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
