//! Feature value table loading.

use std::path::Path;

use crate::error::{Result, WallmapError};
use crate::model::{FeatureTable, FeatureValue};

/// Load a wide feature CSV: identifier column first, then one numeric
/// column per feature.
pub fn read_feature_table(path: &Path) -> Result<FeatureTable> {
    if !path.exists() {
        return Err(WallmapError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut reader = csv::Reader::from_path(path)?;
    read_features(&mut reader)
}

/// Read a feature table from an open CSV reader.
pub fn read_features<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<FeatureTable> {
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(WallmapError::CsvShape {
            row: 1,
            message: "feature table has no columns".to_string(),
        });
    }
    let columns: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();

    let mut ids = Vec::new();
    let mut rows = Vec::new();

    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let Some(id) = record.get(0) else {
            continue;
        };
        if record.len() != columns.len() + 1 {
            return Err(WallmapError::CsvShape {
                row: row_idx + 2,
                message: format!(
                    "expected {} columns, got {}",
                    columns.len() + 1,
                    record.len()
                ),
            });
        }
        ids.push(id.trim().to_string());
        rows.push(record.iter().skip(1).map(FeatureValue::parse).collect());
    }

    Ok(FeatureTable::new(columns, ids, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_feature_table() {
        let data = "Wall ID,Sill 1,Height\nWALL_A,0,2.5\nWALL_B,1,-\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let table = read_features(&mut reader).unwrap();

        assert_eq!(table.columns, vec!["Sill 1", "Height"]);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.value("WALL_A", "Height").unwrap(),
            FeatureValue::Float(2.5)
        );
        assert!(table.value("WALL_B", "Height").unwrap().is_missing());
    }

    #[test]
    fn test_column_count_mismatch_reported() {
        let data = "Wall ID,Sill 1,Height\nWALL_A,0\n";
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(data.as_bytes());
        let err = read_features(&mut reader).unwrap_err();
        assert!(matches!(err, WallmapError::CsvShape { row: 2, .. }));
    }
}
