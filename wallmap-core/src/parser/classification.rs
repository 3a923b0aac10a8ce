//! Classification table loading.
//!
//! Three auxiliary tables feed the [`FeatureClassification`] structure:
//! - discrete: feature name followed by repeating value/color/legend triples,
//! - continuous: feature name and a color-scale name,
//! - binary: feature name followed by one color per class code.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Result, WallmapError};
use crate::model::{ClassEntry, ColorScale, FeatureClassification, FeatureKind, Rgb};

/// Load the combined classification from up to three table files.
/// Registration order fixes the lookup precedence: discrete, continuous,
/// binary.
pub fn load_classification(
    discrete: Option<&Path>,
    continuous: Option<&Path>,
    binary: Option<&Path>,
) -> Result<FeatureClassification> {
    let mut classification = FeatureClassification::default();

    if let Some(path) = discrete {
        load_discrete(path, &mut classification)?;
    }
    if let Some(path) = continuous {
        load_continuous(path, &mut classification)?;
    }
    if let Some(path) = binary {
        load_binary(path, &mut classification)?;
    }

    Ok(classification)
}

/// Discrete table: header row, then `feature, v1, color1, legend1, v2, ...`
/// with trailing blanks allowed.
pub fn load_discrete(path: &Path, out: &mut FeatureClassification) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let Some(feature) = record.get(0) else {
            continue;
        };
        let feature = feature.trim();
        if feature.is_empty() {
            continue;
        }

        let mut values = BTreeMap::new();
        let cells: Vec<&str> = record.iter().skip(1).collect();
        for triple in cells.chunks(3) {
            let value_cell = triple[0].trim();
            if value_cell.is_empty() {
                continue;
            }
            if triple.len() < 3 {
                return Err(WallmapError::CsvShape {
                    row: row_idx + 2,
                    message: format!(
                        "discrete feature '{}' has an incomplete value/color/legend triple",
                        feature
                    ),
                });
            }
            let value = value_cell
                .parse::<i64>()
                .map_err(|_| WallmapError::CsvShape {
                    row: row_idx + 2,
                    message: format!("invalid discrete value '{}'", value_cell),
                })?;
            values.insert(
                value,
                ClassEntry {
                    color: Rgb::parse(triple[1])?,
                    legend: triple[2].trim().to_string(),
                },
            );
        }
        out.insert(feature, FeatureKind::Discrete(values));
    }
    Ok(())
}

/// Continuous table: `feature, colorscale` rows, header optional.
pub fn load_continuous(path: &Path, out: &mut FeatureClassification) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    for record in reader.records() {
        let record = record?;
        let Some(feature) = record.get(0) else {
            continue;
        };
        let feature = feature.trim();
        let scale = record.get(1).map(str::trim).unwrap_or("");
        if feature.is_empty() {
            continue;
        }
        // Tolerate a header row.
        if feature.eq_ignore_ascii_case("label") && scale.eq_ignore_ascii_case("colorscale") {
            continue;
        }
        out.insert(feature, FeatureKind::Continuous(ColorScale::parse(scale)?));
    }
    Ok(())
}

/// Binary table: headerless `feature, color_for_0, color_for_1, ...` rows.
pub fn load_binary(path: &Path, out: &mut FeatureClassification) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    for record in reader.records() {
        let record = record?;
        let Some(feature) = record.get(0) else {
            continue;
        };
        let feature = feature.trim();
        if feature.is_empty() {
            continue;
        }

        let mut values = BTreeMap::new();
        for (i, cell) in record.iter().enumerate().skip(1) {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            values.insert((i - 1) as i64, Rgb::parse(cell)?);
        }
        out.insert(feature, FeatureKind::Binary(values));
    }
    Ok(())
}
