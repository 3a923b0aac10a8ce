//! Geometry table serialization: one row per wall section, variable-length
//! point list blank-padded to the widest row.

use std::path::Path;

use crate::error::{Result, WallmapError};
use crate::model::{Point, WallSection};

/// Write sections to the geometry CSV format.
///
/// Header: `block name, point 1, ..., point N` where N is the maximum
/// point count over all sections; shorter rows leave trailing cells blank.
pub fn write_geometry_csv(sections: &[WallSection], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    write_geometry(sections, &mut writer)
}

/// Write sections to an open CSV writer.
pub fn write_geometry<W: std::io::Write>(
    sections: &[WallSection],
    writer: &mut csv::Writer<W>,
) -> Result<()> {
    let max_points = sections.iter().map(|s| s.points.len()).max().unwrap_or(0);

    let mut header = vec!["block name".to_string()];
    for i in 1..=max_points {
        header.push(format!("point {}", i));
    }
    writer.write_record(&header)?;

    for section in sections {
        let mut row = vec![section.name.clone()];
        for point in &section.points {
            row.push(point.to_string());
        }
        // Blank-pad to the header width.
        while row.len() < max_points + 1 {
            row.push(String::new());
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Read a geometry CSV back into wall sections.
///
/// The insertion offset is not stored in the tabular format, so read-back
/// sections carry a zero offset.
pub fn read_geometry_csv(path: &Path) -> Result<Vec<WallSection>> {
    if !path.exists() {
        return Err(WallmapError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    read_geometry(&mut reader)
}

/// Read sections from an open CSV reader.
pub fn read_geometry<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Vec<WallSection>> {
    let mut sections = Vec::new();

    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let Some(name) = record.get(0) else {
            continue;
        };
        if name.trim().is_empty() {
            continue;
        }

        let mut points = Vec::new();
        for (col, cell) in record.iter().enumerate().skip(1) {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            points.push(parse_point_cell(cell, row_idx + 2, col)?);
        }

        sections.push(WallSection::new(name.trim(), points, Point::default()));
    }

    Ok(sections)
}

/// Parse an `x, y` cell.
fn parse_point_cell(cell: &str, row: usize, col: usize) -> Result<Point> {
    let mut parts = cell.splitn(2, ',');
    let x = parts.next().map(str::trim).unwrap_or("");
    let y = parts.next().map(str::trim).unwrap_or("");
    match (x.parse::<f64>(), y.parse::<f64>()) {
        (Ok(x), Ok(y)) => Ok(Point::new(x, y)),
        _ => Err(WallmapError::CsvShape {
            row,
            message: format!("column {}: expected 'x, y' pair, got '{}'", col + 1, cell),
        }),
    }
}
