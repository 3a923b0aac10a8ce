//! Block-reference resolution: drawing -> named wall-section polygons.

use std::collections::HashMap;

use crate::config::DuplicatePolicy;
use crate::error::{Result, WallmapError};
use crate::model::{Point, WallSection};
use crate::parser::Drawing;

/// Extraction options.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// How to handle a block name appearing on multiple references.
    pub on_duplicate: DuplicatePolicy,
}

/// Per-run record of what extraction skipped and why.
#[derive(Debug, Default)]
pub struct ExtractSummary {
    /// Sections extracted.
    pub extracted: usize,
    /// (block name, reason) pairs for skipped references.
    pub skipped: Vec<(String, String)>,
}

impl ExtractSummary {
    /// Log the summary at the end of a run.
    pub fn report(&self) {
        tracing::info!("extracted {} wall section(s)", self.extracted);
        for (name, reason) in &self.skipped {
            tracing::warn!("skipped '{}': {}", name, reason);
        }
    }
}

/// Resolve every block reference to an absolute-coordinate wall section.
///
/// Section order follows the first appearance of each block name in the
/// drawing's entity list. References to undefined blocks are reported and
/// skipped; empty definitions still produce a (zero-point) section so the
/// caller can filter or report them.
pub fn extract_sections(
    drawing: &Drawing,
    options: &ExtractOptions,
) -> Result<(Vec<WallSection>, ExtractSummary)> {
    let mut sections: Vec<WallSection> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut summary = ExtractSummary::default();

    for insert in &drawing.inserts {
        let Some(block) = drawing.blocks.get(&insert.name) else {
            summary
                .skipped
                .push((insert.name.clone(), "no block definition".to_string()));
            continue;
        };

        if insert.has_unapplied_transform() {
            tracing::warn!(
                "block reference '{}' has rotation/scale, which extraction does not apply",
                insert.name
            );
        }

        let points = translate_block_points(block, insert.at);

        match by_name.get(&insert.name) {
            None => {
                by_name.insert(insert.name.clone(), sections.len());
                sections.push(WallSection::new(insert.name.clone(), points, insert.at));
            }
            Some(&idx) => match options.on_duplicate {
                DuplicatePolicy::LastWins => {
                    sections[idx] = WallSection::new(insert.name.clone(), points, insert.at);
                }
                DuplicatePolicy::FirstWins => {
                    summary.skipped.push((
                        insert.name.clone(),
                        "duplicate reference (first-wins)".to_string(),
                    ));
                }
                DuplicatePolicy::Merge => {
                    sections[idx].points.extend(points);
                }
                DuplicatePolicy::FailFast => {
                    return Err(WallmapError::DuplicateBlock {
                        name: insert.name.clone(),
                    });
                }
            },
        }
    }

    summary.extracted = sections.len();
    Ok((sections, summary))
}

/// Translate every polyline vertex of a block by the insertion point.
fn translate_block_points(block: &crate::parser::BlockDef, at: Point) -> Vec<Point> {
    let mut points = Vec::with_capacity(block.vertex_count());
    for polyline in &block.polylines {
        points.extend(polyline.vertices.iter().map(|v| v.translated(at.x, at.y)));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{BlockDef, Insert, Polyline};
    use pretty_assertions::assert_eq;

    fn unit_square_block(name: &str) -> BlockDef {
        BlockDef {
            name: name.to_string(),
            polylines: vec![Polyline {
                vertices: vec![
                    Point::new(0.0, 0.0),
                    Point::new(1.0, 0.0),
                    Point::new(1.0, 1.0),
                    Point::new(0.0, 1.0),
                ],
                closed: true,
            }],
        }
    }

    fn insert(name: &str, x: f64, y: f64) -> Insert {
        Insert {
            name: name.to_string(),
            at: Point::new(x, y),
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    fn drawing_with(blocks: Vec<BlockDef>, inserts: Vec<Insert>) -> Drawing {
        Drawing {
            blocks: blocks.into_iter().map(|b| (b.name.clone(), b)).collect(),
            inserts,
        }
    }

    #[test]
    fn test_translation_by_insertion_point() {
        let drawing = drawing_with(
            vec![unit_square_block("WALL_A")],
            vec![insert("WALL_A", 10.0, 10.0)],
        );
        let (sections, summary) =
            extract_sections(&drawing, &ExtractOptions::default()).unwrap();

        assert_eq!(summary.extracted, 1);
        let expected = [
            Point::new(10.0, 10.0),
            Point::new(11.0, 10.0),
            Point::new(11.0, 11.0),
            Point::new(10.0, 11.0),
        ];
        for (p, e) in sections[0].points.iter().zip(expected.iter()) {
            assert!(p.approx_eq(e));
        }
    }

    #[test]
    fn test_round_trip_recovers_local_polygon() {
        let block = unit_square_block("WALL_A");
        let local = block.polylines[0].vertices.clone();
        let drawing = drawing_with(vec![block], vec![insert("WALL_A", -7.5, 42.25)]);

        let (sections, _) = extract_sections(&drawing, &ExtractOptions::default()).unwrap();
        let recovered = sections[0].local_points();
        for (p, e) in recovered.iter().zip(local.iter()) {
            assert!(p.approx_eq(e));
        }
    }

    #[test]
    fn test_missing_definition_skipped_and_reported() {
        let drawing = drawing_with(vec![], vec![insert("GHOST", 0.0, 0.0)]);
        let (sections, summary) =
            extract_sections(&drawing, &ExtractOptions::default()).unwrap();
        assert!(sections.is_empty());
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].0, "GHOST");
    }

    #[test]
    fn test_duplicate_last_wins() {
        let drawing = drawing_with(
            vec![unit_square_block("W")],
            vec![insert("W", 0.0, 0.0), insert("W", 100.0, 0.0)],
        );
        let (sections, _) = extract_sections(&drawing, &ExtractOptions::default()).unwrap();
        assert_eq!(sections.len(), 1);
        assert!(sections[0].points[0].approx_eq(&Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_duplicate_first_wins() {
        let drawing = drawing_with(
            vec![unit_square_block("W")],
            vec![insert("W", 0.0, 0.0), insert("W", 100.0, 0.0)],
        );
        let options = ExtractOptions {
            on_duplicate: DuplicatePolicy::FirstWins,
        };
        let (sections, summary) = extract_sections(&drawing, &options).unwrap();
        assert!(sections[0].points[0].approx_eq(&Point::new(0.0, 0.0)));
        assert_eq!(summary.skipped.len(), 1);
    }

    #[test]
    fn test_duplicate_merge_appends() {
        let drawing = drawing_with(
            vec![unit_square_block("W")],
            vec![insert("W", 0.0, 0.0), insert("W", 100.0, 0.0)],
        );
        let options = ExtractOptions {
            on_duplicate: DuplicatePolicy::Merge,
        };
        let (sections, _) = extract_sections(&drawing, &options).unwrap();
        assert_eq!(sections[0].points.len(), 8);
    }

    #[test]
    fn test_duplicate_fail_fast() {
        let drawing = drawing_with(
            vec![unit_square_block("W")],
            vec![insert("W", 0.0, 0.0), insert("W", 100.0, 0.0)],
        );
        let options = ExtractOptions {
            on_duplicate: DuplicatePolicy::FailFast,
        };
        let err = extract_sections(&drawing, &options).unwrap_err();
        assert!(matches!(err, WallmapError::DuplicateBlock { .. }));
    }

    #[test]
    fn test_empty_block_yields_zero_point_section() {
        let drawing = drawing_with(
            vec![BlockDef {
                name: "EMPTY".to_string(),
                polylines: vec![],
            }],
            vec![insert("EMPTY", 5.0, 5.0)],
        );
        let (sections, _) = extract_sections(&drawing, &ExtractOptions::default()).unwrap();
        assert_eq!(sections.len(), 1);
        assert!(sections[0].points.is_empty());
    }
}
