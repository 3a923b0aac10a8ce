//! ASCII DXF reader for block definitions and block references.
//!
//! Reads just enough of the drawing-exchange format for wall extraction:
//! BLOCK entities with their LWPOLYLINE/POLYLINE outlines, and INSERT
//! references with insertion points. Everything else is skipped.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WallmapError};
use crate::model::Point;

/// One group code / value pair with its source line for diagnostics.
#[derive(Debug, Clone)]
struct GroupPair {
    code: i32,
    value: String,
    line: usize,
}

/// A polyline outline in block-local coordinates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Polyline {
    pub vertices: Vec<Point>,
    pub closed: bool,
}

/// A named block definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockDef {
    pub name: String,
    pub polylines: Vec<Polyline>,
}

impl BlockDef {
    /// Total vertex count across all polylines.
    pub fn vertex_count(&self) -> usize {
        self.polylines.iter().map(|p| p.vertices.len()).sum()
    }
}

/// A block reference placing a definition at an absolute insertion point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Insert {
    pub name: String,
    pub at: Point,
    /// Rotation in degrees. Parsed but not applied by extraction.
    pub rotation: f64,
    /// X/Y scale factors. Parsed but not applied by extraction.
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Insert {
    /// Whether the reference carries a transform extraction ignores.
    pub fn has_unapplied_transform(&self) -> bool {
        self.rotation != 0.0 || self.scale_x != 1.0 || self.scale_y != 1.0
    }
}

/// Parsed drawing content relevant to wall extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Drawing {
    /// Block definitions by name.
    pub blocks: BTreeMap<String, BlockDef>,
    /// Block references in model space, in file order.
    pub inserts: Vec<Insert>,
}

/// DXF file parser.
#[derive(Debug)]
pub struct DxfParser {
    pairs: Vec<GroupPair>,
}

impl DxfParser {
    /// Create a parser from file content.
    pub fn new(content: &str) -> Result<Self> {
        let pairs = Self::read_pairs(content)?;
        Ok(Self { pairs })
    }

    /// Split the content into group code / value pairs.
    fn read_pairs(content: &str) -> Result<Vec<GroupPair>> {
        let mut pairs = Vec::new();
        let mut lines = content.lines().enumerate();

        while let Some((line_no, code_line)) = lines.next() {
            let code_str = code_line.trim();
            let code = code_str
                .parse::<i32>()
                .map_err(|_| WallmapError::DxfParse {
                    line: line_no + 1,
                    message: format!("expected group code, got '{}'", code_str),
                })?;
            let Some((_, value_line)) = lines.next() else {
                return Err(WallmapError::DxfParse {
                    line: line_no + 1,
                    message: format!("group code {} has no value line", code),
                });
            };
            // Group values keep interior whitespace; DXF names are trimmed.
            pairs.push(GroupPair {
                code,
                value: value_line.trim().to_string(),
                line: line_no + 1,
            });
        }

        Ok(pairs)
    }

    /// Find the pair index range of a named section, excluding the
    /// SECTION/name/ENDSEC markers.
    fn section_range(&self, name: &str) -> Option<(usize, usize)> {
        let mut i = 0;
        while i + 1 < self.pairs.len() {
            if self.pairs[i].code == 0 && self.pairs[i].value == "SECTION" {
                let header = &self.pairs[i + 1];
                if header.code == 2 && header.value == name {
                    let start = i + 2;
                    let mut end = start;
                    while end < self.pairs.len()
                        && !(self.pairs[end].code == 0 && self.pairs[end].value == "ENDSEC")
                    {
                        end += 1;
                    }
                    return Some((start, end));
                }
            }
            i += 1;
        }
        None
    }

    /// Parse the whole drawing.
    pub fn parse(&self) -> Result<Drawing> {
        let blocks = self.parse_blocks()?;
        let inserts = self.parse_inserts()?;
        Ok(Drawing { blocks, inserts })
    }

    /// Parse the BLOCKS section into named definitions.
    fn parse_blocks(&self) -> Result<BTreeMap<String, BlockDef>> {
        let Some((start, end)) = self.section_range("BLOCKS") else {
            return Err(WallmapError::MissingSection {
                section: "BLOCKS".to_string(),
            });
        };

        let mut blocks = BTreeMap::new();
        let mut i = start;

        while i < end {
            let pair = &self.pairs[i];
            if pair.code == 0 && pair.value == "BLOCK" {
                let (block, next) = self.parse_block(i + 1, end)?;
                // Layout blocks (*Model_Space etc.) carry no wall geometry.
                if !block.name.starts_with('*') {
                    blocks.insert(block.name.clone(), block);
                }
                i = next;
            } else {
                i += 1;
            }
        }

        Ok(blocks)
    }

    /// Parse one BLOCK entity starting just after its 0/BLOCK pair.
    /// Returns the definition and the index past its ENDBLK.
    fn parse_block(&self, start: usize, end: usize) -> Result<(BlockDef, usize)> {
        let mut block = BlockDef::default();
        let mut i = start;

        // Header groups up to the first contained entity.
        while i < end && self.pairs[i].code != 0 {
            if self.pairs[i].code == 2 {
                block.name = self.pairs[i].value.clone();
            }
            i += 1;
        }

        while i < end {
            let pair = &self.pairs[i];
            if pair.code != 0 {
                i += 1;
                continue;
            }
            match pair.value.as_str() {
                "ENDBLK" => return Ok((block, i + 1)),
                "LWPOLYLINE" => {
                    let (polyline, next) = self.parse_lwpolyline(i + 1, end)?;
                    block.polylines.push(polyline);
                    i = next;
                }
                "POLYLINE" => {
                    let (polyline, next) = self.parse_polyline(i + 1, end)?;
                    block.polylines.push(polyline);
                    i = next;
                }
                _ => i += 1,
            }
        }

        Err(WallmapError::DxfParse {
            line: self.pairs[start.min(self.pairs.len() - 1)].line,
            message: format!("block '{}' has no ENDBLK", block.name),
        })
    }

    /// Parse an LWPOLYLINE's vertex groups (repeated 10/20 pairs).
    /// Returns the polyline and the index of the next 0-group.
    fn parse_lwpolyline(&self, start: usize, end: usize) -> Result<(Polyline, usize)> {
        let mut polyline = Polyline::default();
        let mut pending_x: Option<f64> = None;
        let mut i = start;

        while i < end && self.pairs[i].code != 0 {
            let pair = &self.pairs[i];
            match pair.code {
                10 => {
                    if pending_x.is_some() {
                        return Err(WallmapError::DxfParse {
                            line: pair.line,
                            message: "vertex X group without matching Y".to_string(),
                        });
                    }
                    pending_x = Some(self.parse_f64(pair)?);
                }
                20 => {
                    let x = pending_x.take().ok_or_else(|| WallmapError::DxfParse {
                        line: pair.line,
                        message: "vertex Y group without preceding X".to_string(),
                    })?;
                    polyline.vertices.push(Point::new(x, self.parse_f64(pair)?));
                }
                70 => {
                    let flags = self.parse_f64(pair)? as i64;
                    polyline.closed = flags & 1 != 0;
                }
                _ => {}
            }
            i += 1;
        }

        Ok((polyline, i))
    }

    /// Parse a legacy POLYLINE/VERTEX/SEQEND chain.
    fn parse_polyline(&self, start: usize, end: usize) -> Result<(Polyline, usize)> {
        let mut polyline = Polyline::default();
        let mut i = start;

        // POLYLINE header groups.
        while i < end && self.pairs[i].code != 0 {
            if self.pairs[i].code == 70 {
                let flags = self.parse_f64(&self.pairs[i])? as i64;
                polyline.closed = flags & 1 != 0;
            }
            i += 1;
        }

        while i < end {
            let pair = &self.pairs[i];
            if pair.code == 0 {
                match pair.value.as_str() {
                    "VERTEX" => {
                        let mut x = 0.0;
                        let mut y = 0.0;
                        i += 1;
                        while i < end && self.pairs[i].code != 0 {
                            match self.pairs[i].code {
                                10 => x = self.parse_f64(&self.pairs[i])?,
                                20 => y = self.parse_f64(&self.pairs[i])?,
                                _ => {}
                            }
                            i += 1;
                        }
                        polyline.vertices.push(Point::new(x, y));
                        continue;
                    }
                    "SEQEND" => {
                        // Skip past SEQEND's own groups.
                        i += 1;
                        while i < end && self.pairs[i].code != 0 {
                            i += 1;
                        }
                        return Ok((polyline, i));
                    }
                    _ => return Ok((polyline, i)),
                }
            }
            i += 1;
        }

        Ok((polyline, i))
    }

    /// Parse the ENTITIES section's INSERT references.
    fn parse_inserts(&self) -> Result<Vec<Insert>> {
        let Some((start, end)) = self.section_range("ENTITIES") else {
            return Err(WallmapError::MissingSection {
                section: "ENTITIES".to_string(),
            });
        };

        let mut inserts = Vec::new();
        let mut i = start;

        while i < end {
            let pair = &self.pairs[i];
            if pair.code == 0 && pair.value == "INSERT" {
                let mut insert = Insert {
                    scale_x: 1.0,
                    scale_y: 1.0,
                    ..Default::default()
                };
                i += 1;
                while i < end && self.pairs[i].code != 0 {
                    let p = &self.pairs[i];
                    match p.code {
                        2 => insert.name = p.value.clone(),
                        10 => insert.at.x = self.parse_f64(p)?,
                        20 => insert.at.y = self.parse_f64(p)?,
                        41 => insert.scale_x = self.parse_f64(p)?,
                        42 => insert.scale_y = self.parse_f64(p)?,
                        50 => insert.rotation = self.parse_f64(p)?,
                        _ => {}
                    }
                    i += 1;
                }
                if insert.name.is_empty() {
                    return Err(WallmapError::DxfParse {
                        line: pair.line,
                        message: "INSERT without a block name".to_string(),
                    });
                }
                inserts.push(insert);
            } else {
                i += 1;
            }
        }

        Ok(inserts)
    }

    fn parse_f64(&self, pair: &GroupPair) -> Result<f64> {
        pair.value
            .trim()
            .parse::<f64>()
            .map_err(|_| WallmapError::DxfParse {
                line: pair.line,
                message: format!("invalid numeric value '{}'", pair.value),
            })
    }
}

/// Parse a DXF file from a path.
pub fn parse_dxf_file(path: &Path) -> Result<Drawing> {
    use std::fs;

    if !path.exists() {
        return Err(WallmapError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(WallmapError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let parser = DxfParser::new(&content)?;
    parser.parse()
}
