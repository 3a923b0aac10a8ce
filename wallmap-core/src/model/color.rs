//! Display colors and continuous color scales.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WallmapError};

/// Opaque RGB color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a new color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 128, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    /// Parse a color from a classification table cell.
    ///
    /// Accepts the named colors the classification tables use plus
    /// `#rrggbb` hex values.
    pub fn parse(s: &str) -> Result<Self> {
        let name = s.trim();
        if let Some(hex) = name.strip_prefix('#') {
            if hex.len() == 6 {
                let r = u8::from_str_radix(&hex[0..2], 16);
                let g = u8::from_str_radix(&hex[2..4], 16);
                let b = u8::from_str_radix(&hex[4..6], 16);
                if let (Ok(r), Ok(g), Ok(b)) = (r, g, b) {
                    return Ok(Rgb::new(r, g, b));
                }
            }
            return Err(WallmapError::BadColor {
                value: s.to_string(),
            });
        }

        match name.to_lowercase().as_str() {
            "white" => Ok(Rgb::new(255, 255, 255)),
            "black" => Ok(Rgb::new(0, 0, 0)),
            "red" => Ok(Rgb::new(255, 0, 0)),
            "green" => Ok(Rgb::new(0, 128, 0)),
            "lime" => Ok(Rgb::new(0, 255, 0)),
            "blue" => Ok(Rgb::new(0, 0, 255)),
            "yellow" => Ok(Rgb::new(255, 255, 0)),
            "orange" => Ok(Rgb::new(255, 165, 0)),
            "purple" => Ok(Rgb::new(128, 0, 128)),
            "cyan" => Ok(Rgb::new(0, 255, 255)),
            "magenta" => Ok(Rgb::new(255, 0, 255)),
            "gray" | "grey" => Ok(Rgb::new(128, 128, 128)),
            "lightgray" | "lightgrey" => Ok(Rgb::new(211, 211, 211)),
            "darkgray" | "darkgrey" => Ok(Rgb::new(64, 64, 64)),
            "brown" => Ok(Rgb::new(165, 42, 42)),
            "tan" => Ok(Rgb::new(210, 180, 140)),
            "pink" => Ok(Rgb::new(255, 192, 203)),
            "olive" => Ok(Rgb::new(128, 128, 0)),
            "navy" => Ok(Rgb::new(0, 0, 128)),
            "teal" => Ok(Rgb::new(0, 128, 128)),
            "maroon" => Ok(Rgb::new(128, 0, 0)),
            _ => Err(WallmapError::BadColor {
                value: s.to_string(),
            }),
        }
    }

    /// Convert to the image crate's pixel type.
    pub fn to_pixel(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

/// A named continuous gradient mapping a normalized value to a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorScale {
    /// Black (0.0) to white (1.0).
    Gray,
    /// Perceptually uniform dark-purple to yellow.
    Viridis,
    /// Diverging blue-white-red.
    Coolwarm,
}

impl ColorScale {
    /// Parse a scale name as written in the continuous classification table.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gray" | "grey" | "grayscale" | "greyscale" => Ok(ColorScale::Gray),
            "viridis" => Ok(ColorScale::Viridis),
            "coolwarm" => Ok(ColorScale::Coolwarm),
            _ => Err(WallmapError::UnknownColorScale {
                value: s.to_string(),
            }),
        }
    }

    /// Sample the scale at a normalized position, clamped to [0, 1].
    pub fn sample(&self, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        match self {
            ColorScale::Gray => {
                let v = (255.0 * t).round() as u8;
                Rgb::new(v, v, v)
            }
            ColorScale::Viridis => sample_stops(&VIRIDIS_STOPS, t),
            ColorScale::Coolwarm => sample_stops(&COOLWARM_STOPS, t),
        }
    }
}

impl std::fmt::Display for ColorScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorScale::Gray => write!(f, "gray"),
            ColorScale::Viridis => write!(f, "viridis"),
            ColorScale::Coolwarm => write!(f, "coolwarm"),
        }
    }
}

// Evenly spaced control points, linearly interpolated.
const VIRIDIS_STOPS: [[u8; 3]; 6] = [
    [68, 1, 84],
    [65, 68, 135],
    [42, 120, 142],
    [34, 168, 132],
    [122, 209, 81],
    [253, 231, 37],
];

const COOLWARM_STOPS: [[u8; 3]; 3] = [[59, 76, 192], [221, 221, 221], [180, 4, 38]];

fn sample_stops(stops: &[[u8; 3]], t: f64) -> Rgb {
    let last = stops.len() - 1;
    let pos = t * last as f64;
    let i = (pos.floor() as usize).min(last - 1);
    let frac = pos - i as f64;
    let a = stops[i];
    let b = stops[i + 1];
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
    Rgb::new(lerp(a[0], b[0]), lerp(a[1], b[1]), lerp(a[2], b[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(Rgb::parse("green").unwrap(), Rgb::new(0, 128, 0));
        assert_eq!(Rgb::parse(" Red ").unwrap(), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Rgb::parse("#10ff0a").unwrap(), Rgb::new(0x10, 0xff, 0x0a));
    }

    #[test]
    fn test_parse_bad_color() {
        assert!(Rgb::parse("chartreuse-ish").is_err());
        assert!(Rgb::parse("#12345").is_err());
    }

    #[test]
    fn test_gray_scale_endpoints() {
        assert_eq!(ColorScale::Gray.sample(0.0), Rgb::new(0, 0, 0));
        assert_eq!(ColorScale::Gray.sample(1.0), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_sample_clamps_out_of_range() {
        assert_eq!(ColorScale::Gray.sample(-0.5), Rgb::new(0, 0, 0));
        assert_eq!(ColorScale::Gray.sample(1.5), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_viridis_endpoints() {
        assert_eq!(ColorScale::Viridis.sample(0.0), Rgb::new(68, 1, 84));
        assert_eq!(ColorScale::Viridis.sample(1.0), Rgb::new(253, 231, 37));
    }

    #[test]
    fn test_parse_scale_names() {
        assert_eq!(ColorScale::parse("Gray").unwrap(), ColorScale::Gray);
        assert_eq!(ColorScale::parse("viridis").unwrap(), ColorScale::Viridis);
        assert!(ColorScale::parse("plasma").is_err());
    }
}
