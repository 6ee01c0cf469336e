//! Colors and color lookups keyed by an integer (a target number, a level).
//!
//! Two lookups exist: a fixed palette indexed modulo its length, and a table of
//! inclusive integer ranges where the first matching band wins.

use serde::{Deserialize, Serialize};

/// RGBA color (components 0.0 - 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl VectorColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Component-wise linear blend; `t` is clamped to [0, 1].
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    pub const GRAY: Self = Self::rgb(0.5, 0.5, 0.5);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

impl Default for VectorColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Palette used when a level does not bring its own colors.
/// Same hue order as the arc/segment colors of the effects atlas.
pub const DEFAULT_PALETTE: [VectorColor; 12] = [
    VectorColor::rgb(0.93, 0.20, 0.20), // red
    VectorColor::rgb(0.98, 0.55, 0.10), // orange
    VectorColor::rgb(0.98, 0.85, 0.15), // yellow
    VectorColor::rgb(0.60, 0.90, 0.20), // lime
    VectorColor::rgb(0.20, 0.80, 0.30), // green
    VectorColor::rgb(0.15, 0.80, 0.65), // green-cyan
    VectorColor::rgb(0.15, 0.80, 0.95), // cyan
    VectorColor::rgb(0.35, 0.60, 1.00), // sky blue
    VectorColor::rgb(0.20, 0.30, 0.95), // blue
    VectorColor::rgb(0.45, 0.25, 0.85), // indigo
    VectorColor::rgb(0.85, 0.25, 0.85), // magenta
    VectorColor::rgb(0.98, 0.50, 0.70), // pink
];

/// One inclusive band `[start, end]` of a [`ColorRanges`] table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRange {
    pub color: VectorColor,
    pub start: i32,
    pub end: i32,
}

impl ColorRange {
    pub fn contains(&self, value: i32) -> bool {
        value >= self.start && value <= self.end
    }
}

/// Range-banded color table. Bands may overlap; the first match wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorRanges {
    ranges: Vec<ColorRange>,
}

impl ColorRanges {
    pub fn new(ranges: Vec<ColorRange>) -> Self {
        Self { ranges }
    }

    pub fn push(&mut self, color: VectorColor, start: i32, end: i32) {
        if start > end {
            log::warn!("Color range [{}, {}] is empty and will never match", start, end);
        }
        self.ranges.push(ColorRange { color, start, end });
    }

    /// Color of the first band containing `value`, white when none does.
    pub fn color_for(&self, value: i32) -> VectorColor {
        self.ranges
            .iter()
            .find(|r| r.contains(value))
            .map(|r| r.color)
            .unwrap_or(VectorColor::WHITE)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// How a game turns a number into a display color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ColorLookup {
    /// `colors[n % colors.len()]`; an empty list falls back to [`DEFAULT_PALETTE`].
    Palette {
        #[serde(default)]
        colors: Vec<VectorColor>,
    },
    /// First matching inclusive range; white if none match.
    Ranges { ranges: ColorRanges },
}

impl Default for ColorLookup {
    fn default() -> Self {
        ColorLookup::Palette { colors: Vec::new() }
    }
}

impl ColorLookup {
    pub fn color_for(&self, value: u32) -> VectorColor {
        match self {
            ColorLookup::Palette { colors } => {
                let colors: &[VectorColor] = if colors.is_empty() { &DEFAULT_PALETTE } else { colors };
                colors[value as usize % colors.len()]
            }
            ColorLookup::Ranges { ranges } => {
                ranges.color_for(i32::try_from(value).unwrap_or(i32::MAX))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps_around() {
        let lookup = ColorLookup::Palette {
            colors: vec![VectorColor::RED, VectorColor::GREEN, VectorColor::BLUE],
        };
        assert_eq!(lookup.color_for(0), VectorColor::RED);
        assert_eq!(lookup.color_for(4), VectorColor::GREEN);
        assert_eq!(lookup.color_for(5), VectorColor::BLUE);
    }

    #[test]
    fn empty_palette_uses_default() {
        let lookup = ColorLookup::default();
        assert_eq!(lookup.color_for(1), DEFAULT_PALETTE[1]);
        assert_eq!(lookup.color_for(13), DEFAULT_PALETTE[1]);
    }

    #[test]
    fn ranges_first_match_wins_inclusive() {
        let mut ranges = ColorRanges::default();
        ranges.push(VectorColor::RED, 1, 3);
        ranges.push(VectorColor::BLUE, 3, 6);
        assert_eq!(ranges.color_for(1), VectorColor::RED);
        assert_eq!(ranges.color_for(3), VectorColor::RED);
        assert_eq!(ranges.color_for(4), VectorColor::BLUE);
        assert_eq!(ranges.color_for(6), VectorColor::BLUE);
    }

    #[test]
    fn ranges_default_to_white() {
        let ranges = ColorRanges::new(vec![ColorRange { color: VectorColor::RED, start: 1, end: 2 }]);
        assert_eq!(ranges.color_for(0), VectorColor::WHITE);
        assert_eq!(ranges.color_for(99), VectorColor::WHITE);
        assert_eq!(ColorRanges::default().color_for(1), VectorColor::WHITE);
    }

    #[test]
    fn ranges_from_json() {
        let json = r#"[
            { "color": { "r": 1.0, "g": 0.0, "b": 0.0 }, "start": 1, "end": 5 },
            { "color": { "r": 0.0, "g": 0.0, "b": 1.0, "a": 0.5 }, "start": 6, "end": 10 }
        ]"#;
        let ranges = ColorRanges::from_json(json).unwrap();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges.color_for(2), VectorColor::RED);
        assert_eq!(ranges.color_for(7).a, 0.5);
    }

    #[test]
    fn lookup_mode_from_json() {
        let lookup: ColorLookup = serde_json::from_str(
            r#"{ "mode": "ranges", "ranges": [ { "color": { "r": 0, "g": 1, "b": 0 }, "start": 1, "end": 1 } ] }"#,
        )
        .unwrap();
        assert_eq!(lookup.color_for(1), VectorColor::GREEN);
        assert_eq!(lookup.color_for(2), VectorColor::WHITE);
    }

    #[test]
    fn lerp_clamps() {
        let mid = VectorColor::BLACK.lerp(VectorColor::WHITE, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert_eq!(VectorColor::BLACK.lerp(VectorColor::WHITE, 2.0), VectorColor::WHITE);
    }
}
