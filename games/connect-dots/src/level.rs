use glam::Vec2;
use serde::{Deserialize, Serialize};
use tapline_engine::Region;

use crate::config::{ConnectConfig, ConnectError};
use crate::dots::{DotDef, DotRegistry};

/// A connect-the-dots level: dot positions, one drawing zone per gap, and
/// tuning. Loaded from JSON at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelManifest {
    pub dots: Vec<DotDef>,
    /// `zones[i]` is the zone between dot `i + 1` and dot `i + 2`.
    #[serde(default)]
    pub zones: Vec<Region>,
    #[serde(default)]
    pub config: ConnectConfig,
}

impl LevelManifest {
    /// Parse and validate a level.
    pub fn from_json(json: &str) -> Result<Self, ConnectError> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn validate(&self) -> Result<(), ConnectError> {
        let registry = DotRegistry::from_defs(&self.dots)?;
        if registry.len() < 2 {
            return Err(ConnectError::DotNotFound(2));
        }
        if !self.zones.is_empty() && self.zones.len() + 1 < registry.len() {
            log::warn!(
                "Level has {} zones for {} dots; later segments are unconstrained",
                self.zones.len(),
                registry.len()
            );
        }
        Ok(())
    }

    /// Sequence of dots at `points`, with a corridor zone around every gap.
    pub fn with_corridors(points: &[Vec2], half_width: f32, config: ConnectConfig) -> Self {
        let dots = points
            .iter()
            .enumerate()
            .map(|(i, p)| DotDef {
                number: i as u32 + 1,
                x: p.x,
                y: p.y,
                radius: 0.35,
            })
            .collect();
        let zones = points
            .windows(2)
            .map(|w| corridor(w[0], w[1], half_width))
            .collect();
        Self { dots, zones, config }
    }
}

/// Rectangle of `half_width` around the segment `a`-`b`, padded past both ends.
pub fn corridor(a: Vec2, b: Vec2, half_width: f32) -> Region {
    let dir = (b - a).normalize_or_zero();
    let side = dir.perp() * half_width;
    let a = a - dir * half_width;
    let b = b + dir * half_width;
    Region::polygon(vec![a - side, b - side, b + side, a + side])
}

impl Default for LevelManifest {
    /// A house outline of five dots.
    fn default() -> Self {
        let points = [
            Vec2::new(-4.0, -3.0),
            Vec2::new(-4.0, 1.0),
            Vec2::new(0.0, 3.5),
            Vec2::new(4.0, 1.0),
            Vec2::new(4.0, -3.0),
        ];
        Self::with_corridors(&points, 0.9, ConnectConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_valid() {
        let level = LevelManifest::default();
        assert!(level.validate().is_ok());
        assert_eq!(level.zones.len(), level.dots.len() - 1);
    }

    #[test]
    fn corridor_contains_both_ends_and_not_the_side() {
        let zone = corridor(Vec2::ZERO, Vec2::new(4.0, 0.0), 0.5);
        assert!(zone.contains(Vec2::ZERO));
        assert!(zone.contains(Vec2::new(4.0, 0.0)));
        assert!(zone.contains(Vec2::new(2.0, 0.4)));
        assert!(!zone.contains(Vec2::new(2.0, 0.6)));
    }

    #[test]
    fn parse_level_json() {
        let json = r#"{
            "dots": [
                { "number": 1, "x": 0, "y": 0 },
                { "number": 2, "x": 3, "y": 0, "radius": 0.5 }
            ],
            "zones": [ { "shape": "rect", "min": [-1, -1], "max": [4, 1] } ],
            "config": { "next_scene_name": "Victory", "min_distance": 0.2 }
        }"#;
        let level = LevelManifest::from_json(json).unwrap();
        assert_eq!(level.dots.len(), 2);
        assert_eq!(level.config.next_scene_name, "Victory");
        assert_eq!(level.config.min_distance, 0.2);
        assert_eq!(level.config.error_margin, 0.3);
    }

    #[test]
    fn malformed_json_is_a_level_error() {
        let err = LevelManifest::from_json("{ \"dots\": 3 }").unwrap_err();
        assert!(matches!(err, ConnectError::Level(_)));
    }

    #[test]
    fn single_dot_level_is_rejected() {
        let err = LevelManifest::from_json(r#"{ "dots": [ { "number": 1, "x": 0, "y": 0 } ] }"#)
            .unwrap_err();
        assert!(matches!(err, ConnectError::DotNotFound(2)));
    }

    #[test]
    fn duplicate_dots_are_rejected() {
        let json = r#"{ "dots": [
            { "number": 1, "x": 0, "y": 0 },
            { "number": 1, "x": 1, "y": 0 }
        ] }"#;
        assert!(matches!(
            LevelManifest::from_json(json).unwrap_err(),
            ConnectError::DuplicateDot(1)
        ));
    }
}
