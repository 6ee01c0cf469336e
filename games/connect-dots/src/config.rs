use serde::{Deserialize, Serialize};
use tapline_engine::ColorLookup;
use thiserror::Error;

/// What happens when the pointer leaves the permitted region mid-line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Keep the line and stick it to the last position that was inside.
    #[default]
    Clamp,
    /// Throw the line away; the player starts again from the current dot.
    Cancel,
}

/// What happens after a segment is connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainPolicy {
    /// The next segment starts right away from the dot just reached.
    #[default]
    Chain,
    /// Every segment needs its own press on its origin dot.
    PressPerSegment,
}

/// Which zones a line may be drawn through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZonePolicy {
    /// Only the zone between the current dot and the next one.
    #[default]
    ActiveOnly,
    /// Any zone of the level, active or not.
    AnyZone,
}

/// How a segment without a zone of its own is treated under `ActiveOnly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnzonedGap {
    /// Draw anywhere.
    #[default]
    Free,
    /// Nothing is inside; the boundary policy applies at once.
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectConfig {
    /// Minimum spacing between consecutive line points.
    pub min_distance: f32,
    /// Slack around zone boundaries and the snap radius around the next dot.
    pub error_margin: f32,
    /// Auto-complete tip speed, world units per second.
    pub auto_complete_speed: f32,
    pub line_sorting_order: i32,
    pub line_width: f32,
    /// Stop after this many dots even if the level has more.
    pub max_dots_to_connect: Option<u32>,
    /// Scene requested once every dot is connected. Empty means "stay".
    pub next_scene_name: String,
    pub boundary_policy: BoundaryPolicy,
    pub chain_policy: ChainPolicy,
    pub zone_policy: ZonePolicy,
    pub unzoned_gap: UnzonedGap,
    pub coloring: ColorLookup,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            min_distance: 0.1,
            error_margin: 0.3,
            auto_complete_speed: 5.0,
            line_sorting_order: 0,
            line_width: 0.12,
            max_dots_to_connect: None,
            next_scene_name: String::new(),
            boundary_policy: BoundaryPolicy::default(),
            chain_policy: ChainPolicy::default(),
            zone_policy: ZonePolicy::default(),
            unzoned_gap: UnzonedGap::default(),
            coloring: ColorLookup::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("configuration missing: {0}")]
    ConfigurationMissing(&'static str),

    #[error("dot {0} not found")]
    DotNotFound(u32),

    #[error("dot {0} is defined more than once")]
    DuplicateDot(u32),

    #[error("dot number {0} is invalid (numbers must run 1..=N without gaps)")]
    InvalidDotNumber(u32),

    #[error("malformed level: {0}")]
    Level(#[from] serde_json::Error),
}
