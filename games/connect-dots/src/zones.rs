use glam::Vec2;
use tapline_engine::{EntityId, LayerMask, SpatialQuery};

use crate::config::{UnzonedGap, ZonePolicy};

/// Pick layer the zones are registered on.
pub const ZONE_LAYER: LayerMask = LayerMask::layer(1);

/// Drawing zones, one per gap: zone `i` covers the path from dot `i + 1` to
/// dot `i + 2`. Shapes live in the spatial world under each zone's entity.
#[derive(Debug)]
pub struct ZoneValidator {
    zones: Vec<EntityId>,
    active: Option<usize>,
    policy: ZonePolicy,
    unzoned: UnzonedGap,
}

impl ZoneValidator {
    pub fn new(zones: Vec<EntityId>, policy: ZonePolicy) -> Self {
        Self {
            zones,
            active: None,
            policy,
            unzoned: UnzonedGap::default(),
        }
    }

    pub fn with_unzoned_gap(mut self, unzoned: UnzonedGap) -> Self {
        self.unzoned = unzoned;
        self
    }

    /// Make the zone for the gap starting at dot `target` the only active one.
    pub fn activate_for_target(&mut self, target: u32) {
        self.deactivate_all();
        let idx = target.saturating_sub(1) as usize;
        if idx < self.zones.len() {
            self.active = Some(idx);
        } else if !self.zones.is_empty() {
            log::warn!("No zone for the segment starting at dot {}", target);
        }
    }

    pub fn deactivate_all(&mut self) {
        self.active = None;
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    pub fn entity(&self, index: usize) -> Option<EntityId> {
        self.zones.get(index).copied()
    }

    pub fn is_inside_active_zone(&self, spatial: &dyn SpatialQuery, pos: Vec2) -> bool {
        self.active
            .and_then(|idx| self.zones.get(idx))
            .is_some_and(|zone| spatial.contains(*zone, pos))
    }

    pub fn is_inside_any_zone(&self, spatial: &dyn SpatialQuery, pos: Vec2) -> bool {
        self.zones.iter().any(|zone| spatial.contains(*zone, pos))
    }

    /// Whether a line may pass through `pos` under the level's policy.
    ///
    /// With `UnzonedGap::Free` a level without zones is unconstrained, and
    /// so is a segment that has no zone of its own under `ActiveOnly`.
    /// `Blocked` treats both as having nowhere valid to draw.
    pub fn is_valid(&self, spatial: &dyn SpatialQuery, pos: Vec2) -> bool {
        let free = self.unzoned == UnzonedGap::Free;
        if self.zones.is_empty() {
            return free;
        }
        match self.policy {
            ZonePolicy::ActiveOnly => match self.active {
                Some(_) => self.is_inside_active_zone(spatial, pos),
                None => free,
            },
            ZonePolicy::AnyZone => self.is_inside_any_zone(spatial, pos),
        }
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
