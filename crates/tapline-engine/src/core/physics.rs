use std::collections::BTreeMap;

use glam::Vec2;
use rapier2d::parry::query::PointQuery;
use rapier2d::prelude::*;

use crate::api::types::EntityId;
use crate::core::spatial::{LayerMask, Region, SpatialQuery};

// ---------------------------------------------------------------------------
// glam <-> nalgebra conversion helpers
// ---------------------------------------------------------------------------

fn vec2_to_point(v: Vec2) -> Point<Real> {
    point![v.x, v.y]
}

fn region_to_collider(region: &Region) -> ColliderBuilder {
    match region {
        Region::Circle { center, radius } => {
            ColliderBuilder::ball(*radius).translation(vector![center.x, center.y])
        }
        Region::Rect { min, max } => {
            let half = (*max - *min) * 0.5;
            let center = (*min + *max) * 0.5;
            ColliderBuilder::cuboid(half.x, half.y).translation(vector![center.x, center.y])
        }
        Region::Polygon { points } => {
            let vertices: Vec<Point<Real>> = points.iter().copied().map(vec2_to_point).collect();
            let n = vertices.len() as u32;
            let indices: Vec<[u32; 2]> = (0..n).map(|i| [i, (i + 1) % n]).collect();
            ColliderBuilder::convex_decomposition(&vertices, &indices)
        }
    }
}

/// Collider handle plus the pick layers the entity was registered on.
#[derive(Debug, Clone, Copy)]
struct SensorEntry {
    collider: ColliderHandle,
    layers: LayerMask,
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Rapier-backed spatial world.
///
/// Every region becomes a parent-less sensor collider: nothing is simulated,
/// the collider set only answers point queries through parry's shape tests.
/// The entity id is stored in the collider's `user_data`.
pub struct PhysicsWorld {
    island_manager: IslandManager,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    sensors: BTreeMap<EntityId, SensorEntry>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            island_manager: IslandManager::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            sensors: BTreeMap::new(),
        }
    }

    fn collider_contains(&self, handle: ColliderHandle, point: Vec2) -> bool {
        self.colliders
            .get(handle)
            .is_some_and(|c| c.shape().contains_point(c.position(), &vec2_to_point(point)))
    }

    fn detach(&mut self, entry: SensorEntry) {
        self.colliders.remove(
            entry.collider,
            &mut self.island_manager,
            &mut self.bodies,
            false,
        );
    }

    /// Number of live Rapier colliders (one per registered entity).
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialQuery for PhysicsWorld {
    fn insert(&mut self, entity: EntityId, region: Region, layers: LayerMask) {
        if region.is_degenerate() {
            log::warn!("Entity {:?} registered with a degenerate region; ignored", entity);
            return;
        }
        if let Some(old) = self.sensors.remove(&entity) {
            self.detach(old);
        }
        let collider = region_to_collider(&region)
            .sensor(true)
            .user_data(entity.0 as u128)
            .build();
        let handle = self.colliders.insert(collider);
        self.sensors.insert(entity, SensorEntry { collider: handle, layers });
    }

    fn remove(&mut self, entity: EntityId) -> bool {
        match self.sensors.remove(&entity) {
            Some(entry) => {
                self.detach(entry);
                true
            }
            None => false,
        }
    }

    fn pick(&self, point: Vec2, layers: LayerMask) -> Option<EntityId> {
        self.sensors
            .iter()
            .rev()
            .find(|(_, entry)| {
                entry.layers.intersects(layers) && self.collider_contains(entry.collider, point)
            })
            .map(|(id, _)| *id)
    }

    fn contains(&self, entity: EntityId, point: Vec2) -> bool {
        self.sensors
            .get(&entity)
            .is_some_and(|entry| self.collider_contains(entry.collider, point))
    }

    fn len(&self) -> usize {
        self.sensors.len()
    }

    fn clear(&mut self) {
        let entries: Vec<SensorEntry> = self.sensors.values().copied().collect();
        for entry in entries {
            self.detach(entry);
        }
        self.sensors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOTS: LayerMask = LayerMask::layer(0);

    #[test]
    fn pick_circle_sensor() {
        let mut world = PhysicsWorld::new();
        world.insert(EntityId(7), Region::circle(Vec2::new(10.0, 10.0), 2.0), DOTS);

        assert_eq!(world.pick(Vec2::new(11.0, 10.0), DOTS), Some(EntityId(7)));
        assert_eq!(world.pick(Vec2::new(20.0, 10.0), DOTS), None);
        assert_eq!(world.pick(Vec2::new(11.0, 10.0), LayerMask::layer(3)), None);
    }

    #[test]
    fn rect_contains() {
        let mut world = PhysicsWorld::new();
        world.insert(EntityId(1), Region::rect(Vec2::ZERO, Vec2::new(4.0, 2.0)), DOTS);
        assert!(world.contains(EntityId(1), Vec2::new(3.9, 1.9)));
        assert!(!world.contains(EntityId(1), Vec2::new(4.5, 1.0)));
    }

    #[test]
    fn concave_polygon_via_decomposition() {
        let mut world = PhysicsWorld::new();
        let l_shape = Region::polygon(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 4.0),
            Vec2::new(0.0, 4.0),
        ]);
        world.insert(EntityId(1), l_shape, DOTS);
        assert!(world.contains(EntityId(1), Vec2::new(0.5, 3.0)));
        assert!(world.contains(EntityId(1), Vec2::new(3.0, 0.5)));
        assert!(!world.contains(EntityId(1), Vec2::new(3.0, 3.0)));
    }

    #[test]
    fn replace_and_remove() {
        let mut world = PhysicsWorld::new();
        world.insert(EntityId(1), Region::circle(Vec2::ZERO, 1.0), DOTS);
        world.insert(EntityId(1), Region::circle(Vec2::new(50.0, 0.0), 1.0), DOTS);
        assert_eq!(world.len(), 1);
        assert_eq!(world.collider_count(), 1);
        assert!(!world.contains(EntityId(1), Vec2::ZERO));

        assert!(world.remove(EntityId(1)));
        assert!(!world.remove(EntityId(1)));
        assert_eq!(world.collider_count(), 0);
    }

    #[test]
    fn clear_drops_every_collider() {
        let mut world = PhysicsWorld::new();
        for i in 0..4 {
            world.insert(EntityId(i), Region::circle(Vec2::splat(i as f32 * 10.0), 1.0), DOTS);
        }
        world.clear();
        assert!(world.is_empty());
        assert_eq!(world.collider_count(), 0);
    }
}
