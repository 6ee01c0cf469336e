//! 2D spatial queries: "which entity is under this point" and
//! "is this point inside that entity's region".
//!
//! Games talk to the [`SpatialQuery`] trait only. [`ShapeWorld`] answers with
//! plain geometry; with the `physics` feature the engine uses the Rapier-backed
//! [`PhysicsWorld`](crate::core::physics::PhysicsWorld) instead.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::EntityId;

/// Bitmask of pick layers. An entity matches a query when the masks intersect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// Mask with only layer `index` (0..32) set.
    pub const fn layer(index: u32) -> Self {
        Self(1 << (index & 31))
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

/// A closed 2D region. Boundaries count as inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Region {
    Circle { center: Vec2, radius: f32 },
    Rect { min: Vec2, max: Vec2 },
    /// Simple polygon in world coordinates, implicitly closed. May be concave.
    Polygon { points: Vec<Vec2> },
}

impl Region {
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Region::Circle { center, radius }
    }

    /// Axis-aligned rectangle from any two opposite corners.
    pub fn rect(a: Vec2, b: Vec2) -> Self {
        Region::Rect { min: a.min(b), max: a.max(b) }
    }

    pub fn polygon(points: impl Into<Vec<Vec2>>) -> Self {
        Region::Polygon { points: points.into() }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        match self {
            Region::Circle { center, radius } => p.distance_squared(*center) <= radius * radius,
            Region::Rect { min, max } => {
                p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
            }
            Region::Polygon { points } => polygon_contains(points, p),
        }
    }

    /// Center of the region's bounding box.
    pub fn center(&self) -> Vec2 {
        match self {
            Region::Circle { center, .. } => *center,
            Region::Rect { min, max } => (*min + *max) * 0.5,
            Region::Polygon { points } => {
                let (lo, hi) = bounds(points);
                (lo + hi) * 0.5
            }
        }
    }

    /// Outline points for drawing (circles are approximated with `segments` points).
    pub fn outline(&self, segments: usize) -> Vec<Vec2> {
        match self {
            Region::Circle { center, radius } => {
                let n = segments.max(8);
                (0..n)
                    .map(|i| {
                        let a = i as f32 / n as f32 * std::f32::consts::TAU;
                        *center + Vec2::new(a.cos(), a.sin()) * *radius
                    })
                    .collect()
            }
            Region::Rect { min, max } => vec![
                *min,
                Vec2::new(max.x, min.y),
                *max,
                Vec2::new(min.x, max.y),
            ],
            Region::Polygon { points } => points.clone(),
        }
    }

    /// A polygon needs at least three points to enclose anything.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Region::Circle { radius, .. } => *radius <= 0.0,
            Region::Rect { min, max } => min.x >= max.x || min.y >= max.y,
            Region::Polygon { points } => points.len() < 3,
        }
    }
}

fn bounds(points: &[Vec2]) -> (Vec2, Vec2) {
    points.iter().fold(
        (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
        |(lo, hi), p| (lo.min(*p), hi.max(*p)),
    )
}

/// Even-odd crossing test, with points on an edge counted as inside.
fn polygon_contains(points: &[Vec2], p: Vec2) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[j];
        if on_segment(a, b, p) {
            return true;
        }
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn on_segment(a: Vec2, b: Vec2, p: Vec2) -> bool {
    const EPS: f32 = 1e-5;
    let ab = b - a;
    let ap = p - a;
    if ab.perp_dot(ap).abs() > EPS * ab.length().max(1.0) {
        return false;
    }
    let t = ap.dot(ab);
    t >= -EPS && t <= ab.length_squared() + EPS
}

/// The spatial query service games depend on.
pub trait SpatialQuery {
    /// Register (or replace) the region owned by `entity`.
    fn insert(&mut self, entity: EntityId, region: Region, layers: LayerMask);

    /// Forget an entity's region. Returns false if it was not registered.
    fn remove(&mut self, entity: EntityId) -> bool;

    /// The topmost entity on `layers` whose region contains `point`.
    /// "Topmost" is the highest entity id, i.e. the most recently spawned.
    fn pick(&self, point: Vec2, layers: LayerMask) -> Option<EntityId>;

    /// Whether `point` lies inside the region registered for `entity`.
    /// Unknown entities contain nothing.
    fn contains(&self, entity: EntityId, point: Vec2) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}

/// Pure-geometry spatial world. Linear scan; minigame scenes are tiny.
#[derive(Debug, Default)]
pub struct ShapeWorld {
    shapes: BTreeMap<EntityId, (Region, LayerMask)>,
}

impl ShapeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(&self, entity: EntityId) -> Option<&Region> {
        self.shapes.get(&entity).map(|(region, _)| region)
    }
}

impl SpatialQuery for ShapeWorld {
    fn insert(&mut self, entity: EntityId, region: Region, layers: LayerMask) {
        if region.is_degenerate() {
            log::warn!("Entity {:?} registered with a degenerate region", entity);
        }
        self.shapes.insert(entity, (region, layers));
    }

    fn remove(&mut self, entity: EntityId) -> bool {
        self.shapes.remove(&entity).is_some()
    }

    fn pick(&self, point: Vec2, layers: LayerMask) -> Option<EntityId> {
        self.shapes
            .iter()
            .rev()
            .find(|(_, (region, mask))| mask.intersects(layers) && region.contains(point))
            .map(|(id, _)| *id)
    }

    fn contains(&self, entity: EntityId, point: Vec2) -> bool {
        self.shapes
            .get(&entity)
            .is_some_and(|(region, _)| region.contains(point))
    }

    fn len(&self) -> usize {
        self.shapes.len()
    }

    fn clear(&mut self) {
        self.shapes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOTS: LayerMask = LayerMask::layer(0);
    const ZONES: LayerMask = LayerMask::layer(1);

    #[test]
    fn circle_boundary_is_inside() {
        let r = Region::circle(Vec2::ZERO, 1.0);
        assert!(r.contains(Vec2::new(1.0, 0.0)));
        assert!(!r.contains(Vec2::new(1.01, 0.0)));
    }

    #[test]
    fn rect_from_any_corners() {
        let r = Region::rect(Vec2::new(2.0, 2.0), Vec2::new(0.0, 0.0));
        assert!(r.contains(Vec2::new(1.0, 1.0)));
        assert!(r.contains(Vec2::new(2.0, 0.0)));
        assert!(!r.contains(Vec2::new(-0.1, 1.0)));
    }

    #[test]
    fn concave_polygon() {
        // U shape: the notch between the arms is outside
        let u = Region::polygon(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(2.0, 3.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 3.0),
            Vec2::new(0.0, 3.0),
        ]);
        assert!(u.contains(Vec2::new(0.5, 2.5)));
        assert!(u.contains(Vec2::new(2.5, 2.5)));
        assert!(!u.contains(Vec2::new(1.5, 2.5)));
        assert!(u.contains(Vec2::new(1.5, 0.5)));
        // On an edge
        assert!(u.contains(Vec2::new(1.5, 1.0)));
    }

    #[test]
    fn degenerate_regions() {
        assert!(Region::polygon(vec![Vec2::ZERO, Vec2::ONE]).is_degenerate());
        assert!(Region::circle(Vec2::ZERO, 0.0).is_degenerate());
        assert!(!Region::rect(Vec2::ZERO, Vec2::ONE).is_degenerate());
    }

    #[test]
    fn pick_respects_layers_and_prefers_topmost() {
        let mut world = ShapeWorld::new();
        world.insert(EntityId(1), Region::circle(Vec2::ZERO, 1.0), DOTS);
        world.insert(EntityId(2), Region::circle(Vec2::ZERO, 1.0), DOTS);
        world.insert(EntityId(3), Region::rect(Vec2::splat(-5.0), Vec2::splat(5.0)), ZONES);

        assert_eq!(world.pick(Vec2::ZERO, DOTS), Some(EntityId(2)));
        assert_eq!(world.pick(Vec2::ZERO, ZONES), Some(EntityId(3)));
        assert_eq!(world.pick(Vec2::new(3.0, 0.0), DOTS), None);
        assert_eq!(world.pick(Vec2::ZERO, DOTS.union(ZONES)), Some(EntityId(3)));
    }

    #[test]
    fn contains_unknown_entity_is_false() {
        let world = ShapeWorld::new();
        assert!(!world.contains(EntityId(42), Vec2::ZERO));
    }

    #[test]
    fn region_parses_from_json() {
        let json = r#"[
            { "shape": "circle", "center": [1.0, 2.0], "radius": 0.5 },
            { "shape": "rect", "min": [0.0, 0.0], "max": [2.0, 1.0] },
            { "shape": "polygon", "points": [[0,0],[1,0],[0,1]] }
        ]"#;
        let regions: Vec<Region> = serde_json::from_str(json).unwrap();
        assert_eq!(regions.len(), 3);
        assert!(regions[0].contains(Vec2::new(1.0, 2.2)));
        assert!(regions[2].contains(Vec2::new(0.2, 0.2)));
    }
}
