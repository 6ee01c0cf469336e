use glam::Vec2;

use crate::api::types::EntityId;

/// A scene object such as a dot or a zone.
///
/// Entities carry no behavior. Shape and pick layers live in the spatial
/// world, keyed by the same id.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    /// String tag for finding entities by role ("dot", "zone", "phase2").
    pub tag: String,
    /// Whether this entity is shown. Inactive entities are skipped by renderers.
    pub active: bool,
    /// Position in world space.
    pub pos: Vec2,
    /// World-space size (for dots: the radius).
    pub scale: f32,
}

impl Entity {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            scale: 1.0,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}
