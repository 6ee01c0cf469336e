use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Simple entity storage using a flat Vec.
/// Minigame scenes hold a handful to a few dozen entities, so linear scans are fine here;
/// anything looked up every tick should be indexed by the game at load time.
#[derive(Debug, Default)]
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(64),
        }
    }

    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove an entity by ID. Returns the removed entity if found.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.swap_remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// All entities with the given tag, in spawn order.
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(move |e| e.tag == tag)
    }

    /// Show or hide one entity. Returns false if the id is unknown.
    pub fn set_active(&mut self, id: EntityId, active: bool) -> bool {
        match self.get_mut(id) {
            Some(entity) => {
                entity.active = active;
                true
            }
            None => false,
        }
    }

    /// Show or hide every entity carrying `tag`. Returns how many were touched.
    pub fn set_active_by_tag(&mut self, tag: &str, active: bool) -> usize {
        let mut touched = 0;
        for entity in self.entities.iter_mut().filter(|e| e.tag == tag) {
            entity.active = active;
            touched += 1;
        }
        touched
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_pos(Vec2::new(10.0, 20.0)));
        assert_eq!(scene.get(EntityId(1)).unwrap().pos, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn despawn_removes_entity() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)));
        assert!(scene.despawn(EntityId(1)).is_some());
        assert!(scene.despawn(EntityId(1)).is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn set_active_by_tag_only_touches_matching() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_tag("phase1"));
        scene.spawn(Entity::new(EntityId(2)).with_tag("phase1"));
        scene.spawn(Entity::new(EntityId(3)).with_tag("phase2"));

        assert_eq!(scene.set_active_by_tag("phase1", false), 2);
        assert!(scene.with_tag("phase1").all(|e| !e.active));
        assert!(scene.get(EntityId(3)).unwrap().active);
    }

    #[test]
    fn set_active_unknown_id() {
        let mut scene = Scene::new();
        assert!(!scene.set_active(EntityId(9), false));
    }
}
