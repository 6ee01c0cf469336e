use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tapline_engine::{EntityId, LayerMask};

use crate::config::ConnectError;

/// Pick layer the dots are registered on.
pub const DOT_LAYER: LayerMask = LayerMask::layer(0);

/// A dot as written in a level file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DotDef {
    pub number: u32,
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_radius")]
    pub radius: f32,
}

fn default_radius() -> f32 {
    0.35
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub number: u32,
    pub pos: Vec2,
    pub radius: f32,
}

/// Dots indexed by sequence number, plus the entity → number table used to
/// resolve spatial picks.
#[derive(Debug, Default)]
pub struct DotRegistry {
    /// `dots[n - 1]` is dot `n`.
    dots: Vec<Dot>,
    by_entity: HashMap<EntityId, u32>,
}

impl DotRegistry {
    /// Build the registry. Numbers must be unique and cover `1..=N`.
    pub fn from_defs(defs: &[DotDef]) -> Result<Self, ConnectError> {
        let mut sorted: Vec<&DotDef> = defs.iter().collect();
        sorted.sort_by_key(|d| d.number);

        let mut dots = Vec::with_capacity(sorted.len());
        for def in sorted {
            let expected = dots.len() as u32 + 1;
            if def.number + 1 == expected && def.number != 0 {
                return Err(ConnectError::DuplicateDot(def.number));
            }
            if def.number != expected {
                return Err(ConnectError::InvalidDotNumber(def.number));
            }
            dots.push(Dot {
                number: def.number,
                pos: Vec2::new(def.x, def.y),
                radius: def.radius,
            });
        }

        Ok(Self {
            dots,
            by_entity: HashMap::new(),
        })
    }

    /// `None` for 0 and for numbers past the last dot.
    pub fn find_by_number(&self, number: u32) -> Option<&Dot> {
        let idx = number.checked_sub(1)?;
        self.dots.get(idx as usize)
    }

    pub fn bind_entity(&mut self, number: u32, entity: EntityId) {
        self.by_entity.insert(entity, number);
    }

    pub fn number_for(&self, entity: EntityId) -> Option<u32> {
        self.by_entity.get(&entity).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dot> {
        self.dots.iter()
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }
}
