use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// A sound cue emitted by the game logic.
/// The numeric value maps to a game-defined sound in the TypeScript audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

/// A game event communicated from Rust to TypeScript.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
/// Engine-level kinds live in [`event_kind`]; games use values from 100 up.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32) -> Self {
        Self { kind, ..Default::default() }
    }

    pub fn with_payload(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}

/// Event kinds reserved by the engine.
pub mod event_kind {
    /// A scene transition was requested; the name is read via `take_scene_request`.
    pub const LOAD_SCENE: f32 = 1.0;
    /// Background music should start. `a` = volume.
    pub const MUSIC_PLAY: f32 = 2.0;
    /// Background music should stop.
    pub const MUSIC_STOP: f32 = 3.0;
    /// Background music volume changed. `a` = volume.
    pub const MUSIC_VOLUME: f32 = 4.0;
    /// A label slot changed. `a` = slot index.
    pub const LABEL_CHANGED: f32 = 5.0;
}
