pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext, RenderContext};
pub use api::types::{event_kind, EntityId, SoundEvent, GameEvent};
pub use components::entity::Entity;
pub use core::scene::Scene;
pub use core::spatial::{LayerMask, Region, ShapeWorld, SpatialQuery};
pub use core::time::{Countdown, FixedTimestep};
pub use renderer::camera::Camera2D;
pub use input::pointer::{PointerSample, PointerTracker};
pub use input::queue::{InputEvent, InputQueue};
pub use systems::audio::{AudioService, AudioSettings, CueDef};
pub use systems::color::{ColorLookup, ColorRange, ColorRanges, VectorColor, DEFAULT_PALETTE};
pub use systems::polyline::{Polyline, PolylineId, PolylineStore};
pub use systems::text::{Label, LabelBoard};

#[cfg(feature = "physics")]
pub use core::physics::PhysicsWorld;

#[cfg(feature = "vectors")]
pub use systems::vector::{VectorState, VectorVertex};
