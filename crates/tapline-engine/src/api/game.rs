use std::error::Error;

use crate::api::types::{event_kind, EntityId, GameEvent, SoundEvent};
use crate::components::entity::Entity;
use crate::core::scene::Scene;
use crate::core::spatial::{LayerMask, Region, SpatialQuery};
use crate::input::pointer::{PointerSample, PointerTracker};
use crate::input::queue::InputQueue;
use crate::systems::audio::{AudioService, AudioSettings};
use crate::systems::polyline::PolylineStore;
use crate::systems::text::LabelBoard;
#[cfg(feature = "vectors")]
use crate::systems::vector::VectorState;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Maximum number of vector vertices per frame (default: 16384).
    pub max_vector_vertices: usize,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    pub audio: AudioSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 16.0,
            world_height: 9.0,
            max_vector_vertices: 16384,
            max_sounds: 32,
            max_events: 32,
            audio: AudioSettings::default(),
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The game loop tick. `ctx.pointer()` already reflects `input`.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Optional read-only render pass for custom render commands.
    fn render(&self, _ctx: &mut RenderContext) {}

    /// Replace the current level with one described by `json`.
    /// Games without loadable levels reject every document.
    fn load_level(&mut self, _ctx: &mut EngineContext, _json: &str) -> Result<(), Box<dyn Error>> {
        Err("this game has no loadable levels".into())
    }
}

fn default_spatial() -> Box<dyn SpatialQuery> {
    #[cfg(feature = "physics")]
    {
        Box::new(crate::core::physics::PhysicsWorld::new())
    }
    #[cfg(not(feature = "physics"))]
    {
        Box::new(crate::core::spatial::ShapeWorld::new())
    }
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub spatial: Box<dyn SpatialQuery>,
    pub polylines: PolylineStore,
    pub audio: AudioService,
    pub labels: LabelBoard,
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    pointer: PointerTracker,
    scene_request: Option<String>,
    dt: f32,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    pub fn with_config(config: &GameConfig) -> Self {
        Self {
            scene: Scene::new(),
            spatial: default_spatial(),
            polylines: PolylineStore::new(),
            audio: AudioService::from_settings(&config.audio),
            labels: LabelBoard::new(),
            sounds: Vec::with_capacity(config.max_sounds),
            events: Vec::with_capacity(config.max_events),
            pointer: PointerTracker::new(),
            scene_request: None,
            dt: config.fixed_dt,
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn an entity and register its pickable region.
    pub fn spawn_with_region(&mut self, entity: Entity, region: Region, layers: LayerMask) -> EntityId {
        let id = entity.id;
        self.spatial.insert(id, region, layers);
        self.scene.spawn(entity);
        id
    }

    /// Despawn an entity and forget its region.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.spatial.remove(id);
        self.scene.despawn(id)
    }

    /// Drop every entity, region and polyline. Audio and labels survive.
    pub fn clear_world(&mut self) {
        self.scene.clear();
        self.spatial.clear();
        self.polylines.clear();
    }

    /// Emit a sound event to be forwarded to the host.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    /// Emit a game event to be forwarded to the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Play a cue unless it is still playing. Returns true if it was emitted.
    pub fn play_cue(&mut self, cue: SoundEvent) -> bool {
        let play = self.audio.play_if_not_playing(cue);
        if play {
            self.emit_sound(cue);
        }
        play
    }

    pub fn start_music(&mut self) {
        if let Some(ev) = self.audio.start_music() {
            self.emit_event(ev);
        }
    }

    pub fn play_music(&mut self) {
        if let Some(ev) = self.audio.play_music() {
            self.emit_event(ev);
        }
    }

    pub fn stop_music(&mut self) {
        if let Some(ev) = self.audio.stop_music() {
            self.emit_event(ev);
        }
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        if let Some(ev) = self.audio.set_volume(volume) {
            self.emit_event(ev);
        }
    }

    /// Ask the host to switch to the scene called `name`.
    ///
    /// An empty name is a configuration gap: it is logged and nothing is
    /// requested. Returns whether a request was made.
    pub fn load_scene(&mut self, name: &str) -> bool {
        if name.is_empty() {
            log::warn!("Scene transition requested without a scene name");
            return false;
        }
        log::info!("Loading scene '{}'", name);
        self.scene_request = Some(name.to_owned());
        self.emit_event(GameEvent::new(event_kind::LOAD_SCENE));
        true
    }

    /// The pending scene name, if any. Cleared by the read.
    pub fn take_scene_request(&mut self) -> Option<String> {
        self.scene_request.take()
    }

    pub fn set_label(&mut self, slot: u32, text: &str) {
        self.labels.set_text(slot, text);
    }

    pub fn hide_label(&mut self, slot: u32) {
        self.labels.set_visible(slot, false);
    }

    /// Pointer state for the current tick.
    pub fn pointer(&self) -> PointerSample {
        self.pointer.sample()
    }

    /// Seconds simulated by the current tick.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Prepare a fixed step: fold the step's input into the pointer sample
    /// and advance audio timers. Called by the runner before `Game::update`.
    pub fn begin_tick(&mut self, input: &InputQueue, dt: f32) -> PointerSample {
        self.dt = dt;
        self.audio.tick(dt);
        self.pointer.observe(input)
    }

    /// Turn label changes into `LABEL_CHANGED` events. Called once per frame.
    pub fn flush_labels(&mut self) {
        for slot in self.labels.take_dirty() {
            self.events
                .push(GameEvent::with_payload(event_kind::LABEL_CHANGED, slot as f32, 0.0, 0.0));
        }
    }

    /// Clear per-frame transient data (sounds, events).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Read access to retained drawing state plus the vector output buffer.
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    pub polylines: &'a PolylineStore,
    #[cfg(feature = "vectors")]
    pub vectors: &'a mut VectorState,
}
