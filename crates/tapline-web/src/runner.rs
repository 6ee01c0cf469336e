use glam::Vec2;
use tapline_engine::{
    Camera2D, EngineContext, FixedTimestep, Game, GameConfig, InputEvent, InputQueue,
    RenderContext,
};
#[cfg(feature = "vectors")]
use tapline_engine::VectorState;

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    camera: Camera2D,
    #[cfg(feature = "vectors")]
    vectors: VectorState,
    initialized: bool,
    /// Flat buffer of sound event IDs for host reads.
    sound_buffer: Vec<u8>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);
        let camera = Camera2D::new(config.world_width, config.world_height);

        Self {
            ctx: EngineContext::with_config(&config),
            input: InputQueue::new(),
            timestep,
            camera,
            #[cfg(feature = "vectors")]
            vectors: VectorState::new(config.max_vector_vertices),
            initialized: false,
            sound_buffer: Vec::with_capacity(config.max_sounds),
            config,
            game,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.ctx.start_music();
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.finish_frame();
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Convert a screen-pixel pointer event into world space and queue it.
    pub fn push_pointer(&mut self, kind: PointerKind, screen_x: f32, screen_y: f32) {
        let world = self.camera.screen_to_world(Vec2::new(screen_x, screen_y));
        let event = match kind {
            PointerKind::Down => InputEvent::PointerDown { x: world.x, y: world.y },
            PointerKind::Up => InputEvent::PointerUp { x: world.x, y: world.y },
            PointerKind::Move => InputEvent::PointerMove { x: world.x, y: world.y },
        };
        self.input.push(event);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera
            .resize(width, height, self.config.world_width, self.config.world_height);
    }

    /// Run one frame: fixed-step updates, then the render pass.
    ///
    /// Input queued since the last frame is delivered to the first step only;
    /// if the frame produces no step it waits for the next frame.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        if steps > 0 {
            let frame_input = InputQueue::from_events(self.input.drain());
            let empty = InputQueue::new();
            for step in 0..steps {
                let input = if step == 0 { &frame_input } else { &empty };
                self.ctx.begin_tick(input, self.timestep.dt());
                self.game.update(&mut self.ctx, input);
            }
        }

        self.finish_frame();
    }

    /// Hand a level document to the game.
    pub fn load_level(&mut self, json: &str) -> bool {
        match self.game.load_level(&mut self.ctx, json) {
            Ok(()) => {
                log::info!("Level loaded");
                true
            }
            Err(e) => {
                log::error!("Level rejected: {}", e);
                false
            }
        }
    }

    fn finish_frame(&mut self) {
        self.ctx.flush_labels();
        self.cap_frame_output();

        #[cfg(feature = "vectors")]
        self.vectors.clear();
        {
            let mut render_ctx = RenderContext {
                scene: &self.ctx.scene,
                polylines: &self.ctx.polylines,
                #[cfg(feature = "vectors")]
                vectors: &mut self.vectors,
            };
            self.game.render(&mut render_ctx);
        }

        self.sound_buffer.clear();
        for sound in &self.ctx.sounds {
            self.sound_buffer.push(sound.0 as u8);
        }
    }

    fn cap_frame_output(&mut self) {
        if self.ctx.sounds.len() > self.config.max_sounds {
            log::warn!("Dropping {} sound events", self.ctx.sounds.len() - self.config.max_sounds);
            self.ctx.sounds.truncate(self.config.max_sounds);
        }
        if self.ctx.events.len() > self.config.max_events {
            log::warn!("Dropping {} game events", self.ctx.events.len() - self.config.max_events);
            self.ctx.events.truncate(self.config.max_events);
        }
    }

    // ---- Accessors for host reads ----

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn take_scene_request(&mut self) -> Option<String> {
        self.ctx.take_scene_request()
    }

    pub fn label(&self, slot: u32) -> Option<String> {
        self.ctx.labels.text(slot).map(str::to_owned)
    }

    /// Flattened `x, y` pairs of every visible polyline, in draw order,
    /// each prefixed with its point count.
    pub fn polyline_data(&self) -> Vec<f32> {
        let mut out = Vec::new();
        for (_, line) in self.ctx.polylines.iter_sorted() {
            out.push(line.points.len() as f32);
            for p in &line.points {
                out.push(p.x);
                out.push(p.y);
            }
        }
        out
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    pub fn max_sounds(&self) -> u32 {
        self.config.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.vectors.buffer_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertex_count(&self) -> u32 {
        self.vectors.vertex_count() as u32
    }

    #[cfg(feature = "vectors")]
    pub fn max_vector_vertices(&self) -> u32 {
        self.vectors.max_vertices() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Up,
    Move,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapline_engine::SoundEvent;

    /// Counts presses and records how many events each update saw.
    #[derive(Default)]
    struct Probe {
        presses: u32,
        updates: u32,
        seen: Vec<usize>,
    }

    impl Game for Probe {
        fn config(&self) -> GameConfig {
            GameConfig {
                fixed_dt: 0.1,
                world_width: 10.0,
                world_height: 10.0,
                ..GameConfig::default()
            }
        }

        fn init(&mut self, ctx: &mut EngineContext) {
            ctx.audio.register_cue(SoundEvent(1), 0.0);
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.updates += 1;
            self.seen.push(input.len());
            if ctx.pointer().pressed {
                self.presses += 1;
                ctx.play_cue(SoundEvent(1));
            }
        }
    }

    fn runner() -> GameRunner<Probe> {
        let mut r = GameRunner::new(Probe::default());
        r.init();
        r
    }

    #[test]
    fn input_goes_to_first_step_only() {
        let mut r = runner();
        r.push_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        r.tick(0.3);
        assert_eq!(r.game.updates, 3);
        assert_eq!(r.game.seen, vec![1, 0, 0]);
        assert_eq!(r.game.presses, 1);
        assert_eq!(r.sound_events_len(), 1);
    }

    #[test]
    fn input_waits_for_a_step() {
        let mut r = runner();
        r.push_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        r.tick(0.05);
        assert_eq!(r.game.updates, 0);
        r.tick(0.05);
        assert_eq!(r.game.presses, 1);
    }

    #[test]
    fn screen_pointer_is_converted_to_world() {
        let mut r = runner();
        r.push_pointer(PointerKind::Down, 5.0, 5.0);
        r.tick(0.1);
        assert_eq!(r.context().pointer().pos, Vec2::ZERO);
    }

    #[test]
    fn frame_data_is_cleared_each_frame() {
        let mut r = runner();
        r.push_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        r.tick(0.1);
        assert_eq!(r.sound_events_len(), 1);
        r.tick(0.1);
        assert_eq!(r.sound_events_len(), 0);
    }

    #[test]
    fn default_game_rejects_levels() {
        let mut r = runner();
        assert!(!r.load_level("{}"));
    }
}
