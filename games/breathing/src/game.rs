use std::error::Error;

use tapline_engine::*;

use crate::breath::{BreathStep, BreathingConfig, BreathingSession, Phase, PHASE_COUNT};

const WORLD_W: f32 = 16.0;
const WORLD_H: f32 = 9.0;

/// Label slots 0..3 carry the instruction, 3..6 the per-phase timers.
pub const INSTRUCTION_SLOT: u32 = 0;
pub const TIMER_SLOT: u32 = 3;

pub mod game_event {
    pub const PHASE_FAILED: f32 = 200.0;
    pub const PHASE_STARTED: f32 = 201.0;
    pub const FINISHED: f32 = 202.0;
}

/// Bar column in world units.
const BAR_X: f32 = 0.0;
const BAR_HALF_W: f32 = 0.6;
const BAR_BOTTOM: f32 = -4.0;
const BAR_TOP: f32 = 4.0;

const PHASE_COLORS: [VectorColor; PHASE_COUNT] = [
    VectorColor::rgb(0.3, 0.8, 0.5),
    VectorColor::rgb(0.3, 0.6, 0.9),
    VectorColor::rgb(0.7, 0.4, 0.9),
];

fn phase_tag(phase: usize) -> String {
    format!("phase{}", phase + 1)
}

pub struct Breathing {
    config: BreathingConfig,
    session: BreathingSession,
}

impl Breathing {
    pub fn new() -> Self {
        Self::with_config(BreathingConfig::default())
    }

    pub fn with_config(config: BreathingConfig) -> Self {
        Self {
            session: BreathingSession::new(config.clone()),
            config,
        }
    }

    pub fn session(&self) -> &BreathingSession {
        &self.session
    }

    fn build(&mut self, ctx: &mut EngineContext) {
        ctx.clear_world();
        self.session = BreathingSession::new(self.config.clone());
        // One marker per band; only the current phase's marker is shown.
        for (i, band) in self.config.bands.iter().enumerate() {
            let id = ctx.next_id();
            let y = self.to_world(band.center);
            ctx.scene.spawn(
                Entity::new(id)
                    .with_tag(phase_tag(i))
                    .with_pos(glam::Vec2::new(BAR_X, y))
                    .with_active(i == 0),
            );
        }
        self.sync_labels(ctx);
    }

    /// Map a bar height onto the world-space column.
    fn to_world(&self, height: f32) -> f32 {
        let span = (self.config.max_height - self.config.min_height).max(f32::EPSILON);
        let t = (height - self.config.min_height) / span;
        BAR_BOTTOM + t * (BAR_TOP - BAR_BOTTOM)
    }

    fn show_phase(&self, ctx: &mut EngineContext, current: Option<usize>) {
        for i in 0..PHASE_COUNT {
            ctx.scene.set_active_by_tag(&phase_tag(i), current == Some(i));
        }
    }

    fn sync_labels(&self, ctx: &mut EngineContext) {
        let text = self.session.instruction();
        for slot in 0..PHASE_COUNT as u32 {
            ctx.set_label(INSTRUCTION_SLOT + slot, text);
        }
        for phase in 0..PHASE_COUNT {
            let timer = self.session.timer_text(phase);
            ctx.set_label(TIMER_SLOT + phase as u32, &timer);
        }
    }
}

impl Default for Breathing {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Breathing {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: WORLD_W,
            world_height: WORLD_H,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.build(ctx);
        log::info!("Breathing exercise ready");
    }

    fn update(&mut self, ctx: &mut EngineContext, _input: &InputQueue) {
        let held = ctx.pointer().held;
        match self.session.tick(held, ctx.dt()) {
            BreathStep::None => {}
            BreathStep::Failed => {
                self.show_phase(ctx, Some(0));
                ctx.emit_event(GameEvent::new(game_event::PHASE_FAILED));
            }
            BreathStep::Advanced(phase) => {
                self.show_phase(ctx, Some(phase));
                ctx.emit_event(GameEvent::with_payload(game_event::PHASE_STARTED, phase as f32, 0.0, 0.0));
            }
            BreathStep::Finished => {
                self.show_phase(ctx, None);
                ctx.emit_event(GameEvent::new(game_event::FINISHED));
                log::info!("Breathing exercise complete");
            }
            BreathStep::SceneDue => {
                ctx.load_scene(&self.config.victory_scene);
            }
        }
        self.sync_labels(ctx);
    }

    #[cfg(feature = "vectors")]
    fn render(&self, ctx: &mut RenderContext) {
        use glam::Vec2;

        ctx.vectors.fill_rect(
            Vec2::new(BAR_X - BAR_HALF_W, BAR_BOTTOM),
            Vec2::new(BAR_X + BAR_HALF_W, BAR_TOP),
            VectorColor::GRAY.with_alpha(0.2),
        );

        for (i, band) in self.config.bands.iter().enumerate() {
            let shown = ctx.scene.with_tag(&phase_tag(i)).any(|e| e.active);
            if !shown {
                continue;
            }
            let min = Vec2::new(BAR_X - BAR_HALF_W * 1.5, self.to_world(band.min()));
            let max = Vec2::new(BAR_X + BAR_HALF_W * 1.5, self.to_world(band.max()));
            ctx.vectors.fill_rect(min, max, PHASE_COLORS[i].with_alpha(0.35));
        }

        let level = self.to_world(self.session.bar());
        let color = match self.session.phase() {
            Phase::Active(i) if self.session.is_satisfied() => PHASE_COLORS[i],
            Phase::Active(_) => VectorColor::WHITE,
            Phase::Complete => VectorColor::rgb(1.0, 0.85, 0.3),
        };
        ctx.vectors.fill_rect(
            Vec2::new(BAR_X - BAR_HALF_W, BAR_BOTTOM),
            Vec2::new(BAR_X + BAR_HALF_W, level),
            color,
        );
    }

    fn load_level(&mut self, ctx: &mut EngineContext, json: &str) -> Result<(), Box<dyn Error>> {
        let config = BreathingConfig::from_json(json)?;
        if config.max_height <= config.min_height {
            return Err("max_height must be above min_height".into());
        }
        self.config = config;
        self.build(ctx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.05;

    fn quick_config() -> BreathingConfig {
        BreathingConfig {
            rise_speed: 20.0,
            fall_speed: 20.0,
            max_height: 40.0,
            required_seconds: 0.5,
            bands: [
                crate::breath::Band { center: 10.0, height: 4.0 },
                crate::breath::Band { center: 20.0, height: 4.0 },
                crate::breath::Band { center: 30.0, height: 4.0 },
            ],
            victory_scene: "Victory".into(),
            finish_delay: 0.2,
            ..BreathingConfig::default()
        }
    }

    fn step(game: &mut Breathing, ctx: &mut EngineContext, held_before: bool, held: bool) {
        ctx.clear_frame_data();
        let events = match (held_before, held) {
            (false, true) => vec![InputEvent::PointerDown { x: 0.0, y: 0.0 }],
            (true, false) => vec![InputEvent::PointerUp { x: 0.0, y: 0.0 }],
            _ => Vec::new(),
        };
        let input = InputQueue::from_events(events);
        ctx.begin_tick(&input, DT);
        game.update(ctx, &input);
        ctx.flush_labels();
    }

    #[test]
    fn init_shows_first_phase_and_labels() {
        let mut game = Breathing::with_config(quick_config());
        let mut ctx = EngineContext::new();
        game.init(&mut ctx);

        assert!(ctx.scene.with_tag("phase1").all(|e| e.active));
        assert!(ctx.scene.with_tag("phase2").all(|e| !e.active));
        assert_eq!(ctx.labels.text(INSTRUCTION_SLOT), Some("Breathe in..."));
        assert_eq!(ctx.labels.text(INSTRUCTION_SLOT + 2), Some("Breathe in..."));
        assert_eq!(ctx.labels.text(TIMER_SLOT), Some("0.5s"));
        assert_eq!(ctx.labels.text(TIMER_SLOT + 1), Some(""));
    }

    #[test]
    fn full_run_requests_victory_scene_once() {
        let mut game = Breathing::with_config(quick_config());
        let mut ctx = EngineContext::new();
        game.init(&mut ctx);

        let mut held = false;
        let mut requests = Vec::new();
        let mut phase_events = 0;
        for _ in 0..2000 {
            let session = game.session();
            let now = match session.phase() {
                Phase::Active(i) => !session.is_satisfied() && session.bar() < game.config.bands[i].center,
                Phase::Complete => false,
            };
            step(&mut game, &mut ctx, held, now);
            held = now;
            phase_events += ctx
                .events
                .iter()
                .filter(|e| e.kind == game_event::PHASE_STARTED)
                .count();
            if let Some(scene) = ctx.take_scene_request() {
                requests.push(scene);
            }
        }
        assert_eq!(phase_events, 2);
        assert_eq!(requests, vec!["Victory".to_string()]);
        assert_eq!(ctx.labels.text(INSTRUCTION_SLOT), Some("Well done!"));
        assert!(ctx.scene.iter().all(|e| !e.active));
    }

    #[test]
    fn load_level_rejects_inverted_range() {
        let mut game = Breathing::new();
        let mut ctx = EngineContext::new();
        game.init(&mut ctx);
        assert!(game
            .load_level(&mut ctx, r#"{ "min_height": 10, "max_height": 5 }"#)
            .is_err());
        assert!(game
            .load_level(&mut ctx, r#"{ "victory_scene": "Next" }"#)
            .is_ok());
        assert_eq!(ctx.scene.len(), PHASE_COUNT);
    }
}
