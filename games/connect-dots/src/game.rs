use std::error::Error;

use tapline_engine::*;

use crate::config::ZonePolicy;
use crate::connect::{ConnectionMachine, Step};
use crate::dots::{DotRegistry, DOT_LAYER};
use crate::level::LevelManifest;
use crate::zones::{ZoneValidator, ZONE_LAYER};

const WORLD_W: f32 = 16.0;
const WORLD_H: f32 = 9.0;

/// Played on every press, wherever it lands.
pub const TAP_CUE: SoundEvent = SoundEvent(1);
const MUSIC_TRACK: u32 = 1;

/// Custom input kinds accepted from the host.
pub mod input_kind {
    /// Start the level over from dot 1.
    pub const RESET: u32 = 1;
}

/// Game events sent to the host, on top of the engine's own.
pub mod game_event {
    /// `a` = number of the dot just reached.
    pub const CONNECTED: f32 = 100.0;
    pub const COMPLETED: f32 = 101.0;
    /// `a` = number of the dot that was pressed out of order.
    pub const WRONG_DOT: f32 = 102.0;
}

pub struct ConnectDots {
    level: LevelManifest,
    machine: Option<ConnectionMachine>,
}

impl ConnectDots {
    pub fn new() -> Self {
        Self::with_level(LevelManifest::default())
    }

    pub fn with_level(level: LevelManifest) -> Self {
        Self {
            level,
            machine: None,
        }
    }

    pub fn machine(&self) -> Option<&ConnectionMachine> {
        self.machine.as_ref()
    }

    /// Replace the world with the current level's dots and zones.
    fn build(&mut self, ctx: &mut EngineContext) {
        ctx.clear_world();

        let mut dots = match DotRegistry::from_defs(&self.level.dots) {
            Ok(dots) => dots,
            Err(e) => {
                log::error!("Invalid dots: {}", e);
                DotRegistry::default()
            }
        };
        let placed: Vec<_> = dots.iter().copied().collect();
        for dot in placed {
            let id = ctx.next_id();
            ctx.spawn_with_region(
                Entity::new(id)
                    .with_tag("dot")
                    .with_pos(dot.pos)
                    .with_scale(dot.radius),
                Region::circle(dot.pos, dot.radius),
                DOT_LAYER,
            );
            dots.bind_entity(dot.number, id);
        }

        let mut zone_ids = Vec::with_capacity(self.level.zones.len());
        for region in &self.level.zones {
            let id = ctx.next_id();
            ctx.spawn_with_region(
                Entity::new(id)
                    .with_tag("zone")
                    .with_pos(region.center())
                    .with_active(false),
                region.clone(),
                ZONE_LAYER,
            );
            zone_ids.push(id);
        }

        let zones = ZoneValidator::new(zone_ids, self.level.config.zone_policy)
            .with_unzoned_gap(self.level.config.unzoned_gap);
        self.machine = Some(ConnectionMachine::new(self.level.config.clone(), dots, zones));
        self.sync_zone_visibility(ctx);
        log::info!(
            "Level built: {} dots, {} zones",
            self.level.dots.len(),
            self.level.zones.len()
        );
    }

    fn sync_zone_visibility(&self, ctx: &mut EngineContext) {
        let Some(machine) = &self.machine else {
            return;
        };
        let zones = machine.zones();
        let show_all = self.level.config.zone_policy == ZonePolicy::AnyZone;
        for i in 0..zones.len() {
            if let Some(id) = zones.entity(i) {
                ctx.scene.set_active(id, show_all || zones.is_active(i));
            }
        }
    }
}

impl Default for ConnectDots {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for ConnectDots {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: 1.0 / 60.0,
            world_width: WORLD_W,
            world_height: WORLD_H,
            audio: AudioSettings {
                default_volume: 0.5,
                music: Some(MUSIC_TRACK),
                cues: vec![CueDef { id: TAP_CUE.0, duration: 0.08 }],
            },
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.build(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let reset = input.custom().any(|(kind, ..)| kind == input_kind::RESET);
        let Some(machine) = self.machine.as_mut() else {
            return;
        };
        if reset {
            log::info!("Reset requested");
            machine.reset(ctx);
        }

        if ctx.pointer().pressed {
            ctx.play_cue(TAP_CUE);
        }

        match machine.update(ctx) {
            Step::Connected(n) => {
                ctx.emit_event(GameEvent::with_payload(game_event::CONNECTED, n as f32, 0.0, 0.0));
            }
            Step::Completed => {
                ctx.emit_event(GameEvent::new(game_event::COMPLETED));
            }
            Step::WrongDot(n) => {
                ctx.emit_event(GameEvent::with_payload(game_event::WRONG_DOT, n as f32, 0.0, 0.0));
            }
            _ => {}
        }

        self.sync_zone_visibility(ctx);
    }

    #[cfg(feature = "vectors")]
    fn render(&self, ctx: &mut RenderContext) {
        let Some(machine) = &self.machine else {
            return;
        };

        // Zones under everything
        for (i, region) in self.level.zones.iter().enumerate() {
            let visible = machine
                .zones()
                .entity(i)
                .and_then(|id| ctx.scene.get(id))
                .is_some_and(|e| e.active);
            if visible {
                let outline = region.outline(48);
                ctx.vectors.fill_polygon(&outline, VectorColor::YELLOW.with_alpha(0.12));
                ctx.vectors.stroke_polygon(&outline, 0.04, VectorColor::YELLOW.with_alpha(0.5));
            }
        }

        ctx.vectors.draw_polylines(ctx.polylines);

        let coloring = &self.level.config.coloring;
        let complete = machine.mode() == crate::connect::Mode::Complete;
        for dot in machine.dots().iter() {
            let color = if dot.number < machine.target() || complete {
                coloring.color_for(dot.number)
            } else if dot.number == machine.target() {
                VectorColor::YELLOW
            } else {
                VectorColor::WHITE
            };
            ctx.vectors.fill_circle(dot.pos, dot.radius, color);
            ctx.vectors.stroke_circle(dot.pos, dot.radius, 0.05, VectorColor::BLACK);
        }
    }

    fn load_level(&mut self, ctx: &mut EngineContext, json: &str) -> Result<(), Box<dyn Error>> {
        let level = LevelManifest::from_json(json)?;
        self.level = level;
        self.build(ctx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect::Mode;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn start(game: &mut ConnectDots) -> EngineContext {
        let mut ctx = EngineContext::with_config(&game.config());
        game.init(&mut ctx);
        ctx
    }

    fn step(game: &mut ConnectDots, ctx: &mut EngineContext, events: Vec<InputEvent>) {
        let input = InputQueue::from_events(events);
        ctx.clear_frame_data();
        ctx.begin_tick(&input, DT);
        game.update(ctx, &input);
    }

    fn three_dots() -> &'static str {
        r#"{
            "dots": [
                { "number": 1, "x": 0, "y": 0, "radius": 0.3 },
                { "number": 2, "x": 3, "y": 0, "radius": 0.3 },
                { "number": 3, "x": 3, "y": 3, "radius": 0.3 }
            ],
            "zones": [
                { "shape": "rect", "min": [-0.5, -0.5], "max": [3.5, 0.5] },
                { "shape": "rect", "min": [2.5, -0.5], "max": [3.5, 3.5] }
            ],
            "config": { "next_scene_name": "Victory" }
        }"#
    }

    fn drag(game: &mut ConnectDots, ctx: &mut EngineContext, from: Vec2, to: Vec2) {
        for i in 1..=30 {
            let p = from.lerp(to, i as f32 / 30.0);
            step(game, ctx, vec![InputEvent::PointerMove { x: p.x, y: p.y }]);
        }
        for _ in 0..60 {
            step(game, ctx, vec![]);
        }
    }

    #[test]
    fn init_spawns_dots_and_hidden_zones() {
        let mut game = ConnectDots::new();
        let ctx = start(&mut game);
        let level = LevelManifest::default();
        assert_eq!(ctx.scene.with_tag("dot").count(), level.dots.len());
        assert_eq!(ctx.scene.with_tag("zone").count(), level.zones.len());
        assert!(ctx.scene.with_tag("zone").all(|e| !e.active));
        assert_eq!(game.machine().unwrap().target(), 1);
    }

    #[test]
    fn every_press_plays_tap_cue() {
        let mut game = ConnectDots::new();
        let mut ctx = start(&mut game);
        // Press on empty space: no line, but the cue still plays
        step(&mut game, &mut ctx, vec![InputEvent::PointerDown { x: 7.0, y: 4.0 }]);
        assert_eq!(ctx.sounds, vec![TAP_CUE]);
        assert_eq!(game.machine().unwrap().mode(), Mode::Idle);
    }

    #[test]
    fn pressing_active_dot_shows_its_zone() {
        let mut game = ConnectDots::new();
        let mut ctx = start(&mut game);
        step(&mut game, &mut ctx, vec![InputEvent::PointerDown { x: -4.0, y: -3.0 }]);

        let machine = game.machine().unwrap();
        assert_eq!(machine.mode(), Mode::Drawing);
        let zone0 = machine.zones().entity(0).unwrap();
        assert!(ctx.scene.get(zone0).unwrap().active);
        assert_eq!(ctx.scene.with_tag("zone").filter(|e| e.active).count(), 1);
    }

    #[test]
    fn wrong_dot_is_reported() {
        let mut game = ConnectDots::new();
        let mut ctx = start(&mut game);
        step(&mut game, &mut ctx, vec![InputEvent::PointerDown { x: -4.0, y: 1.0 }]);
        assert!(ctx
            .events
            .iter()
            .any(|e| e.kind == game_event::WRONG_DOT && e.a == 2.0));
    }

    #[test]
    fn three_dot_level_plays_to_victory() {
        let mut game = ConnectDots::new();
        let mut ctx = start(&mut game);
        game.load_level(&mut ctx, three_dots()).unwrap();

        step(&mut game, &mut ctx, vec![InputEvent::PointerDown { x: 0.0, y: 0.0 }]);
        drag(&mut game, &mut ctx, Vec2::ZERO, Vec2::new(3.0, 0.0));
        assert_eq!(game.machine().unwrap().target(), 2);

        let mut saw_complete = false;
        for i in 1..=30 {
            let p = Vec2::new(3.0, 0.0).lerp(Vec2::new(3.0, 3.0), i as f32 / 30.0);
            step(&mut game, &mut ctx, vec![InputEvent::PointerMove { x: p.x, y: p.y }]);
            saw_complete |= ctx.events.iter().any(|e| e.kind == game_event::COMPLETED);
        }
        for _ in 0..60 {
            step(&mut game, &mut ctx, vec![]);
            saw_complete |= ctx.events.iter().any(|e| e.kind == game_event::COMPLETED);
        }

        assert!(saw_complete);
        assert_eq!(game.machine().unwrap().mode(), Mode::Complete);
        assert_eq!(ctx.take_scene_request().as_deref(), Some("Victory"));
    }

    #[test]
    fn reset_event_restarts_from_dot_one() {
        let mut game = ConnectDots::new();
        let mut ctx = start(&mut game);
        game.load_level(&mut ctx, three_dots()).unwrap();
        step(&mut game, &mut ctx, vec![InputEvent::PointerDown { x: 0.0, y: 0.0 }]);
        drag(&mut game, &mut ctx, Vec2::ZERO, Vec2::new(3.0, 0.0));
        step(&mut game, &mut ctx, vec![InputEvent::PointerUp { x: 3.0, y: 0.0 }]);

        step(
            &mut game,
            &mut ctx,
            vec![InputEvent::Custom { kind: input_kind::RESET, a: 0.0, b: 0.0, c: 0.0 }],
        );
        let machine = game.machine().unwrap();
        assert_eq!(machine.target(), 1);
        assert_eq!(machine.line().permanent_count(), 1);
        assert_eq!(ctx.polylines.len(), 1);
    }

    #[test]
    fn bad_level_is_rejected_and_old_level_kept() {
        let mut game = ConnectDots::new();
        let mut ctx = start(&mut game);
        let dots_before = ctx.scene.with_tag("dot").count();
        assert!(game.load_level(&mut ctx, "{ not json").is_err());
        assert_eq!(ctx.scene.with_tag("dot").count(), dots_before);
    }
}
