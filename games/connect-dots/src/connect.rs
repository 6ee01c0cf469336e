//! Connection state machine.
//!
//! One instance drives a whole level: it decides when a line may start,
//! which samples the line accepts, when the tip snaps to the next dot, and
//! when the level is finished.
//!
//! ```text
//! Idle ──press on current dot──▶ Drawing ──near next dot──▶ AutoCompleting
//!  ▲                               │                            │
//!  └──release / left zone (Cancel)─┘          reached: next segment, Idle or Complete
//! ```

use glam::Vec2;
use tapline_engine::{EngineContext, PointerSample};

use crate::config::{BoundaryPolicy, ChainPolicy, ConnectConfig, ConnectError};
use crate::dots::{Dot, DotRegistry, DOT_LAYER};
use crate::line::LineAccumulator;
use crate::zones::ZoneValidator;

/// The auto-complete tip counts as arrived within this distance of the dot.
pub const AUTO_COMPLETE_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Drawing,
    AutoCompleting,
    Complete,
}

/// What a single `update` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing happened.
    None,
    /// A press landed on a dot other than the current one.
    WrongDot(u32),
    /// A line started from dot `n`.
    Started(u32),
    /// The line accepted or clamped a sample.
    Drawing,
    /// The tip snapped onto the next dot and is gliding to it.
    AutoCompleting,
    /// The line reached dot `n` and was kept.
    Connected(u32),
    /// The unfinished line was thrown away.
    Cancelled,
    /// The last dot was connected.
    Completed,
}

pub struct ConnectionMachine {
    config: ConnectConfig,
    dots: DotRegistry,
    zones: ZoneValidator,
    line: LineAccumulator,
    mode: Mode,
    /// Number of the dot the current segment starts from.
    target: u32,
    current: Option<Dot>,
    next: Option<Dot>,
    /// Last sampled position that was inside the permitted region.
    last_inside: Vec2,
    auto_tip: Vec2,
    connected: u32,
    scene_requested: bool,
    inert: bool,
}

impl ConnectionMachine {
    /// Set up a machine at target 1. A level that cannot be played (no
    /// dot 1, fewer than two dots) leaves the machine inert: it logs the
    /// problem once and ignores all input.
    pub fn new(config: ConnectConfig, dots: DotRegistry, zones: ZoneValidator) -> Self {
        let line = LineAccumulator::new(
            config.min_distance,
            config.line_width,
            config.line_sorting_order,
        );
        let mut machine = Self {
            config,
            dots,
            zones,
            line,
            mode: Mode::Idle,
            target: 1,
            current: None,
            next: None,
            last_inside: Vec2::ZERO,
            auto_tip: Vec2::ZERO,
            connected: 0,
            scene_requested: false,
            inert: false,
        };
        machine.resolve_targets();
        if let Err(e) = machine.check_playable() {
            log::error!("Connect-dots level is not playable: {}", e);
            machine.inert = true;
        }
        machine
    }

    fn check_playable(&self) -> Result<(), ConnectError> {
        if self.current.is_none() {
            return Err(ConnectError::DotNotFound(1));
        }
        if self.next.is_none() {
            return Err(ConnectError::DotNotFound(2));
        }
        Ok(())
    }

    fn resolve_targets(&mut self) {
        self.current = self.dots.find_by_number(self.target).copied();
        self.next = self.dots.find_by_number(self.target + 1).copied();
    }

    /// Number of dots that make up a finished level.
    fn dot_limit(&self) -> u32 {
        let total = self.dots.len() as u32;
        match self.config.max_dots_to_connect {
            Some(max) => max.clamp(2, total.max(2)),
            None => total,
        }
    }

    /// Advance one tick using the pointer sample already stored in `ctx`.
    pub fn update(&mut self, ctx: &mut EngineContext) -> Step {
        if self.inert {
            return Step::None;
        }
        let pointer = ctx.pointer();

        let mut step = Step::None;
        if pointer.pressed && self.mode == Mode::Idle {
            step = self.try_start(ctx, pointer.press_pos.unwrap_or(pointer.pos));
        }

        match self.mode {
            Mode::Drawing => self.draw(ctx, pointer),
            Mode::AutoCompleting => self.auto_complete(ctx),
            Mode::Idle | Mode::Complete => step,
        }
    }

    fn try_start(&mut self, ctx: &mut EngineContext, pos: Vec2) -> Step {
        let Some(number) = ctx
            .spatial
            .pick(pos, DOT_LAYER)
            .and_then(|entity| self.dots.number_for(entity))
        else {
            return Step::None;
        };
        if number != self.target {
            log::debug!("Pressed dot {} while dot {} is current", number, self.target);
            return Step::WrongDot(number);
        }
        self.start_segment(ctx);
        Step::Started(number)
    }

    fn start_segment(&mut self, ctx: &mut EngineContext) {
        let Some(current) = self.current else {
            log::warn!("{}", ConnectError::DotNotFound(self.target));
            return;
        };
        let color = self.config.coloring.color_for(self.target);
        self.line.start_line(&mut ctx.polylines, current.pos, color);
        self.zones.activate_for_target(self.target);
        self.last_inside = current.pos;
        self.mode = Mode::Drawing;
    }

    fn draw(&mut self, ctx: &mut EngineContext, pointer: PointerSample) -> Step {
        if !pointer.held {
            return self.cancel(ctx);
        }

        let pos = pointer.pos;
        let inside = self.zones.is_valid(ctx.spatial.as_ref(), pos);
        if inside {
            self.last_inside = pos;
            self.line.append_point(&mut ctx.polylines, pos);
        } else if pos.distance(self.last_inside) <= self.config.error_margin {
            self.line.append_point(&mut ctx.polylines, pos);
        } else {
            match self.config.boundary_policy {
                BoundaryPolicy::Clamp => {
                    let clamped = self.last_inside;
                    self.line.append_point(&mut ctx.polylines, clamped);
                }
                BoundaryPolicy::Cancel => return self.cancel(ctx),
            }
        }

        match self.next {
            Some(next) if pos.distance(next.pos) <= self.config.error_margin => {
                self.auto_tip = self.line.last_point().unwrap_or(pos);
                self.mode = Mode::AutoCompleting;
                Step::AutoCompleting
            }
            _ => Step::Drawing,
        }
    }

    fn auto_complete(&mut self, ctx: &mut EngineContext) -> Step {
        let Some(next) = self.next else {
            return self.cancel(ctx);
        };
        let max_step = self.config.auto_complete_speed.max(0.0) * ctx.dt();
        let to_target = next.pos - self.auto_tip;
        let dist = to_target.length();
        self.auto_tip = if dist <= max_step {
            next.pos
        } else {
            self.auto_tip + to_target / dist * max_step
        };

        if self.auto_tip.distance(next.pos) <= AUTO_COMPLETE_EPSILON {
            return self.finish_segment(ctx, next);
        }
        self.line.append_point(&mut ctx.polylines, self.auto_tip);
        Step::AutoCompleting
    }

    fn finish_segment(&mut self, ctx: &mut EngineContext, reached: Dot) -> Step {
        self.line.finalize(&mut ctx.polylines, reached.pos);
        self.zones.deactivate_all();
        self.connected += 1;
        self.target += 1;
        self.current = self.next;
        self.next = self.dots.find_by_number(self.target + 1).copied();
        log::debug!("Connected dot {}", reached.number);

        let limit = self.dot_limit();
        if self.target >= limit {
            self.mode = Mode::Complete;
            if !self.scene_requested {
                self.scene_requested = true;
                log::info!("All {} dots connected", limit);
                self.request_next_scene(ctx);
            }
            return Step::Completed;
        }

        match self.config.chain_policy {
            ChainPolicy::Chain => self.start_segment(ctx),
            ChainPolicy::PressPerSegment => self.mode = Mode::Idle,
        }
        Step::Connected(reached.number)
    }

    fn request_next_scene(&self, ctx: &mut EngineContext) {
        if self.config.next_scene_name.is_empty() {
            log::warn!("{}", ConnectError::ConfigurationMissing("next_scene_name"));
            return;
        }
        ctx.load_scene(&self.config.next_scene_name);
    }

    fn cancel(&mut self, ctx: &mut EngineContext) -> Step {
        self.line.cancel(&mut ctx.polylines);
        self.zones.deactivate_all();
        self.mode = Mode::Idle;
        Step::Cancelled
    }

    /// Back to dot 1. Connected lines stay on screen.
    pub fn reset(&mut self, ctx: &mut EngineContext) {
        self.line.cancel(&mut ctx.polylines);
        self.zones.deactivate_all();
        self.target = 1;
        self.resolve_targets();
        self.connected = 0;
        self.scene_requested = false;
        self.mode = Mode::Idle;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn current_dot(&self) -> Option<&Dot> {
        self.current.as_ref()
    }

    pub fn next_dot(&self) -> Option<&Dot> {
        self.next.as_ref()
    }

    pub fn connected(&self) -> u32 {
        self.connected
    }

    pub fn is_inert(&self) -> bool {
        self.inert
    }

    pub fn dots(&self) -> &DotRegistry {
        &self.dots
    }

    pub fn dots_mut(&mut self) -> &mut DotRegistry {
        &mut self.dots
    }

    pub fn zones(&self) -> &ZoneValidator {
        &self.zones
    }

    pub fn line(&self) -> &LineAccumulator {
        &self.line
    }
}
