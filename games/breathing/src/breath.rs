//! Breathing rhythm rules, independent of rendering.
//!
//! Holding the pointer raises a bar, letting go lets it fall. Each of three
//! phases has a band the bar must be kept in for `required_seconds`; after
//! that the player releases and the bar must drop back to the floor before
//! the next phase starts.

use serde::{Deserialize, Serialize};
use tapline_engine::Countdown;

pub const PHASE_COUNT: usize = 3;

/// Distance above `min_height` that counts as "back at the floor".
const FLOOR_SLACK: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub center: f32,
    pub height: f32,
}

impl Band {
    pub fn min(&self) -> f32 {
        self.center - self.height / 2.0
    }

    pub fn max(&self) -> f32 {
        self.center + self.height / 2.0
    }

    pub fn contains(&self, y: f32) -> bool {
        y >= self.min() && y <= self.max()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreathTexts {
    pub breathe: String,
    pub hold: String,
    pub release: String,
    pub error: String,
    pub finished: String,
}

impl Default for BreathTexts {
    fn default() -> Self {
        Self {
            breathe: "Breathe in...".into(),
            hold: "Hold...".into(),
            release: "Release...".into(),
            error: "Wrong breathing!".into(),
            finished: "Well done!".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreathingConfig {
    pub rise_speed: f32,
    pub fall_speed: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub required_seconds: f32,
    pub bands: [Band; PHASE_COUNT],
    pub texts: BreathTexts,
    pub victory_scene: String,
    /// Pause between the last phase and the scene change.
    pub finish_delay: f32,
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            rise_speed: 400.0,
            fall_speed: 300.0,
            min_height: 0.0,
            max_height: 800.0,
            required_seconds: 2.0,
            bands: [
                Band { center: 250.0, height: 150.0 },
                Band { center: 450.0, height: 150.0 },
                Band { center: 650.0, height: 150.0 },
            ],
            texts: BreathTexts::default(),
            victory_scene: "Victory".into(),
            finish_delay: 1.0,
        }
    }
}

impl BreathingConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active(usize),
    Complete,
}

/// Notable things that happened during one `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathStep {
    None,
    /// The bar left the band early; back to the first phase.
    Failed,
    /// Phase `n` (0-based) just began.
    Advanced(usize),
    /// The last phase was cleared.
    Finished,
    /// The post-finish delay ran out; time to change scene.
    SceneDue,
}

#[derive(Debug)]
pub struct BreathingSession {
    config: BreathingConfig,
    bar: f32,
    phase: Phase,
    satisfied: bool,
    error_shown: bool,
    time_in_band: f32,
    instruction: String,
    finish: Countdown,
}

impl BreathingSession {
    pub fn new(config: BreathingConfig) -> Self {
        let instruction = config.texts.breathe.clone();
        Self {
            bar: config.min_height,
            config,
            phase: Phase::Active(0),
            satisfied: false,
            error_shown: false,
            time_in_band: 0.0,
            instruction,
            finish: Countdown::idle(),
        }
    }

    pub fn tick(&mut self, held: bool, dt: f32) -> BreathStep {
        let Phase::Active(phase) = self.phase else {
            return if self.finish.tick(dt) {
                BreathStep::SceneDue
            } else {
                BreathStep::None
            };
        };

        let speed = if held { self.config.rise_speed } else { -self.config.fall_speed };
        self.bar = (self.bar + speed * dt).clamp(self.config.min_height, self.config.max_height);

        let band = self.config.bands[phase];
        if band.contains(self.bar) {
            self.time_in_band += dt;
            if !self.satisfied {
                self.set_instruction(Instruction::Hold);
                self.error_shown = false;
                if self.time_in_band >= self.config.required_seconds {
                    self.satisfied = true;
                    self.set_instruction(Instruction::Release);
                }
            }
        } else if !self.satisfied {
            if self.time_in_band > 0.0 {
                if !self.error_shown {
                    self.fail();
                    return BreathStep::Failed;
                }
                return BreathStep::None;
            }
            if !self.error_shown {
                self.set_instruction(Instruction::Breathe);
            }
        }

        if self.satisfied && self.bar <= self.config.min_height + FLOOR_SLACK {
            return self.advance(phase);
        }
        BreathStep::None
    }

    fn fail(&mut self) {
        log::debug!("Breathing failed in phase {:?}", self.phase);
        self.phase = Phase::Active(0);
        self.satisfied = false;
        self.time_in_band = 0.0;
        self.error_shown = true;
        self.set_instruction(Instruction::Error);
    }

    fn advance(&mut self, phase: usize) -> BreathStep {
        let next = phase + 1;
        self.satisfied = false;
        self.time_in_band = 0.0;
        self.error_shown = false;
        if next >= PHASE_COUNT {
            self.phase = Phase::Complete;
            self.set_instruction(Instruction::Finished);
            self.finish = Countdown::start(self.config.finish_delay);
            return BreathStep::Finished;
        }
        self.phase = Phase::Active(next);
        self.set_instruction(Instruction::Breathe);
        BreathStep::Advanced(next)
    }

    fn set_instruction(&mut self, which: Instruction) {
        let texts = &self.config.texts;
        let text = match which {
            Instruction::Breathe => &texts.breathe,
            Instruction::Hold => &texts.hold,
            Instruction::Release => &texts.release,
            Instruction::Error => &texts.error,
            Instruction::Finished => &texts.finished,
        };
        if self.instruction != *text {
            self.instruction.clone_from(text);
        }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Remaining time for `phase`, e.g. "1.5s". Empty unless `phase` is current.
    pub fn timer_text(&self, phase: usize) -> String {
        match self.phase {
            Phase::Active(current) if current == phase => {
                let left = (self.config.required_seconds - self.time_in_band).max(0.0);
                format!("{:.1}s", left)
            }
            _ => String::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn bar(&self) -> f32 {
        self.bar
    }

    pub fn config(&self) -> &BreathingConfig {
        &self.config
    }

    pub fn is_satisfied(&self) -> bool {
        self.satisfied
    }
}

#[derive(Debug, Clone, Copy)]
enum Instruction {
    Breathe,
    Hold,
    Release,
    Error,
    Finished,
}
