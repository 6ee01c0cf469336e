//! Per-tick pointer sampling.
//!
//! Games think in terms of "pressed this tick / held / released this tick"
//! rather than raw events. [`PointerTracker`] folds the event queue of one
//! tick into a [`PointerSample`] and remembers the held state across ticks.

use glam::Vec2;

use super::queue::{InputEvent, InputQueue};

/// Snapshot of the pointer for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    /// Last known world position.
    pub pos: Vec2,
    /// A press began during this tick.
    pub pressed: bool,
    /// Where the press of this tick landed. Later moves in the same tick
    /// only change `pos`.
    pub press_pos: Option<Vec2>,
    /// The pointer is down at the end of this tick.
    pub held: bool,
    /// A press ended during this tick.
    pub released: bool,
}

#[derive(Debug, Default)]
pub struct PointerTracker {
    pos: Vec2,
    held: bool,
    sample: PointerSample,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold this tick's events into a new sample.
    ///
    /// A down and an up in the same tick both register (`pressed` and
    /// `released` set, `held` false) so quick taps are never lost.
    pub fn observe(&mut self, input: &InputQueue) -> PointerSample {
        let mut pressed = false;
        let mut press_pos = None;
        let mut released = false;

        for event in input.iter() {
            if let Some(pos) = event.pointer_pos() {
                self.pos = pos;
            }
            match event {
                InputEvent::PointerDown { x, y } => {
                    pressed = true;
                    press_pos = Some(Vec2::new(*x, *y));
                    self.held = true;
                }
                InputEvent::PointerUp { .. } => {
                    if self.held || pressed {
                        released = true;
                    }
                    self.held = false;
                }
                _ => {}
            }
        }

        self.sample = PointerSample {
            pos: self.pos,
            pressed,
            press_pos,
            held: self.held,
            released,
        };
        self.sample
    }

    /// The sample produced by the most recent `observe`.
    pub fn sample(&self) -> PointerSample {
        self.sample
    }

    /// Forget the held state (e.g. when the page loses focus).
    pub fn cancel(&mut self) {
        self.held = false;
        self.sample = PointerSample { pos: self.pos, ..Default::default() };
    }
}
