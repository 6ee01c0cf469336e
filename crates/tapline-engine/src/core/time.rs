/// Fixed timestep accumulator.
/// Ensures game logic runs at a consistent rate regardless of frame time.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: 10,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    ///
    /// Negative or non-finite frame deltas (tab switches, clock jumps) count as zero.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        let frame_dt = if frame_dt.is_finite() { frame_dt.max(0.0) } else { 0.0 };
        self.accumulator = (self.accumulator + frame_dt).min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// One-shot countdown advanced by tick time.
///
/// Replaces "call this in N seconds" engine facilities: the owner ticks it
/// every update and acts on the tick that reports completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    remaining: f32,
    armed: bool,
}

impl Countdown {
    /// An idle countdown that never fires until started.
    pub const fn idle() -> Self {
        Self { remaining: 0.0, armed: false }
    }

    pub fn start(seconds: f32) -> Self {
        Self { remaining: seconds.max(0.0), armed: true }
    }

    /// Advance by `dt`. Returns true exactly once, on the tick the countdown expires.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.armed {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.armed = false;
            self.remaining = 0.0;
            return true;
        }
        false
    }

    pub fn is_running(&self) -> bool {
        self.armed
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::idle()
    }
}
