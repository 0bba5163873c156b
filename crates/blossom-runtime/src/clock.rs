//! Frame clock: clamped host delta and pausable, bounded simulation time

use std::time::Instant;

/// Default upper bound on a single frame step (seconds)
pub const DEFAULT_MAX_DT: f64 = 1.0 / 30.0;

/// Tracks host frame timing and the simulation time derived from it
pub struct FrameClock {
    /// Simulation time in seconds, clamped to `limit`
    pub time: f64,
    /// Clamped host delta of the last tick
    pub delta_time: f64,
    /// Delta applied to simulations this tick (0 while paused or held)
    pub step: f64,
    /// Upper bound on a single frame step
    pub max_dt: f64,
    /// Simulation time never advances past this (timeline total)
    limit: f64,
    paused: bool,
    /// Time is held (not accumulated) until released, e.g. before user unlock
    held: bool,
    last_instant: Option<Instant>,
}

impl FrameClock {
    pub fn new(limit: f64, max_dt: f64) -> Self {
        Self {
            time: 0.0,
            delta_time: 0.0,
            step: 0.0,
            max_dt: if max_dt > 0.0 { max_dt } else { DEFAULT_MAX_DT },
            limit: limit.max(0.0),
            paused: false,
            held: false,
            last_instant: None,
        }
    }

    /// Advance from the wall clock. The first tick yields a zero delta.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let raw = match self.last_instant {
            Some(last) => now.duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last_instant = Some(now);
        self.advance(raw)
    }

    /// Advance by a host-measured delta. Returns the simulation step.
    pub fn advance(&mut self, raw_dt: f64) -> f64 {
        let dt = if raw_dt.is_finite() { raw_dt.clamp(0.0, self.max_dt) } else { 0.0 };
        self.delta_time = dt;

        if self.is_running() {
            self.step = dt;
            self.time = (self.time + dt).min(self.limit);
        } else {
            self.step = 0.0;
        }
        self.step
    }

    pub fn is_running(&self) -> bool {
        !self.paused && !self.held
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn set_held(&mut self, held: bool) {
        self.held = held;
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Whether simulation time has reached the end of the timeline
    pub fn is_finished(&self) -> bool {
        self.time >= self.limit
    }
}
