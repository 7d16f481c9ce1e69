//! Fixed timestep accumulator
//!
//! Converts variable wall-clock frame deltas into a whole number of
//! simulation ticks per frame.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStep {
    step: f32,
    max_steps: u32,
    max_frame_dt: f32,
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS, MAX_FRAME_DT)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_steps: u32, max_frame_dt: f32) -> Self {
        Self {
            step,
            max_steps,
            max_frame_dt,
            accumulator: 0.0,
        }
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Leftover time below one step
    #[inline]
    pub fn carry(&self) -> f32 {
        self.accumulator
    }

    /// Feed one frame delta and return how many ticks to run.
    ///
    /// Whole steps beyond `max_steps` are dropped (no spiral of death); the
    /// sub-step remainder carries into the next frame.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, self.max_frame_dt)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if self.accumulator >= self.step {
            self.accumulator %= self.step;
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
