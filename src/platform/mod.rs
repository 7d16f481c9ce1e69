//! Platform abstraction layer
//!
//! Handles the host-facing edges of the game:
//! - Input events (held-key set, movement axis)
//! - Time (fixed-step accumulator)

pub mod clock;
pub mod input;

pub use clock::FixedStep;
pub use input::{InputState, Key};
