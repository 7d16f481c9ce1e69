//! Battle Tank - A grid arena tank battle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile map, entities, engine state machine)
//! - `renderer`: Drawing-surface contract and a triangle mesh backend
//! - `platform`: Input mapping and the fixed-step clock
//! - `settings`: Data-driven game rules and render options

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{ConfigError, RenderOptions, Settings};
pub use sim::{GameEngine, GamePhase, GameStatus};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for stable collision)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Longest wall-clock frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Tank bounding box edge length
    pub const TANK_SIZE: f32 = 22.0;
    /// Bullet collision box edge length (kept small for stable gameplay)
    pub const BULLET_SIZE: f32 = 6.0;
    /// Muzzle offset from the tank center, as a fraction of `TANK_SIZE`
    pub const MUZZLE_OFFSET: f32 = 0.62;
    /// Distance the brick impact point is pushed along the travel direction
    pub const BULLET_IMPACT_BIAS: f32 = 2.5;

    /// Perpendicular snap window when a tank turns
    pub const TURN_SNAP_EPSILON: f32 = 2.2;
    /// Slack subtracted from right/bottom edges before flooring to a tile index
    pub const EDGE_EPSILON: f32 = 0.001;

    /// Explosion lifetimes (seconds)
    pub const EXPLOSION_BIG_DURATION: f32 = 0.28;
    pub const EXPLOSION_SMALL_DURATION: f32 = 0.18;
    /// Explosion peak radii
    pub const EXPLOSION_BIG_RADIUS: f32 = 22.0;
    pub const EXPLOSION_SMALL_RADIUS: f32 = 12.0;

    /// AI re-think interval: base + uniform(0, spread)
    pub const AI_INTERVAL_BASE: f32 = 0.35;
    pub const AI_INTERVAL_SPREAD: f32 = 0.9;
    /// First enemy shot: base + interval * scale
    pub const FIRST_SHOT_DELAY: f32 = 0.25;
    pub const FIRST_SHOT_SCALE: f32 = 0.35;
    /// Minimum width of a fire-interval window
    pub const FIRE_WINDOW_FLOOR: f32 = 0.01;
}

/// Snap `value` to the nearest multiple of `step` when it is within `eps`
#[inline]
pub fn snap_to_grid(value: f32, step: f32, eps: f32) -> f32 {
    let grid = (value / step).round() * step;
    if (value - grid).abs() <= eps { grid } else { value }
}

/// Exponential approach from 0 toward 1: `1 - e^(-rate * t)`
#[inline]
pub fn exp_approach(rate: f32, t: f32) -> f32 {
    1.0 - (-rate * t.max(0.0)).exp()
}

/// Scale and offset that fit `world` inside `surface` preserving aspect ratio
#[inline]
pub fn letterbox(world: Vec2, surface: Vec2) -> (f32, Vec2) {
    let scale = (surface.x / world.x).min(surface.y / world.y);
    let offset = (surface - world * scale) * 0.5;
    (scale, offset)
}
