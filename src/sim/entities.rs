//! Tanks, bullets and explosions
//!
//! Entities carry their own per-tick advance rules; anything that needs to
//! see more than one entity (movement blocking, firing caps, hits) lives in
//! the engine.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::RectF;
use crate::consts::*;
use crate::{exp_approach, snap_to_grid};

/// Side a tank or bullet fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Player,
    Enemy,
}

/// Cardinal facing (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn to_unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
        }
    }

    /// Dominant axis of `v`; ties go to the vertical axis
    pub fn from_vector(v: Vec2) -> Self {
        if v.x.abs() > v.y.abs() {
            if v.x >= 0.0 { Direction::Right } else { Direction::Left }
        } else if v.y >= 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// Enemy variants; tuning lives in [`ENEMY_PROFILES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Light,
    Medium,
    Heavy,
}

/// Per-kind aggression and spawn weighting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    pub kind: EnemyKind,
    /// Probability of actually firing when the fire timer expires
    pub fire_chance: f64,
    /// Fire interval window for a freshly spawned tank
    pub start_interval: (f32, f32),
    /// Window the interval approaches as the tank ages
    pub end_interval: (f32, f32),
    /// Exponential ramp rate (per second of age)
    pub ramp: f32,
    /// Spawn weight: `min(base + per_level * level, max)`
    pub weight_base: f64,
    pub weight_per_level: f64,
    pub weight_max: f64,
    /// HUD label
    pub label: &'static str,
}

impl EnemyProfile {
    /// Spawn weight at `level`
    pub fn weight(&self, level: u32) -> f64 {
        (self.weight_base + self.weight_per_level * level as f64).min(self.weight_max)
    }

    /// Fire interval window for a tank of `age` seconds
    pub fn interval_window(&self, age: f32) -> (f32, f32) {
        let k = exp_approach(self.ramp, age);
        let min = self.start_interval.0 + (self.end_interval.0 - self.start_interval.0) * k;
        let mut max = self.start_interval.1 + (self.end_interval.1 - self.start_interval.1) * k;
        if max < min {
            max = min + FIRE_WINDOW_FLOOR;
        }
        (min, max)
    }
}

/// Ordered easiest first. The first entry takes whatever weight the others
/// leave, so its own weight fields are unused.
pub const ENEMY_PROFILES: [EnemyProfile; 3] = [
    EnemyProfile {
        kind: EnemyKind::Light,
        fire_chance: 0.55,
        start_interval: (0.95, 1.65),
        end_interval: (0.55, 0.95),
        ramp: 0.08,
        weight_base: 0.0,
        weight_per_level: 0.0,
        weight_max: 1.0,
        label: "1",
    },
    EnemyProfile {
        kind: EnemyKind::Medium,
        fire_chance: 0.65,
        start_interval: (0.80, 1.35),
        end_interval: (0.45, 0.78),
        ramp: 0.11,
        weight_base: 0.25,
        weight_per_level: 0.04,
        weight_max: 0.50,
        label: "2",
    },
    EnemyProfile {
        kind: EnemyKind::Heavy,
        fire_chance: 0.75,
        start_interval: (0.65, 1.10),
        end_interval: (0.32, 0.60),
        ramp: 0.16,
        weight_base: 0.10,
        weight_per_level: 0.03,
        weight_max: 0.35,
        label: "3",
    },
];

impl EnemyKind {
    pub fn profile(self) -> &'static EnemyProfile {
        match self {
            EnemyKind::Light => &ENEMY_PROFILES[0],
            EnemyKind::Medium => &ENEMY_PROFILES[1],
            EnemyKind::Heavy => &ENEMY_PROFILES[2],
        }
    }

    /// Map a uniform roll in [0, 1) to a kind. Harder kinds claim the low end
    /// of the roll, the first profile takes the remainder.
    pub fn from_roll(roll: f64, level: u32) -> Self {
        let mut acc = 0.0;
        for profile in ENEMY_PROFILES.iter().skip(1).rev() {
            acc += profile.weight(level);
            if roll < acc {
                return profile.kind;
            }
        }
        ENEMY_PROFILES[0].kind
    }
}

/// Cosmetic colors
pub mod palette {
    pub const PLAYER_BODY: [f32; 4] = [60.0 / 255.0, 210.0 / 255.0, 110.0 / 255.0, 1.0];
    pub const PLAYER_ACCENT: [f32; 4] = [210.0 / 255.0, 1.0, 230.0 / 255.0, 220.0 / 255.0];

    /// Bright, varied enemy bodies
    pub const ENEMY_PALETTE: [[u8; 3]; 8] = [
        [235, 90, 90],
        [255, 165, 70],
        [255, 235, 90],
        [90, 220, 120],
        [80, 210, 255],
        [120, 150, 255],
        [190, 120, 255],
        [255, 120, 210],
    ];

    pub fn enemy_body(index: usize) -> [f32; 4] {
        let [r, g, b] = ENEMY_PALETTE[index % ENEMY_PALETTE.len()];
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
    }

    /// Soft bright accent for a body color
    pub fn accent_for(body: [f32; 4]) -> [f32; 4] {
        let lift = |c: f32| (c + 55.0 / 255.0).min(1.0);
        [lift(body[0]), lift(body[1]), lift(body[2]), 220.0 / 255.0]
    }
}

/// A player or enemy tank
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    pub id: u32,
    pub alive: bool,
    pub team: Team,
    /// `None` for the player
    pub kind: Option<EnemyKind>,
    /// Seconds alive (drives the fire-rate ramp)
    pub age: f32,
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    pub dir: Direction,
    pub speed: f32,
    pub shoot_cooldown: f32,
    pub ai_timer: f32,
    pub fire_timer: f32,
    pub body_color: [f32; 4],
    pub accent_color: [f32; 4],
}

impl Tank {
    pub fn player(id: u32, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            alive: true,
            team: Team::Player,
            kind: None,
            age: 0.0,
            pos,
            vel: Vec2::ZERO,
            dir: Direction::Up,
            speed,
            shoot_cooldown: 0.0,
            ai_timer: 0.0,
            fire_timer: 0.0,
            body_color: palette::PLAYER_BODY,
            accent_color: palette::PLAYER_ACCENT,
        }
    }

    pub fn enemy(id: u32, pos: Vec2, speed: f32, kind: EnemyKind) -> Self {
        let body = palette::enemy_body(0);
        Self {
            id,
            alive: true,
            team: Team::Enemy,
            kind: Some(kind),
            age: 0.0,
            pos,
            vel: Vec2::ZERO,
            dir: Direction::Down,
            speed,
            shoot_cooldown: 0.0,
            ai_timer: 0.4,
            fire_timer: 0.8,
            body_color: body,
            accent_color: palette::accent_for(body),
        }
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        self.team == Team::Player
    }

    pub fn bounds(&self) -> RectF {
        Self::bounds_at(self.pos)
    }

    pub fn bounds_at(center: Vec2) -> RectF {
        RectF::from_center(center, TANK_SIZE)
    }

    /// Where a fired bullet appears
    pub fn muzzle(&self) -> Vec2 {
        self.pos + self.dir.to_unit() * (TANK_SIZE * MUZZLE_OFFSET)
    }

    /// Turn to `desired`, snapping the perpendicular axis onto the grid
    pub fn try_set_dir_snap(&mut self, desired: Direction, tile_size: f32) {
        if self.dir == desired {
            return;
        }
        if desired.is_vertical() {
            self.pos.x = snap_to_grid(self.pos.x, tile_size, TURN_SNAP_EPSILON);
        } else {
            self.pos.y = snap_to_grid(self.pos.y, tile_size, TURN_SNAP_EPSILON);
        }
        self.dir = desired;
    }

    /// Age the tank and run down its shot cooldown
    pub fn update(&mut self, dt: f32) {
        self.age += dt;
        if self.shoot_cooldown > 0.0 {
            self.shoot_cooldown -= dt;
        }
    }
}

/// A projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub alive: bool,
    pub team: Team,
    /// Center
    pub pos: Vec2,
    pub dir: Direction,
    pub speed: f32,
}

impl Bullet {
    pub fn new(id: u32, pos: Vec2, dir: Direction, team: Team, speed: f32) -> Self {
        Self {
            id,
            alive: true,
            team,
            pos,
            dir,
            speed,
        }
    }

    pub fn bounds(&self) -> RectF {
        RectF::from_center(self.pos, BULLET_SIZE)
    }

    /// Straight-line advance, no acceleration
    pub fn update(&mut self, dt: f32) {
        self.pos += self.dir.to_unit() * (self.speed * dt);
    }
}

/// Cosmetic blast; no collision footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub id: u32,
    pub alive: bool,
    pub pos: Vec2,
    pub big: bool,
    elapsed: f32,
    duration: f32,
}

impl Explosion {
    pub fn new(id: u32, pos: Vec2, big: bool) -> Self {
        Self {
            id,
            alive: true,
            pos,
            big,
            elapsed: 0.0,
            duration: if big {
                EXPLOSION_BIG_DURATION
            } else {
                EXPLOSION_SMALL_DURATION
            },
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.alive = false;
        }
    }

    /// 1.0 when fresh, 0.0 when spent
    pub fn intensity(&self) -> f32 {
        (1.0 - self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Current radius: grows from 60% to 150% of the peak radius
    pub fn radius(&self) -> f32 {
        let peak = if self.big {
            EXPLOSION_BIG_RADIUS
        } else {
            EXPLOSION_SMALL_RADIUS
        };
        peak * (0.6 + (1.0 - self.intensity()) * 0.9)
    }
}
