//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod engine;
pub mod entities;
pub mod glyphs;
pub mod level;
pub mod map;
pub mod rect;
pub mod tile;

pub use engine::{EngineError, GameEngine, GameEvent, GamePhase, GameStatus};
pub use entities::{Bullet, Direction, ENEMY_PROFILES, EnemyKind, EnemyProfile, Explosion, Tank, Team};
pub use level::{Decor, LEVEL_PLANS, LayoutError, LevelPlan, generate_level, parse_layout};
pub use map::{BulletHit, TileMap};
pub use rect::RectF;
pub use tile::{QUAD_ALL, QUAD_BL, QUAD_BR, QUAD_TL, QUAD_TR, Tile, TileKind};
