//! Terrain cells and the brick quadrant mask

use serde::{Deserialize, Serialize};

use super::rect::RectF;

/// Brick quadrant bits
pub const QUAD_TL: u8 = 1;
pub const QUAD_TR: u8 = 2;
pub const QUAD_BL: u8 = 4;
pub const QUAD_BR: u8 = 8;
pub const QUAD_ALL: u8 = QUAD_TL | QUAD_TR | QUAD_BL | QUAD_BR;

/// Terrain kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Empty,
    /// Destructible, per quadrant
    Brick,
    /// Indestructible, stops tanks and bullets
    Steel,
    /// Stops tanks and bullets
    Water,
    /// Cosmetic cover, passable
    Bush,
    /// Cosmetic, passable
    Ice,
    /// The player's base; destroyed by any bullet
    Base,
}

impl TileKind {
    /// Whether the whole cell stops tanks (brick is resolved per quadrant)
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Steel | TileKind::Water | TileKind::Base)
    }

    /// Whether this kind never interacts with tanks or bullets
    pub fn is_passable(self) -> bool {
        matches!(self, TileKind::Empty | TileKind::Bush | TileKind::Ice)
    }

    /// ASCII layout symbol
    pub fn symbol(self) -> char {
        match self {
            TileKind::Empty => '.',
            TileKind::Brick => '#',
            TileKind::Steel => 'S',
            TileKind::Water => '~',
            TileKind::Bush => '"',
            TileKind::Ice => '_',
            TileKind::Base => 'B',
        }
    }

    pub fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            '.' | ' ' => Some(TileKind::Empty),
            '#' => Some(TileKind::Brick),
            'S' => Some(TileKind::Steel),
            '~' => Some(TileKind::Water),
            '"' => Some(TileKind::Bush),
            '_' => Some(TileKind::Ice),
            'B' => Some(TileKind::Base),
            _ => None,
        }
    }
}

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    /// Remaining brick quadrants (only meaningful for `Brick`)
    pub brick_mask: u8,
}

impl Tile {
    pub const EMPTY: Tile = Tile::of(TileKind::Empty);
    pub const STEEL: Tile = Tile::of(TileKind::Steel);
    pub const WATER: Tile = Tile::of(TileKind::Water);
    pub const BUSH: Tile = Tile::of(TileKind::Bush);
    pub const ICE: Tile = Tile::of(TileKind::Ice);
    pub const BASE: Tile = Tile::of(TileKind::Base);
    pub const BRICK: Tile = Tile {
        kind: TileKind::Brick,
        brick_mask: QUAD_ALL,
    };

    /// Non-brick tile of `kind` (bricks come out full)
    pub const fn of(kind: TileKind) -> Self {
        let brick_mask = if matches!(kind, TileKind::Brick) { QUAD_ALL } else { 0 };
        Self { kind, brick_mask }
    }

    /// Brick with an explicit mask; a zero mask yields an empty tile
    pub fn brick(mask: u8) -> Self {
        let mask = mask & QUAD_ALL;
        if mask == 0 {
            Self::EMPTY
        } else {
            Self {
                kind: TileKind::Brick,
                brick_mask: mask,
            }
        }
    }

    /// Clear one quadrant bit. Returns false if the bit was already clear.
    pub fn clear_quadrant(&mut self, bit: u8) -> bool {
        if self.kind != TileKind::Brick || self.brick_mask & bit == 0 {
            return false;
        }
        *self = Tile::brick(self.brick_mask & !bit);
        true
    }

    /// World rects of the remaining brick quadrants (TL, TR, BL, BR order)
    pub fn brick_quadrants(&self, tile_size: f32, x: usize, y: usize) -> Vec<RectF> {
        if self.kind != TileKind::Brick || self.brick_mask == 0 {
            return Vec::new();
        }
        let half = tile_size * 0.5;
        let ox = x as f32 * tile_size;
        let oy = y as f32 * tile_size;

        [
            (QUAD_TL, ox, oy),
            (QUAD_TR, ox + half, oy),
            (QUAD_BL, ox, oy + half),
            (QUAD_BR, ox + half, oy + half),
        ]
        .into_iter()
        .filter(|(bit, _, _)| self.brick_mask & bit != 0)
        .map(|(_, qx, qy)| RectF::new(qx, qy, half, half))
        .collect()
    }
}

/// Quadrant bit under a tile-local point, split at the tile midpoint
pub fn quadrant_at(local_x: f32, local_y: f32, tile_size: f32) -> u8 {
    let right = local_x >= tile_size * 0.5;
    let bottom = local_y >= tile_size * 0.5;
    match (right, bottom) {
        (false, false) => QUAD_TL,
        (true, false) => QUAD_TR,
        (false, true) => QUAD_BL,
        (true, true) => QUAD_BR,
    }
}
