//! Tile grid: terrain storage, collision queries and bullet damage

use glam::Vec2;

use super::entities::Direction;
use super::level::{self, LayoutError};
use super::rect::RectF;
use super::tile::{Tile, TileKind, quadrant_at};
use crate::consts::{BULLET_IMPACT_BIAS, EDGE_EPSILON};

/// Outcome of testing a bullet against terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulletHit {
    /// The bullet was absorbed by terrain
    pub blocked: bool,
    /// The base tile was destroyed
    pub hit_base: bool,
}

/// Fixed-size terrain grid; world bounds never change after construction
#[derive(Debug, Clone)]
pub struct TileMap {
    width: usize,
    height: usize,
    tile_size: f32,
    tiles: Vec<Tile>,
}

impl TileMap {
    pub fn new(tile_size: f32, width: usize, height: usize) -> Result<Self, LayoutError> {
        if !(tile_size > 0.0) {
            return Err(LayoutError::NonPositiveTileSize);
        }
        level::check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            tile_size,
            tiles: vec![Tile::EMPTY; width * height],
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }

    pub fn world_rect(&self) -> RectF {
        let size = self.world_size();
        RectF::new(0.0, 0.0, size.x, size.y)
    }

    /// Replace every cell with the generated layout for `level`
    pub fn load_level(&mut self, level: u32) -> Result<(), LayoutError> {
        let tiles = level::generate_level(level, self.width, self.height)?;
        self.load_tiles(tiles)
    }

    /// Replace every cell from layout text (see [`level::parse_layout`])
    pub fn load_layout(&mut self, text: &str) -> Result<(), LayoutError> {
        let tiles = level::parse_layout(text, self.width, self.height)?;
        self.load_tiles(tiles)
    }

    fn load_tiles(&mut self, tiles: Vec<Tile>) -> Result<(), LayoutError> {
        if tiles.len() != self.tiles.len() {
            return Err(LayoutError::CellCount {
                expected: self.tiles.len(),
                found: tiles.len(),
            });
        }
        self.tiles.copy_from_slice(&tiles);
        Ok(())
    }

    pub fn tile(&self, x: usize, y: usize) -> Option<Tile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.tiles[y * self.width + x])
    }

    pub fn set_tile(&mut self, x: usize, y: usize, tile: Tile) {
        if x < self.width && y < self.height {
            self.tiles[y * self.width + x] = tile;
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile_rect(&self, x: usize, y: usize) -> RectF {
        let ts = self.tile_size;
        RectF::new(x as f32 * ts, y as f32 * ts, ts, ts)
    }

    /// World positions of the three enemy spawn points
    ///
    /// Each point sits on the top-left corner of its spawn cell, so a tank
    /// there straddles the four cells carved around it.
    pub fn enemy_spawn_points(&self) -> [Vec2; 3] {
        let ts = self.tile_size;
        level::enemy_spawn_cells(self.width).map(|(x, y)| Vec2::new(x as f32 * ts, y as f32 * ts))
    }

    /// World center of the player spawn point
    pub fn player_spawn_point(&self) -> Vec2 {
        let ts = self.tile_size;
        let (px, _) = level::player_spawn_cell(self.width, self.height);
        Vec2::new(ts * (px as f32 + 0.5), self.world_size().y - ts * 0.5)
    }

    pub fn base_cell(&self) -> (usize, usize) {
        level::base_cell(self.width, self.height)
    }

    pub fn base_intact(&self) -> bool {
        self.tiles.iter().any(|t| t.kind == TileKind::Base)
    }

    /// Inclusive cell span overlapped by `r`, right/bottom edges half-open
    fn cell_span(&self, r: &RectF) -> (i64, i64, i64, i64) {
        let ts = self.tile_size;
        let min_x = (r.x / ts).floor() as i64;
        let max_x = ((r.right() - EDGE_EPSILON) / ts).floor() as i64;
        let min_y = (r.y / ts).floor() as i64;
        let max_y = ((r.bottom() - EDGE_EPSILON) / ts).floor() as i64;
        (min_x, max_x, min_y, max_y)
    }

    /// True if `r` leaves the world or overlaps solid terrain or a remaining brick quadrant
    pub fn is_rect_blocked(&self, r: &RectF) -> bool {
        let world = self.world_size();
        if r.x < 0.0 || r.y < 0.0 || r.right() > world.x || r.bottom() > world.y {
            return true;
        }

        let (min_x, max_x, min_y, max_y) = self.cell_span(r);
        for y in min_y.max(0)..=max_y.min(self.height as i64 - 1) {
            for x in min_x.max(0)..=max_x.min(self.width as i64 - 1) {
                let (x, y) = (x as usize, y as usize);
                let tile = self.tiles[y * self.width + x];
                if tile.kind.is_passable() {
                    continue;
                }
                let hit = if tile.kind.is_solid() {
                    r.intersects(&self.tile_rect(x, y))
                } else {
                    tile.brick_quadrants(self.tile_size, x, y)
                        .iter()
                        .any(|q| r.intersects(q))
                };
                if hit {
                    return true;
                }
            }
        }
        false
    }

    /// Resolve a bullet against terrain, destroying the base or one brick quadrant
    pub fn try_bullet_hit(&mut self, bullet: &RectF, dir: Direction) -> BulletHit {
        let (min_x, max_x, min_y, max_y) = self.cell_span(bullet);
        let clamp_x = |v: i64| v.clamp(0, self.width as i64 - 1) as usize;
        let clamp_y = |v: i64| v.clamp(0, self.height as i64 - 1) as usize;
        let (min_x, max_x) = (clamp_x(min_x), clamp_x(max_x));
        let (min_y, max_y) = (clamp_y(min_y), clamp_y(max_y));

        let impact = bullet.center() + dir.to_unit() * BULLET_IMPACT_BIAS;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let idx = y * self.width + x;
                match self.tiles[idx].kind {
                    TileKind::Empty | TileKind::Bush | TileKind::Ice => {}
                    TileKind::Base => {
                        self.tiles[idx] = Tile::EMPTY;
                        return BulletHit {
                            blocked: true,
                            hit_base: true,
                        };
                    }
                    TileKind::Steel | TileKind::Water => {
                        return BulletHit {
                            blocked: true,
                            hit_base: false,
                        };
                    }
                    TileKind::Brick => {
                        let local_x = impact.x - x as f32 * self.tile_size;
                        let local_y = impact.y - y as f32 * self.tile_size;
                        let bit = quadrant_at(local_x, local_y, self.tile_size);
                        if self.tiles[idx].clear_quadrant(bit) {
                            return BulletHit {
                                blocked: true,
                                hit_base: false,
                            };
                        }
                    }
                }
            }
        }
        BulletHit::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tile::{QUAD_ALL, QUAD_BL, QUAD_BR, QUAD_TL, QUAD_TR};
    use proptest::prelude::*;

    const TS: f32 = 28.0;

    fn open_map() -> TileMap {
        TileMap::new(TS, 12, 12).unwrap()
    }

    /// Rect strictly inside cell (x, y) at offset (u, v) in [0,1) with edge `s`
    fn rect_in_cell(x: usize, y: usize, u: f32, v: f32, s: f32) -> RectF {
        let room = TS - s - 0.01;
        RectF::new(x as f32 * TS + u * room, y as f32 * TS + v * room, s, s)
    }

    #[test]
    fn test_construction_validates() {
        assert!(matches!(
            TileMap::new(0.0, 50, 26),
            Err(LayoutError::NonPositiveTileSize)
        ));
        assert!(matches!(
            TileMap::new(28.0, 5, 26),
            Err(LayoutError::TooSmall { .. })
        ));
    }

    #[test]
    fn test_outside_world_is_blocked() {
        let map = open_map();
        assert!(map.is_rect_blocked(&RectF::new(-1.0, 10.0, 5.0, 5.0)));
        assert!(map.is_rect_blocked(&RectF::new(330.0, 10.0, 10.0, 5.0)));
        assert!(!map.is_rect_blocked(&RectF::new(326.0, 10.0, 10.0, 5.0)));
    }

    #[test]
    fn test_bush_and_ice_pass() {
        let mut map = open_map();
        map.set_tile(3, 3, Tile::BUSH);
        map.set_tile(4, 3, Tile::ICE);
        assert!(!map.is_rect_blocked(&RectF::new(3.0 * TS, 3.0 * TS, 2.0 * TS, TS)));
    }

    #[test]
    fn test_touching_grid_line_is_not_double_counted() {
        let mut map = open_map();
        map.set_tile(4, 3, Tile::STEEL);
        // Right edge exactly on the steel tile's left edge
        let r = RectF::new(3.0 * TS, 3.0 * TS, TS, TS);
        assert!(!map.is_rect_blocked(&r));
        let r = RectF::new(3.0 * TS + 0.5, 3.0 * TS, TS, TS);
        assert!(map.is_rect_blocked(&r));
    }

    #[test]
    fn test_partial_brick_blocks_only_remaining_quadrants() {
        let mut map = open_map();
        map.set_tile(5, 5, Tile::brick(QUAD_BR));
        let tl = RectF::new(5.0 * TS + 1.0, 5.0 * TS + 1.0, 10.0, 10.0);
        let br = RectF::new(5.0 * TS + 16.0, 5.0 * TS + 16.0, 10.0, 10.0);
        assert!(!map.is_rect_blocked(&tl));
        assert!(map.is_rect_blocked(&br));
    }

    #[test]
    fn test_bullet_hits_base() {
        let mut map = open_map();
        map.set_tile(6, 6, Tile::BASE);
        let bullet = RectF::from_center(Vec2::new(6.5 * TS, 6.5 * TS), 6.0);
        let hit = map.try_bullet_hit(&bullet, Direction::Down);
        assert_eq!(
            hit,
            BulletHit {
                blocked: true,
                hit_base: true
            }
        );
        assert_eq!(map.tile(6, 6), Some(Tile::EMPTY));
        assert!(!map.base_intact());
    }

    #[test]
    fn test_steel_and_water_absorb_without_damage() {
        let mut map = open_map();
        map.set_tile(2, 2, Tile::STEEL);
        map.set_tile(3, 2, Tile::WATER);
        for x in [2.5, 3.5] {
            let bullet = RectF::from_center(Vec2::new(x * TS, 2.5 * TS), 6.0);
            let hit = map.try_bullet_hit(&bullet, Direction::Up);
            assert!(hit.blocked && !hit.hit_base);
        }
        assert_eq!(map.tile(2, 2), Some(Tile::STEEL));
        assert_eq!(map.tile(3, 2), Some(Tile::WATER));
    }

    #[test]
    fn test_impact_point_is_biased_along_travel() {
        let mut map = open_map();
        map.set_tile(4, 4, Tile::BRICK);
        // Center sits 1 unit left of the midpoint; moving right pushes impact into TR
        let bullet = RectF::from_center(Vec2::new(4.0 * TS + 13.0, 4.0 * TS + 5.0), 6.0);
        let hit = map.try_bullet_hit(&bullet, Direction::Right);
        assert!(hit.blocked);
        assert_eq!(map.tile(4, 4).unwrap().brick_mask, QUAD_ALL & !QUAD_TR);
    }

    #[test]
    fn test_cleared_quadrant_lets_bullet_through() {
        let mut map = open_map();
        map.set_tile(4, 4, Tile::brick(QUAD_BR));
        let bullet = RectF::from_center(Vec2::new(4.0 * TS + 5.0, 4.0 * TS + 5.0), 6.0);
        assert_eq!(map.try_bullet_hit(&bullet, Direction::Up), BulletHit::default());
    }

    #[test]
    fn test_four_hits_clear_brick() {
        let mut map = open_map();
        map.set_tile(4, 4, Tile::BRICK);
        let ox = 4.0 * TS;
        let points = [(5.0, 5.0), (22.0, 5.0), (5.0, 22.0), (22.0, 22.0)];
        for (i, (dx, dy)) in points.into_iter().enumerate() {
            let bullet = RectF::from_center(Vec2::new(ox + dx, ox + dy - 2.5), 6.0);
            let hit = map.try_bullet_hit(&bullet, Direction::Down);
            assert!(hit.blocked, "hit {i}");
        }
        assert_eq!(map.tile(4, 4), Some(Tile::EMPTY));
        assert!(!map.is_rect_blocked(&map.tile_rect(4, 4)));
    }

    #[test]
    fn test_enemy_spawn_points_sit_on_spawn_cells() {
        let map = TileMap::new(TS, 50, 26).unwrap();
        let cells = level::enemy_spawn_cells(50);
        for (p, (x, y)) in map.enemy_spawn_points().into_iter().zip(cells) {
            assert_eq!(p, Vec2::new(x as f32 * TS, y as f32 * TS));
        }
    }

    #[test]
    fn test_spawn_points_clear_on_every_level() {
        let mut map = TileMap::new(TS, 50, 26).unwrap();
        for level in 1..=3 {
            map.load_level(level).unwrap();
            for p in map.enemy_spawn_points() {
                assert!(!map.is_rect_blocked(&RectF::from_center(p, crate::consts::TANK_SIZE)));
            }
            let p = map.player_spawn_point();
            assert!(!map.is_rect_blocked(&RectF::from_center(p, crate::consts::TANK_SIZE)));
            assert!(map.base_intact());
        }
    }

    #[test]
    fn test_load_layout_rejects_wrong_dimensions() {
        let mut map = open_map();
        let text = std::iter::repeat_n("............", 11).collect::<Vec<_>>().join("\n");
        assert!(matches!(
            map.load_layout(&text),
            Err(LayoutError::RowCount { expected: 12, found: 11 })
        ));
    }

    proptest! {
        #[test]
        fn solid_tiles_always_block(
            kind in prop_oneof![Just(Tile::STEEL), Just(Tile::WATER), Just(Tile::BASE), Just(Tile::BRICK)],
            x in 1usize..11,
            y in 1usize..11,
            u in 0.0f32..1.0,
            v in 0.0f32..1.0,
            s in 1.0f32..20.0,
        ) {
            let mut map = open_map();
            map.set_tile(x, y, kind);
            prop_assert!(map.is_rect_blocked(&rect_in_cell(x, y, u, v, s)));
        }

        #[test]
        fn empty_and_cleared_tiles_never_block(
            cleared in any::<bool>(),
            x in 1usize..11,
            y in 1usize..11,
            u in 0.0f32..1.0,
            v in 0.0f32..1.0,
            s in 1.0f32..20.0,
        ) {
            let mut map = open_map();
            let mut tile = Tile::BRICK;
            if cleared {
                for bit in [QUAD_TL, QUAD_TR, QUAD_BL, QUAD_BR] {
                    tile.clear_quadrant(bit);
                }
            } else {
                tile = Tile::EMPTY;
            }
            map.set_tile(x, y, tile);
            prop_assert!(!map.is_rect_blocked(&rect_in_cell(x, y, u, v, s)));
        }
    }
}
