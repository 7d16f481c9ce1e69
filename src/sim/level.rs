//! Level layout generation
//!
//! Every layout is a pure function of the level index and grid dimensions:
//! steel border, decorative obstacles, a brick banner naming the level, the
//! base fortress and finally spawn-zone carving (which leaves the fortress
//! alone). No RNG is involved.

use serde::{Deserialize, Serialize};

use super::glyphs::{GLYPH_HEIGHT, GLYPH_WIDTH, glyph, normalize_text, text_width};
use super::tile::{Tile, TileKind};

/// Smallest grid that fits the spawn row, the fortress and a playable gap
pub const MIN_WIDTH: usize = 10;
pub const MIN_HEIGHT: usize = 10;

/// Radius (in cells) of the clear zone carved around every spawn point
pub const SPAWN_CARVE_RADIUS: i32 = 2;

/// Errors raised while building or validating a layout
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("grid {width}x{height} is smaller than the minimum {min_width}x{min_height}")]
    TooSmall {
        width: usize,
        height: usize,
        min_width: usize,
        min_height: usize,
    },

    #[error("tile size must be positive")]
    NonPositiveTileSize,

    #[error("layout declares {expected} rows but has {found}")]
    RowCount { expected: usize, found: usize },

    #[error("row {row} declares {expected} columns but has {found}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("layout has {found} cells, grid needs {expected}")]
    CellCount { expected: usize, found: usize },

    #[error("unknown tile symbol {ch:?} at row {row}, column {col}")]
    UnknownTile { row: usize, col: usize, ch: char },

    #[error("level {0} does not exist (levels start at 1)")]
    UnknownLevel(u32),
}

/// Decorative obstacle set stamped for a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decor {
    /// Water lanes, steel pillars and bush patches
    Lanes,
    /// Ice bands with bush cover, open middle
    IceFields,
    /// Brick pillar columns and a checkered water pool
    Maze,
}

/// Static description of one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelPlan {
    /// Banner lines; `{n}` expands to the two-digit level number
    pub banner: &'static [&'static str],
    pub scale: usize,
    pub spacing: usize,
    pub line_spacing: usize,
    pub banner_top: usize,
    pub decor: Decor,
    /// Stamp decor before the banner (banner wins on overlap)
    pub decor_first: bool,
}

/// Campaign plans; levels past the end cycle through the table
pub const LEVEL_PLANS: [LevelPlan; 3] = [
    LevelPlan {
        banner: &["{n}"],
        scale: 2,
        spacing: 1,
        line_spacing: 0,
        banner_top: 5,
        decor: Decor::Lanes,
        decor_first: false,
    },
    LevelPlan {
        banner: &["LEVEL", "{n}"],
        scale: 1,
        spacing: 2,
        line_spacing: 1,
        banner_top: 8,
        decor: Decor::IceFields,
        decor_first: true,
    },
    LevelPlan {
        banner: &["{n}"],
        scale: 2,
        spacing: 1,
        line_spacing: 0,
        banner_top: 5,
        decor: Decor::Maze,
        decor_first: false,
    },
];

/// Plan for a 1-based level index
pub fn plan_for(level: u32) -> Result<&'static LevelPlan, LayoutError> {
    if level == 0 {
        return Err(LayoutError::UnknownLevel(level));
    }
    Ok(&LEVEL_PLANS[(level as usize - 1) % LEVEL_PLANS.len()])
}

/// Enemy spawn cells along the top of the map
pub fn enemy_spawn_cells(width: usize) -> [(usize, usize); 3] {
    [(2, 2), (width / 2, 2), (width - 2, 2)]
}

/// Cell the player spawns in: a bottom border notch two columns left of the
/// base, so the opening line of fire runs past the fortress
pub fn player_spawn_cell(width: usize, height: usize) -> (usize, usize) {
    (width / 2 - 2, height - 1)
}

/// Cell holding the base
pub fn base_cell(width: usize, height: usize) -> (usize, usize) {
    (width / 2, height - 3)
}

pub fn check_dimensions(width: usize, height: usize) -> Result<(), LayoutError> {
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        return Err(LayoutError::TooSmall {
            width,
            height,
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
        });
    }
    Ok(())
}

/// Build the full tile grid for `level`
pub fn generate_level(level: u32, width: usize, height: usize) -> Result<Vec<Tile>, LayoutError> {
    check_dimensions(width, height)?;
    let plan = plan_for(level)?;
    let mut grid = Grid::new(width, height);

    grid.stamp_border();

    let lines: Vec<String> = plan
        .banner
        .iter()
        .map(|line| line.replace("{n}", &format!("{level:02}")))
        .collect();

    if plan.decor_first {
        grid.stamp_decor(plan.decor);
        grid.stamp_banner(&lines, plan);
    } else {
        grid.stamp_banner(&lines, plan);
        grid.stamp_decor(plan.decor);
    }

    grid.stamp_fortress();
    grid.carve_spawn_zones();

    Ok(grid.cells)
}

/// Parse a hand-authored layout, one text row per grid row
///
/// Symbols: `.` empty, `#` brick, `S` steel, `~` water, `"` bush, `_` ice, `B` base.
pub fn parse_layout(text: &str, width: usize, height: usize) -> Result<Vec<Tile>, LayoutError> {
    check_dimensions(width, height)?;
    let rows: Vec<&str> = text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .collect();

    if rows.len() != height {
        return Err(LayoutError::RowCount {
            expected: height,
            found: rows.len(),
        });
    }

    let mut cells = Vec::with_capacity(width * height);
    for (row, line) in rows.iter().enumerate() {
        let found = line.chars().count();
        if found != width {
            return Err(LayoutError::RowWidth {
                row,
                expected: width,
                found,
            });
        }
        for (col, ch) in line.chars().enumerate() {
            let kind = TileKind::from_symbol(ch).ok_or(LayoutError::UnknownTile { row, col, ch })?;
            cells.push(Tile::of(kind));
        }
    }
    Ok(cells)
}

/// Render a grid back to layout text
pub fn format_layout(cells: &[Tile], width: usize) -> String {
    cells
        .chunks(width)
        .map(|row| row.iter().map(|t| t.kind.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Scratch grid used while stamping a layout
struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl Grid {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Tile::EMPTY; width * height],
        }
    }

    fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.cells[y as usize * self.width + x as usize] = tile;
    }

    /// Set only inside the border ring
    fn set_interior(&mut self, x: i32, y: i32, tile: Tile) {
        if x < 1 || y < 1 || x as usize >= self.width - 1 || y as usize >= self.height - 1 {
            return;
        }
        self.set(x, y, tile);
    }

    fn stamp_border(&mut self) {
        let (w, h) = (self.width as i32, self.height as i32);
        for x in 0..w {
            self.set(x, 0, Tile::STEEL);
            self.set(x, h - 1, Tile::STEEL);
        }
        for y in 0..h {
            self.set(0, y, Tile::STEEL);
            self.set(w - 1, y, Tile::STEEL);
        }
    }

    fn stamp_decor(&mut self, decor: Decor) {
        let (w, h) = (self.width as i32, self.height as i32);
        match decor {
            Decor::Lanes => {
                for x in (6..w - 6).step_by(6) {
                    self.set_interior(x, 12, Tile::WATER);
                    self.set_interior(x, 13, Tile::WATER);
                }
                for y in (6..h - 8).step_by(5) {
                    self.set_interior(10, y, Tile::STEEL);
                    self.set_interior(w - 11, y, Tile::STEEL);
                }
                for x in (4..w - 4).step_by(8) {
                    self.set_interior(x, 18, Tile::BUSH);
                    self.set_interior(x + 1, 18, Tile::BUSH);
                }
            }
            Decor::IceFields => {
                for y in [5, h - 7] {
                    for x in 3..w - 3 {
                        self.set_interior(x, y, Tile::ICE);
                    }
                }
                for x in (5..w - 5).step_by(10) {
                    for dy in 0..2 {
                        self.set_interior(x, 3 + dy, Tile::BUSH);
                        self.set_interior(x + 1, 3 + dy, Tile::BUSH);
                    }
                }
            }
            Decor::Maze => {
                for y in (4..h - 6).filter(|y| y % 2 == 0) {
                    self.set_interior(8, y, Tile::BRICK);
                    self.set_interior(w - 9, y, Tile::BRICK);
                }
                for y in 10..=13 {
                    for x in 22..=27 {
                        if (x + y) % 2 == 0 {
                            self.set_interior(x, y, Tile::WATER);
                        }
                    }
                }
            }
        }
    }

    /// Stamp banner lines centered as one block, each line centered within it
    fn stamp_banner(&mut self, lines: &[String], plan: &LevelPlan) {
        let lines: Vec<String> = lines.iter().map(|l| normalize_text(l)).collect();
        if lines.is_empty() {
            return;
        }
        let scale = plan.scale.max(1);

        let widths: Vec<usize> = lines
            .iter()
            .map(|l| text_width(l.chars().count(), plan.spacing) * scale)
            .collect();
        let max_w = widths.iter().copied().max().unwrap_or(0);

        let line_step = (GLYPH_HEIGHT + plan.line_spacing) * scale;
        let total_h = lines.len() * GLYPH_HEIGHT * scale
            + lines.len().saturating_sub(1) * plan.line_spacing * scale;

        let max_top = self.height.saturating_sub(total_h + 2);
        let start_y = plan.banner_top.min(max_top).max(1);
        let block_x = (self.width.saturating_sub(max_w) / 2).max(1);

        for (i, line) in lines.iter().enumerate() {
            let x = block_x + (max_w - widths[i]) / 2;
            let y = start_y + i * line_step;
            self.stamp_line(line, scale, plan.spacing, x, y);
        }
    }

    fn stamp_line(&mut self, text: &str, scale: usize, spacing: usize, start_x: usize, start_y: usize) {
        let mut cursor = 0;
        for ch in text.chars() {
            let bitmap = glyph(ch);
            for (gy, row) in bitmap.iter().enumerate() {
                for (gx, &on) in row.iter().enumerate() {
                    if !on {
                        continue;
                    }
                    let px = start_x + (cursor + gx) * scale;
                    let py = start_y + gy * scale;
                    for sy in 0..scale {
                        for sx in 0..scale {
                            self.set_interior((px + sx) as i32, (py + sy) as i32, Tile::BRICK);
                        }
                    }
                }
            }
            cursor += GLYPH_WIDTH + spacing;
        }
    }

    /// Base with a brick guard ring; the cells flanking the spawn lane stay open
    fn stamp_fortress(&mut self) {
        let (bx, by) = base_cell(self.width, self.height);
        let (bx, by) = (bx as i32, by as i32);
        let lane = player_spawn_cell(self.width, self.height).0 as i32;

        for y in by - 1..=by + 1 {
            for x in bx - 1..=bx + 1 {
                self.set(x, y, Tile::BRICK);
            }
        }
        self.set_interior(lane - 1, by + 1, Tile::EMPTY);
        self.set_interior(lane + 1, by + 1, Tile::EMPTY);
        self.set(bx, by, Tile::BASE);
    }

    fn in_fortress(&self, x: i32, y: i32) -> bool {
        let (bx, by) = base_cell(self.width, self.height);
        (x - bx as i32).abs() <= 1 && (y - by as i32).abs() <= 1
    }

    fn carve_spawn_zones(&mut self) {
        for (x, y) in enemy_spawn_cells(self.width) {
            self.carve_circle(x as i32, y as i32, SPAWN_CARVE_RADIUS);
        }
        let (px, py) = player_spawn_cell(self.width, self.height);
        self.carve_circle(px as i32, py as i32, SPAWN_CARVE_RADIUS);
    }

    /// Clear a disc of cells; the fortress footprint is never carved
    fn carve_circle(&mut self, cx: i32, cy: i32, r: i32) {
        for y in cy - r..=cy + r {
            for x in cx - r..=cx + r {
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy <= r * r && !self.in_fortress(x, y) {
                    self.set(x, y, Tile::EMPTY);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: usize = 50;
    const H: usize = 26;

    fn at(cells: &[Tile], x: usize, y: usize) -> Tile {
        cells[y * W + x]
    }

    #[test]
    fn test_generation_is_deterministic() {
        for level in 1..=4 {
            let a = generate_level(level, W, H).unwrap();
            let b = generate_level(level, W, H).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_border_is_steel_except_spawn_carves() {
        let cells = generate_level(1, W, H).unwrap();
        // Corners are far from every spawn zone
        assert_eq!(at(&cells, 0, 0).kind, TileKind::Steel);
        assert_eq!(at(&cells, W - 1, H - 1).kind, TileKind::Steel);
        assert_eq!(at(&cells, 10, H - 1).kind, TileKind::Steel);
        // The player notch is open
        let (px, py) = player_spawn_cell(W, H);
        assert_eq!(at(&cells, px, py).kind, TileKind::Empty);
    }

    #[test]
    fn test_fortress_survives_carving() {
        for level in 1..=3 {
            let cells = generate_level(level, W, H).unwrap();
            let (bx, by) = base_cell(W, H);
            assert_eq!(at(&cells, bx, by).kind, TileKind::Base);
            assert_eq!(at(&cells, bx, by - 1).kind, TileKind::Brick);
            assert_eq!(at(&cells, bx, by + 1).kind, TileKind::Brick);
            assert_eq!(at(&cells, bx + 1, by + 1).kind, TileKind::Brick);
            // Flank of the spawn lane
            assert_eq!(at(&cells, bx - 1, by + 1).kind, TileKind::Empty);
            let bases = cells.iter().filter(|t| t.kind == TileKind::Base).count();
            assert_eq!(bases, 1);
        }
    }

    #[test]
    fn test_spawn_lane_misses_fortress() {
        let (px, py) = player_spawn_cell(W, H);
        let (bx, by) = base_cell(W, H);
        assert!(px + 1 < bx);
        for level in 1..=3 {
            let cells = generate_level(level, W, H).unwrap();
            for y in by - 1..py {
                assert_ne!(at(&cells, px, y).kind, TileKind::Base);
            }
            // Two free cells right above the notch
            assert_eq!(at(&cells, px, py - 1).kind, TileKind::Empty);
            assert_eq!(at(&cells, px, py - 2).kind, TileKind::Empty);
        }
    }

    #[test]
    fn test_spawn_cells_are_clear() {
        for level in 1..=3 {
            let cells = generate_level(level, W, H).unwrap();
            for (x, y) in enemy_spawn_cells(W) {
                for (dx, dy) in [(0, 0), (-1, -1), (-1, 0), (0, -1)] {
                    let t = at(&cells, (x as i32 + dx) as usize, (y as i32 + dy) as usize);
                    assert_eq!(t.kind, TileKind::Empty, "level {level} spawn {x},{y}");
                }
            }
        }
    }

    #[test]
    fn test_levels_differ_and_have_banner_bricks() {
        let l1 = generate_level(1, W, H).unwrap();
        let l2 = generate_level(2, W, H).unwrap();
        let l3 = generate_level(3, W, H).unwrap();
        assert_ne!(l1, l2);
        assert_ne!(l2, l3);
        for cells in [&l1, &l2, &l3] {
            let bricks = cells.iter().filter(|t| t.kind == TileKind::Brick).count();
            assert!(bricks > 20);
        }
        assert!(l2.iter().any(|t| t.kind == TileKind::Ice));
        assert!(l1.iter().any(|t| t.kind == TileKind::Bush));
    }

    #[test]
    fn test_level_zero_rejected() {
        assert_eq!(generate_level(0, W, H), Err(LayoutError::UnknownLevel(0)));
    }

    #[test]
    fn test_too_small_rejected() {
        assert!(matches!(
            generate_level(1, 8, 26),
            Err(LayoutError::TooSmall { width: 8, .. })
        ));
    }

    #[test]
    fn test_parse_layout_checks_dimensions() {
        let row = "S........S";
        let good = std::iter::repeat_n(row, 10).collect::<Vec<_>>().join("\n");
        let cells = parse_layout(&good, 10, 10).unwrap();
        assert_eq!(cells.len(), 100);
        assert_eq!(cells[0].kind, TileKind::Steel);

        let short = std::iter::repeat_n(row, 9).collect::<Vec<_>>().join("\n");
        assert_eq!(
            parse_layout(&short, 10, 10),
            Err(LayoutError::RowCount { expected: 10, found: 9 })
        );

        let mut rows: Vec<String> = std::iter::repeat_n(row.to_string(), 10).collect();
        rows[3] = "S.......S".to_string();
        assert_eq!(
            parse_layout(&rows.join("\n"), 10, 10),
            Err(LayoutError::RowWidth { row: 3, expected: 10, found: 9 })
        );

        rows[3] = "S...x....S".to_string();
        assert_eq!(
            parse_layout(&rows.join("\n"), 10, 10),
            Err(LayoutError::UnknownTile { row: 3, col: 4, ch: 'x' })
        );
    }

    #[test]
    fn test_format_layout_matches_parse() {
        let cells = generate_level(2, W, H).unwrap();
        let text = format_layout(&cells, W);
        // Brick masks are full after generation so kinds carry everything
        assert_eq!(parse_layout(&text, W, H).unwrap(), cells);
    }
}
