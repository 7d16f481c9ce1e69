//! Fixed 7x7 bitmap font used to stamp level banners in brick

pub const GLYPH_WIDTH: usize = 7;
pub const GLYPH_HEIGHT: usize = 7;

type Rows = [&'static str; GLYPH_HEIGHT];

const FALLBACK: Rows = [
    "#######",
    "......#",
    "....##.",
    "...#...",
    "...#...",
    ".......",
    "...#...",
];

const BLANK: Rows = [
    ".......",
    ".......",
    ".......",
    ".......",
    ".......",
    ".......",
    ".......",
];

fn rows_for(c: char) -> Rows {
    match c {
        '0' => [
            "..###..",
            ".#...#.",
            "#....##",
            "#...#.#",
            "#..#..#",
            ".#...#.",
            "..###..",
        ],
        '1' => [
            "...#...",
            "..##...",
            ".#.#...",
            "...#...",
            "...#...",
            "...#...",
            ".#####.",
        ],
        '2' => [
            "#######",
            "......#",
            "......#",
            "#######",
            "#......",
            "#......",
            "#######",
        ],
        '3' => [
            "#######",
            "......#",
            "......#",
            "#######",
            "......#",
            "......#",
            "#######",
        ],
        '4' => [
            "#.....#",
            "#.....#",
            "#.....#",
            "#######",
            "......#",
            "......#",
            "......#",
        ],
        '5' => [
            "#######",
            "#......",
            "#......",
            "#######",
            "......#",
            "......#",
            "#######",
        ],
        '6' => [
            "#######",
            "#......",
            "#......",
            "#######",
            "#.....#",
            "#.....#",
            "#######",
        ],
        '7' => [
            "#######",
            "......#",
            ".....#.",
            "....#..",
            "...#...",
            "...#...",
            "...#...",
        ],
        '8' => [
            "#######",
            "#.....#",
            "#.....#",
            "#######",
            "#.....#",
            "#.....#",
            "#######",
        ],
        '9' => [
            "#######",
            "#.....#",
            "#.....#",
            "#######",
            "......#",
            "......#",
            "#######",
        ],
        'A' => [
            "..###..",
            ".#...#.",
            "#.....#",
            "#######",
            "#.....#",
            "#.....#",
            "#.....#",
        ],
        'E' => [
            "#######",
            "#......",
            "#......",
            "######.",
            "#......",
            "#......",
            "#######",
        ],
        'H' => [
            "#.....#",
            "#.....#",
            "#.....#",
            "#######",
            "#.....#",
            "#.....#",
            "#.....#",
        ],
        'L' => [
            "#......",
            "#......",
            "#......",
            "#......",
            "#......",
            "#......",
            "#######",
        ],
        'N' => [
            "#.....#",
            "##....#",
            "#.#...#",
            "#..#..#",
            "#...#.#",
            "#....##",
            "#.....#",
        ],
        'O' => [
            "..###..",
            ".#...#.",
            "#.....#",
            "#.....#",
            "#.....#",
            ".#...#.",
            "..###..",
        ],
        'T' => [
            "#######",
            "...#...",
            "...#...",
            "...#...",
            "...#...",
            "...#...",
            "...#...",
        ],
        'V' => [
            "#.....#",
            "#.....#",
            "#.....#",
            ".#...#.",
            ".#...#.",
            "..#.#..",
            "...#...",
        ],
        ' ' => BLANK,
        _ => FALLBACK,
    }
}

/// Glyph bitmap for `c`, row-major; unknown characters render as `?`
pub fn glyph(c: char) -> [[bool; GLYPH_WIDTH]; GLYPH_HEIGHT] {
    let rows = rows_for(c);
    let mut out = [[false; GLYPH_WIDTH]; GLYPH_HEIGHT];
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate().take(GLYPH_WIDTH) {
            out[y][x] = ch == '#';
        }
    }
    out
}

/// Uppercase, collapse whitespace to plain spaces, drop control characters
pub fn normalize_text(s: &str) -> String {
    if s.trim().is_empty() {
        return String::new();
    }
    s.chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .flat_map(char::to_uppercase)
        .collect()
}

/// Width in glyph pixels of `glyph_count` glyphs separated by `spacing`
pub fn text_width(glyph_count: usize, spacing: usize) -> usize {
    glyph_count * GLYPH_WIDTH + glyph_count.saturating_sub(1) * spacing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rows_are_seven_wide() {
        for c in "0123456789AEHLNOTV ?".chars() {
            for row in rows_for(c) {
                assert_eq!(row.len(), GLYPH_WIDTH, "glyph {c:?}");
            }
        }
    }

    #[test]
    fn test_unknown_falls_back() {
        assert_eq!(glyph('@'), glyph('?'));
        assert!(glyph(' ').iter().flatten().all(|p| !p));
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("lv 1"), "LV 1");
        assert_eq!(normalize_text("a\tb"), "A B");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width(0, 1), 0);
        assert_eq!(text_width(1, 1), 7);
        assert_eq!(text_width(2, 1), 15);
    }
}
