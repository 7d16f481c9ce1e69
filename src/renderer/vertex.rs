//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Byte stride of one vertex in an interleaved buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    /// Raw bytes ready for upload to a vertex buffer
    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

/// Build an RGBA color from 8-bit ARGB channels
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> [f32; 4] {
    [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    ]
}

/// Colors for game elements
pub mod colors {
    use super::argb;

    pub const BACKDROP: [f32; 4] = argb(255, 8, 10, 18);
    pub const BACKDROP_STRIPE: [f32; 4] = argb(18, 120, 180, 255);
    pub const ARENA: [f32; 4] = argb(255, 12, 16, 26);
    pub const ARENA_BORDER: [f32; 4] = argb(160, 0, 0, 0);

    pub const BRICK: [f32; 4] = argb(255, 168, 72, 42);
    pub const BRICK_OUTLINE: [f32; 4] = argb(140, 0, 0, 0);
    pub const BITMAP_OUTLINE: [f32; 4] = argb(90, 0, 0, 0);
    pub const STEEL: [f32; 4] = argb(255, 140, 150, 165);
    pub const STEEL_INSET: [f32; 4] = argb(120, 0, 0, 0);
    pub const WATER: [f32; 4] = argb(255, 22, 90, 160);
    pub const WATER_WAVE: [f32; 4] = argb(255, 180, 240, 255);
    pub const BUSH: [f32; 4] = argb(110, 60, 200, 90);
    pub const ICE: [f32; 4] = argb(220, 210, 240, 255);
    pub const ICE_STREAK: [f32; 4] = argb(90, 40, 90, 140);
    pub const BASE: [f32; 4] = argb(255, 70, 70, 70);
    pub const BASE_EMBLEM: [f32; 4] = argb(255, 230, 200, 40);
    pub const BASE_OUTLINE: [f32; 4] = argb(200, 0, 0, 0);

    pub const TANK_OUTLINE: [f32; 4] = argb(180, 0, 0, 0);
    pub const TURRET: [f32; 4] = argb(255, 0, 0, 0);
    pub const PLAYER_BULLET: [f32; 4] = argb(210, 10, 220, 120);
    pub const ENEMY_BULLET: [f32; 4] = argb(210, 255, 165, 70);
    pub const BULLET_OUTLINE: [f32; 4] = argb(220, 0, 0, 0);
    pub const EXPLOSION_OUTER: [f32; 4] = argb(255, 255, 220, 80);
    pub const EXPLOSION_CORE: [f32; 4] = argb(255, 255, 80, 60);

    pub const TEXT: [f32; 4] = argb(255, 255, 255, 255);
    pub const TEXT_CLEARED: [f32; 4] = argb(255, 0, 191, 255);
    pub const TEXT_GAME_OVER: [f32; 4] = argb(255, 255, 69, 0);
}

/// Same color with alpha scaled by `factor`
pub fn with_alpha(color: [f32; 4], factor: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * factor.clamp(0.0, 1.0)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_bytes() {
        let verts = [Vertex::new(1.0, 2.0, colors::TEXT); 3];
        assert_eq!(Vertex::STRIDE, 24);
        assert_eq!(Vertex::as_bytes(&verts).len(), 72);
    }

    #[test]
    fn test_argb_channel_order() {
        let c = argb(0, 255, 0, 51);
        assert_eq!(c, [1.0, 0.0, 0.2, 0.0]);
        assert_eq!(with_alpha(colors::TEXT, 0.5)[3], 0.5);
    }
}
