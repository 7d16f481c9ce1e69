//! Drawing-surface contract consumed by the scene renderer

use std::collections::HashMap;

use glam::Vec2;

use crate::sim::{RectF, TileKind};

/// Straight (non-premultiplied) RGBA in 0..=1
pub type Color = [f32; 4];

/// Opaque handle to a host-owned bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitmapId(pub u32);

/// Optional decorative bitmaps by terrain kind
pub trait TileArt {
    fn bitmap(&self, kind: TileKind) -> Option<BitmapId>;
}

impl TileArt for HashMap<TileKind, BitmapId> {
    fn bitmap(&self, kind: TileKind) -> Option<BitmapId> {
        self.get(&kind).copied()
    }
}

/// Immediate-mode 2D drawing target.
///
/// Coordinates passed to the primitive calls are transformed by the current
/// `scale`/`offset` pair: `screen = p * scale + offset`.
pub trait DrawSurface {
    fn set_transform(&mut self, scale: f32, offset: Vec2);
    fn fill_rect(&mut self, rect: RectF, color: Color);
    fn stroke_rect(&mut self, rect: RectF, width: f32, color: Color);
    fn fill_rounded_rect(&mut self, rect: RectF, radius: f32, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
    fn draw_bitmap(&mut self, bitmap: BitmapId, dest: RectF);
    /// `pos` is the top-left of the text box
    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);
}
