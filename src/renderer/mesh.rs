//! Triangle-mesh drawing surface
//!
//! Tessellates every primitive into screen-space [`Vertex`] triangles ready
//! for a vertex buffer. Text and bitmaps are collected as side lists for
//! whichever layer the host uses to draw them.

use glam::Vec2;

use super::shapes;
use super::surface::{BitmapId, Color, DrawSurface};
use super::vertex::Vertex;
use crate::sim::RectF;

/// Segments used for full circles
const CIRCLE_SEGMENTS: u32 = 20;
/// Segments per rounded corner
const CORNER_SEGMENTS: u32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    /// Screen-space top-left
    pub pos: Vec2,
    /// Screen-space font size
    pub size: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitmapQuad {
    pub bitmap: BitmapId,
    /// Screen-space destination
    pub dest: RectF,
    /// Index into the vertex list where the bitmap sits in draw order
    pub layer: usize,
}

#[derive(Debug, Clone)]
pub struct MeshSurface {
    scale: f32,
    offset: Vec2,
    vertices: Vec<Vertex>,
    labels: Vec<TextLabel>,
    bitmaps: Vec<BitmapQuad>,
}

impl Default for MeshSurface {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            vertices: Vec::new(),
            labels: Vec::new(),
            bitmaps: Vec::new(),
        }
    }
}

impl MeshSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop last frame's output, keeping allocations
    pub fn clear(&mut self) {
        self.scale = 1.0;
        self.offset = Vec2::ZERO;
        self.vertices.clear();
        self.labels.clear();
        self.bitmaps.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    pub fn bitmaps(&self) -> &[BitmapQuad] {
        &self.bitmaps
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    #[inline]
    fn to_screen(&self, p: Vec2) -> Vec2 {
        p * self.scale + self.offset
    }

    fn rect_to_screen(&self, r: RectF) -> (Vec2, Vec2) {
        (
            self.to_screen(Vec2::new(r.x, r.y)),
            self.to_screen(Vec2::new(r.right(), r.bottom())),
        )
    }

    /// Append already screen-space vertices
    fn push(&mut self, vertices: Vec<Vertex>) {
        self.vertices.extend(vertices);
    }
}

impl DrawSurface for MeshSurface {
    fn set_transform(&mut self, scale: f32, offset: Vec2) {
        self.scale = scale;
        self.offset = offset;
    }

    fn fill_rect(&mut self, rect: RectF, color: Color) {
        let (min, max) = self.rect_to_screen(rect);
        self.push(shapes::quad(min, max, color));
    }

    fn stroke_rect(&mut self, rect: RectF, width: f32, color: Color) {
        let (min, max) = self.rect_to_screen(rect);
        self.push(shapes::rect_outline(min, max, width * self.scale, color));
    }

    fn fill_rounded_rect(&mut self, rect: RectF, radius: f32, color: Color) {
        let (min, max) = self.rect_to_screen(rect);
        self.push(shapes::rounded_rect(
            min,
            max,
            radius * self.scale,
            color,
            CORNER_SEGMENTS,
        ));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let center = self.to_screen(center);
        self.push(shapes::circle(center, radius * self.scale, color, CIRCLE_SEGMENTS));
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        let (from, to) = (self.to_screen(from), self.to_screen(to));
        self.push(shapes::line(from, to, width * self.scale, color));
    }

    fn draw_bitmap(&mut self, bitmap: BitmapId, dest: RectF) {
        let (min, max) = self.rect_to_screen(dest);
        self.bitmaps.push(BitmapQuad {
            bitmap,
            dest: RectF::new(min.x, min.y, max.x - min.x, max.y - min.y),
            layer: self.vertices.len(),
        });
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.labels.push(TextLabel {
            text: text.to_string(),
            pos: self.to_screen(pos),
            size: size * self.scale,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_transform_applies_to_vertices() {
        let mut mesh = MeshSurface::new();
        mesh.set_transform(2.0, Vec2::new(10.0, 0.0));
        mesh.fill_rect(RectF::new(1.0, 1.0, 2.0, 2.0), RED);
        assert_eq!(mesh.triangle_count(), 2);
        let xs: Vec<f32> = mesh.vertices().iter().map(|v| v.position[0]).collect();
        assert!(xs.iter().all(|&x| x == 12.0 || x == 16.0));
    }

    #[test]
    fn test_text_and_bitmaps_collected() {
        let mut mesh = MeshSurface::new();
        mesh.fill_circle(Vec2::ZERO, 3.0, RED);
        mesh.set_transform(0.5, Vec2::ZERO);
        mesh.draw_bitmap(BitmapId(4), RectF::new(0.0, 0.0, 28.0, 28.0));
        mesh.text("GO", Vec2::new(4.0, 8.0), 20.0, RED);

        assert_eq!(mesh.bitmaps().len(), 1);
        assert_eq!(mesh.bitmaps()[0].dest.w, 14.0);
        assert_eq!(mesh.bitmaps()[0].layer, CIRCLE_SEGMENTS as usize * 3);
        assert_eq!(mesh.labels()[0].pos, Vec2::new(2.0, 4.0));
        assert_eq!(mesh.labels()[0].size, 10.0);

        mesh.clear();
        assert!(mesh.vertices().is_empty() && mesh.labels().is_empty());
    }
}
