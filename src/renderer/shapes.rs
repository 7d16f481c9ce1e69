//! Shape generation for 2D primitives
//!
//! Every generator returns a triangle list in the caller's coordinate space.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use super::vertex::Vertex;

/// Two triangles for an axis-aligned rectangle
pub fn quad(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    fan(center, radius, 0.0, 2.0 * PI, color, segments)
}

/// Pie slice from `theta_start` to `theta_end`
pub fn fan(
    center: Vec2,
    radius: f32,
    theta_start: f32,
    theta_end: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(1);
    let span = theta_end - theta_start;
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = theta_start + (i as f32 / segments as f32) * span;
        let theta2 = theta_start + ((i + 1) as f32 / segments as f32) * span;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Rectangle with quarter-circle corners; `radius` is clamped to half the short side
pub fn rounded_rect(
    min: Vec2,
    max: Vec2,
    radius: f32,
    color: [f32; 4],
    corner_segments: u32,
) -> Vec<Vertex> {
    let size = max - min;
    let r = radius.clamp(0.0, size.x.min(size.y) * 0.5);
    if r <= 0.0 {
        return quad(min, max, color);
    }

    // Center column plus the two side strips
    let mut vertices = quad(Vec2::new(min.x + r, min.y), Vec2::new(max.x - r, max.y), color);
    vertices.extend(quad(Vec2::new(min.x, min.y + r), Vec2::new(min.x + r, max.y - r), color));
    vertices.extend(quad(Vec2::new(max.x - r, min.y + r), Vec2::new(max.x, max.y - r), color));

    // y grows downward, so angles sweep clockwise on screen
    let corners = [
        (Vec2::new(max.x - r, max.y - r), 0.0),
        (Vec2::new(min.x + r, max.y - r), FRAC_PI_2),
        (Vec2::new(min.x + r, min.y + r), PI),
        (Vec2::new(max.x - r, min.y + r), PI + FRAC_PI_2),
    ];
    for (center, start) in corners {
        vertices.extend(fan(center, r, start, start + FRAC_PI_2, color, corner_segments));
    }

    vertices
}

/// Thick line segment as a quad
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a1 = from + perp;
    let a2 = from - perp;
    let b1 = to + perp;
    let b2 = to - perp;

    // Two triangles
    vec![
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// Rectangle outline of `width`, drawn inside the rectangle
pub fn rect_outline(min: Vec2, max: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let w = width.min((max.x - min.x) * 0.5).min((max.y - min.y) * 0.5);
    if w <= 0.0 {
        return Vec::new();
    }
    let mut vertices = quad(min, Vec2::new(max.x, min.y + w), color);
    vertices.extend(quad(Vec2::new(min.x, max.y - w), max, color));
    vertices.extend(quad(Vec2::new(min.x, min.y + w), Vec2::new(min.x + w, max.y - w), color));
    vertices.extend(quad(Vec2::new(max.x - w, min.y + w), Vec2::new(max.x, max.y - w), color));
    vertices
}
