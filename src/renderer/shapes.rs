//! Shape generation for 2D primitives
//!
//! Everything here works in window pixels with y pointing down.

use glam::{Mat2, Vec2};

use super::vertex::Vertex;

/// Two triangles covering a quad given in winding order
pub fn quad(corners: [Vec2; 4], colors: [[f32; 4]; 4]) -> Vec<Vertex> {
    let v = |i: usize| Vertex::at(corners[i], colors[i]);
    vec![v(0), v(1), v(2), v(2), v(3), v(0)]
}

/// Axis-aligned filled rectangle with its top-left corner at `min`
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    quad(
        [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ],
        [color; 4],
    )
}

/// Unit square scaled, then rotated about its top-left corner, then translated
pub fn sprite(scale: Vec2, rotation: f32, translation: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let rot = Mat2::from_angle(rotation);
    let corners = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y].map(|c| rot * (c * scale) + translation);
    quad(corners, [color; 4])
}

/// Full-window background fading from `top` to `bottom`
pub fn vertical_gradient(size: Vec2, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    quad(
        [Vec2::ZERO, Vec2::new(size.x, 0.0), size, Vec2::new(0.0, size.y)],
        [top, top, bottom, bottom],
    )
}
