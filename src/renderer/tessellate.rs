//! Surface that turns draw calls into GPU-ready triangles

use glam::{IVec2, Vec2};

use super::Surface;
use super::shapes;
use super::vertex::Vertex;

/// Text the GPU pass does not draw; the host overlays it
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    /// Left end of the baseline, window pixels
    pub position: IVec2,
    pub size: f64,
    pub color: [f32; 4],
}

/// Collects triangles in normalized device coordinates for one frame
#[derive(Debug, Clone)]
pub struct VertexSurface {
    size: Vec2,
    vertices: Vec<Vertex>,
    texts: Vec<TextItem>,
}

impl VertexSurface {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            size: Vec2::new(width.max(1) as f32, height.max(1) as f32),
            vertices: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn texts(&self) -> &[TextItem] {
        &self.texts
    }

    /// Drop this frame's output, keeping the allocations
    pub fn clear(&mut self, width: i32, height: i32) {
        self.size = Vec2::new(width.max(1) as f32, height.max(1) as f32);
        self.vertices.clear();
        self.texts.clear();
    }

    /// Window pixels (y down) to NDC (y up)
    pub fn pixel_to_ndc(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x / self.size.x * 2.0 - 1.0, 1.0 - p.y / self.size.y * 2.0)
    }

    fn push(&mut self, pixel_vertices: Vec<Vertex>) {
        let converted: Vec<Vertex> = pixel_vertices
            .into_iter()
            .map(|v| Vertex::at(self.pixel_to_ndc(v.pos()), v.color))
            .collect();
        self.vertices.extend(converted);
    }
}

impl Surface for VertexSurface {
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: [f32; 4]) {
        self.push(shapes::rect(min, size, color));
    }

    fn draw_sprite(&mut self, scale: Vec2, rotation: f32, translation: Vec2, color: [f32; 4]) {
        self.push(shapes::sprite(scale, rotation, translation, color));
    }

    fn draw_background(&mut self, top: [f32; 4], bottom: [f32; 4]) {
        self.push(shapes::vertical_gradient(self.size, top, bottom));
    }

    fn draw_text(&mut self, text: &str, position: IVec2, size: f64, color: [f32; 4]) {
        self.texts.push(TextItem {
            text: text.to_owned(),
            position,
            size,
            color,
        });
    }
}
