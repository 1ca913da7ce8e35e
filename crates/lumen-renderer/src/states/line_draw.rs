use glam::Mat4;
use lumen_common::Color;

use crate::backend::{BufferUsage, DrawMode, RenderBackend};
use crate::error::Result;
use crate::geometry::{Line, ScreenLine};
use crate::objects::{VertexAttribute, VertexBuffer, VertexLayout, VertexLayoutBuilder};
use crate::vertex::LineVertex;

use super::{transform_point, VERTICES_PER_LINE};

/// Immediate single-line drawing: every call writes two vertices and draws.
pub struct LineDrawState<B: RenderBackend> {
    vertex_layout: VertexLayout<B>,
    vertex_buffer: VertexBuffer<B>,
}

impl<B: RenderBackend> LineDrawState<B> {
    pub fn new(backend: &mut B) -> Result<Self> {
        let vertex_buffer = VertexBuffer::new(
            backend,
            (VERTICES_PER_LINE * std::mem::size_of::<LineVertex>()) as u64,
            BufferUsage::Dynamic,
        )?;
        let vertex_layout = VertexLayoutBuilder::new()
            .add_attribute(VertexAttribute::float32(2))
            .add_attribute(VertexAttribute::float32(4))
            .add_vertex_buffer(&vertex_buffer)
            .build(backend)?;

        Ok(Self {
            vertex_layout,
            vertex_buffer,
        })
    }

    pub fn draw_line(&self, backend: &mut B, line: &Line, model: &Mat4, color: Color) {
        let color = color.to_normalized();
        let vertices = [line.start, line.end].map(|point| LineVertex {
            position: transform_point(model, point),
            color,
        });

        self.vertex_buffer
            .set_sub_data(backend, &vertices, VERTICES_PER_LINE);
        self.vertex_layout
            .draw(backend, VERTICES_PER_LINE as u32, 0, DrawMode::Lines);
    }

    /// Pixel-space line. The caller activates the screen projection.
    pub fn draw_screen_line(&self, backend: &mut B, line: &ScreenLine, model: &Mat4, color: Color) {
        self.draw_line(backend, &(*line).into(), model, color);
    }

    pub fn destroy(&mut self, backend: &mut B) {
        self.vertex_layout.destroy(backend);
        self.vertex_buffer.destroy(backend);
    }

    pub fn is_valid(&self) -> bool {
        self.vertex_layout.is_valid() && self.vertex_buffer.is_valid()
    }
}
