use glam::{Mat4, UVec2, Vec2};

use crate::backend::{BufferUsage, DrawMode, RenderBackend, TextureId};
use crate::error::Result;
use crate::geometry::{Quad, ScreenQuad, Sprite, UNIT_RECTANGLE};
use crate::objects::{IndexBuffer, VertexAttribute, VertexBuffer, VertexLayout, VertexLayoutBuilder};
use crate::vertex::QuadVertex;

use super::{screen_rectangle_corners, transform_point, QUAD_INDEX_PATTERN, VERTICES_PER_QUAD};

/// Immediate single-quad drawing: every call writes four vertices and
/// issues one indexed draw with the sprite's texture on unit 0.
pub struct QuadDrawState<B: RenderBackend> {
    default_texture: TextureId,
    vertex_layout: VertexLayout<B>,
    vertex_buffer: VertexBuffer<B>,
    index_buffer: IndexBuffer<B>,
}

impl<B: RenderBackend> QuadDrawState<B> {
    pub fn new(backend: &mut B, default_texture: TextureId) -> Result<Self> {
        let vertex_buffer = VertexBuffer::new(
            backend,
            (VERTICES_PER_QUAD * std::mem::size_of::<QuadVertex>()) as u64,
            BufferUsage::Dynamic,
        )?;
        let vertex_layout = VertexLayoutBuilder::new()
            .add_attribute(VertexAttribute::float32(2))
            .add_attribute(VertexAttribute::float32(4))
            .add_attribute(VertexAttribute::float32(2))
            .add_vertex_buffer(&vertex_buffer)
            .build(backend)?;
        let index_buffer = IndexBuffer::new(backend, &QUAD_INDEX_PATTERN, BufferUsage::Static)?;

        Ok(Self {
            default_texture,
            vertex_layout,
            vertex_buffer,
            index_buffer,
        })
    }

    pub fn draw_rectangle(&self, backend: &mut B, model: &Mat4, sprite: &Sprite) {
        self.draw_corners(backend, UNIT_RECTANGLE, model, sprite);
    }

    /// Pixel-space rectangle anchored at its top-left. The caller activates
    /// the screen projection.
    pub fn draw_screen_rectangle(&self, backend: &mut B, size: UVec2, model: &Mat4, sprite: &Sprite) {
        self.draw_corners(backend, screen_rectangle_corners(size), model, sprite);
    }

    pub fn draw_quad(&self, backend: &mut B, quad: &Quad, model: &Mat4, sprite: &Sprite) {
        self.draw_corners(backend, quad.corners(), model, sprite);
    }

    pub fn draw_screen_quad(&self, backend: &mut B, quad: &ScreenQuad, model: &Mat4, sprite: &Sprite) {
        self.draw_corners(backend, quad.corners(), model, sprite);
    }

    fn draw_corners(&self, backend: &mut B, corners: [Vec2; 4], model: &Mat4, sprite: &Sprite) {
        let color = sprite.color.to_normalized();
        let uvs = sprite.texture_coordinates().corners();

        let mut vertices = [QuadVertex {
            position: [0.0; 2],
            color,
            texture_coordinates: [0.0; 2],
        }; VERTICES_PER_QUAD];
        for ((vertex, corner), uv) in vertices.iter_mut().zip(corners).zip(uvs) {
            vertex.position = transform_point(model, corner);
            vertex.texture_coordinates = uv.to_array();
        }

        self.vertex_buffer
            .set_sub_data(backend, &vertices, VERTICES_PER_QUAD);

        backend.bind_texture(sprite.texture.unwrap_or(self.default_texture), 0);
        self.vertex_layout.draw_indexed(
            backend,
            &self.index_buffer,
            self.index_buffer.index_count(),
            true,
            DrawMode::Triangles,
        );
        backend.unbind_texture(0);
    }

    pub fn destroy(&mut self, backend: &mut B) {
        self.vertex_layout.destroy(backend);
        self.vertex_buffer.destroy(backend);
        self.index_buffer.destroy(backend);
    }

    pub fn is_valid(&self) -> bool {
        self.vertex_layout.is_valid() && self.vertex_buffer.is_valid() && self.index_buffer.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use lumen_common::Color;

    use super::*;
    use crate::backend::{HeadlessBackend, TextureDescriptor};

    fn texture(backend: &mut HeadlessBackend) -> TextureId {
        backend
            .create_texture(&TextureDescriptor {
                label: None,
                width: 1,
                height: 1,
                pixels: &[255; 4],
            })
            .unwrap()
    }

    #[test]
    fn rectangle_draws_six_indices_with_default_texture() {
        let mut backend = HeadlessBackend::new();
        let default_texture = texture(&mut backend);
        let state = QuadDrawState::new(&mut backend, default_texture).unwrap();

        state.draw_rectangle(&mut backend, &Mat4::IDENTITY, &Sprite::colored(Color::BLACK));

        let call = &backend.draw_calls()[0];
        assert!(call.indexed);
        assert_eq!(call.count, 6);
        assert_eq!(call.indices(), vec![0, 1, 3, 1, 2, 3]);
        assert_eq!(call.texture_at(0), Some(default_texture));

        let vertices = call.drawn_vertices::<QuadVertex>();
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[2].position, [-0.5, -0.5]);
        assert_eq!(vertices[0].texture_coordinates, [1.0, 1.0]);
        assert_eq!(vertices[0].color, [0.0, 0.0, 0.0, 1.0]);
        assert!(backend.bound_textures().is_empty());
    }

    #[test]
    fn sprite_texture_replaces_default() {
        let mut backend = HeadlessBackend::new();
        let default_texture = texture(&mut backend);
        let sprite_texture = texture(&mut backend);
        let state = QuadDrawState::new(&mut backend, default_texture).unwrap();

        state.draw_screen_rectangle(
            &mut backend,
            UVec2::new(16, 8),
            &Mat4::IDENTITY,
            &Sprite::new(sprite_texture),
        );

        let call = &backend.draw_calls()[0];
        assert_eq!(call.texture_at(0), Some(sprite_texture));
        let vertices = call.drawn_vertices::<QuadVertex>();
        assert_eq!(vertices[1].position, [16.0, 8.0]);
    }

    #[test]
    fn each_call_is_its_own_draw() {
        let mut backend = HeadlessBackend::new();
        let default_texture = texture(&mut backend);
        let state = QuadDrawState::new(&mut backend, default_texture).unwrap();
        let quad = Quad {
            upper_right: Vec2::new(1.0, 1.0),
            lower_right: Vec2::new(1.0, 0.0),
            lower_left: Vec2::ZERO,
            upper_left: Vec2::new(0.0, 1.0),
        };

        for _ in 0..3 {
            state.draw_quad(&mut backend, &quad, &Mat4::IDENTITY, &Sprite::default());
        }
        assert_eq!(backend.draw_calls().len(), 3);
    }

    #[test]
    fn destroy_releases_resources() {
        let mut backend = HeadlessBackend::new();
        let default_texture = texture(&mut backend);
        let mut state = QuadDrawState::new(&mut backend, default_texture).unwrap();
        state.destroy(&mut backend);
        assert!(!state.is_valid());
        assert_eq!(backend.live_buffer_count(), 0);
    }
}
