//! Batched textured quads.
//!
//! Quads are written into a CPU staging buffer four vertices at a time.
//! Textures are assigned to slots of a fixed-size table on first use;
//! slot 0 always holds the default texture. The staging buffer is
//! uploaded and drawn in one indexed call when it fills up, when the
//! slot table fills up, or when the caller flushes.


use glam::{Mat4, UVec2, Vec2};

use crate::backend::{BufferUsage, DrawMode, RenderBackend, TextureId};
use crate::error::{RendererError, Result};
use crate::geometry::{Quad, ScreenQuad, Sprite, UNIT_RECTANGLE};
use crate::objects::{IndexBuffer, VertexAttribute, VertexBuffer, VertexLayout, VertexLayoutBuilder};
use crate::pipeline::Pipeline;
use crate::vertex::{BatchQuadVertex, ProjectionType};

use super::{
    batch_capacity, quad_indices, screen_rectangle_corners, transform_point, BatchStats,
    DEFAULT_TEXTURE_INDEX, INDICES_PER_QUAD, VERTICES_PER_QUAD,
};

/// Parameters for [`QuadBatchState::new`].
pub struct QuadBatchCreateInfo<'a, B: RenderBackend> {
    /// Quads per draw call.
    pub max_shapes_per_batch: u32,
    /// Pipeline whose sampler array is mapped onto texture units.
    pub pipeline: &'a Pipeline<B>,
    /// Name of that sampler array.
    pub texture_array_uniform: &'a str,
    /// Texture held in slot 0 for the state's lifetime.
    pub default_texture: TextureId,
    /// Requested slot count. The backend's texture unit limit may lower it.
    pub max_texture_slots: u32,
}

pub struct QuadBatchState<B: RenderBackend> {
    vertices_per_batch: usize,
    indices_per_batch: u32,

    staging: Vec<BatchQuadVertex>,
    index_count: u32,

    texture_slots: Vec<Option<TextureId>>,
    max_texture_slots: u32,
    current_texture_slot: u32,

    vertex_layout: VertexLayout<B>,
    vertex_buffer: VertexBuffer<B>,
    index_buffer: IndexBuffer<B>,

    stats: BatchStats,
}

impl<B: RenderBackend> QuadBatchState<B> {
    pub fn new(backend: &mut B, info: &QuadBatchCreateInfo<'_, B>) -> Result<Self> {
        if info.max_shapes_per_batch == 0 {
            return Err(RendererError::InvalidCreateInfo(
                "max_shapes_per_batch must be at least 1".into(),
            ));
        }

        let max_texture_slots = backend
            .limits()
            .max_texture_units
            .min(info.max_texture_slots);
        if max_texture_slots < 2 {
            return Err(RendererError::InvalidCreateInfo(format!(
                "{max_texture_slots} texture slots leave no room beside the default texture"
            )));
        }

        let (vertices_per_batch, vertex_bytes) = batch_capacity(
            info.max_shapes_per_batch,
            VERTICES_PER_QUAD,
            std::mem::size_of::<BatchQuadVertex>(),
        )?;
        let (indices_per_batch, _) = batch_capacity(
            info.max_shapes_per_batch,
            INDICES_PER_QUAD as usize,
            std::mem::size_of::<u32>(),
        )?;
        let indices_per_batch = indices_per_batch as u32;

        let vertex_buffer = VertexBuffer::new(backend, vertex_bytes, BufferUsage::Dynamic)?;

        let vertex_layout = VertexLayoutBuilder::new()
            .add_attribute(VertexAttribute::float32(2))
            .add_attribute(VertexAttribute::float32(4))
            .add_attribute(VertexAttribute::float32(2))
            .add_attribute(VertexAttribute::float32(1))
            .add_attribute(VertexAttribute::float32(1))
            .add_vertex_buffer(&vertex_buffer)
            .build(backend)?;

        let index_buffer = IndexBuffer::new(
            backend,
            &quad_indices(info.max_shapes_per_batch),
            BufferUsage::Static,
        )?;

        let mut texture_slots = vec![None; max_texture_slots as usize];
        texture_slots[0] = Some(info.default_texture);

        let sampler_units: Vec<i32> = (0..max_texture_slots as i32).collect();
        info.pipeline.use_pipeline(backend);
        info.pipeline
            .set_texture_uniform_vector(backend, info.texture_array_uniform, &sampler_units);
        info.pipeline.disuse(backend);

        tracing::info!(
            "quad batch ready: {} quads per batch, {max_texture_slots} texture slots",
            info.max_shapes_per_batch
        );

        Ok(Self {
            vertices_per_batch,
            indices_per_batch,
            staging: Vec::with_capacity(vertices_per_batch),
            index_count: 0,
            texture_slots,
            max_texture_slots,
            current_texture_slot: 1,
            vertex_layout,
            vertex_buffer,
            index_buffer,
            stats: BatchStats::default(),
        })
    }

    /// Start a new batch: empty staging, no indices, only the default slot assigned.
    pub fn begin(&mut self) {
        self.staging.clear();
        self.index_count = 0;
        self.texture_slots[1..].fill(None);
        self.current_texture_slot = 1;
    }

    /// Upload the staged quads and draw them with one indexed call.
    ///
    /// Does not reset the batch; call [`begin`](Self::begin) afterwards.
    /// A flush with nothing staged issues no draw.
    pub fn flush(&mut self, backend: &mut B) {
        if self.index_count == 0 {
            return;
        }

        self.vertex_buffer
            .set_sub_data(backend, &self.staging, self.staging.len());

        let occupied = &self.texture_slots[..self.current_texture_slot as usize];
        for (unit, texture) in occupied.iter().enumerate() {
            if let Some(texture) = texture {
                backend.bind_texture(*texture, unit as u32);
            }
        }

        self.vertex_layout.draw_indexed(
            backend,
            &self.index_buffer,
            self.index_count,
            true,
            DrawMode::Triangles,
        );

        for (unit, texture) in occupied.iter().enumerate() {
            if texture.is_some() {
                backend.unbind_texture(unit as u32);
            }
        }

        self.stats.draw_calls += 1;
        tracing::trace!(
            "quad batch flushed: {} indices, {} texture slots",
            self.index_count,
            self.current_texture_slot
        );
    }

    /// Centred unit square through `model`, in world space.
    pub fn batch_rectangle(&mut self, backend: &mut B, model: &Mat4, sprite: &Sprite) {
        self.batch_corners(backend, UNIT_RECTANGLE, model, sprite, ProjectionType::View);
    }

    /// `size`-pixel rectangle anchored at its top-left through `model`, in screen space.
    pub fn batch_screen_rectangle(
        &mut self,
        backend: &mut B,
        size: UVec2,
        model: &Mat4,
        sprite: &Sprite,
    ) {
        self.batch_corners(
            backend,
            screen_rectangle_corners(size),
            model,
            sprite,
            ProjectionType::Screen,
        );
    }

    pub fn batch_quad(&mut self, backend: &mut B, quad: &Quad, model: &Mat4, sprite: &Sprite) {
        self.batch_corners(backend, quad.corners(), model, sprite, ProjectionType::View);
    }

    pub fn batch_screen_quad(
        &mut self,
        backend: &mut B,
        quad: &ScreenQuad,
        model: &Mat4,
        sprite: &Sprite,
    ) {
        self.batch_corners(backend, quad.corners(), model, sprite, ProjectionType::Screen);
    }

    fn batch_corners(
        &mut self,
        backend: &mut B,
        corners: [Vec2; 4],
        model: &Mat4,
        sprite: &Sprite,
        projection: ProjectionType,
    ) {
        self.refresh_if_required(backend);

        let texture_index = match sprite.texture {
            Some(texture) => self.texture_index(texture) as f32,
            None => DEFAULT_TEXTURE_INDEX,
        };
        let color = sprite.color.to_normalized();
        let uvs = sprite.texture_coordinates().corners();

        debug_assert!(self.staging.len() + VERTICES_PER_QUAD <= self.vertices_per_batch);
        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.staging.push(BatchQuadVertex {
                position: transform_point(model, corner),
                color,
                texture_coordinates: uv.to_array(),
                texture_index,
                projection_type: projection.tag(),
            });
        }

        self.index_count += INDICES_PER_QUAD;
        self.stats.shapes += 1;
    }

    /// Flush and restart when the index budget is spent or no slot is free.
    ///
    /// The slot check fires even if the next sprite would reuse a texture
    /// that is already assigned.
    fn refresh_if_required(&mut self, backend: &mut B) {
        if self.index_count >= self.indices_per_batch
            || self.current_texture_slot > self.max_texture_slots - 1
        {
            self.flush(backend);
            self.begin();
        }
    }

    /// Slot holding `texture` in this batch, assigning the next free one on a miss.
    fn texture_index(&mut self, texture: TextureId) -> u32 {
        let assigned = &self.texture_slots[..self.current_texture_slot as usize];
        if let Some(slot) = assigned.iter().position(|slot| *slot == Some(texture)) {
            return slot as u32;
        }

        let slot = self.current_texture_slot;
        self.texture_slots[slot as usize] = Some(texture);
        self.current_texture_slot += 1;
        slot
    }

    /// Release the GPU buffers and layout. The state is invalid afterwards.
    pub fn destroy(&mut self, backend: &mut B) {
        self.vertex_layout.destroy(backend);
        self.vertex_buffer.destroy(backend);
        self.index_buffer.destroy(backend);
        self.staging.clear();
        self.index_count = 0;
    }

    pub fn is_valid(&self) -> bool {
        self.vertex_layout.is_valid() && self.vertex_buffer.is_valid() && self.index_buffer.is_valid()
    }

    /// Indices staged in the current batch.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Vertices staged in the current batch.
    pub fn vertex_count(&self) -> usize {
        self.staging.len()
    }

    pub fn staged_vertices(&self) -> &[BatchQuadVertex] {
        &self.staging
    }

    /// Next free slot; also the number of slots in use.
    pub fn current_texture_slot(&self) -> u32 {
        self.current_texture_slot
    }

    /// Effective slot count after applying the backend limit.
    pub fn max_texture_slots(&self) -> u32 {
        self.max_texture_slots
    }

    pub fn max_shapes_per_batch(&self) -> u32 {
        self.indices_per_batch / INDICES_PER_QUAD
    }

    /// Textures assigned in the current batch, by slot.
    pub fn assigned_textures(&self) -> &[Option<TextureId>] {
        &self.texture_slots[..self.current_texture_slot as usize]
    }

    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }
}
