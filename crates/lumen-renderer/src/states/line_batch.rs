use glam::Mat4;
use lumen_common::Color;

use crate::backend::{BufferUsage, DrawMode, RenderBackend};
use crate::error::{RendererError, Result};
use crate::geometry::{Line, ScreenLine};
use crate::objects::{VertexAttribute, VertexBuffer, VertexLayout, VertexLayoutBuilder};
use crate::vertex::{BatchLineVertex, ProjectionType};

use super::{batch_capacity, transform_point, BatchStats, VERTICES_PER_LINE};

/// Batched coloured lines drawn as a line list.
///
/// Same begin/flush discipline as [`QuadBatchState`](super::QuadBatchState)
/// without texture slots or an index buffer.
pub struct LineBatchState<B: RenderBackend> {
    vertices_per_batch: usize,
    staging: Vec<BatchLineVertex>,
    vertex_layout: VertexLayout<B>,
    vertex_buffer: VertexBuffer<B>,
    stats: BatchStats,
}

impl<B: RenderBackend> LineBatchState<B> {
    pub fn new(backend: &mut B, max_shapes_per_batch: u32) -> Result<Self> {
        if max_shapes_per_batch == 0 {
            return Err(RendererError::InvalidCreateInfo(
                "max_shapes_per_batch must be at least 1".into(),
            ));
        }

        let (vertices_per_batch, vertex_bytes) = batch_capacity(
            max_shapes_per_batch,
            VERTICES_PER_LINE,
            std::mem::size_of::<BatchLineVertex>(),
        )?;
        let vertex_buffer = VertexBuffer::new(backend, vertex_bytes, BufferUsage::Dynamic)?;

        let vertex_layout = VertexLayoutBuilder::new()
            .add_attribute(VertexAttribute::float32(2))
            .add_attribute(VertexAttribute::float32(4))
            .add_attribute(VertexAttribute::float32(1))
            .add_vertex_buffer(&vertex_buffer)
            .build(backend)?;

        tracing::info!("line batch ready: {max_shapes_per_batch} lines per batch");

        Ok(Self {
            vertices_per_batch,
            staging: Vec::with_capacity(vertices_per_batch),
            vertex_layout,
            vertex_buffer,
            stats: BatchStats::default(),
        })
    }

    pub fn begin(&mut self) {
        self.staging.clear();
    }

    /// Upload the staged lines and draw them. Does not reset the batch.
    pub fn flush(&mut self, backend: &mut B) {
        if self.staging.is_empty() {
            return;
        }

        self.vertex_buffer
            .set_sub_data(backend, &self.staging, self.staging.len());
        self.vertex_layout
            .draw(backend, self.staging.len() as u32, 0, DrawMode::Lines);

        self.stats.draw_calls += 1;
        tracing::trace!("line batch flushed: {} vertices", self.staging.len());
    }

    pub fn batch_line(&mut self, backend: &mut B, line: &Line, model: &Mat4, color: Color) {
        self.push_line(backend, line, model, color, ProjectionType::View);
    }

    pub fn batch_screen_line(
        &mut self,
        backend: &mut B,
        line: &ScreenLine,
        model: &Mat4,
        color: Color,
    ) {
        self.push_line(backend, &(*line).into(), model, color, ProjectionType::Screen);
    }

    fn push_line(
        &mut self,
        backend: &mut B,
        line: &Line,
        model: &Mat4,
        color: Color,
        projection: ProjectionType,
    ) {
        if self.staging.len() >= self.vertices_per_batch {
            self.flush(backend);
            self.begin();
        }

        let color = color.to_normalized();
        for point in [line.start, line.end] {
            self.staging.push(BatchLineVertex {
                position: transform_point(model, point),
                color,
                projection_type: projection.tag(),
            });
        }
        self.stats.shapes += 1;
    }

    pub fn destroy(&mut self, backend: &mut B) {
        self.vertex_layout.destroy(backend);
        self.vertex_buffer.destroy(backend);
        self.staging.clear();
    }

    pub fn is_valid(&self) -> bool {
        self.vertex_layout.is_valid() && self.vertex_buffer.is_valid()
    }

    /// Vertices staged in the current batch.
    pub fn vertex_count(&self) -> usize {
        self.staging.len()
    }

    pub fn staged_vertices(&self) -> &[BatchLineVertex] {
        &self.staging
    }

    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }
}

#[cfg(test)]
mod tests {
    use glam::{IVec2, Vec2, Vec3};

    use super::*;
    use crate::backend::HeadlessBackend;

    fn line(x: f32) -> Line {
        Line {
            start: Vec2::new(x, 0.0),
            end: Vec2::new(x, 1.0),
        }
    }

    #[test]
    fn layout_matches_vertex_format() {
        let mut backend = HeadlessBackend::new();
        let state = LineBatchState::new(&mut backend, 8).unwrap();
        assert!(state.is_valid());
        assert_eq!(
            state.vertex_layout.stride() as usize,
            std::mem::size_of::<BatchLineVertex>()
        );
        assert_eq!(state.vertex_layout.location_count(), 3);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut backend = HeadlessBackend::new();
        assert!(LineBatchState::new(&mut backend, 0).is_err());
    }

    #[test]
    fn overflowing_capacity_is_rejected() {
        let mut backend = HeadlessBackend::new();
        assert!(matches!(
            LineBatchState::new(&mut backend, u32::MAX),
            Err(RendererError::InvalidCreateInfo(_))
        ));
        assert_eq!(backend.live_buffer_count(), 0);
    }

    #[test]
    fn third_line_flushes_a_full_batch_of_two() {
        let mut backend = HeadlessBackend::new();
        let mut state = LineBatchState::new(&mut backend, 2).unwrap();

        state.begin();
        state.batch_line(&mut backend, &line(0.0), &Mat4::IDENTITY, Color::WHITE);
        state.batch_line(&mut backend, &line(1.0), &Mat4::IDENTITY, Color::WHITE);
        assert!(backend.draw_calls().is_empty());

        state.batch_line(&mut backend, &line(2.0), &Mat4::IDENTITY, Color::WHITE);
        assert_eq!(backend.draw_calls().len(), 1);
        assert_eq!(backend.draw_calls()[0].count, 4);

        state.flush(&mut backend);
        let calls = backend.draw_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].count, 2);
        assert_eq!(calls[1].mode, DrawMode::Lines);
        assert!(!calls[1].indexed);

        let drawn = calls[1].drawn_vertices::<BatchLineVertex>();
        assert_eq!(drawn[0].position, [2.0, 0.0]);
        assert_eq!(drawn[1].position, [2.0, 1.0]);
        assert_eq!(state.stats(), BatchStats { draw_calls: 2, shapes: 3 });
    }

    #[test]
    fn empty_flush_issues_no_draw() {
        let mut backend = HeadlessBackend::new();
        let mut state = LineBatchState::new(&mut backend, 2).unwrap();
        state.begin();
        state.flush(&mut backend);
        assert!(backend.draw_calls().is_empty());
    }

    #[test]
    fn vertices_carry_model_colour_and_projection() {
        let mut backend = HeadlessBackend::new();
        let mut state = LineBatchState::new(&mut backend, 4).unwrap();
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 0.0));

        state.begin();
        state.batch_line(&mut backend, &line(0.0), &model, Color::BLACK);
        state.batch_screen_line(
            &mut backend,
            &ScreenLine {
                start: IVec2::new(10, 20),
                end: IVec2::new(30, 40),
            },
            &Mat4::IDENTITY,
            Color::WHITE,
        );

        let staged = state.staged_vertices();
        assert_eq!(staged[0].position, [1.0, 2.0]);
        assert_eq!(staged[1].position, [1.0, 3.0]);
        assert_eq!(staged[0].color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(staged[0].projection_type, ProjectionType::View.tag());
        assert_eq!(staged[3].position, [30.0, 40.0]);
        assert_eq!(staged[3].projection_type, ProjectionType::Screen.tag());
    }

    #[test]
    fn destroy_releases_resources() {
        let mut backend = HeadlessBackend::new();
        let mut state = LineBatchState::new(&mut backend, 2).unwrap();
        state.destroy(&mut backend);
        assert!(!state.is_valid());
        assert_eq!(backend.live_buffer_count(), 0);
        assert_eq!(backend.live_layout_count(), 0);
    }
}
