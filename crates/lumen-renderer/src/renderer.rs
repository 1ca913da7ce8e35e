//! Frame-level facade over the batch and draw states.
//!
//! A frame is `begin_frame`, any number of shape submissions, then
//! `end_frame`. Batched quads and lines are drawn when their batch fills
//! up and at `end_frame`; immediate draws go out as they are called, so
//! they land underneath anything still waiting in a batch.

use glam::{Mat4, UVec2};
use lumen_common::Color;
use lumen_config::RendererConfig;

use crate::backend::{RenderBackend, ShaderProgram, TextureDescriptor, TextureId};
use crate::camera::Camera2D;
use crate::error::{RendererError, Result};
use crate::geometry::{Line, Quad, ScreenLine, ScreenQuad, Sprite};
use crate::perf::FrameStats;
use crate::pipeline::{Pipeline, SCREEN_PROJECTION_UNIFORM, VIEW_PROJECTION_UNIFORM};
use crate::states::{
    LineBatchState, LineDrawState, QuadBatchCreateInfo, QuadBatchState, QuadDrawState,
};

struct Pipelines<B: RenderBackend> {
    batch_quad: Pipeline<B>,
    batch_line: Pipeline<B>,
    quad: Pipeline<B>,
    line: Pipeline<B>,
}

impl<B: RenderBackend> Pipelines<B> {
    fn get(&self, program: ShaderProgram) -> &Pipeline<B> {
        match program {
            ShaderProgram::BatchQuad => &self.batch_quad,
            ShaderProgram::BatchLine => &self.batch_line,
            ShaderProgram::Quad => &self.quad,
            ShaderProgram::Line => &self.line,
        }
    }
}

pub struct Renderer<B: RenderBackend> {
    pipelines: Pipelines<B>,
    quad_batch: QuadBatchState<B>,
    line_batch: LineBatchState<B>,
    quad_draw: QuadDrawState<B>,
    line_draw: LineDrawState<B>,

    default_texture: Option<TextureId>,
    clear_color: [f32; 4],
    virtual_size: UVec2,
    view_projection: Mat4,
    screen_projection: Mat4,

    active: Option<ShaderProgram>,
    immediate_draws: u32,
}

impl<B: RenderBackend> Renderer<B> {
    pub fn new(backend: &mut B, config: &RendererConfig) -> Result<Self> {
        let clear_color = Color::parse(&config.clear_color)
            .ok_or_else(|| {
                RendererError::InvalidCreateInfo(format!(
                    "clear colour {:?} is not a colour",
                    config.clear_color
                ))
            })?
            .to_normalized();

        let default_texture = backend.create_texture(&TextureDescriptor {
            label: Some("default white"),
            width: 1,
            height: 1,
            pixels: &[255; 4],
        })?;

        let texture_slots = backend.limits().max_texture_units.min(config.max_texture_slots);
        let pipelines = Pipelines {
            batch_quad: Pipeline::new(backend, ShaderProgram::BatchQuad, texture_slots)?,
            batch_line: Pipeline::new(backend, ShaderProgram::BatchLine, 0)?,
            quad: Pipeline::new(backend, ShaderProgram::Quad, 1)?,
            line: Pipeline::new(backend, ShaderProgram::Line, 0)?,
        };

        let quad_batch = QuadBatchState::new(
            backend,
            &QuadBatchCreateInfo {
                max_shapes_per_batch: config.max_shapes_per_batch,
                pipeline: &pipelines.batch_quad,
                texture_array_uniform: &config.texture_array_uniform,
                default_texture,
                max_texture_slots: config.max_texture_slots,
            },
        )?;
        let line_batch = LineBatchState::new(backend, config.max_lines_per_batch)?;
        let quad_draw = QuadDrawState::new(backend, default_texture)?;
        let line_draw = LineDrawState::new(backend)?;

        let mut renderer = Self {
            pipelines,
            quad_batch,
            line_batch,
            quad_draw,
            line_draw,
            default_texture: Some(default_texture),
            clear_color,
            virtual_size: UVec2::ONE,
            view_projection: Mat4::IDENTITY,
            screen_projection: Mat4::IDENTITY,
            active: None,
            immediate_draws: 0,
        };
        renderer.set_virtual_size(UVec2::new(config.virtual_width, config.virtual_height));

        tracing::info!(
            "renderer ready: virtual size {}x{}, {} texture slots",
            renderer.virtual_size.x,
            renderer.virtual_size.y,
            renderer.quad_batch.max_texture_slots()
        );
        Ok(renderer)
    }

    /// Resize the pixel space used by screen-space shapes. Origin top-left, y down.
    pub fn set_virtual_size(&mut self, size: UVec2) {
        self.virtual_size = size.max(UVec2::ONE);
        self.screen_projection = Mat4::orthographic_rh(
            0.0,
            self.virtual_size.x as f32,
            self.virtual_size.y as f32,
            0.0,
            -1.0,
            1.0,
        );
    }

    pub fn virtual_size(&self) -> UVec2 {
        self.virtual_size
    }

    pub fn screen_projection(&self) -> Mat4 {
        self.screen_projection
    }

    /// Clear the target, upload the camera and screen projections, and
    /// start empty batches.
    pub fn begin_frame(&mut self, backend: &mut B, camera: &Camera2D) {
        self.view_projection = camera.view_projection();
        backend.clear(self.clear_color);

        for program in [ShaderProgram::BatchQuad, ShaderProgram::BatchLine] {
            self.activate(backend, program);
            let pipeline = self.pipelines.get(program);
            pipeline.set_matrix(backend, VIEW_PROJECTION_UNIFORM, &self.view_projection);
            pipeline.set_matrix(backend, SCREEN_PROJECTION_UNIFORM, &self.screen_projection);
        }

        self.quad_batch.reset_stats();
        self.line_batch.reset_stats();
        self.immediate_draws = 0;
        self.quad_batch.begin();
        self.line_batch.begin();
    }

    /// Flush both batches and report what the frame drew.
    pub fn end_frame(&mut self, backend: &mut B) -> FrameStats {
        self.activate(backend, ShaderProgram::BatchQuad);
        self.quad_batch.flush(backend);
        self.quad_batch.begin();

        self.activate(backend, ShaderProgram::BatchLine);
        self.line_batch.flush(backend);
        self.line_batch.begin();

        backend.use_pipeline(None);
        self.active = None;

        let quads = self.quad_batch.stats();
        let lines = self.line_batch.stats();
        let stats = FrameStats {
            quad_batches: quads.draw_calls,
            line_batches: lines.draw_calls,
            immediate_draws: self.immediate_draws,
            quads: quads.shapes,
            lines: lines.shapes,
        };
        tracing::trace!("frame done: {} draw calls", stats.draw_calls());
        stats
    }

    fn activate(&mut self, backend: &mut B, program: ShaderProgram) {
        if self.active != Some(program) {
            self.pipelines.get(program).use_pipeline(backend);
            self.active = Some(program);
        }
    }

    // -- batched ------------------------------------------------------------

    pub fn batch_rectangle(&mut self, backend: &mut B, model: &Mat4, sprite: &Sprite) {
        self.activate(backend, ShaderProgram::BatchQuad);
        self.quad_batch.batch_rectangle(backend, model, sprite);
    }

    pub fn batch_quad(&mut self, backend: &mut B, quad: &Quad, model: &Mat4, sprite: &Sprite) {
        self.activate(backend, ShaderProgram::BatchQuad);
        self.quad_batch.batch_quad(backend, quad, model, sprite);
    }

    pub fn batch_screen_rectangle(
        &mut self,
        backend: &mut B,
        size: UVec2,
        model: &Mat4,
        sprite: &Sprite,
    ) {
        self.activate(backend, ShaderProgram::BatchQuad);
        self.quad_batch
            .batch_screen_rectangle(backend, size, model, sprite);
    }

    pub fn batch_screen_quad(
        &mut self,
        backend: &mut B,
        quad: &ScreenQuad,
        model: &Mat4,
        sprite: &Sprite,
    ) {
        self.activate(backend, ShaderProgram::BatchQuad);
        self.quad_batch.batch_screen_quad(backend, quad, model, sprite);
    }

    pub fn batch_line(&mut self, backend: &mut B, line: &Line, model: &Mat4, color: Color) {
        self.activate(backend, ShaderProgram::BatchLine);
        self.line_batch.batch_line(backend, line, model, color);
    }

    pub fn batch_screen_line(
        &mut self,
        backend: &mut B,
        line: &ScreenLine,
        model: &Mat4,
        color: Color,
    ) {
        self.activate(backend, ShaderProgram::BatchLine);
        self.line_batch.batch_screen_line(backend, line, model, color);
    }

    // -- immediate ----------------------------------------------------------

    fn prepare_immediate(&mut self, backend: &mut B, program: ShaderProgram, projection: Mat4) {
        self.activate(backend, program);
        self.pipelines
            .get(program)
            .set_matrix(backend, VIEW_PROJECTION_UNIFORM, &projection);
        self.immediate_draws += 1;
    }

    pub fn draw_rectangle(&mut self, backend: &mut B, model: &Mat4, sprite: &Sprite) {
        self.prepare_immediate(backend, ShaderProgram::Quad, self.view_projection);
        self.quad_draw.draw_rectangle(backend, model, sprite);
    }

    pub fn draw_screen_rectangle(
        &mut self,
        backend: &mut B,
        size: UVec2,
        model: &Mat4,
        sprite: &Sprite,
    ) {
        self.prepare_immediate(backend, ShaderProgram::Quad, self.screen_projection);
        self.quad_draw
            .draw_screen_rectangle(backend, size, model, sprite);
    }

    pub fn draw_line(&mut self, backend: &mut B, line: &Line, model: &Mat4, color: Color) {
        self.prepare_immediate(backend, ShaderProgram::Line, self.view_projection);
        self.line_draw.draw_line(backend, line, model, color);
    }

    pub fn draw_screen_line(
        &mut self,
        backend: &mut B,
        line: &ScreenLine,
        model: &Mat4,
        color: Color,
    ) {
        self.prepare_immediate(backend, ShaderProgram::Line, self.screen_projection);
        self.line_draw.draw_screen_line(backend, line, model, color);
    }

    // -- lifetime -----------------------------------------------------------

    /// The 1x1 white texture untextured sprites sample. `None` after [`destroy`](Self::destroy).
    pub fn default_texture(&self) -> Option<TextureId> {
        self.default_texture
    }

    pub fn max_texture_slots(&self) -> u32 {
        self.quad_batch.max_texture_slots()
    }

    pub fn is_valid(&self) -> bool {
        self.default_texture.is_some()
            && self.quad_batch.is_valid()
            && self.line_batch.is_valid()
            && self.quad_draw.is_valid()
            && self.line_draw.is_valid()
    }

    /// Release every GPU object the renderer owns. Safe to call twice.
    pub fn destroy(&mut self, backend: &mut B) {
        self.quad_batch.destroy(backend);
        self.line_batch.destroy(backend);
        self.quad_draw.destroy(backend);
        self.line_draw.destroy(backend);
        if let Some(texture) = self.default_texture.take() {
            backend.destroy_texture(texture);
        }
        self.active = None;
    }
}
