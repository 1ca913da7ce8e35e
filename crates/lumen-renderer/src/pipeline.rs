use glam::Mat4;

use crate::backend::{PipelineDescriptor, RenderBackend, ShaderProgram};
use crate::error::Result;

/// Uniform holding the world (or, for single draws, the active) projection.
pub const VIEW_PROJECTION_UNIFORM: &str = "u_ViewProjection";
/// Uniform holding the pixel-space projection used by screen-tagged vertices.
pub const SCREEN_PROJECTION_UNIFORM: &str = "u_ScreenProjection";

/// A linked shader program.
///
/// Opaque to the batching states: they only activate it and hand it
/// uniform values.
pub struct Pipeline<B: RenderBackend> {
    raw: B::Pipeline,
    program: ShaderProgram,
}

impl<B: RenderBackend> Pipeline<B> {
    pub fn new(backend: &mut B, program: ShaderProgram, texture_slots: u32) -> Result<Self> {
        let label = format!("{program:?} pipeline");
        let raw = backend.create_pipeline(&PipelineDescriptor {
            label: Some(&label),
            program,
            texture_slots,
        })?;
        tracing::debug!("created {label}");
        Ok(Self { raw, program })
    }

    pub fn use_pipeline(&self, backend: &mut B) {
        backend.use_pipeline(Some(&self.raw));
    }

    pub fn disuse(&self, backend: &mut B) {
        backend.use_pipeline(None);
    }

    /// Map the sampler array `name` onto texture units.
    pub fn set_texture_uniform_vector(&self, backend: &mut B, name: &str, indices: &[i32]) {
        backend.set_texture_uniform(&self.raw, name, indices);
    }

    pub fn set_matrix(&self, backend: &mut B, name: &str, matrix: &Mat4) {
        backend.set_matrix_uniform(&self.raw, name, matrix);
    }

    pub fn program(&self) -> ShaderProgram {
        self.program
    }

    pub fn raw(&self) -> &B::Pipeline {
        &self.raw
    }
}
