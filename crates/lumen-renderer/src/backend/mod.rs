//! The graphics API seam.
//!
//! Everything above this module (buffers, layouts, batch states) talks to
//! the GPU only through [`RenderBackend`]. Two implementations ship with
//! the crate: [`HeadlessBackend`], which records every call for tests and
//! benchmarks, and [`WgpuBackend`].

mod gpu;
mod headless;
mod types;

pub use gpu::WgpuBackend;
pub use headless::{
    BufferWrite, DrawCall, HeadlessBackend, HeadlessBuffer, HeadlessLayout, HeadlessPipeline,
};
pub use types::*;

use glam::Mat4;

use crate::error::Result;

/// Buffer, layout, pipeline, texture and draw operations of a graphics API.
///
/// Creation is fallible. Binding and drawing are not: a backend that cannot
/// honour one of those calls logs the problem and skips it.
pub trait RenderBackend {
    /// GPU buffer handle. Layouts keep a clone of each buffer they read from.
    type Buffer: Clone;
    /// Compiled vertex layout.
    type Layout;
    /// Linked shader program.
    type Pipeline;

    fn limits(&self) -> BackendLimits;

    fn create_buffer(&mut self, desc: &BufferDescriptor<'_>) -> Result<Self::Buffer>;
    /// Overwrite `data.len()` bytes starting at `offset`. The buffer is never resized.
    fn write_buffer(&mut self, buffer: &Self::Buffer, offset: u64, data: &[u8]);
    /// Bind `buffer` to `target`, or clear the binding when `None`.
    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<&Self::Buffer>);
    fn destroy_buffer(&mut self, buffer: Self::Buffer);

    fn create_layout(&mut self, desc: &LayoutDescriptor<'_, Self::Buffer>) -> Result<Self::Layout>;
    fn destroy_layout(&mut self, layout: Self::Layout);

    fn create_pipeline(&mut self, desc: &PipelineDescriptor<'_>) -> Result<Self::Pipeline>;
    /// Make `pipeline` current for subsequent draws, or none when `None`.
    fn use_pipeline(&mut self, pipeline: Option<&Self::Pipeline>);
    /// Map each element of the sampler array `name` to a texture unit.
    fn set_texture_uniform(&mut self, pipeline: &Self::Pipeline, name: &str, units: &[i32]);
    fn set_matrix_uniform(&mut self, pipeline: &Self::Pipeline, name: &str, matrix: &Mat4);

    fn create_texture(&mut self, desc: &TextureDescriptor<'_>) -> Result<TextureId>;
    fn destroy_texture(&mut self, texture: TextureId);
    fn bind_texture(&mut self, texture: TextureId, unit: u32);
    fn unbind_texture(&mut self, unit: u32);

    /// Clear the render target.
    fn clear(&mut self, color: [f32; 4]);
    /// Non-indexed draw of `count` vertices starting at `first`.
    fn draw(&mut self, layout: &Self::Layout, mode: DrawMode, first: u32, count: u32);
    /// Indexed draw of `count` indices from the bound index buffer.
    fn draw_indexed(&mut self, layout: &Self::Layout, mode: DrawMode, count: u32);
}
