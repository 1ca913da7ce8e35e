use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::backend::{AttributeType, DrawMode, RenderBackend};

use super::buffer::IndexBuffer;

/// One attribute as declared to [`VertexLayoutBuilder`](super::VertexLayoutBuilder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub element_count: u32,
    pub data_type: AttributeType,
    pub normalised: bool,
}

impl VertexAttribute {
    /// `element_count` 32-bit floats.
    pub const fn float32(element_count: u32) -> Self {
        Self {
            element_count,
            data_type: AttributeType::Float32,
            normalised: false,
        }
    }

    /// Bytes this attribute occupies in a vertex.
    pub fn size(&self) -> u32 {
        self.element_count * self.data_type.size()
    }
}

/// A compiled vertex layout.
///
/// The default value is invalid; a usable layout only comes out of
/// [`VertexLayoutBuilder::build`](super::VertexLayoutBuilder::build).
/// A layout also turns invalid once any buffer it was built over is
/// destroyed.
pub struct VertexLayout<B: RenderBackend> {
    raw: Option<B::Layout>,
    sources: Vec<Arc<AtomicBool>>,
    stride: u32,
    location_count: u32,
}

impl<B: RenderBackend> Default for VertexLayout<B> {
    fn default() -> Self {
        Self {
            raw: None,
            sources: Vec::new(),
            stride: 0,
            location_count: 0,
        }
    }
}

impl<B: RenderBackend> VertexLayout<B> {
    pub(crate) fn from_raw(
        raw: B::Layout,
        sources: Vec<Arc<AtomicBool>>,
        stride: u32,
        location_count: u32,
    ) -> Self {
        Self {
            raw: Some(raw),
            sources,
            stride,
            location_count,
        }
    }

    /// Non-indexed draw of `count` vertices starting at vertex `offset`.
    pub fn draw(&self, backend: &mut B, count: u32, offset: u32, mode: DrawMode) {
        let Some(raw) = &self.raw else {
            tracing::warn!("draw on an invalid vertex layout skipped");
            return;
        };
        backend.draw(raw, mode, offset, count);
    }

    /// Indexed draw of `index_count` indices.
    ///
    /// With `bind_index_buffer` set, `index_buffer` is bound before the draw
    /// and unbound after it. Otherwise the caller must have bound it.
    pub fn draw_indexed(
        &self,
        backend: &mut B,
        index_buffer: &IndexBuffer<B>,
        index_count: u32,
        bind_index_buffer: bool,
        mode: DrawMode,
    ) {
        let Some(raw) = &self.raw else {
            tracing::warn!("indexed draw on an invalid vertex layout skipped");
            return;
        };

        if bind_index_buffer {
            index_buffer.bind(backend);
        }
        backend.draw_indexed(raw, mode, index_count);
        if bind_index_buffer {
            index_buffer.unbind(backend);
        }
    }

    /// Release the backend layout. Does nothing when already invalid.
    pub fn destroy(&mut self, backend: &mut B) {
        if let Some(raw) = self.raw.take() {
            backend.destroy_layout(raw);
        }
    }

    /// The backend layout exists and every source buffer is still alive.
    pub fn is_valid(&self) -> bool {
        self.raw.is_some()
            && self
                .sources
                .iter()
                .all(|alive| alive.load(Ordering::Acquire))
    }

    /// Bytes per vertex.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Shader input locations used.
    pub fn location_count(&self) -> u32 {
        self.location_count
    }

    pub fn raw(&self) -> Option<&B::Layout> {
        self.raw.as_ref()
    }
}
