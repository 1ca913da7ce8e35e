use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::backend::{
    BufferDescriptor, BufferKind, BufferTarget, BufferUsage, IndexFormat, RenderBackend,
};
use crate::error::{RendererError, Result};

// ---------------------------------------------------------------------------
// VertexBuffer
// ---------------------------------------------------------------------------

/// GPU vertex memory of a fixed size.
///
/// Owns its backend handle and is move-only. [`destroy`](Self::destroy)
/// releases the handle early. Dropping the buffer drops its handle, and the
/// backend frees the memory once no layout built over it holds a clone.
pub struct VertexBuffer<B: RenderBackend> {
    raw: Option<B::Buffer>,
    /// Cleared by `destroy`; layouts built over this buffer watch it.
    alive: Arc<AtomicBool>,
    size: u64,
    usage: BufferUsage,
}

impl<B: RenderBackend> VertexBuffer<B> {
    /// Allocate `size` zeroed bytes.
    pub fn new(backend: &mut B, size: u64, usage: BufferUsage) -> Result<Self> {
        let raw = backend.create_buffer(&BufferDescriptor {
            label: Some("vertex buffer"),
            kind: BufferKind::Vertex,
            usage,
            size,
            contents: None,
        })?;

        Ok(Self {
            raw: Some(raw),
            alive: Arc::new(AtomicBool::new(true)),
            size,
            usage,
        })
    }

    /// Allocate exactly enough for `vertices` and upload them.
    pub fn with_data<T: bytemuck::Pod>(
        backend: &mut B,
        vertices: &[T],
        usage: BufferUsage,
    ) -> Result<Self> {
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        let size = bytes.len() as u64;
        let raw = backend.create_buffer(&BufferDescriptor {
            label: Some("vertex buffer"),
            kind: BufferKind::Vertex,
            usage,
            size,
            contents: Some(bytes),
        })?;

        Ok(Self {
            raw: Some(raw),
            alive: Arc::new(AtomicBool::new(true)),
            size,
            usage,
        })
    }

    /// Overwrite the first `count` elements of the buffer with `vertices[..count]`.
    ///
    /// The buffer is never reallocated; the caller keeps the write within
    /// the allocated size.
    pub fn set_sub_data<T: bytemuck::Pod>(&self, backend: &mut B, vertices: &[T], count: usize) {
        let Some(raw) = &self.raw else {
            return;
        };
        let count = count.min(vertices.len());
        let bytes: &[u8] = bytemuck::cast_slice(&vertices[..count]);
        debug_assert!(
            bytes.len() as u64 <= self.size,
            "sub data of {} bytes exceeds vertex buffer size {}",
            bytes.len(),
            self.size
        );
        if !bytes.is_empty() {
            backend.write_buffer(raw, 0, bytes);
        }
    }

    pub fn bind(&self, backend: &mut B) {
        if let Some(raw) = &self.raw {
            backend.bind_buffer(BufferTarget::Vertex, Some(raw));
        }
    }

    pub fn unbind(&self, backend: &mut B) {
        backend.bind_buffer(BufferTarget::Vertex, None);
    }

    /// Release the handle. Does nothing when already destroyed.
    pub fn destroy(&mut self, backend: &mut B) {
        if let Some(raw) = self.raw.take() {
            self.alive.store(false, Ordering::Release);
            backend.destroy_buffer(raw);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.raw.is_some()
    }

    /// Flag that stays `true` until this buffer is destroyed.
    pub(crate) fn liveness(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.alive)
    }

    /// Allocated size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub(crate) fn raw(&self) -> Result<&B::Buffer> {
        self.raw
            .as_ref()
            .ok_or_else(|| RendererError::InvalidResource("vertex buffer has been destroyed".into()))
    }
}

// ---------------------------------------------------------------------------
// IndexBuffer
// ---------------------------------------------------------------------------

/// Integer types usable as indices.
pub trait IndexElement: bytemuck::Pod {
    const FORMAT: IndexFormat;
}

impl IndexElement for u16 {
    const FORMAT: IndexFormat = IndexFormat::Uint16;
}

impl IndexElement for u32 {
    const FORMAT: IndexFormat = IndexFormat::Uint32;
}

/// GPU index memory, uploaded once at creation.
pub struct IndexBuffer<B: RenderBackend> {
    raw: Option<B::Buffer>,
    index_count: u32,
    format: IndexFormat,
}

impl<B: RenderBackend> IndexBuffer<B> {
    pub fn new<I: IndexElement>(backend: &mut B, indices: &[I], usage: BufferUsage) -> Result<Self> {
        let bytes: &[u8] = bytemuck::cast_slice(indices);
        let raw = backend.create_buffer(&BufferDescriptor {
            label: Some("index buffer"),
            kind: BufferKind::Index(I::FORMAT),
            usage,
            size: bytes.len() as u64,
            contents: Some(bytes),
        })?;

        Ok(Self {
            raw: Some(raw),
            index_count: indices.len() as u32,
            format: I::FORMAT,
        })
    }

    pub fn bind(&self, backend: &mut B) {
        if let Some(raw) = &self.raw {
            backend.bind_buffer(BufferTarget::Index, Some(raw));
        }
    }

    pub fn unbind(&self, backend: &mut B) {
        backend.bind_buffer(BufferTarget::Index, None);
    }

    /// Release the handle. Does nothing when already destroyed.
    pub fn destroy(&mut self, backend: &mut B) {
        if let Some(raw) = self.raw.take() {
            backend.destroy_buffer(raw);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.raw.is_some()
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn format(&self) -> IndexFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;

    #[test]
    fn new_vertex_buffer_is_valid_and_sized() {
        let mut backend = HeadlessBackend::new();
        let buffer = VertexBuffer::new(&mut backend, 64, BufferUsage::Dynamic).unwrap();
        assert!(buffer.is_valid());
        assert_eq!(buffer.size(), 64);
        assert_eq!(buffer.usage(), BufferUsage::Dynamic);
        assert_eq!(backend.live_buffer_count(), 1);
    }

    #[test]
    fn with_data_uploads_contents() {
        let mut backend = HeadlessBackend::new();
        let buffer = VertexBuffer::with_data(&mut backend, &[1.0f32, 2.0], BufferUsage::Static)
            .unwrap();
        assert_eq!(buffer.size(), 8);
        let contents = buffer.raw().unwrap().contents();
        assert_eq!(bytemuck::pod_collect_to_vec::<u8, f32>(&contents), vec![1.0, 2.0]);
    }

    #[test]
    fn set_sub_data_writes_only_requested_prefix() {
        let mut backend = HeadlessBackend::new();
        let buffer = VertexBuffer::new(&mut backend, 16, BufferUsage::Dynamic).unwrap();
        buffer.set_sub_data(&mut backend, &[9u32, 8, 7], 2);

        let writes = backend.buffer_writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].offset, 0);
        assert_eq!(writes[0].len, 8);

        let contents = buffer.raw().unwrap().contents();
        assert_eq!(
            bytemuck::pod_collect_to_vec::<u8, u32>(&contents),
            vec![9, 8, 0, 0]
        );
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut backend = HeadlessBackend::new();
        let mut buffer = VertexBuffer::new(&mut backend, 16, BufferUsage::Static).unwrap();
        buffer.destroy(&mut backend);
        buffer.destroy(&mut backend);
        assert!(!buffer.is_valid());
        assert_eq!(backend.live_buffer_count(), 0);
        assert!(buffer.raw().is_err());

        // Writes to a destroyed buffer are dropped.
        buffer.set_sub_data(&mut backend, &[1u8], 1);
        assert!(backend.buffer_writes().is_empty());
    }

    #[test]
    fn moving_a_buffer_transfers_the_handle() {
        let mut backend = HeadlessBackend::new();
        let buffer = VertexBuffer::new(&mut backend, 16, BufferUsage::Static).unwrap();
        let mut moved = buffer;
        assert!(moved.is_valid());
        moved.destroy(&mut backend);
        assert_eq!(backend.live_buffer_count(), 0);
    }

    #[test]
    fn index_buffer_records_count_and_format() {
        let mut backend = HeadlessBackend::new();
        let small = IndexBuffer::new(&mut backend, &[0u16, 1, 2], BufferUsage::Static).unwrap();
        assert_eq!(small.index_count(), 3);
        assert_eq!(small.format(), IndexFormat::Uint16);

        let mut wide = IndexBuffer::new(&mut backend, &[0u32; 6], BufferUsage::Static).unwrap();
        assert_eq!(wide.format(), IndexFormat::Uint32);
        wide.destroy(&mut backend);
        wide.destroy(&mut backend);
        assert!(!wide.is_valid());
        assert_eq!(backend.live_buffer_count(), 1);
    }

    #[test]
    fn dropping_buffers_releases_their_memory() {
        let mut backend = HeadlessBackend::new();
        {
            let _vertices = VertexBuffer::new(&mut backend, 16, BufferUsage::Static).unwrap();
            let _indices =
                IndexBuffer::new(&mut backend, &[0u16, 1, 2], BufferUsage::Static).unwrap();
            assert_eq!(backend.live_buffer_count(), 2);
        }
        assert_eq!(backend.live_buffer_count(), 0);
    }

    #[test]
    fn destroy_clears_the_liveness_flag() {
        let mut backend = HeadlessBackend::new();
        let mut buffer = VertexBuffer::new(&mut backend, 16, BufferUsage::Static).unwrap();
        let alive = buffer.liveness();
        assert!(alive.load(Ordering::Acquire));
        buffer.destroy(&mut backend);
        assert!(!alive.load(Ordering::Acquire));
    }
}
