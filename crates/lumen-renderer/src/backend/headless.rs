//! CPU-only backend that records every call.
//!
//! Buffers are plain byte vectors, textures are size records, and each
//! draw is captured as a [`DrawCall`] with a snapshot of the vertex and
//! index data it would have read. Used by tests and by the benchmark
//! binary when no GPU is wanted.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use glam::Mat4;

use super::types::*;
use super::RenderBackend;
use crate::error::{RendererError, Result};

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Counts one live resource. Released by an explicit destroy or, failing
/// that, when the last handle holding it is dropped.
#[derive(Debug)]
struct LiveToken {
    counter: Rc<Cell<usize>>,
    released: Cell<bool>,
}

impl LiveToken {
    fn new(counter: &Rc<Cell<usize>>) -> Self {
        counter.set(counter.get() + 1);
        Self {
            counter: Rc::clone(counter),
            released: Cell::new(false),
        }
    }

    fn release(&self) {
        if !self.released.replace(true) {
            self.counter.set(self.counter.get().saturating_sub(1));
        }
    }
}

impl Drop for LiveToken {
    fn drop(&mut self) {
        self.release();
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessBuffer {
    id: u32,
    kind: BufferKind,
    data: Rc<RefCell<Vec<u8>>>,
    token: Rc<LiveToken>,
}

impl HeadlessBuffer {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    /// Copy of the buffer's current contents.
    pub fn contents(&self) -> Vec<u8> {
        self.data.borrow().clone()
    }
}

#[derive(Debug)]
pub struct HeadlessLayout {
    id: u32,
    stride: u32,
    attributes: Vec<AttributeDescriptor>,
    buffers: Vec<HeadlessBuffer>,
    _token: LiveToken,
}

impl HeadlessLayout {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessPipeline {
    id: u32,
    program: ShaderProgram,
}

impl HeadlessPipeline {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn program(&self) -> ShaderProgram {
        self.program
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One captured draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub mode: DrawMode,
    pub indexed: bool,
    /// First vertex (non-indexed draws only).
    pub first: u32,
    /// Vertex count, or index count for indexed draws.
    pub count: u32,
    /// Id of the pipeline in use, if any.
    pub pipeline: Option<u32>,
    /// `(unit, texture)` pairs bound at draw time, ordered by unit.
    pub textures: Vec<(u32, TextureId)>,
    /// Full contents of the layout's source buffer.
    pub vertex_data: Vec<u8>,
    /// Full contents of the bound index buffer (indexed draws only).
    pub index_data: Vec<u8>,
    pub index_format: Option<IndexFormat>,
}

impl DrawCall {
    /// Decode the vertex snapshot as `T`.
    pub fn vertices<T: bytemuck::Pod>(&self) -> Vec<T> {
        bytemuck::pod_collect_to_vec(&self.vertex_data)
    }

    /// The vertices this draw actually reads: `count` for plain draws,
    /// up to the highest referenced index for indexed draws.
    pub fn drawn_vertices<T: bytemuck::Pod>(&self) -> Vec<T> {
        let all = self.vertices::<T>();
        let end = if self.indexed {
            self.indices()
                .iter()
                .take(self.count as usize)
                .max()
                .map_or(0, |&max| max as usize + 1)
        } else {
            (self.first + self.count) as usize
        };
        let start = if self.indexed { 0 } else { self.first as usize };
        all[start.min(all.len())..end.min(all.len())].to_vec()
    }

    /// Decode the index snapshot, widened to `u32`.
    pub fn indices(&self) -> Vec<u32> {
        match self.index_format {
            Some(IndexFormat::Uint16) => bytemuck::pod_collect_to_vec::<u8, u16>(&self.index_data)
                .into_iter()
                .map(u32::from)
                .collect(),
            Some(IndexFormat::Uint32) => bytemuck::pod_collect_to_vec(&self.index_data),
            None => Vec::new(),
        }
    }

    pub fn texture_at(&self, unit: u32) -> Option<TextureId> {
        self.textures
            .iter()
            .find(|(u, _)| *u == unit)
            .map(|(_, texture)| *texture)
    }
}

/// One captured `write_buffer` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferWrite {
    pub buffer: u32,
    pub offset: u64,
    pub len: usize,
}

#[derive(Debug, Clone, Copy)]
struct TextureRecord {
    width: u32,
    height: u32,
}

// ---------------------------------------------------------------------------
// HeadlessBackend
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    limits: BackendLimits,
    next_id: u32,
    live_buffers: Rc<Cell<usize>>,
    live_layouts: Rc<Cell<usize>>,
    textures: HashMap<TextureId, TextureRecord>,
    units: BTreeMap<u32, TextureId>,
    bound_vertex_buffer: Option<HeadlessBuffer>,
    bound_index_buffer: Option<HeadlessBuffer>,
    active_pipeline: Option<u32>,
    texture_uniforms: HashMap<(u32, String), Vec<i32>>,
    matrix_uniforms: HashMap<(u32, String), Mat4>,
    draw_calls: Vec<DrawCall>,
    writes: Vec<BufferWrite>,
    clears: Vec<[f32; 4]>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: BackendLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    /// Drain the recorded draws.
    pub fn take_draw_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.draw_calls)
    }

    pub fn buffer_writes(&self) -> &[BufferWrite] {
        &self.writes
    }

    pub fn clears(&self) -> &[[f32; 4]] {
        &self.clears
    }

    /// Forget recorded draws, writes and clears. Resources stay alive.
    pub fn reset_records(&mut self) {
        self.draw_calls.clear();
        self.writes.clear();
        self.clears.clear();
    }

    pub fn texture_uniform(&self, pipeline: u32, name: &str) -> Option<&[i32]> {
        self.texture_uniforms
            .get(&(pipeline, name.to_string()))
            .map(Vec::as_slice)
    }

    pub fn matrix_uniform(&self, pipeline: u32, name: &str) -> Option<Mat4> {
        self.matrix_uniforms.get(&(pipeline, name.to_string())).copied()
    }

    pub fn active_pipeline(&self) -> Option<u32> {
        self.active_pipeline
    }

    /// Textures currently bound, as `(unit, texture)` ordered by unit.
    pub fn bound_textures(&self) -> Vec<(u32, TextureId)> {
        self.units.iter().map(|(u, t)| (*u, *t)).collect()
    }

    /// Buffers neither destroyed nor dropped. A buffer stays live while a
    /// layout built over it still exists.
    pub fn live_buffer_count(&self) -> usize {
        self.live_buffers.get()
    }

    pub fn live_layout_count(&self) -> usize {
        self.live_layouts.get()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.textures.get(&texture).map(|t| (t.width, t.height))
    }

    fn record(
        &mut self,
        layout: &HeadlessLayout,
        mode: DrawMode,
        first: u32,
        count: u32,
        index_buffer: Option<&HeadlessBuffer>,
    ) {
        let vertex_data = layout
            .buffers
            .last()
            .map(HeadlessBuffer::contents)
            .unwrap_or_default();

        let (index_data, index_format) = match index_buffer {
            Some(buffer) => match buffer.kind {
                BufferKind::Index(format) => (buffer.contents(), Some(format)),
                BufferKind::Vertex => (Vec::new(), None),
            },
            None => (Vec::new(), None),
        };

        let textures = self.bound_textures();
        self.draw_calls.push(DrawCall {
            mode,
            indexed: index_buffer.is_some(),
            first,
            count,
            pipeline: self.active_pipeline,
            textures,
            vertex_data,
            index_data,
            index_format,
        });
    }
}

impl RenderBackend for HeadlessBackend {
    type Buffer = HeadlessBuffer;
    type Layout = HeadlessLayout;
    type Pipeline = HeadlessPipeline;

    fn limits(&self) -> BackendLimits {
        self.limits
    }

    fn create_buffer(&mut self, desc: &BufferDescriptor<'_>) -> Result<HeadlessBuffer> {
        let mut data = vec![0u8; desc.size as usize];
        if let Some(contents) = desc.contents {
            if contents.len() > data.len() {
                return Err(RendererError::ResourceCreation(format!(
                    "buffer {:?}: {} bytes of contents exceed size {}",
                    desc.label.unwrap_or("unnamed"),
                    contents.len(),
                    desc.size
                )));
            }
            data[..contents.len()].copy_from_slice(contents);
        }

        Ok(HeadlessBuffer {
            id: self.next_id(),
            kind: desc.kind,
            data: Rc::new(RefCell::new(data)),
            token: Rc::new(LiveToken::new(&self.live_buffers)),
        })
    }

    fn write_buffer(&mut self, buffer: &HeadlessBuffer, offset: u64, data: &[u8]) {
        let mut target = buffer.data.borrow_mut();
        let start = offset as usize;
        let end = start + data.len();
        if end > target.len() {
            tracing::warn!(
                "write of {} bytes at offset {offset} overruns buffer {} ({} bytes)",
                data.len(),
                buffer.id,
                target.len()
            );
            return;
        }
        target[start..end].copy_from_slice(data);
        self.writes.push(BufferWrite {
            buffer: buffer.id,
            offset,
            len: data.len(),
        });
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<&HeadlessBuffer>) {
        match target {
            BufferTarget::Vertex => self.bound_vertex_buffer = buffer.cloned(),
            BufferTarget::Index => self.bound_index_buffer = buffer.cloned(),
        }
    }

    fn destroy_buffer(&mut self, buffer: HeadlessBuffer) {
        for bound in [&mut self.bound_vertex_buffer, &mut self.bound_index_buffer] {
            if bound.as_ref().is_some_and(|b| b.id == buffer.id) {
                *bound = None;
            }
        }
        buffer.token.release();
    }

    fn create_layout(
        &mut self,
        desc: &LayoutDescriptor<'_, HeadlessBuffer>,
    ) -> Result<HeadlessLayout> {
        if desc.buffers.is_empty() {
            return Err(RendererError::InvalidResource(
                "vertex layout has no vertex buffer".into(),
            ));
        }

        Ok(HeadlessLayout {
            id: self.next_id(),
            stride: desc.stride,
            attributes: desc.attributes.to_vec(),
            buffers: desc.buffers.iter().map(|b| (*b).clone()).collect(),
            _token: LiveToken::new(&self.live_layouts),
        })
    }

    fn destroy_layout(&mut self, layout: HeadlessLayout) {
        drop(layout);
    }

    fn create_pipeline(&mut self, desc: &PipelineDescriptor<'_>) -> Result<HeadlessPipeline> {
        Ok(HeadlessPipeline {
            id: self.next_id(),
            program: desc.program,
        })
    }

    fn use_pipeline(&mut self, pipeline: Option<&HeadlessPipeline>) {
        self.active_pipeline = pipeline.map(|p| p.id);
    }

    fn set_texture_uniform(&mut self, pipeline: &HeadlessPipeline, name: &str, units: &[i32]) {
        if self.active_pipeline != Some(pipeline.id) {
            tracing::warn!("uniform {name} set on pipeline {} while not in use", pipeline.id);
        }
        self.texture_uniforms
            .insert((pipeline.id, name.to_string()), units.to_vec());
    }

    fn set_matrix_uniform(&mut self, pipeline: &HeadlessPipeline, name: &str, matrix: &Mat4) {
        self.matrix_uniforms
            .insert((pipeline.id, name.to_string()), *matrix);
    }

    fn create_texture(&mut self, desc: &TextureDescriptor<'_>) -> Result<TextureId> {
        if desc.width == 0 || desc.height == 0 || desc.pixels.len() != desc.expected_len() {
            return Err(RendererError::ResourceCreation(format!(
                "texture {:?}: {}x{} with {} bytes of pixels",
                desc.label.unwrap_or("unnamed"),
                desc.width,
                desc.height,
                desc.pixels.len()
            )));
        }

        let id = TextureId(self.next_id());
        self.textures.insert(
            id,
            TextureRecord {
                width: desc.width,
                height: desc.height,
            },
        );
        Ok(id)
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
        self.units.retain(|_, bound| *bound != texture);
    }

    fn bind_texture(&mut self, texture: TextureId, unit: u32) {
        if !self.textures.contains_key(&texture) {
            tracing::warn!("bind of unknown texture {texture:?} to unit {unit} ignored");
            return;
        }
        if unit >= self.limits.max_texture_units {
            tracing::warn!("texture unit {unit} exceeds the backend limit");
            return;
        }
        self.units.insert(unit, texture);
    }

    fn unbind_texture(&mut self, unit: u32) {
        self.units.remove(&unit);
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.clears.push(color);
    }

    fn draw(&mut self, layout: &HeadlessLayout, mode: DrawMode, first: u32, count: u32) {
        self.record(layout, mode, first, count, None);
    }

    fn draw_indexed(&mut self, layout: &HeadlessLayout, mode: DrawMode, count: u32) {
        let Some(index_buffer) = self.bound_index_buffer.clone() else {
            tracing::warn!("indexed draw with no index buffer bound skipped");
            return;
        };
        self.record(layout, mode, 0, count, Some(&index_buffer));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
