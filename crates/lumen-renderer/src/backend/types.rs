/// Non-owning handle to a texture held in a backend's texture registry.
///
/// Batch states compare and store these by value. They never free the
/// texture they refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Hardware limits the batching states size themselves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendLimits {
    /// Texture units a single draw can sample from.
    pub max_texture_units: u32,
    /// Vertex input locations available to a layout.
    pub max_vertex_attributes: u32,
}

impl Default for BackendLimits {
    fn default() -> Self {
        Self {
            max_texture_units: 16,
            max_vertex_attributes: 16,
        }
    }
}

/// Update-frequency hint for a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferUsage {
    #[default]
    Static,
    Dynamic,
    Stream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    Uint16,
    Uint32,
}

impl IndexFormat {
    pub fn size(self) -> u64 {
        match self {
            IndexFormat::Uint16 => 2,
            IndexFormat::Uint32 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Vertex,
    Index(IndexFormat),
}

/// Binding point for [`RenderBackend::bind_buffer`](super::RenderBackend::bind_buffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    Vertex,
    Index,
}

#[derive(Debug, Clone, Copy)]
pub struct BufferDescriptor<'a> {
    pub label: Option<&'a str>,
    pub kind: BufferKind,
    pub usage: BufferUsage,
    /// Allocation size in bytes.
    pub size: u64,
    /// Initial contents. Must not be longer than `size`.
    pub contents: Option<&'a [u8]>,
}

/// Component type of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    Float32,
    Int32,
    UInt32,
    UInt8,
}

impl AttributeType {
    /// Size of one component in bytes.
    pub fn size(self) -> u32 {
        match self {
            AttributeType::Float32 | AttributeType::Int32 | AttributeType::UInt32 => 4,
            AttributeType::UInt8 => 1,
        }
    }
}

/// One resolved vertex input: a location, a component count of 1-4 and a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub location: u32,
    pub element_count: u32,
    pub data_type: AttributeType,
    pub normalised: bool,
    pub offset: u32,
}

pub struct LayoutDescriptor<'a, Buf> {
    pub attributes: &'a [AttributeDescriptor],
    pub stride: u32,
    /// Source buffers. Attributes read from the last one.
    pub buffers: &'a [&'a Buf],
}

/// Primitive topology of a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawMode {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
}

/// The fixed set of shader programs the renderer knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderProgram {
    /// Textured quads with per-vertex slot index and projection tag.
    BatchQuad,
    /// Coloured lines with per-vertex projection tag.
    BatchLine,
    /// A single textured quad sampled from unit 0.
    Quad,
    /// A single coloured line.
    Line,
}

#[derive(Debug, Clone, Copy)]
pub struct PipelineDescriptor<'a> {
    pub label: Option<&'a str>,
    pub program: ShaderProgram,
    /// Length of the sampler array for [`ShaderProgram::BatchQuad`]; ignored otherwise.
    pub texture_slots: u32,
}

/// RGBA8 texture upload.
#[derive(Debug, Clone, Copy)]
pub struct TextureDescriptor<'a> {
    pub label: Option<&'a str>,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows, `width * height * 4` bytes.
    pub pixels: &'a [u8],
}

impl TextureDescriptor<'_> {
    pub(crate) fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}
