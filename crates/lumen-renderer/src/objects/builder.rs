use std::collections::VecDeque;

use crate::backend::{AttributeDescriptor, LayoutDescriptor, RenderBackend};
use crate::error::Result;

use super::buffer::VertexBuffer;
use super::layout::{VertexAttribute, VertexLayout};

/// Components a single shader input location can hold.
const ELEMENTS_PER_LOCATION: u32 = 4;

struct PendingAttribute {
    attribute: VertexAttribute,
    offset: u32,
}

/// Accumulates attributes and source buffers, then builds a [`VertexLayout`].
///
/// Every method takes the builder by value, so a builder cannot be reused
/// after [`build`](Self::build).
///
/// ```ignore
/// let layout = VertexLayoutBuilder::new()
///     .add_attribute(VertexAttribute::float32(2))
///     .add_attribute(VertexAttribute::float32(4))
///     .add_vertex_buffer(&vertex_buffer)
///     .build(&mut backend)?;
/// ```
pub struct VertexLayoutBuilder<'a, B: RenderBackend> {
    attributes: VecDeque<PendingAttribute>,
    stride: u32,
    buffers: Vec<&'a VertexBuffer<B>>,
}

impl<B: RenderBackend> Default for VertexLayoutBuilder<'_, B> {
    fn default() -> Self {
        Self {
            attributes: VecDeque::new(),
            stride: 0,
            buffers: Vec::new(),
        }
    }
}

impl<'a, B: RenderBackend> VertexLayoutBuilder<'a, B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute placed at the current end of the vertex.
    pub fn add_attribute(mut self, attribute: VertexAttribute) -> Self {
        self.attributes.push_back(PendingAttribute {
            attribute,
            offset: self.stride,
        });
        self.stride += attribute.size();
        self
    }

    pub fn add_vertex_buffer(mut self, buffer: &'a VertexBuffer<B>) -> Self {
        self.buffers.push(buffer);
        self
    }

    /// Bytes per vertex accumulated so far.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Assign locations in declaration order and create the backend layout.
    ///
    /// Attributes wider than four components span consecutive locations.
    /// Using more locations than the backend supports is logged, not
    /// rejected. Fails if a registered buffer has been destroyed.
    pub fn build(self, backend: &mut B) -> Result<VertexLayout<B>> {
        let Self {
            mut attributes,
            stride,
            buffers,
        } = self;

        let raw_buffers = buffers
            .iter()
            .map(|buffer| buffer.raw())
            .collect::<Result<Vec<_>>>()?;
        let sources = buffers.iter().map(|buffer| buffer.liveness()).collect();

        let mut descriptors = Vec::with_capacity(attributes.len());
        let mut location = 0;

        while let Some(PendingAttribute { attribute, offset }) = attributes.pop_front() {
            let chunk_size = ELEMENTS_PER_LOCATION * attribute.data_type.size();
            let chunks = attribute.element_count.div_ceil(ELEMENTS_PER_LOCATION);

            for chunk in 0..chunks {
                let consumed = chunk * ELEMENTS_PER_LOCATION;
                descriptors.push(AttributeDescriptor {
                    location,
                    element_count: (attribute.element_count - consumed).min(ELEMENTS_PER_LOCATION),
                    data_type: attribute.data_type,
                    normalised: attribute.normalised,
                    offset: offset + chunk * chunk_size,
                });
                location += 1;
            }
        }

        let max_attributes = backend.limits().max_vertex_attributes;
        if location > max_attributes {
            tracing::warn!(
                "vertex layout uses {location} attribute locations but the backend supports {max_attributes}"
            );
        }

        let raw = backend.create_layout(&LayoutDescriptor {
            attributes: &descriptors,
            stride,
            buffers: &raw_buffers,
        })?;

        tracing::debug!("built vertex layout: {location} locations, stride {stride}");
        Ok(VertexLayout::from_raw(raw, sources, stride, location))
    }
}
