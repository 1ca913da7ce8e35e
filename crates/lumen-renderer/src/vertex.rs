//! Vertex formats uploaded by the draw and batch states.

/// Which projection the pipeline applies to a batched vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    /// World space, transformed by the camera's view-projection.
    View,
    /// Screen pixels, transformed by the fixed screen projection.
    Screen,
}

impl ProjectionType {
    /// Value written into the vertex's projection attribute.
    pub const fn tag(self) -> f32 {
        match self {
            ProjectionType::View => 0.0,
            ProjectionType::Screen => 1.0,
        }
    }
}

/// One end of an immediate-mode line.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// One corner of an immediate-mode quad.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub texture_coordinates: [f32; 2],
}

/// One end of a batched line.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BatchLineVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    /// [`ProjectionType::tag`].
    pub projection_type: f32,
}

/// One corner of a batched quad.
///
/// Positions are already multiplied by the model matrix. The slot index
/// and projection tag are floats so every attribute shares one numeric
/// path through the vertex stage.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BatchQuadVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub texture_coordinates: [f32; 2],
    /// Texture slot within the current batch; `0.0` is the default texture.
    pub texture_index: f32,
    /// [`ProjectionType::tag`].
    pub projection_type: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_sizes() {
        assert_eq!(std::mem::size_of::<LineVertex>(), 24);
        assert_eq!(std::mem::size_of::<QuadVertex>(), 32);
        assert_eq!(std::mem::size_of::<BatchLineVertex>(), 28);
        assert_eq!(std::mem::size_of::<BatchQuadVertex>(), 40);
    }

    #[test]
    fn projection_tags() {
        assert_eq!(ProjectionType::View.tag(), 0.0);
        assert_eq!(ProjectionType::Screen.tag(), 1.0);
    }
}
