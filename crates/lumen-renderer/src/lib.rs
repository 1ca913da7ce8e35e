pub mod backend;
pub mod camera;
pub mod error;
pub mod geometry;
pub mod objects;
pub mod perf;
pub mod pipeline;
pub mod renderer;
pub mod states;
pub mod transform;
pub mod vertex;

pub use backend::{HeadlessBackend, RenderBackend, TextureId, WgpuBackend};
pub use camera::Camera2D;
pub use error::{RendererError, Result};
pub use geometry::{Line, Quad, ScreenLine, ScreenQuad, Sprite, TextureCoordinatePair};
pub use perf::{FrameStats, StatsWindow};
pub use renderer::Renderer;
pub use transform::{Flip, ScreenTransform, Transform};
