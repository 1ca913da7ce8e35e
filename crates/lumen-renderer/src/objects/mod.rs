//! Backend-agnostic GPU objects: buffers and vertex layouts.

mod buffer;
mod builder;
mod layout;

pub use buffer::{IndexBuffer, IndexElement, VertexBuffer};
pub use builder::VertexLayoutBuilder;
pub use layout::{VertexAttribute, VertexLayout};
