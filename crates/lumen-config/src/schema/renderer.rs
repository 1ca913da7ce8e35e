//! Batching renderer configuration.

use serde::{Deserialize, Serialize};

/// Batch capacities, texture slot budget and virtual screen size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Quads per batch before an automatic flush (valid range: 1-100000).
    pub max_shapes_per_batch: u32,
    /// Lines per batch before an automatic flush (valid range: 1-100000).
    pub max_lines_per_batch: u32,
    /// Texture slots requested from the batch pipeline, including the
    /// default texture slot (valid range: 2-32). Clamped to the backend limit.
    pub max_texture_slots: u32,
    /// Name of the sampler array uniform in the batch pipeline.
    pub texture_array_uniform: String,
    /// Width of the screen-space coordinate system in pixels.
    pub virtual_width: u32,
    /// Height of the screen-space coordinate system in pixels.
    pub virtual_height: u32,
    /// Clear colour applied at the start of every frame.
    pub clear_color: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_shapes_per_batch: 4000,
            max_lines_per_batch: 2000,
            max_texture_slots: 16,
            texture_array_uniform: "u_Textures".into(),
            virtual_width: 1280,
            virtual_height: 720,
            clear_color: "#000000".into(),
        }
    }
}
