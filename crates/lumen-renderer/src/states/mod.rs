//! Batched and immediate shape submission.
//!
//! The batch states accumulate vertices on the CPU and issue one draw per
//! flush. The draw states issue one draw per call.

mod line_batch;
mod line_draw;
mod quad_batch;
mod quad_draw;

pub use line_batch::LineBatchState;
pub use line_draw::LineDrawState;
pub use quad_batch::{QuadBatchCreateInfo, QuadBatchState};
pub use quad_draw::QuadDrawState;

use glam::{Mat4, UVec2, Vec2, Vec4};

use crate::error::{RendererError, Result};

pub(crate) const VERTICES_PER_QUAD: usize = 4;
pub(crate) const INDICES_PER_QUAD: u32 = 6;
pub(crate) const VERTICES_PER_LINE: usize = 2;

/// Two triangles over corners in winding order.
pub(crate) const QUAD_INDEX_PATTERN: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Slot index written for sprites without a texture.
pub(crate) const DEFAULT_TEXTURE_INDEX: f32 = 0.0;

/// Draw counters a state accumulates until [`reset`](Self::reset).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Draw calls issued.
    pub draw_calls: u32,
    /// Shapes submitted.
    pub shapes: u32,
}

impl BatchStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Elements needed for `shapes` shapes of `per_shape` elements each, and
/// their size in bytes. The count must fit a `u32` index.
pub(crate) fn batch_capacity(
    shapes: u32,
    per_shape: usize,
    element_size: usize,
) -> Result<(usize, u64)> {
    let overflow = || {
        RendererError::InvalidCreateInfo(format!(
            "{shapes} shapes per batch overflow the batch buffers"
        ))
    };
    let count = u32::try_from(per_shape)
        .ok()
        .and_then(|per_shape| shapes.checked_mul(per_shape))
        .ok_or_else(overflow)?;
    let bytes = u64::from(count)
        .checked_mul(element_size as u64)
        .ok_or_else(overflow)?;
    Ok((count as usize, bytes))
}

/// [`QUAD_INDEX_PATTERN`] repeated for `quad_count` quads, each offset by 4.
///
/// `quad_count * 4` must fit a `u32`; see [`batch_capacity`].
pub(crate) fn quad_indices(quad_count: u32) -> Vec<u32> {
    (0..quad_count)
        .flat_map(|quad| {
            let base = quad * VERTICES_PER_QUAD as u32;
            QUAD_INDEX_PATTERN.map(|index| base + index)
        })
        .collect()
}

/// Corners of a pixel rectangle anchored at its top-left, in winding order.
pub(crate) fn screen_rectangle_corners(size: UVec2) -> [Vec2; 4] {
    let size = size.as_vec2();
    [
        Vec2::new(size.x, 0.0),
        size,
        Vec2::new(0.0, size.y),
        Vec2::ZERO,
    ]
}

pub(crate) fn transform_point(model: &Mat4, point: Vec2) -> [f32; 2] {
    let transformed = *model * Vec4::new(point.x, point.y, 0.0, 1.0);
    [transformed.x, transformed.y]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_capacity_counts_elements_and_bytes() {
        assert_eq!(batch_capacity(3, 4, 40).unwrap(), (12, 480));
    }

    #[test]
    fn batch_capacity_rejects_overflow() {
        assert!(matches!(
            batch_capacity(u32::MAX, 4, 40),
            Err(RendererError::InvalidCreateInfo(_))
        ));
        assert!(batch_capacity(u32::MAX / 6 + 1, INDICES_PER_QUAD as usize, 4).is_err());
    }

    #[test]
    fn quad_indices_repeat_with_offset() {
        assert_eq!(
            quad_indices(2),
            vec![0, 1, 3, 1, 2, 3, 4, 5, 7, 5, 6, 7]
        );
        assert!(quad_indices(0).is_empty());
    }

    #[test]
    fn screen_rectangle_is_origin_anchored() {
        assert_eq!(
            screen_rectangle_corners(UVec2::new(32, 16)),
            [
                Vec2::new(32.0, 0.0),
                Vec2::new(32.0, 16.0),
                Vec2::new(0.0, 16.0),
                Vec2::ZERO,
            ]
        );
    }

    #[test]
    fn transform_point_applies_translation() {
        let model = Mat4::from_translation(glam::Vec3::new(3.0, -2.0, 0.0));
        assert_eq!(transform_point(&model, Vec2::new(1.0, 1.0)), [4.0, -1.0]);
    }
}
