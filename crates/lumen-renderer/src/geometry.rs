//! Plain shape and sprite descriptors consumed by the draw and batch states.

use glam::{IVec2, Vec2};
use lumen_common::Color;

use crate::backend::TextureId;

/// Corners of the centred unit square in winding order
/// (upper-right, lower-right, lower-left, upper-left).
pub const UNIT_RECTANGLE: [Vec2; 4] = [
    Vec2::new(0.5, 0.5),
    Vec2::new(0.5, -0.5),
    Vec2::new(-0.5, -0.5),
    Vec2::new(-0.5, 0.5),
];

/// World-space line segment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Line {
    pub start: Vec2,
    pub end: Vec2,
}

/// Pixel-space line segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenLine {
    pub start: IVec2,
    pub end: IVec2,
}

impl From<ScreenLine> for Line {
    fn from(line: ScreenLine) -> Self {
        Self {
            start: line.start.as_vec2(),
            end: line.end.as_vec2(),
        }
    }
}

/// Free-form world-space quad.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quad {
    pub upper_right: Vec2,
    pub lower_right: Vec2,
    pub lower_left: Vec2,
    pub upper_left: Vec2,
}

impl Quad {
    /// Corners in winding order.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.upper_right,
            self.lower_right,
            self.lower_left,
            self.upper_left,
        ]
    }
}

/// Free-form pixel-space quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenQuad {
    pub upper_right: IVec2,
    pub lower_right: IVec2,
    pub lower_left: IVec2,
    pub upper_left: IVec2,
}

impl ScreenQuad {
    /// Corners in winding order.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.upper_right.as_vec2(),
            self.lower_right.as_vec2(),
            self.lower_left.as_vec2(),
            self.upper_left.as_vec2(),
        ]
    }
}

/// UV rectangle given by its lower-left and upper-right corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureCoordinatePair {
    pub lower_left: Vec2,
    pub upper_right: Vec2,
}

impl TextureCoordinatePair {
    /// The whole texture, `(0, 0)` to `(1, 1)`.
    pub const FULL: Self = Self {
        lower_left: Vec2::ZERO,
        upper_right: Vec2::ONE,
    };

    /// UVs for the four corners in winding order.
    pub fn corners(&self) -> [Vec2; 4] {
        let ll = self.lower_left;
        let ur = self.upper_right;
        [ur, Vec2::new(ur.x, ll.y), ll, Vec2::new(ll.x, ur.y)]
    }
}

impl Default for TextureCoordinatePair {
    fn default() -> Self {
        Self::FULL
    }
}

/// What to paint a shape with.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sprite {
    /// `None` paints with the default texture.
    pub texture: Option<TextureId>,
    /// Region of the texture to sample. `None` samples all of it.
    pub sub_texture_area: Option<TextureCoordinatePair>,
    /// Colour modulation.
    pub color: Color,
}

impl Sprite {
    pub fn new(texture: TextureId) -> Self {
        Self {
            texture: Some(texture),
            ..Self::default()
        }
    }

    /// Untextured sprite of a single colour.
    pub fn colored(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_sub_texture_area(mut self, area: TextureCoordinatePair) -> Self {
        self.sub_texture_area = Some(area);
        self
    }

    pub fn texture_coordinates(&self) -> TextureCoordinatePair {
        self.sub_texture_area.unwrap_or_default()
    }
}
