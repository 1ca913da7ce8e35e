//! Model matrices for world-space and screen-space shapes.

use glam::{IVec2, Mat4, UVec2, Vec2, Vec3, Vec4};

/// Placement of a world-space shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec2,
    pub scale: Vec2,
    /// Degrees, clockwise.
    pub rotation: f32,
    /// Rotation centre relative to `translation`. `None` rotates about it.
    pub pivot: Option<Vec2>,
    /// Shear along x and y, in degrees.
    pub shear: Option<Vec2>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
            pivot: None,
            shear: None,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec2) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_pivot(mut self, pivot: Vec2) -> Self {
        self.pivot = Some(pivot);
        self
    }

    pub fn with_shear(mut self, degrees: Vec2) -> Self {
        self.shear = Some(degrees);
        self
    }

    pub fn model_matrix(&self) -> Mat4 {
        let pivot = self.pivot.unwrap_or(Vec2::ZERO).extend(0.0);

        Mat4::from_translation(self.translation.extend(0.0))
            * Mat4::from_translation(pivot)
            * Mat4::from_rotation_z(-self.rotation.to_radians())
            * Mat4::from_translation(-pivot)
            * shear_matrix(self.shear)
            * Mat4::from_scale(self.scale.extend(1.0))
    }
}

/// Mirroring applied to a screen-space shape about its centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flip {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl Flip {
    pub fn scale(self) -> Vec2 {
        match self {
            Flip::None => Vec2::ONE,
            Flip::Horizontal => Vec2::new(-1.0, 1.0),
            Flip::Vertical => Vec2::new(1.0, -1.0),
            Flip::Both => Vec2::NEG_ONE,
        }
    }
}

/// Placement of a screen-space shape in pixels, y pointing down.
///
/// The shape's own footprint is `[0, size]`, so `position` is where its
/// top-left corner lands.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenTransform {
    pub position: IVec2,
    pub size: UVec2,
    /// Degrees, clockwise on screen.
    pub rotation: f32,
    /// Rotation centre relative to the top-left corner. `None` rotates
    /// about the centre.
    pub pivot: Option<IVec2>,
    pub flip: Flip,
    /// Shear along x and y, in degrees.
    pub shear: Option<Vec2>,
}

impl ScreenTransform {
    pub fn new(position: IVec2, size: UVec2) -> Self {
        Self {
            position,
            size,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_pivot(mut self, pivot: IVec2) -> Self {
        self.pivot = Some(pivot);
        self
    }

    pub fn with_flip(mut self, flip: Flip) -> Self {
        self.flip = flip;
        self
    }

    pub fn model_matrix(&self) -> Mat4 {
        let centre = (self.size.as_vec2() / 2.0).extend(0.0);
        let pivot = self
            .pivot
            .map_or(centre, |pivot| pivot.as_vec2().extend(0.0));

        Mat4::from_translation(self.position.as_vec2().extend(0.0))
            * Mat4::from_translation(pivot)
            * Mat4::from_rotation_z(self.rotation.to_radians())
            * Mat4::from_translation(-pivot)
            * Mat4::from_translation(centre)
            * shear_matrix(self.shear)
            * Mat4::from_scale(self.flip.scale().extend(1.0))
            * Mat4::from_translation(-centre)
    }
}

/// Shear along y by `tan(x)` followed by shear along x by `tan(y)`.
fn shear_matrix(shear: Option<Vec2>) -> Mat4 {
    let Some(degrees) = shear else {
        return Mat4::IDENTITY;
    };

    let along_y = Mat4::from_cols(
        Vec4::new(1.0, degrees.x.to_radians().tan(), 0.0, 0.0),
        Vec4::Y,
        Vec4::Z,
        Vec4::W,
    );
    let along_x = Mat4::from_cols(
        Vec4::X,
        Vec4::new(degrees.y.to_radians().tan(), 1.0, 0.0, 0.0),
        Vec4::Z,
        Vec4::W,
    );
    along_y * along_x
}

/// `model` applied to a 2D point.
pub fn apply(model: &Mat4, point: Vec2) -> Vec2 {
    model.transform_point3(Vec3::new(point.x, point.y, 0.0)).truncate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn default_transform_is_identity() {
        assert_eq!(Transform::default().model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn scale_then_translate() {
        let model = Transform::from_translation(Vec2::new(5.0, 1.0))
            .with_scale(Vec2::new(2.0, 3.0))
            .model_matrix();
        assert!(close(apply(&model, Vec2::new(0.5, 0.5)), Vec2::new(6.0, 2.5)));
    }

    #[test]
    fn positive_rotation_is_clockwise() {
        let model = Transform::default().with_rotation(90.0).model_matrix();
        assert!(close(apply(&model, Vec2::X), Vec2::new(0.0, -1.0)));
    }

    #[test]
    fn pivot_stays_fixed_under_rotation() {
        let pivot = Vec2::new(1.0, 1.0);
        let model = Transform::default()
            .with_rotation(37.0)
            .with_pivot(pivot)
            .model_matrix();
        assert!(close(apply(&model, pivot), pivot));
    }

    #[test]
    fn shear_skews_along_axes() {
        let model = Transform::default()
            .with_shear(Vec2::new(45.0, 0.0))
            .model_matrix();
        assert!(close(apply(&model, Vec2::X), Vec2::new(1.0, 1.0)));

        let model = Transform::default()
            .with_shear(Vec2::new(0.0, 45.0))
            .model_matrix();
        assert!(close(apply(&model, Vec2::Y), Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn screen_transform_places_top_left() {
        let model = ScreenTransform::new(IVec2::new(100, 50), UVec2::new(20, 10)).model_matrix();
        assert!(close(apply(&model, Vec2::ZERO), Vec2::new(100.0, 50.0)));
        assert!(close(apply(&model, Vec2::new(20.0, 10.0)), Vec2::new(120.0, 60.0)));
    }

    #[test]
    fn screen_rotation_turns_about_centre() {
        let model = ScreenTransform::new(IVec2::ZERO, UVec2::new(20, 10))
            .with_rotation(90.0)
            .model_matrix();
        assert!(close(apply(&model, Vec2::new(10.0, 5.0)), Vec2::new(10.0, 5.0)));
        // Top-right swings down on a y-down screen.
        assert!(close(apply(&model, Vec2::new(20.0, 5.0)), Vec2::new(10.0, 15.0)));
    }

    #[test]
    fn screen_pivot_overrides_centre() {
        let model = ScreenTransform::new(IVec2::new(10, 10), UVec2::new(20, 10))
            .with_pivot(IVec2::ZERO)
            .with_rotation(180.0)
            .model_matrix();
        assert!(close(apply(&model, Vec2::ZERO), Vec2::new(10.0, 10.0)));
        assert!(close(apply(&model, Vec2::new(20.0, 0.0)), Vec2::new(-10.0, 10.0)));
    }

    #[test]
    fn flip_mirrors_within_footprint() {
        let model = ScreenTransform::new(IVec2::ZERO, UVec2::new(20, 10))
            .with_flip(Flip::Horizontal)
            .model_matrix();
        assert!(close(apply(&model, Vec2::ZERO), Vec2::new(20.0, 0.0)));

        let model = ScreenTransform::new(IVec2::ZERO, UVec2::new(20, 10))
            .with_flip(Flip::Both)
            .model_matrix();
        assert!(close(apply(&model, Vec2::ZERO), Vec2::new(20.0, 10.0)));
    }
}
