//! Orthographic 2D camera.

use glam::{IVec2, Mat4, UVec2, Vec2, Vec3};

/// World-space camera looking down the z axis.
///
/// `half_size` is half the visible world width; the visible height
/// follows from the aspect ratio of the virtual resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera2D {
    half_size: f32,
    virtual_size: UVec2,
    aspect_ratio: f32,
    pixels_per_unit: f32,
    projection: Mat4,

    pub position: Vec2,
    /// Degrees, counter-clockwise.
    pub rotation: f32,
    pub zoom: f32,
}

impl Camera2D {
    pub fn new(half_size: f32, virtual_size: UVec2) -> Self {
        let mut camera = Self {
            half_size,
            virtual_size,
            aspect_ratio: 1.0,
            pixels_per_unit: 1.0,
            projection: Mat4::IDENTITY,
            position: Vec2::ZERO,
            rotation: 0.0,
            zoom: 1.0,
        };
        camera.refresh(virtual_size);
        camera
    }

    /// Recompute the aspect ratio and projection for a new virtual resolution.
    pub fn refresh(&mut self, virtual_size: UVec2) {
        self.virtual_size = virtual_size.max(UVec2::ONE);
        self.aspect_ratio = self.virtual_size.x as f32 / self.virtual_size.y as f32;
        self.update_projection();
    }

    pub fn reset_transform(&mut self) {
        self.position = Vec2::ZERO;
        self.rotation = 0.0;
        self.zoom = 1.0;
    }

    pub fn set_half_size(&mut self, half_size: f32) {
        self.half_size = half_size;
        self.update_projection();
    }

    fn update_projection(&mut self) {
        let hs = self.half_size;
        let half_height = hs / self.aspect_ratio;
        self.pixels_per_unit = self.virtual_size.x as f32 / (hs * 2.0);
        self.projection = Mat4::orthographic_rh(-hs, hs, -half_height, half_height, -1.0, 1.0);
    }

    pub fn half_size(&self) -> f32 {
        self.half_size
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn pixels_per_unit(&self) -> f32 {
        self.pixels_per_unit
    }

    pub fn virtual_size(&self) -> UVec2 {
        self.virtual_size
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Rotate, then zoom, then move the world opposite to the camera.
    pub fn view(&self) -> Mat4 {
        Mat4::from_rotation_z(self.rotation.to_radians())
            * Mat4::from_scale(Vec3::new(self.zoom, self.zoom, 1.0))
            * Mat4::from_translation((-self.position).extend(0.0))
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view()
    }

    /// Pixel under a world point, with the origin at the top-left of the
    /// virtual resolution. Position, rotation and zoom are not applied.
    pub fn world_to_screen(&self, point: Vec2) -> IVec2 {
        let shifted = Vec2::new(
            point.x + self.half_size,
            point.y - self.half_size / self.aspect_ratio,
        ) * self.pixels_per_unit;
        IVec2::new(shifted.x as i32, -shifted.y as i32)
    }

    /// Inverse of [`world_to_screen`](Self::world_to_screen).
    pub fn screen_to_world(&self, pixel: IVec2) -> Vec2 {
        let scaled = Vec2::new(pixel.x as f32, -(pixel.y as f32)) / self.pixels_per_unit;
        Vec2::new(
            scaled.x - self.half_size,
            scaled.y + self.half_size / self.aspect_ratio,
        )
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    fn camera() -> Camera2D {
        Camera2D::new(8.0, UVec2::new(1600, 800))
    }

    #[test]
    fn derived_values() {
        let camera = camera();
        assert_eq!(camera.aspect_ratio(), 2.0);
        assert_eq!(camera.pixels_per_unit(), 100.0);
    }

    #[test]
    fn projection_maps_visible_edges_to_clip_edges() {
        let camera = camera();
        let top_right = camera.projection() * Vec4::new(8.0, 4.0, 0.0, 1.0);
        assert!((top_right.x - 1.0).abs() < 1e-5);
        assert!((top_right.y - 1.0).abs() < 1e-5);
        let bottom_left = camera.projection() * Vec4::new(-8.0, -4.0, 0.0, 1.0);
        assert!((bottom_left.x + 1.0).abs() < 1e-5);
        assert!((bottom_left.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn view_moves_world_opposite_to_camera() {
        let mut camera = camera();
        camera.position = Vec2::new(3.0, -1.0);
        let p = camera.view() * Vec4::new(3.0, -1.0, 0.0, 1.0);
        assert!(p.truncate().truncate().length() < 1e-6);

        camera.zoom = 2.0;
        let p = camera.view() * Vec4::new(4.0, -1.0, 0.0, 1.0);
        assert!((p.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn world_to_screen_corners() {
        let camera = camera();
        assert_eq!(camera.world_to_screen(Vec2::new(-8.0, 4.0)), IVec2::ZERO);
        assert_eq!(camera.world_to_screen(Vec2::ZERO), IVec2::new(800, 400));
        assert_eq!(
            camera.world_to_screen(Vec2::new(8.0, -4.0)),
            IVec2::new(1600, 800)
        );
    }

    #[test]
    fn screen_to_world_inverts_world_to_screen() {
        let camera = camera();
        for pixel in [IVec2::ZERO, IVec2::new(800, 400), IVec2::new(200, 600)] {
            let world = camera.screen_to_world(pixel);
            assert_eq!(camera.world_to_screen(world), pixel);
        }
    }

    #[test]
    fn half_size_changes_pixels_per_unit() {
        let mut camera = camera();
        camera.set_half_size(4.0);
        assert_eq!(camera.pixels_per_unit(), 200.0);
        camera.refresh(UVec2::new(800, 800));
        assert_eq!(camera.aspect_ratio(), 1.0);
        assert_eq!(camera.pixels_per_unit(), 100.0);
    }

    #[test]
    fn reset_transform_restores_defaults() {
        let mut camera = camera();
        camera.position = Vec2::ONE;
        camera.rotation = 45.0;
        camera.zoom = 3.0;
        camera.reset_transform();
        assert_eq!(camera.view(), Mat4::IDENTITY);
    }
}
