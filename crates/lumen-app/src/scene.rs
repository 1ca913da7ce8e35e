//! Deterministic benchmark scene.

use glam::{IVec2, Mat4, UVec2, Vec2};
use lumen_common::Color;
use lumen_renderer::backend::TextureDescriptor;
use lumen_renderer::{
    Line, RenderBackend, Renderer, ScreenLine, ScreenTransform, Sprite, TextureCoordinatePair,
    TextureId, Transform,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Size of the generated scene.
#[derive(Debug, Clone, Copy)]
pub struct SceneParams {
    pub sprites: u32,
    pub lines: u32,
    pub textures: u32,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
struct SceneSprite {
    transform: Transform,
    /// Degrees per frame.
    spin: f32,
    texture: Option<usize>,
    sub_texture_area: Option<TextureCoordinatePair>,
    color: Color,
}

#[derive(Debug, Clone, PartialEq)]
struct SceneLine {
    line: Line,
    color: Color,
}

const HUD_POSITION: IVec2 = IVec2::new(8, 8);
const HUD_SIZE: UVec2 = UVec2::new(200, 16);
const CURSOR_SIZE: UVec2 = UVec2::new(12, 12);

/// Random sprites and lines spread over the visible world, plus a small
/// screen-space overlay.
///
/// Every frame submits `sprites + 1` batched quads, `lines + 1` batched
/// lines and one immediate quad.
pub struct Scene {
    sprites: Vec<SceneSprite>,
    lines: Vec<SceneLine>,
    textures: Vec<TextureId>,
}

impl Scene {
    /// Build the scene and upload its textures. `half_extent` is half the
    /// visible world area.
    pub fn generate<B: RenderBackend>(
        backend: &mut B,
        params: &SceneParams,
        half_extent: Vec2,
    ) -> lumen_renderer::Result<Self> {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let half_extent = half_extent.max(Vec2::ONE);

        let mut textures = Vec::with_capacity(params.textures as usize);
        for _ in 0..params.textures {
            let a = random_color(&mut rng);
            let b = random_color(&mut rng);
            let pixels: Vec<u8> = [a, b, b, a]
                .iter()
                .flat_map(|c| [c.r, c.g, c.b, c.a])
                .collect();
            textures.push(backend.create_texture(&TextureDescriptor {
                label: Some("bench checker"),
                width: 2,
                height: 2,
                pixels: &pixels,
            })?);
        }

        let sprites = (0..params.sprites)
            .map(|_| {
                let position = Vec2::new(
                    rng.gen_range(-half_extent.x..half_extent.x),
                    rng.gen_range(-half_extent.y..half_extent.y),
                );
                let size = rng.gen_range(0.1..0.6);
                let texture = (!textures.is_empty()).then(|| rng.gen_range(0..textures.len()));
                let sub_texture_area = rng.gen_bool(0.25).then_some(TextureCoordinatePair {
                    lower_left: Vec2::ZERO,
                    upper_right: Vec2::splat(0.5),
                });

                SceneSprite {
                    transform: Transform::from_translation(position)
                        .with_scale(Vec2::splat(size))
                        .with_rotation(rng.gen_range(0.0..360.0)),
                    spin: rng.gen_range(-3.0..3.0),
                    texture,
                    sub_texture_area,
                    color: random_color(&mut rng),
                }
            })
            .collect();

        let lines = (0..params.lines)
            .map(|_| {
                let start = Vec2::new(
                    rng.gen_range(-half_extent.x..half_extent.x),
                    rng.gen_range(-half_extent.y..half_extent.y),
                );
                let offset = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
                SceneLine {
                    line: Line {
                        start,
                        end: start + offset,
                    },
                    color: random_color(&mut rng),
                }
            })
            .collect();

        tracing::info!(
            "scene generated: {} sprites, {} lines, {} textures (seed {})",
            params.sprites,
            params.lines,
            params.textures,
            params.seed
        );

        Ok(Self {
            sprites,
            lines,
            textures,
        })
    }

    pub fn draw<B: RenderBackend>(&self, renderer: &mut Renderer<B>, backend: &mut B, frame: u32) {
        for sprite in &self.sprites {
            let rotation = sprite.transform.rotation + sprite.spin * frame as f32;
            let model = sprite.transform.with_rotation(rotation).model_matrix();
            let paint = Sprite {
                texture: sprite.texture.map(|index| self.textures[index]),
                sub_texture_area: sprite.sub_texture_area,
                color: sprite.color,
            };
            renderer.batch_rectangle(backend, &model, &paint);
        }

        for line in &self.lines {
            renderer.batch_line(backend, &line.line, &Mat4::IDENTITY, line.color);
        }

        let hud = ScreenTransform::new(HUD_POSITION, HUD_SIZE).model_matrix();
        renderer.batch_screen_rectangle(
            backend,
            HUD_SIZE,
            &hud,
            &Sprite::colored(Color::from_rgba(20, 20, 20, 200)),
        );
        let underline_y = HUD_POSITION.y + HUD_SIZE.y as i32;
        renderer.batch_screen_line(
            backend,
            &ScreenLine {
                start: IVec2::new(HUD_POSITION.x, underline_y),
                end: IVec2::new(HUD_POSITION.x + HUD_SIZE.x as i32, underline_y),
            },
            &Mat4::IDENTITY,
            Color::WHITE,
        );

        let corner = renderer.virtual_size().as_ivec2() - CURSOR_SIZE.as_ivec2() - IVec2::splat(8);
        let cursor = ScreenTransform::new(corner, CURSOR_SIZE)
            .with_rotation(frame as f32 * 4.0)
            .model_matrix();
        renderer.draw_screen_rectangle(
            backend,
            CURSOR_SIZE,
            &cursor,
            &Sprite::colored(Color::from_rgba(255, 200, 0, 255)),
        );
    }

    pub fn destroy<B: RenderBackend>(&mut self, backend: &mut B) {
        for texture in self.textures.drain(..) {
            backend.destroy_texture(texture);
        }
        self.sprites.clear();
        self.lines.clear();
    }
}

fn random_color(rng: &mut StdRng) -> Color {
    Color::from_rgba(rng.gen(), rng.gen(), rng.gen(), 255)
}

#[cfg(test)]
mod tests {
    use lumen_renderer::HeadlessBackend;

    use super::*;

    fn params() -> SceneParams {
        SceneParams {
            sprites: 50,
            lines: 10,
            textures: 3,
            seed: 7,
        }
    }

    #[test]
    fn same_seed_same_scene() {
        let mut backend = HeadlessBackend::new();
        let a = Scene::generate(&mut backend, &params(), Vec2::new(8.0, 4.5)).unwrap();
        let b = Scene::generate(&mut backend, &params(), Vec2::new(8.0, 4.5)).unwrap();
        assert_eq!(a.sprites, b.sprites);
        assert_eq!(a.lines, b.lines);
    }

    #[test]
    fn sprites_stay_inside_extent() {
        let mut backend = HeadlessBackend::new();
        let scene = Scene::generate(&mut backend, &params(), Vec2::new(8.0, 4.5)).unwrap();
        assert!(scene.sprites.iter().all(|s| {
            s.transform.translation.x.abs() <= 8.0 && s.transform.translation.y.abs() <= 4.5
        }));
    }

    #[test]
    fn no_textures_means_untextured_sprites() {
        let mut backend = HeadlessBackend::new();
        let params = SceneParams {
            textures: 0,
            ..params()
        };
        let scene = Scene::generate(&mut backend, &params, Vec2::new(8.0, 4.5)).unwrap();
        assert!(scene.sprites.iter().all(|s| s.texture.is_none()));
    }

    #[test]
    fn destroy_releases_textures() {
        let mut backend = HeadlessBackend::new();
        let mut scene = Scene::generate(&mut backend, &params(), Vec2::new(8.0, 4.5)).unwrap();
        assert_eq!(backend.texture_count(), 3);
        scene.destroy(&mut backend);
        assert_eq!(backend.texture_count(), 0);
    }
}
