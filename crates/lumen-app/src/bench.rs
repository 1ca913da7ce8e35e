use std::time::Instant;

use glam::{UVec2, Vec2};
use lumen_config::LumenConfig;
use lumen_renderer::{Camera2D, RenderBackend, Renderer, StatsWindow};

use crate::scene::{Scene, SceneParams};

#[derive(Debug, Clone, Copy)]
pub struct BenchOptions {
    pub frames: u32,
    pub scene: SceneParams,
}

/// Render `options.frames` frames of a generated scene through `backend`.
///
/// `after_frame` runs once per frame after the batches are flushed and
/// before the frame time is taken.
pub fn run<B: RenderBackend>(
    backend: &mut B,
    config: &LumenConfig,
    options: &BenchOptions,
    mut after_frame: impl FnMut(&mut B),
) -> lumen_renderer::Result<StatsWindow> {
    let virtual_size = UVec2::new(config.renderer.virtual_width, config.renderer.virtual_height);
    let mut renderer = Renderer::new(backend, &config.renderer)?;
    let mut camera = Camera2D::new(config.camera.half_size, virtual_size);

    let half_extent = Vec2::new(camera.half_size(), camera.half_size() / camera.aspect_ratio());
    let mut scene = Scene::generate(backend, &options.scene, half_extent)?;

    let mut window = StatsWindow::new();
    for frame in 0..options.frames {
        let start = Instant::now();

        camera.zoom = 1.0 + 0.25 * (frame as f32 * 0.05).sin();
        renderer.begin_frame(backend, &camera);
        scene.draw(&mut renderer, backend, frame);
        let stats = renderer.end_frame(backend);
        after_frame(backend);

        window.push(stats, start.elapsed());
        if frame == 0 {
            tracing::debug!(
                "first frame: {} quads, {} lines, {} draw calls",
                stats.quads,
                stats.lines,
                stats.draw_calls()
            );
        }
    }

    scene.destroy(backend);
    renderer.destroy(backend);
    Ok(window)
}

/// Log the averages collected by [`run`].
pub fn report(window: &StatsWindow) {
    tracing::info!(
        "{} frames: {:.1} draw calls/frame, {:.0} shapes/frame, {:.1} shapes/draw",
        window.sample_count(),
        window.average_draw_calls(),
        window.average_shapes(),
        window.shapes_per_draw()
    );
    tracing::info!(
        "frame time {:.3} ms ({:.0} fps)",
        window.frame_time_ms(),
        window.fps()
    );
}

#[cfg(test)]
mod tests {
    use lumen_config::RendererConfig;
    use lumen_renderer::HeadlessBackend;

    use super::*;

    fn config() -> LumenConfig {
        LumenConfig {
            renderer: RendererConfig {
                max_shapes_per_batch: 4,
                ..RendererConfig::default()
            },
            ..LumenConfig::default()
        }
    }

    fn options(frames: u32) -> BenchOptions {
        BenchOptions {
            frames,
            scene: SceneParams {
                sprites: 10,
                lines: 3,
                textures: 2,
                seed: 1,
            },
        }
    }

    #[test]
    fn every_frame_is_sampled() {
        let mut backend = HeadlessBackend::new();
        let window = run(&mut backend, &config(), &options(5), |b| b.reset_records()).unwrap();
        assert_eq!(window.sample_count(), 5);
    }

    #[test]
    fn draw_calls_follow_batch_capacity() {
        let mut backend = HeadlessBackend::new();
        let window = run(&mut backend, &config(), &options(3), |b| b.reset_records()).unwrap();
        // 11 quads in batches of 4, one line batch, one immediate quad.
        assert_eq!(window.average_draw_calls(), 5.0);
        // 11 quads + 4 lines + 1 immediate.
        assert_eq!(window.average_shapes(), 16.0);
    }

    #[test]
    fn run_releases_everything() {
        let mut backend = HeadlessBackend::new();
        run(&mut backend, &config(), &options(1), |_| {}).unwrap();
        assert_eq!(backend.texture_count(), 0);
        assert_eq!(backend.live_buffer_count(), 0);
        assert_eq!(backend.live_layout_count(), 0);
    }

    #[test]
    fn after_frame_runs_once_per_frame() {
        let mut backend = HeadlessBackend::new();
        let mut calls = 0;
        run(&mut backend, &config(), &options(4), |_| calls += 1).unwrap();
        assert_eq!(calls, 4);
    }
}
