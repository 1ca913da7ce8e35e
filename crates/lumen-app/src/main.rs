mod bench;
mod cli;
mod scene;

use std::path::Path;

use lumen_config::LumenConfig;
use lumen_renderer::{HeadlessBackend, WgpuBackend};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::bench::BenchOptions;
use crate::cli::BackendKind;
use crate::scene::SceneParams;

fn main() {
    // Parse CLI arguments
    let args = cli::parse();

    // Load config before logging so its level can seed the filter
    let loaded = lumen_config::load_config(args.config.as_deref().map(Path::new));

    // Initialize logging
    let config_directive = match &loaded {
        Ok(config) => format!("lumen={}", config.logging.level),
        Err(_) => "lumen=info".to_string(),
    };
    let log_directive = args.log_level.clone().unwrap_or(config_directive);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();

    tracing::info!("lumen-bench v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        LumenConfig::default()
    });

    if args.dump_config {
        println!("{}", lumen_config::config_to_json(&config));
        return;
    }

    let options = BenchOptions {
        frames: args.frames,
        scene: SceneParams {
            sprites: args.sprites,
            lines: args.lines,
            textures: args.textures,
            seed: args.seed,
        },
    };

    let result = match args.backend {
        BackendKind::Headless => {
            let mut backend = HeadlessBackend::new();
            bench::run(&mut backend, &config, &options, |b| b.reset_records())
        }
        BackendKind::Wgpu => WgpuBackend::new_offscreen(
            config.renderer.virtual_width,
            config.renderer.virtual_height,
        )
        .and_then(|mut backend| {
            bench::run(&mut backend, &config, &options, |b| b.wait_idle())
        }),
    };

    match result {
        Ok(window) => bench::report(&window),
        Err(e) => {
            tracing::error!("Benchmark failed: {e}");
            std::process::exit(1);
        }
    }
}
