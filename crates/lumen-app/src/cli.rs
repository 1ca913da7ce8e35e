use clap::{Parser, ValueEnum};

/// Which graphics backend the benchmark renders through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Record draws on the CPU without a GPU.
    Headless,
    /// Render into an offscreen wgpu target.
    Wgpu,
}

/// Lumen batching benchmark: renders a random sprite scene and reports draw statistics.
#[derive(Parser, Debug)]
#[command(name = "lumen-bench", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Frames to render.
    #[arg(long, default_value_t = 120)]
    pub frames: u32,

    /// World-space sprites in the scene.
    #[arg(long, default_value_t = 10_000)]
    pub sprites: u32,

    /// World-space lines in the scene.
    #[arg(long, default_value_t = 1_000)]
    pub lines: u32,

    /// Distinct textures the sprites are spread across.
    #[arg(long, default_value_t = 8)]
    pub textures: u32,

    /// Seed for scene generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, value_enum, default_value_t = BackendKind::Headless)]
    pub backend: BackendKind,

    /// Print the resolved config as JSON and exit.
    #[arg(long)]
    pub dump_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
