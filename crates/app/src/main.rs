use std::path::{Path, PathBuf};

use circle_tunnel_core::{
    AudioClock, CanvasConfig, CueCursor, CueSheet, Material, PackingSet, PlaybackClock,
    RenderGraph, Simulation, TunnelConfig,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

fn main() -> circle_tunnel_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            cues,
            frames,
            fps,
            seed,
            material,
        } => run_session(config.as_deref(), cues.as_deref(), frames, fps, seed, material),
        Commands::Pack {
            width,
            height,
            seed,
            output,
        } => run_pack(width, height, seed, output.as_deref()),
    }
}

fn run_session(
    config_path: Option<&Path>,
    cues_path: Option<&Path>,
    frames: u64,
    fps: f64,
    seed: Option<u64>,
    material: MaterialArg,
) -> circle_tunnel_core::Result<()> {
    let mut config = match config_path {
        Some(path) => TunnelConfig::load(path)?,
        None => TunnelConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if fps <= 0.0 {
        return Err("fps must be positive".into());
    }
    tracing::info!(?config_path, ?cues_path, frames, fps, seed = config.seed, "starting session");

    let mut simulation = Simulation::new(&config);
    let mut scheduler = Simulation::scheduler();
    if let Some(path) = cues_path {
        let sheet = CueSheet::load(path)?;
        let accepted = sheet.register_all(&mut scheduler)?;
        tracing::info!(tracks = sheet.tracks.len(), cues = accepted, "cue sheet registered");
    }

    let mut clock = PlaybackClock::new();
    let mut cursor = CueCursor::new();
    let mut render = RenderGraph::new(material.into());
    clock.play();

    for _ in 0..frames {
        let now = clock.current_time();
        let fired = cursor.fire_due(&scheduler, now, &mut simulation)?;
        let summary = simulation.frame(now);
        let drawn = render.collect(&simulation).len();

        if fired > 0 || summary.frame_index % (fps as u64).max(1) == 0 {
            tracing::debug!(
                frame = summary.frame_index,
                time = now,
                fired,
                depth = summary.camera_depth,
                layer = summary.current_layer,
                placed = summary.tick.placed,
                drawn,
                "frame"
            );
        }
        clock.advance(1.0 / fps);
    }

    let set = simulation.stack().current_set();
    tracing::info!(
        time = clock.current_time(),
        camera_depth = simulation.camera().depth(),
        layer = simulation.stack().current_index(),
        circles = set.circles().len(),
        saturated = !set.is_active(),
        cues_remaining = !cursor.is_exhausted(&scheduler),
        "session finished"
    );
    Ok(())
}

fn run_pack(
    width: f64,
    height: f64,
    seed: u64,
    output: Option<&Path>,
) -> circle_tunnel_core::Result<()> {
    let mut config = TunnelConfig {
        canvas: CanvasConfig { width, height },
        seed,
        ..Default::default()
    };
    config.stack.layers = 1;
    config.validate()?;
    tracing::info!(width, height, seed, "packing a single band");

    let mut set = PackingSet::new(config.canvas, 0.0, config.packing, seed);
    let mut frame = 0;
    while !set.is_settled() {
        set.advance_one_tick(frame);
        frame += 1;
    }
    tracing::info!(ticks = frame, circles = set.circles().len(), "band settled");

    let json = serde_json::to_string_pretty(set.circles())?;
    match output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Cue-driven flight through a tunnel of packed circles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a headless session, firing cues from a cue sheet against a stepped clock.
    Run {
        /// JSON configuration file; defaults are used when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// JSON cue sheet with the note tracks to schedule.
        #[arg(long)]
        cues: Option<PathBuf>,
        /// Number of frames to simulate.
        #[arg(short, long, default_value_t = 600)]
        frames: u64,
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Overrides the seed from the configuration.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, value_enum, default_value_t = MaterialArg::Emissive)]
        material: MaterialArg,
    },
    /// Pack a single band until it saturates and print its circles as JSON.
    Pack {
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Write the JSON here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum MaterialArg {
    Emissive,
    Ambient,
    Specular,
    Normal,
}

impl From<MaterialArg> for Material {
    fn from(value: MaterialArg) -> Self {
        match value {
            MaterialArg::Emissive => Material::Emissive,
            MaterialArg::Ambient => Material::Ambient,
            MaterialArg::Specular => Material::Specular,
            MaterialArg::Normal => Material::Normal,
        }
    }
}
