//! Headless pointfx runner.
//!
//! Runs an emitter profile for a fixed number of simulated seconds and
//! reports what the engine did. Useful for checking a profile without a
//! renderer.
//!
//! Usage: `cargo run --features cli --bin pointfx-sim -- run --preset fire --seconds 5`

use clap::{Parser, Subcommand};
use log::info;
use pointfx::prelude::*;
use pointfx::settings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pointfx-sim")]
#[command(about = "Run point-sprite particle profiles without a renderer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a profile and print per-second stats
    Run {
        /// Profile JSON file
        #[arg(conflicts_with = "preset")]
        profile: Option<PathBuf>,
        /// Built-in preset name (smoke, fire, sparkles, snow)
        #[arg(short, long)]
        preset: Option<String>,
        /// Simulated seconds
        #[arg(short, long, default_value_t = 5.0)]
        seconds: f64,
        /// Fixed ticks per second
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        /// Directory sprite paths are resolved against
        #[arg(long, default_value = ".")]
        assets: PathBuf,
        /// Buffer capacity
        #[arg(long, default_value_t = settings::DEFAULT_CAPACITY)]
        capacity: usize,
        /// Viewpoint for size scaling, as `x,y,z`
        #[arg(long, value_parser = parse_vec3)]
        eye: Option<Vec3>,
    },
    /// Print the configuration field table as JSON
    Schema,
    /// Print a preset profile as JSON
    Preset {
        /// Preset name
        name: String,
    },
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("{p}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got `{s}`")),
    }
}

fn preset(name: &str) -> Result<ParticleProfile, Box<dyn std::error::Error>> {
    presets::by_name(name).ok_or_else(|| {
        format!(
            "unknown preset `{name}` (expected one of {})",
            presets::NAMES.join(", ")
        )
        .into()
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            profile,
            preset: preset_name,
            seconds,
            fps,
            seed,
            assets,
            capacity,
            eye,
        } => {
            let profile = match (profile, preset_name) {
                (Some(path), _) => ParticleProfile::load(&path)?,
                (None, Some(name)) => preset(&name)?,
                (None, None) => ParticleProfile::default(),
            };

            let builder = ParticleSystem::builder(profile)
                .capacity(capacity)
                .sprites(ImageSpriteSource::new(assets));
            let builder = match seed {
                Some(seed) => builder.seed(seed),
                None => builder,
            };
            let mut system = builder.build();

            let fps = fps.max(1);
            let mut clock = FrameClock::fixed(1.0 / fps as f64);
            let frames = (seconds.max(0.0) * fps as f64).round() as u64;

            for frame in 1..=frames {
                let now = clock.tick();
                system.update(now, eye.as_ref().map(|e| e as &dyn Viewpoint));

                if frame % fps as u64 == 0 {
                    let stats = system.stats();
                    info!(
                        "t={now:.2}s live={} drawn={} spawned={} expired={} dropped={}",
                        stats.live, stats.draw_count, stats.spawned, stats.expired, stats.dropped
                    );
                }
            }

            let stats = system.stats();
            println!("Simulated {:.2}s in {} ticks", clock.now(), stats.ticks);
            println!("  Live particles: {}", stats.live);
            println!("  Draw count: {}", stats.draw_count);
            println!("  Spawned: {}", stats.spawned);
            println!("  Expired: {}", stats.expired);
            println!("  Dropped at cap: {}", stats.dropped);
            println!("  Blend mode: {:?}", system.blend_mode());
        }
        Commands::Schema => {
            println!("{}", settings::schema_json()?);
        }
        Commands::Preset { name } => {
            println!("{}", preset(&name)?.to_json()?);
        }
    }

    Ok(())
}
