//! # pointfx - Point-Sprite Particle Engine
//!
//! Time-driven particle emitters with a bounded pool, linear lifetime curves
//! and flat, GPU-ready attribute buffers.
//!
//! pointfx simulates; it does not draw. Each frame you hand the engine the
//! current time and, optionally, a viewpoint. It hands back five parallel
//! `f32` arrays and a draw count for your renderer to consume.
//!
//! ## Quick Start
//!
//! ```ignore
//! use pointfx::prelude::*;
//!
//! fn main() {
//!     let mut system = ParticleSystem::builder(presets::fire())
//!         .sprites(ImageSpriteSource::new("assets"))
//!         .build();
//!
//!     let mut clock = FrameClock::fixed(1.0 / 60.0);
//!     for _ in 0..600 {
//!         let now = clock.tick();
//!         system.update(now, Some(&Vec3::new(0.0, 2.0, 10.0)));
//!
//!         let packed = system.buffers();
//!         upload(packed.positions(), packed.sizes(), packed.draw_count());
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Profiles
//!
//! A [`ParticleProfile`] is the whole configuration of one emitter: spawn
//! rate and shape, lifetime range, and start/stop values for speed, size,
//! alpha and color. Profiles load from camelCase JSON; missing keys take
//! their defaults from [`settings::FIELDS`].
//!
//! ```ignore
//! let profile = ParticleProfile::load("smoke.json")?;
//! let issues = system.set_config(profile); // repaired, logged, returned
//! ```
//!
//! ### Ticks
//!
//! [`ParticleSystem::update`] runs one frame: expired particles are pruned,
//! new ones spawned at the configured rate, every particle integrated along
//! its curves, and the survivors packed into [`ParticleBuffers`].
//!
//! ### World Space
//!
//! With `world_space` set, particles stay where they were born when the
//! emitter moves. Otherwise they move with it.
//!
//! ## Feature Overview
//!
//! | Concern | Types |
//! |---------|-------|
//! | Configuration | [`ParticleProfile`], [`settings::FIELDS`], [`presets`] |
//! | Simulation | [`ParticleSystem`], [`ParticlePool`], [`EmissionClock`] |
//! | Output | [`ParticleBuffers`], [`Attribute`], [`SizeScaler`] |
//! | Sprites | [`SpriteSource`], [`ImageSpriteSource`] |
//! | Timing | [`FrameClock`] |
//! | GPU (`wgpu` feature) | `gpu::ParticleVertexBuffers` |

pub mod buffers;
pub mod error;
#[cfg(feature = "wgpu")]
pub mod gpu;
pub mod lifecycle;
pub mod particle;
pub mod pool;
pub mod presets;
pub mod profile;
pub mod scaling;
pub mod settings;
pub mod spawn;
pub mod system;
pub mod textures;
pub mod time;

pub use buffers::{Attribute, PackContext, ParticleBuffers};
pub use bytemuck;
pub use error::{ConfigError, ProfileError, ScaleError, TextureError};
pub use glam::Vec3;
pub use particle::ParticleInstance;
pub use pool::{ParticleId, ParticlePool};
pub use profile::{BlendMode, ParticleProfile, Rgb, SpawnType};
pub use scaling::{SizeScaler, Viewpoint};
pub use spawn::EmissionClock;
pub use system::{ParticleSystem, ParticleSystemBuilder, SystemStats};
pub use textures::{ImageSpriteSource, Sprite, SpriteHandle, SpriteSource, StaticSpriteSource};
pub use time::{ClockMode, FrameClock};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use pointfx::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffers::{Attribute, ParticleBuffers};
    pub use crate::presets;
    pub use crate::profile::{BlendMode, ParticleProfile, Rgb, SpawnType};
    pub use crate::scaling::Viewpoint;
    pub use crate::system::{ParticleSystem, SystemStats};
    pub use crate::textures::{ImageSpriteSource, SpriteSource, StaticSpriteSource};
    pub use crate::time::FrameClock;
    pub use crate::Vec3;
}
