//! Ready-made emitter profiles.
//!
//! Each preset is a plain [`ParticleProfile`] that passes sanitization
//! unchanged. Start from one and override what you need:
//!
//! ```ignore
//! let profile = ParticleProfile {
//!     spawn_frequency: 400.0,
//!     ..presets::fire()
//! };
//! ```

use crate::profile::{BlendMode, ParticleProfile, Rgb, SpawnType};

/// Slow grey plumes that grow and fade as they rise.
pub fn smoke() -> ParticleProfile {
    ParticleProfile {
        alpha_start: 0.6,
        alpha_stop: 0.0,
        start_scale: 1.0,
        stop_scale: 4.0,
        scale_randomizer: 0.6,
        start_color: Rgb::new(0.35, 0.35, 0.35),
        stop_color: Rgb::new(0.8, 0.8, 0.8),
        start_speed: 1.5,
        stop_speed: 0.5,
        speed_randomizer: 0.5,
        direction_y: 1.0,
        rotation_speed: 20.0,
        min_lifetime: 3.0,
        max_lifetime: 6.0,
        spawn_frequency: 40.0,
        max_particles: 400.0,
        src: "/smoke.png".into(),
        spawn_type: SpawnType::Circle,
        spawn_radius: 0.5,
        blend_mode: BlendMode::Regular,
        world_space: true,
        ..Default::default()
    }
}

/// Short-lived yellow to red flames with additive blending.
pub fn fire() -> ParticleProfile {
    ParticleProfile {
        alpha_start: 1.0,
        alpha_stop: 0.0,
        start_scale: 1.5,
        stop_scale: 0.2,
        scale_randomizer: 0.5,
        start_color: Rgb::new(1.0, 0.9, 0.3),
        stop_color: Rgb::new(0.8, 0.2, 0.0),
        start_speed: 3.0,
        stop_speed: 1.0,
        speed_randomizer: 0.6,
        direction_y: 1.0,
        min_lifetime: 0.8,
        max_lifetime: 1.5,
        spawn_frequency: 200.0,
        max_particles: 300.0,
        src: "/particle.png".into(),
        spawn_type: SpawnType::Circle,
        spawn_radius: 0.3,
        blend_mode: BlendMode::Additive,
        world_space: true,
        ..Default::default()
    }
}

/// Small spinning white-gold points that pop and vanish.
pub fn sparkles() -> ParticleProfile {
    ParticleProfile {
        alpha_start: 1.0,
        alpha_stop: 0.0,
        start_scale: 0.4,
        stop_scale: 0.1,
        scale_randomizer: 0.3,
        start_color: Rgb::new(1.0, 1.0, 1.0),
        stop_color: Rgb::new(1.0, 0.8, 0.3),
        start_speed: 0.5,
        stop_speed: 0.0,
        speed_randomizer: 0.2,
        direction_y: 1.0,
        start_rotation: 45.0,
        rotation_speed: 360.0,
        min_lifetime: 0.3,
        max_lifetime: 1.0,
        spawn_frequency: 80.0,
        max_particles: 120.0,
        src: "/particle.png".into(),
        spawn_type: SpawnType::Rectangle,
        spawn_width: 2.0,
        spawn_height: 2.0,
        blend_mode: BlendMode::Additive,
        world_space: false,
        ..Default::default()
    }
}

/// A wide field of slowly falling flakes.
pub fn snow() -> ParticleProfile {
    ParticleProfile {
        alpha_start: 0.9,
        alpha_stop: 0.9,
        start_scale: 0.3,
        stop_scale: 0.3,
        scale_randomizer: 0.4,
        start_color: Rgb::WHITE,
        stop_color: Rgb::WHITE,
        start_speed: 1.0,
        stop_speed: 1.0,
        speed_randomizer: 0.5,
        direction_y: -1.0,
        rotation_speed: 30.0,
        min_lifetime: 8.0,
        max_lifetime: 10.0,
        spawn_frequency: 150.0,
        max_particles: 2000.0,
        src: "/particle.png".into(),
        spawn_type: SpawnType::Rectangle,
        spawn_width: 40.0,
        spawn_height: 40.0,
        blend_mode: BlendMode::Regular,
        world_space: true,
        ..Default::default()
    }
}

/// Look a preset up by name.
pub fn by_name(name: &str) -> Option<ParticleProfile> {
    match name {
        "smoke" => Some(smoke()),
        "fire" => Some(fire()),
        "sparkles" => Some(sparkles()),
        "snow" => Some(snow()),
        _ => None,
    }
}

/// Names accepted by [`by_name`].
pub const NAMES: [&str; 4] = ["smoke", "fire", "sparkles", "snow"];
