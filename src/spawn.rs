//! Time-driven emission and initial particle state.
//!
//! [`EmissionClock`] turns elapsed time into a whole number of spawns while
//! carrying the fractional remainder forward, so a steady clock produces a
//! steady rate no matter how frames are sliced. [`spawn_particle`] builds the
//! initial [`ParticleInstance`] for one spawn from a profile and an RNG.

use crate::particle::ParticleInstance;
use crate::profile::{ParticleProfile, SpawnType};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Tracks how much emission time has been consumed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EmissionClock {
    last_emission: f64,
}

impl EmissionClock {
    /// A clock whose time origin is zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock that has consumed all time up to `now`.
    pub fn starting_at(now: f64) -> Self {
        Self { last_emission: now }
    }

    /// Clock reading up to which emission time has been consumed.
    #[inline]
    pub fn last_emission(&self) -> f64 {
        self.last_emission
    }

    /// Forget any accumulated time.
    pub fn reset(&mut self, now: f64) {
        self.last_emission = now;
    }

    /// Number of spawns due at `now` for `frequency` particles per second.
    ///
    /// Only whole spawn periods are consumed; the leftover fraction stays on
    /// the clock for the next call. A non-positive or non-finite frequency
    /// never spawns.
    pub fn due(&mut self, now: f64, frequency: f32) -> u64 {
        if !(frequency.is_finite() && frequency > 0.0) {
            return 0;
        }
        let period = 1.0 / frequency as f64;
        let elapsed = now - self.last_emission;
        if !(elapsed >= period) {
            return 0;
        }
        let count = (elapsed / period).floor();
        self.last_emission += count * period;
        count as u64
    }
}

/// Uniform draw in `[lower, 1)`, the per-particle jitter factor.
#[inline]
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, lower: f32) -> f32 {
    lower + rng.gen::<f32>() * (1.0 - lower)
}

/// Initial position in the emitter's local XZ plane.
pub fn initial_position<R: Rng + ?Sized>(profile: &ParticleProfile, rng: &mut R) -> Vec3 {
    match profile.spawn_type {
        SpawnType::Point => Vec3::new(profile.spawn_x, 0.0, profile.spawn_y),
        SpawnType::Rectangle => Vec3::new(
            profile.spawn_x + rng.gen::<f32>() * profile.spawn_width,
            0.0,
            profile.spawn_y + rng.gen::<f32>() * profile.spawn_height,
        ),
        SpawnType::Circle => {
            let radius = rng.gen::<f32>() * profile.spawn_radius;
            let theta = rng.gen::<f32>() * TAU;
            Vec3::new(
                profile.spawn_x + radius * theta.cos(),
                0.0,
                profile.spawn_y + radius * theta.sin(),
            )
        }
        SpawnType::Unknown => Vec3::ZERO,
    }
}

/// Build one new particle born at `now` from an emitter at `emitter_position`.
///
/// The visual state holds the raw spawn defaults; the first integration pass
/// replaces it with the curve values.
pub fn spawn_particle<R: Rng + ?Sized>(
    profile: &ParticleProfile,
    rng: &mut R,
    now: f64,
    emitter_position: Vec3,
) -> ParticleInstance {
    let position = initial_position(profile, rng);
    let speed_randomizer = jitter(rng, profile.speed_randomizer);
    let lifetime =
        profile.min_lifetime + rng.gen::<f32>() * (profile.max_lifetime - profile.min_lifetime);
    let scale_randomizer = jitter(rng, profile.scale_randomizer);

    ParticleInstance {
        position,
        velocity: profile.direction() * profile.start_speed * speed_randomizer,
        creation_time: now,
        lifetime,
        creation_system_position: emitter_position,
        color: Vec3::ONE,
        alpha: profile.alpha_start,
        size: profile.start_scale,
        rotation: profile.start_rotation.to_radians(),
        speed_randomizer,
        scale_randomizer,
    }
}
