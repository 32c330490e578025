//! Per-particle simulation state.

use glam::Vec3;

/// One simulated particle.
///
/// Created by the spawner, owned by the [`ParticlePool`](crate::ParticlePool),
/// and mutated only by [`lifecycle::integrate`](crate::lifecycle::integrate).
/// The jitter factors are drawn once at spawn so a replay with the same
/// clock sequence produces the same visual state.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleInstance {
    /// Position relative to the emitter.
    pub position: Vec3,
    pub velocity: Vec3,
    /// Clock reading at spawn, in seconds.
    pub creation_time: f64,
    /// Seconds; fixed at spawn.
    pub lifetime: f32,
    /// Emitter world position at spawn time.
    pub creation_system_position: Vec3,
    /// RGB, 0..1.
    pub color: Vec3,
    pub alpha: f32,
    pub size: f32,
    /// Radians.
    pub rotation: f32,
    /// Speed multiplier in `[profile.speed_randomizer, 1]`.
    pub speed_randomizer: f32,
    /// Scale multiplier in `[profile.scale_randomizer, 1]`.
    pub scale_randomizer: f32,
}

impl ParticleInstance {
    /// Normalized age clamped to `[0, 1]`.
    ///
    /// A lifetime of zero (or less) counts as fully aged.
    #[inline]
    pub fn age_fraction(&self, now: f64) -> f32 {
        if self.lifetime <= 0.0 {
            return 1.0;
        }
        ((now - self.creation_time) / self.lifetime as f64).clamp(0.0, 1.0) as f32
    }

    /// True once the age fraction reaches 1.
    #[inline]
    pub fn is_expired(&self, now: f64) -> bool {
        now - self.creation_time >= self.lifetime as f64
    }
}
