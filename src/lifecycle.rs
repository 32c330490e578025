//! Per-tick particle integration.
//!
//! Every visual attribute is a straight line between a profile's start and
//! stop values, evaluated at the particle's age fraction. Position and
//! rotation are the only accumulated quantities.
//!
//! | Attribute | Start | Stop |
//! |-----------|-------|------|
//! | speed | `start_speed * s` | `stop_speed * s` |
//! | size | `start_scale * k` | `stop_scale * k` |
//! | alpha | `alpha_start` | `alpha_stop` |
//! | color | `start_color` | `stop_color` |
//!
//! `s` and `k` are the particle's own speed and scale jitter. The same draw
//! scales both ends of the curve.

use crate::particle::ParticleInstance;
use crate::profile::ParticleProfile;

#[inline]
fn lerp(start: f32, stop: f32, t: f32) -> f32 {
    start + (stop - start) * t
}

/// Advance one particle to `now`, `delta` seconds after the previous tick.
pub fn integrate(particle: &mut ParticleInstance, profile: &ParticleProfile, now: f64, delta: f32) {
    let fraction = particle.age_fraction(now);

    let speed = lerp(
        profile.start_speed * particle.speed_randomizer,
        profile.stop_speed * particle.speed_randomizer,
        fraction,
    );
    particle.velocity = profile.direction() * speed;

    particle.position += particle.velocity * delta;

    particle.rotation += (delta * profile.rotation_speed).to_radians();

    particle.size = lerp(
        profile.start_scale * particle.scale_randomizer,
        profile.stop_scale * particle.scale_randomizer,
        fraction,
    );

    particle.alpha = lerp(profile.alpha_start, profile.alpha_stop, fraction);

    particle.color = profile.start_color.0.lerp(profile.stop_color.0, fraction);
}
