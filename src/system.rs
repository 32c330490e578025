//! The particle emitter.
//!
//! [`ParticleSystem`] owns a profile, a bounded pool, the flat render
//! buffers and an emission clock, and advances them all once per frame:
//!
//! 1. prune particles that reached the end of their lifetime
//! 2. spawn whatever the emission clock says is due, up to `max_particles`
//! 3. integrate every live particle
//! 4. pack the live particles into the buffers, scaled for the viewpoint
//!
//! All four steps run synchronously inside [`ParticleSystem::update`]. The
//! renderer reads [`ParticleSystem::buffers`] after `update` returns; a read
//! can never observe a half-packed frame because `update` holds the only
//! mutable borrow.
//!
//! # Example
//!
//! ```ignore
//! use pointfx::prelude::*;
//!
//! let mut system = ParticleSystem::builder(presets::smoke())
//!     .sprites(ImageSpriteSource::new("assets"))
//!     .build();
//!
//! let mut clock = FrameClock::new();
//! loop {
//!     let now = clock.tick();
//!     system.set_position(emitter_transform.translation);
//!     system.update(now, Some(&camera_position));
//!     renderer.draw_points(system.buffers(), system.blend_mode());
//! }
//! ```

use crate::buffers::{PackContext, ParticleBuffers};
use crate::error::ConfigError;
use crate::lifecycle;
use crate::pool::ParticlePool;
use crate::profile::{BlendMode, ParticleProfile};
use crate::scaling::{SizeScaler, Viewpoint};
use crate::settings::DEFAULT_CAPACITY;
use crate::spawn::{self, EmissionClock};
use crate::textures::{ImageSpriteSource, Sprite, SpriteSource};
use glam::Vec3;
use log::{debug, trace, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Running counters for one emitter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemStats {
    /// Ticks that ran (paused calls excluded).
    pub ticks: u64,
    /// Particles alive after the last tick.
    pub live: usize,
    /// Particles packed by the last tick.
    pub draw_count: usize,
    /// Particles created since the last reset.
    pub spawned: u64,
    /// Spawns skipped because the emitter was at `max_particles`.
    pub dropped: u64,
    /// Particles removed at the end of their lifetime.
    pub expired: u64,
}

/// Builder for [`ParticleSystem`].
pub struct ParticleSystemBuilder<R> {
    profile: ParticleProfile,
    capacity: usize,
    rng: R,
    sprites: Option<Box<dyn SpriteSource>>,
    position: Vec3,
}

impl<R: Rng> ParticleSystemBuilder<R> {
    /// Hard buffer capacity. Defaults to [`DEFAULT_CAPACITY`].
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Random source for spawn placement and jitter.
    pub fn rng<R2: Rng>(self, rng: R2) -> ParticleSystemBuilder<R2> {
        ParticleSystemBuilder {
            profile: self.profile,
            capacity: self.capacity,
            rng,
            sprites: self.sprites,
            position: self.position,
        }
    }

    /// Seed the default generator, for reproducible runs.
    pub fn seed(self, seed: u64) -> ParticleSystemBuilder<SmallRng> {
        self.rng(SmallRng::seed_from_u64(seed))
    }

    /// Where sprite references are resolved. Defaults to image files under `.`.
    pub fn sprites(mut self, sprites: impl SpriteSource + 'static) -> Self {
        self.sprites = Some(Box::new(sprites));
        self
    }

    /// Initial emitter world position.
    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn build(self) -> ParticleSystem<R> {
        let mut system = ParticleSystem {
            profile: ParticleProfile::default(),
            pool: ParticlePool::with_capacity(self.capacity),
            buffers: ParticleBuffers::with_capacity(self.capacity),
            clock: EmissionClock::new(),
            rng: self.rng,
            sprites: self
                .sprites
                .unwrap_or_else(|| Box::new(ImageSpriteSource::new("."))),
            src: None,
            sprite: None,
            position: self.position,
            playing: true,
            emit: true,
            last_update: 0.0,
            stats: SystemStats::default(),
        };
        system.set_config(self.profile);
        system
    }
}

/// A single emitter and its particles.
pub struct ParticleSystem<R = SmallRng> {
    profile: ParticleProfile,
    pool: ParticlePool,
    buffers: ParticleBuffers,
    clock: EmissionClock,
    rng: R,
    sprites: Box<dyn SpriteSource>,
    src: Option<String>,
    sprite: Option<Sprite>,
    position: Vec3,
    /// Gates the whole tick.
    playing: bool,
    /// Gates spawning only.
    emit: bool,
    last_update: f64,
    stats: SystemStats,
}

impl ParticleSystem<SmallRng> {
    /// Start building a system around `profile`.
    pub fn builder(profile: ParticleProfile) -> ParticleSystemBuilder<SmallRng> {
        ParticleSystemBuilder {
            profile,
            capacity: DEFAULT_CAPACITY,
            rng: SmallRng::from_entropy(),
            sprites: None,
            position: Vec3::ZERO,
        }
    }

    /// A system with default capacity, entropy-seeded randomness and sprites
    /// resolved from the working directory.
    pub fn new(profile: ParticleProfile) -> Self {
        Self::builder(profile).build()
    }
}

impl<R: Rng> ParticleSystem<R> {
    /// Advance the simulation to `now` (seconds) and repack the buffers.
    ///
    /// `viewpoint`, when present, scales packed sizes by inverse distance.
    /// Returns the draw count. While paused this does nothing and returns
    /// the previous frame's draw count.
    pub fn update(&mut self, now: f64, viewpoint: Option<&dyn Viewpoint>) -> usize {
        if !self.playing {
            return self.buffers.draw_count();
        }

        let delta = (now - self.last_update).max(0.0) as f32;
        self.last_update = now;

        let expired = self.pool.prune_expired(now);
        self.stats.expired = self.stats.expired.saturating_add(expired as u64);

        if self.emit {
            self.emit_due(now);
        } else {
            self.clock.reset(now);
        }

        for particle in self.pool.iter_mut() {
            lifecycle::integrate(particle, &self.profile, now, delta);
        }

        let ctx = PackContext {
            now,
            emitter_position: self.position,
            world_space: self.profile.world_space,
            scaler: SizeScaler::new(self.sprite_width(), viewpoint.map(|v| v.eye())),
        };
        let drawn = self.buffers.pack(&self.pool, &ctx);

        self.stats.ticks += 1;
        self.stats.live = self.pool.len();
        self.stats.draw_count = drawn;
        trace!(
            "tick t={now:.3} live={} drawn={drawn} expired={expired}",
            self.pool.len()
        );
        drawn
    }

    fn emit_due(&mut self, now: f64) {
        let due = self.clock.due(now, self.profile.spawn_frequency);
        let limit = self.profile.particle_limit().min(self.pool.capacity());

        let mut spawned = 0;
        while spawned < due && self.pool.len() < limit {
            let particle = spawn::spawn_particle(&self.profile, &mut self.rng, now, self.position);
            if self.pool.insert(particle).is_err() {
                break;
            }
            spawned += 1;
        }
        self.stats.spawned = self.stats.spawned.saturating_add(spawned);
        self.stats.dropped = self.stats.dropped.saturating_add(due - spawned);
    }

    /// Resume spawning.
    pub fn play(&mut self) {
        self.emit = true;
    }

    /// Stop spawning. Live particles keep simulating until they expire.
    pub fn stop(&mut self) {
        self.emit = false;
    }

    #[inline]
    pub fn is_emitting(&self) -> bool {
        self.emit
    }

    /// Freeze the whole simulation; `update` becomes a no-op.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Unfreeze after [`pause`](Self::pause).
    ///
    /// The paused interval is not skipped. The next tick integrates the
    /// whole gap since the last tick that ran in one step, and the emission
    /// clock releases the spawns that came due meanwhile, up to
    /// `max_particles`.
    pub fn resume(&mut self) {
        self.playing = true;
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Hard reset onto a new profile.
    ///
    /// Clears every particle, publishes an empty frame, sanitizes and swaps
    /// in the profile, reloads the sprite if its reference changed, and
    /// resumes emission. Each configuration defect is logged once here and
    /// returned.
    pub fn set_config(&mut self, mut profile: ParticleProfile) -> Vec<ConfigError> {
        self.stop();

        self.pool.clear();
        self.buffers.clear();
        self.stats = SystemStats {
            ticks: self.stats.ticks,
            ..SystemStats::default()
        };

        let issues = profile.sanitize(self.pool.capacity());
        for issue in &issues {
            warn!("particle profile: {issue}");
        }
        debug!(
            "particle system reset: {} max particles at {}/s",
            profile.max_particles, profile.spawn_frequency
        );

        let src = profile.src.clone();
        self.profile = profile;
        if !src.is_empty() {
            self.set_src(&src);
        }

        self.play();
        issues
    }

    /// Point the emitter at a different sprite. No-op if `src` is already loaded.
    ///
    /// A sprite that fails to load leaves the size scale at 1x.
    pub fn set_src(&mut self, src: &str) {
        if self.src.as_deref() == Some(src) {
            return;
        }
        self.src = Some(src.to_owned());
        self.sprite = match self.sprites.load(src) {
            Ok(sprite) => {
                debug!("loaded sprite {src} ({}x{})", sprite.width, sprite.height);
                Some(sprite)
            }
            Err(e) => {
                warn!("sprite {src} unavailable, using neutral scale: {e}");
                None
            }
        };
    }

    /// Move the emitter. Takes effect on the next tick.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn profile(&self) -> &ParticleProfile {
        &self.profile
    }

    /// Blending hint for the renderer.
    #[inline]
    pub fn blend_mode(&self) -> BlendMode {
        self.profile.blend_mode
    }

    /// The packed frame.
    #[inline]
    pub fn buffers(&self) -> &ParticleBuffers {
        &self.buffers
    }

    #[inline]
    pub fn draw_count(&self) -> usize {
        self.buffers.draw_count()
    }

    /// Read access to the live particles.
    #[inline]
    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.pool.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Currently loaded sprite, if any.
    #[inline]
    pub fn sprite(&self) -> Option<&Sprite> {
        self.sprite.as_ref()
    }

    #[inline]
    pub fn sprite_width(&self) -> Option<u32> {
        self.sprite.as_ref().map(|s| s.width)
    }

    #[inline]
    pub fn stats(&self) -> SystemStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textures::StaticSpriteSource;

    fn system(profile: ParticleProfile) -> ParticleSystem {
        ParticleSystem::builder(profile)
            .seed(42)
            .sprites(StaticSpriteSource::new().with_sprite("/smoke.png", 1, 1))
            .build()
    }

    #[test]
    fn test_first_tick_spawns_due_particles() {
        let mut sys = system(ParticleProfile {
            spawn_frequency: 10.0,
            ..Default::default()
        });
        assert_eq!(sys.update(0.5, None), 5);
        assert_eq!(sys.live_count(), 5);
        assert_eq!(sys.stats().spawned, 5);
    }

    #[test]
    fn test_stop_keeps_simulating() {
        let mut sys = system(ParticleProfile {
            spawn_frequency: 10.0,
            start_speed: 1.0,
            stop_speed: 1.0,
            speed_randomizer: 1.0,
            direction_y: 1.0,
            ..Default::default()
        });
        sys.update(1.0, None);
        let live = sys.live_count();
        let y_before = sys.pool().iter().next().unwrap().1.position.y;

        sys.stop();
        sys.update(2.0, None);
        assert_eq!(sys.live_count(), live);
        let y_after = sys.pool().iter().next().unwrap().1.position.y;
        assert!((y_after - y_before - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_stopped_emitter_does_not_burst_on_play() {
        let mut sys = system(ParticleProfile {
            spawn_frequency: 10.0,
            min_lifetime: 10.0,
            max_lifetime: 10.0,
            ..Default::default()
        });
        sys.stop();
        sys.update(5.0, None);
        assert_eq!(sys.live_count(), 0);

        sys.play();
        sys.update(5.2, None);
        assert_eq!(sys.live_count(), 2);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut sys = system(ParticleProfile {
            spawn_frequency: 10.0,
            ..Default::default()
        });
        sys.update(1.0, None);
        let before = sys.pool().clone();
        let stats = sys.stats();

        sys.pause();
        assert_eq!(sys.update(3.0, None), stats.draw_count);
        assert_eq!(sys.stats(), stats);
        assert_eq!(
            sys.pool().iter().map(|(_, p)| p.clone()).collect::<Vec<_>>(),
            before.iter().map(|(_, p)| p.clone()).collect::<Vec<_>>()
        );

        sys.resume();
        sys.update(3.0, None);
        assert!(sys.stats().ticks > stats.ticks);
    }

    #[test]
    fn test_resume_releases_backlog_up_to_cap() {
        let mut sys = system(ParticleProfile {
            spawn_frequency: 10.0,
            max_particles: 15.0,
            min_lifetime: 10.0,
            max_lifetime: 10.0,
            ..Default::default()
        });
        sys.update(1.0, None);
        assert_eq!(sys.live_count(), 10);

        sys.pause();
        sys.update(2.0, None);
        sys.resume();
        sys.update(3.0, None);

        // Twenty spawns came due over the gap; only five fit under the cap.
        assert_eq!(sys.live_count(), 15);
        assert_eq!(sys.stats().spawned, 15);
        assert_eq!(sys.stats().dropped, 15);
    }

    #[test]
    fn test_set_config_resets_to_empty_frame() {
        let mut sys = system(ParticleProfile::default());
        sys.update(1.0, None);
        assert!(sys.draw_count() > 0);

        let issues = sys.set_config(ParticleProfile::default());
        assert!(issues.is_empty());
        assert_eq!(sys.draw_count(), 0);
        assert_eq!(sys.live_count(), 0);
        assert!(sys.is_emitting());
    }

    #[test]
    fn test_set_config_reports_capacity_overflow() {
        let mut sys = ParticleSystem::builder(ParticleProfile::default())
            .capacity(50)
            .seed(1)
            .build();
        let issues = sys.set_config(ParticleProfile {
            max_particles: 500.0,
            ..Default::default()
        });
        assert_eq!(
            issues,
            vec![ConfigError::CapacityExceeded {
                requested: 500,
                capacity: 50
            }]
        );
        assert_eq!(sys.profile().particle_limit(), 50);

        sys.update(100.0, None);
        assert_eq!(sys.live_count(), 50);
        assert_eq!(sys.draw_count(), 50);
    }

    #[test]
    fn test_set_src_only_reloads_on_change() {
        struct Counting(usize);
        impl SpriteSource for Counting {
            fn load(&mut self, _src: &str) -> Result<Sprite, crate::TextureError> {
                self.0 += 1;
                Ok(Sprite {
                    handle: crate::SpriteHandle(self.0 as u64),
                    width: 8,
                    height: 8,
                })
            }
        }

        let mut sys = ParticleSystem::builder(ParticleProfile::default())
            .sprites(Counting(0))
            .build();
        assert_eq!(sys.sprite().unwrap().handle.0, 1);
        sys.set_src("/smoke.png");
        assert_eq!(sys.sprite().unwrap().handle.0, 1);
        sys.set_src("/particle.png");
        assert_eq!(sys.sprite().unwrap().handle.0, 2);
    }

    #[test]
    fn test_missing_sprite_is_neutral() {
        let mut sys = ParticleSystem::builder(ParticleProfile {
            src: "/nope.png".into(),
            start_scale: 3.0,
            stop_scale: 3.0,
            scale_randomizer: 1.0,
            ..Default::default()
        })
        .sprites(StaticSpriteSource::new())
        .seed(3)
        .build();
        assert!(sys.sprite().is_none());
        sys.update(0.1, None);
        assert!(sys.buffers().sizes().iter().all(|&s| s == 3.0));
    }

    #[test]
    fn test_counters_saturate_on_absurd_clock() {
        let mut sys = system(ParticleProfile::default());
        sys.update(1e300, None);
        sys.update(2e300, None);
        assert_eq!(sys.stats().dropped, u64::MAX);
        assert_eq!(sys.live_count(), 1000);
    }

    #[test]
    fn test_blend_mode_passthrough() {
        let sys = system(ParticleProfile {
            blend_mode: BlendMode::Additive,
            ..Default::default()
        });
        assert_eq!(sys.blend_mode(), BlendMode::Additive);
    }
}
