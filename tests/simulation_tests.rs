//! Integration tests for the emitter tick.
//!
//! These drive [`ParticleSystem`] through its public surface only and check
//! the observable properties of the packed frames.

use pointfx::prelude::*;
use pointfx::{ConfigError, ParticleId};

fn headless(profile: ParticleProfile, seed: u64) -> ParticleSystem {
    ParticleSystem::builder(profile)
        .seed(seed)
        .sprites(StaticSpriteSource::new())
        .build()
}

fn rendered(system: &ParticleSystem, i: usize) -> Vec3 {
    let p = system.buffers().positions();
    Vec3::new(p[i * 3], p[i * 3 + 1], p[i * 3 + 2])
}

// ============================================================================
// Lifetime
// ============================================================================

#[test]
fn test_age_fraction_stays_in_unit_range() {
    let mut system = headless(presets::sparkles(), 11);
    for frame in 1..=600 {
        let now = frame as f64 / 60.0;
        system.update(now, None);
        for (_, particle) in system.pool().iter() {
            let f = particle.age_fraction(now);
            assert!((0.0..=1.0).contains(&f), "fraction {f} at t={now}");
        }
    }
}

#[test]
fn test_finished_particles_gone_next_tick() {
    let mut system = headless(
        ParticleProfile {
            min_lifetime: 0.1,
            max_lifetime: 0.5,
            spawn_frequency: 200.0,
            ..Default::default()
        },
        5,
    );

    let mut checked = 0;
    let mut finished: Vec<ParticleId> = Vec::new();
    for frame in 1..=240 {
        let now = frame as f64 / 60.0;
        system.update(now, None);

        for id in finished.drain(..) {
            assert!(system.pool().get(id).is_none());
            checked += 1;
        }
        // Anything still in the pool past its lifetime must go next tick.
        let next = (frame + 1) as f64 / 60.0;
        finished.extend(
            system
                .pool()
                .iter()
                .filter(|(_, p)| p.is_expired(next))
                .map(|(id, _)| id),
        );
    }
    assert!(checked > 0);
}

#[test]
fn test_alpha_halfway_through_lifetime() {
    let mut system = headless(
        ParticleProfile {
            alpha_start: 1.0,
            alpha_stop: 0.0,
            min_lifetime: 2.0,
            max_lifetime: 2.0,
            spawn_frequency: 10.0,
            ..Default::default()
        },
        1,
    );
    assert_eq!(system.update(0.1, None), 1);
    system.stop();

    assert_eq!(system.update(1.1, None), 1);
    assert!((system.buffers().alphas()[0] - 0.5).abs() < 1e-6);
}

// ============================================================================
// Emission
// ============================================================================

#[test]
fn test_emission_rate_is_stable_across_frame_sizes() {
    let frequency = 30.0;
    let mut system = headless(
        ParticleProfile {
            spawn_frequency: frequency,
            min_lifetime: 10.0,
            max_lifetime: 10.0,
            ..Default::default()
        },
        2,
    );

    let steps = [0.013, 0.021, 1.0 / 30.0, 0.007, 0.05];
    let mut now = 0.0;
    let mut i = 0;
    while now < 5.0 {
        now += steps[i % steps.len()];
        i += 1;
        system.update(now, None);
    }

    let expected = frequency as f64 * now;
    let spawned = system.stats().spawned as f64;
    assert!(
        (spawned - expected).abs() <= 1.0,
        "spawned {spawned}, expected about {expected}"
    );
    assert_eq!(system.live_count() as u64, system.stats().spawned);
}

#[test]
fn test_live_count_never_exceeds_caps() {
    let mut system = ParticleSystem::builder(ParticleProfile {
        spawn_frequency: 1000.0,
        max_particles: 50.0,
        ..Default::default()
    })
    .capacity(100)
    .seed(3)
    .sprites(StaticSpriteSource::new())
    .build();

    for frame in 1..=120 {
        let drawn = system.update(frame as f64 / 60.0, None);
        assert!(system.live_count() <= 50);
        assert!(drawn <= system.capacity());
    }
    assert!(system.stats().dropped > 0);
}

#[test]
fn test_max_particles_limits_spawns_silently() {
    let mut system = headless(ParticleProfile::default(), 4);
    let issues = system.set_config(ParticleProfile {
        spawn_frequency: 20.0,
        max_particles: 5.0,
        ..Default::default()
    });
    assert!(issues.is_empty());

    // 20 spawns are due after one second.
    system.update(1.0, None);
    assert_eq!(system.live_count(), 5);
    assert_eq!(system.draw_count(), 5);
    assert_eq!(system.stats().spawned, 5);
    assert_eq!(system.stats().dropped, 15);
}

#[test]
fn test_circle_spawns_within_radius() {
    let mut system = headless(
        ParticleProfile {
            spawn_type: SpawnType::Circle,
            spawn_radius: 10.0,
            spawn_frequency: 10_000.0,
            max_particles: 10_000.0,
            ..Default::default()
        },
        9,
    );
    system.update(1.5, None);
    assert_eq!(system.draw_count(), 10_000);

    for i in 0..system.draw_count() {
        let p = rendered(&system, i);
        assert_eq!(p.y, 0.0);
        assert!(p.x * p.x + p.z * p.z <= 100.0 + 1e-3, "{p} outside radius");
    }
}

// ============================================================================
// Emitter motion
// ============================================================================

fn moving_emitter(world_space: bool) -> ParticleSystem {
    let mut system = headless(
        ParticleProfile {
            spawn_frequency: 10.0,
            world_space,
            ..Default::default()
        },
        6,
    );
    system.set_position(Vec3::new(5.0, 0.0, 0.0));
    assert_eq!(system.update(0.1, None), 1);
    system.stop();
    system
}

#[test]
fn test_world_space_particles_stay_put() {
    let mut system = moving_emitter(true);
    let before = rendered(&system, 0) + system.position();

    let emitter = Vec3::new(8.0, 2.0, 1.0);
    system.set_position(emitter);
    system.update(0.2, None);

    let after = rendered(&system, 0) + emitter;
    assert!((after - before).length() < 1e-5);
    assert!((after - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
}

#[test]
fn test_local_space_particles_follow_emitter() {
    let mut system = moving_emitter(false);
    let start = system.position();
    let before = rendered(&system, 0) + start;

    let emitter = Vec3::new(8.0, 2.0, 1.0);
    system.set_position(emitter);
    system.update(0.2, None);

    let after = rendered(&system, 0) + emitter;
    assert!((after - before - (emitter - start)).length() < 1e-5);
}

// ============================================================================
// Control surface
// ============================================================================

#[test]
fn test_set_config_publishes_empty_frame() {
    let mut system = headless(presets::fire(), 7);
    system.update(0.5, None);
    assert!(system.draw_count() > 0);

    system.set_config(presets::smoke());
    assert_eq!(system.draw_count(), 0);
    assert!(system.buffers().positions().is_empty());

    // Emission resumes on the next tick.
    system.update(1.0, None);
    assert!(system.draw_count() > 0);
}

#[test]
fn test_set_config_repairs_bad_profile() {
    let profile = ParticleProfile::from_json(
        r#"{ "alphaStart": 4.0, "minLifetime": 3, "maxLifetime": 1, "blendMode": "screen" }"#,
    )
    .unwrap();

    let mut system = headless(ParticleProfile::default(), 8);
    let issues = system.set_config(profile);
    assert_eq!(issues.len(), 3);
    assert!(issues.contains(&ConfigError::InvertedRange {
        min_field: "minLifetime",
        max_field: "maxLifetime",
    }));
    assert_eq!(system.profile().alpha_start, 1.0);
    assert_eq!(system.profile().min_lifetime, 1.0);
    assert_eq!(system.blend_mode(), BlendMode::Regular);

    system.update(1.0, None);
    assert!(system.draw_count() > 0);
}

#[test]
fn test_pause_freezes_frame() {
    let mut system = headless(presets::smoke(), 10);
    system.update(1.0, None);
    let drawn = system.draw_count();
    let positions = system.buffers().positions().to_vec();

    system.pause();
    assert!(!system.is_playing());
    for frame in 1..=30 {
        assert_eq!(system.update(1.0 + frame as f64 / 60.0, None), drawn);
    }
    assert_eq!(system.buffers().positions(), positions.as_slice());
}

#[test]
fn test_stop_drains_to_empty() {
    let mut system = headless(
        ParticleProfile {
            min_lifetime: 0.5,
            max_lifetime: 1.0,
            ..Default::default()
        },
        12,
    );
    system.update(0.5, None);
    assert!(system.live_count() > 0);

    system.stop();
    assert!(!system.is_emitting());
    system.update(1.0, None);
    assert!(system.live_count() > 0);
    system.update(2.0, None);
    assert_eq!(system.live_count(), 0);
    assert_eq!(system.draw_count(), 0);
}

#[test]
fn test_same_seed_same_frames() {
    let run = || {
        let mut system = headless(presets::snow(), 99);
        for frame in 1..=120 {
            system.update(frame as f64 / 60.0, None);
        }
        (
            system.buffers().positions().to_vec(),
            system.buffers().sizes().to_vec(),
        )
    };
    assert_eq!(run(), run());
}

// ============================================================================
// Sprites and scaling
// ============================================================================

#[test]
fn test_set_config_keeps_loaded_sprite_for_same_src() {
    use pointfx::{Sprite, SpriteHandle, TextureError};

    // Every load hands out a fresh handle, so a reload is visible.
    struct Counting(u64);
    impl SpriteSource for Counting {
        fn load(&mut self, _src: &str) -> Result<Sprite, TextureError> {
            self.0 += 1;
            Ok(Sprite {
                handle: SpriteHandle(self.0),
                width: 4,
                height: 4,
            })
        }
    }

    let mut system = ParticleSystem::builder(presets::fire())
        .sprites(Counting(0))
        .seed(15)
        .build();
    let first = system.sprite().map(|s| s.handle);
    assert_eq!(first, Some(SpriteHandle(1)));

    system.set_config(presets::sparkles());
    assert_eq!(presets::sparkles().src, presets::fire().src);
    assert_eq!(system.sprite().map(|s| s.handle), first);

    system.set_config(presets::smoke());
    assert_eq!(system.sprite().map(|s| s.handle), Some(SpriteHandle(2)));
}

#[test]
fn test_sprite_width_and_viewpoint_scale_sizes() {
    let dir = tempfile::tempdir().unwrap();
    image::RgbaImage::new(16, 16)
        .save(dir.path().join("particle.png"))
        .unwrap();

    let mut system = ParticleSystem::builder(ParticleProfile {
        src: "/particle.png".into(),
        start_scale: 2.0,
        stop_scale: 2.0,
        spawn_frequency: 10.0,
        ..Default::default()
    })
    .sprites(ImageSpriteSource::new(dir.path()))
    .seed(13)
    .build();
    assert_eq!(system.sprite().map(|s| s.width), Some(16));

    let eye = Vec3::new(0.0, 0.0, 4.0);
    system.update(0.1, Some(&eye));
    // 2.0 * 16 px / 4 units
    assert!((system.buffers().sizes()[0] - 8.0).abs() < 1e-4);
}

#[test]
fn test_viewpoint_on_particle_stays_finite() {
    let mut system = headless(
        ParticleProfile {
            spawn_frequency: 10.0,
            ..Default::default()
        },
        14,
    );
    system.update(0.1, Some(&Vec3::ZERO));
    assert!(system.buffers().sizes().iter().all(|s| s.is_finite()));
}
