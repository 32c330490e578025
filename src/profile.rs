//! Emitter profiles.
//!
//! A [`ParticleProfile`] is the declarative bundle that controls how one
//! emitter spawns particles and how those particles evolve over their
//! lifetime. Profiles serialize to the same camelCase JSON documents the
//! configuration surface in [`settings`](crate::settings) describes.
//!
//! # Example
//!
//! ```ignore
//! use pointfx::prelude::*;
//!
//! let mut profile = ParticleProfile {
//!     spawn_type: SpawnType::Circle,
//!     spawn_radius: 10.0,
//!     start_speed: 2.0,
//!     stop_speed: 0.5,
//!     direction_y: 1.0,
//!     ..Default::default()
//! };
//! for issue in profile.sanitize(DEFAULT_CAPACITY) {
//!     eprintln!("{issue}");
//! }
//! profile.save("fountain.json")?;
//! ```

use crate::error::{ConfigError, ProfileError};
use crate::settings;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Where new particles appear, in the emitter's local XZ plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnType {
    /// Fixed at `(spawnX, spawnY)`.
    #[default]
    Point,
    /// Uniform inside `spawnWidth` x `spawnHeight`, anchored at `(spawnX, spawnY)`.
    Rectangle,
    /// Uniform radius and angle around `(spawnX, spawnY)`.
    Circle,
    /// Any unrecognised value. Particles spawn at the emitter origin.
    #[serde(other)]
    Unknown,
}

/// Blending hint passed through to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Colors add up; overlapping particles glow.
    Additive,
    /// Standard alpha blending.
    #[default]
    Regular,
    /// Any unrecognised value. Replaced by `Regular` during sanitizing.
    #[serde(other)]
    Unknown,
}

/// RGB color with components in 0..1, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub Vec3);

impl Rgb {
    pub const WHITE: Rgb = Rgb(Vec3::ONE);

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Rgb(Vec3::new(r, g, b))
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, ProfileError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ProfileError::Color(hex.to_owned()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| ProfileError::Color(hex.to_owned()))
        };
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        let c = (self.0.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
        format!("#{:02x}{:02x}{:02x}", c.x as u8, c.y as u8, c.z as u8)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ProfileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Complete emitter configuration.
///
/// Missing JSON keys take their defaults from [`settings::FIELDS`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticleProfile {
    pub alpha_start: f32,
    pub alpha_stop: f32,

    pub start_scale: f32,
    pub stop_scale: f32,
    /// Lower bound of the per-particle scale jitter; the draw is in `[scale_randomizer, 1]`.
    pub scale_randomizer: f32,

    pub start_color: Rgb,
    pub stop_color: Rgb,

    pub start_speed: f32,
    pub stop_speed: f32,
    /// Lower bound of the per-particle speed jitter; the draw is in `[speed_randomizer, 1]`.
    pub speed_randomizer: f32,
    pub direction_x: f32,
    pub direction_y: f32,
    pub direction_z: f32,

    /// Degrees.
    pub start_rotation: f32,
    /// Degrees per second.
    pub rotation_speed: f32,

    /// Seconds.
    pub min_lifetime: f32,
    /// Seconds.
    pub max_lifetime: f32,

    /// Target particles per second.
    pub spawn_frequency: f32,
    /// Cap on concurrently live particles. Fractions are floored by
    /// [`sanitize`](Self::sanitize).
    pub max_particles: f32,

    /// Sprite image reference.
    pub src: String,

    pub spawn_type: SpawnType,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub spawn_width: f32,
    pub spawn_height: f32,
    pub spawn_radius: f32,

    pub blend_mode: BlendMode,
    /// Particles keep their world position when the emitter moves.
    pub world_space: bool,
}

impl Default for ParticleProfile {
    fn default() -> Self {
        let n = |name: &str| settings::number_default(name) as f32;
        let color = |name: &str| {
            settings::text_default(name)
                .and_then(|hex| Rgb::from_hex(hex).ok())
                .unwrap_or(Rgb::WHITE)
        };
        Self {
            alpha_start: n("alphaStart"),
            alpha_stop: n("alphaStop"),
            start_scale: n("startScale"),
            stop_scale: n("stopScale"),
            scale_randomizer: n("scaleRandomizer"),
            start_color: color("startColor"),
            stop_color: color("stopColor"),
            start_speed: n("startSpeed"),
            stop_speed: n("stopSpeed"),
            speed_randomizer: n("speedRandomizer"),
            direction_x: n("directionX"),
            direction_y: n("directionY"),
            direction_z: n("directionZ"),
            start_rotation: n("startRotation"),
            rotation_speed: n("rotationSpeed"),
            min_lifetime: n("minLifetime"),
            max_lifetime: n("maxLifetime"),
            spawn_frequency: n("spawnFrequency"),
            max_particles: n("maxParticles"),
            src: settings::text_default("src").unwrap_or_default().to_owned(),
            spawn_type: SpawnType::default(),
            spawn_x: n("spawnX"),
            spawn_y: n("spawnY"),
            spawn_width: n("spawnWidth"),
            spawn_height: n("spawnHeight"),
            spawn_radius: n("spawnRadius"),
            blend_mode: BlendMode::default(),
            world_space: settings::bool_default("worldSpace").unwrap_or(true),
        }
    }
}

impl ParticleProfile {
    /// Direction vector scaled by speed each tick.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        Vec3::new(self.direction_x, self.direction_y, self.direction_z)
    }

    /// Repair every defect in place and report what was changed.
    ///
    /// Out-of-domain numbers are clamped, non-finite numbers reset to their
    /// default, inverted lifetime bounds swapped, unknown blend modes
    /// replaced, and `max_particles` floored to a whole count and limited to
    /// `capacity`. An unknown
    /// spawn type is reported but kept; those particles spawn at the origin.
    pub fn sanitize(&mut self, capacity: usize) -> Vec<ConfigError> {
        let mut issues = Vec::new();

        let numbers: [(&'static str, &mut f32); 22] = [
            ("alphaStart", &mut self.alpha_start),
            ("alphaStop", &mut self.alpha_stop),
            ("startScale", &mut self.start_scale),
            ("stopScale", &mut self.stop_scale),
            ("scaleRandomizer", &mut self.scale_randomizer),
            ("startSpeed", &mut self.start_speed),
            ("stopSpeed", &mut self.stop_speed),
            ("speedRandomizer", &mut self.speed_randomizer),
            ("directionX", &mut self.direction_x),
            ("directionY", &mut self.direction_y),
            ("directionZ", &mut self.direction_z),
            ("startRotation", &mut self.start_rotation),
            ("rotationSpeed", &mut self.rotation_speed),
            ("minLifetime", &mut self.min_lifetime),
            ("maxLifetime", &mut self.max_lifetime),
            ("spawnFrequency", &mut self.spawn_frequency),
            ("maxParticles", &mut self.max_particles),
            ("spawnX", &mut self.spawn_x),
            ("spawnY", &mut self.spawn_y),
            ("spawnWidth", &mut self.spawn_width),
            ("spawnHeight", &mut self.spawn_height),
            ("spawnRadius", &mut self.spawn_radius),
        ];
        for (field, value) in numbers {
            let Some((min, max)) = settings::number_domain(field) else {
                continue;
            };
            if !value.is_finite() {
                let default = settings::number_default(field);
                *value = default as f32;
                issues.push(ConfigError::NotFinite { field, default });
                continue;
            }
            let clamped = value.clamp(min as f32, max as f32);
            if clamped != *value {
                issues.push(ConfigError::OutOfDomain {
                    field,
                    value: *value as f64,
                    min,
                    max,
                    clamped: clamped as f64,
                });
                *value = clamped;
            }
        }

        if self.min_lifetime > self.max_lifetime {
            std::mem::swap(&mut self.min_lifetime, &mut self.max_lifetime);
            issues.push(ConfigError::InvertedRange {
                min_field: "minLifetime",
                max_field: "maxLifetime",
            });
        }

        if self.max_particles.fract() != 0.0 {
            let whole = self.max_particles.floor();
            issues.push(ConfigError::NotWhole {
                field: "maxParticles",
                value: self.max_particles as f64,
                rounded: whole as f64,
            });
            self.max_particles = whole;
        }
        if self.particle_limit() > capacity {
            issues.push(ConfigError::CapacityExceeded {
                requested: self.particle_limit(),
                capacity,
            });
            self.max_particles = capacity as f32;
        }

        if self.blend_mode == BlendMode::Unknown {
            self.blend_mode = BlendMode::Regular;
            issues.push(ConfigError::UnknownVariant {
                field: "blendMode",
                fallback: "using regular blending",
            });
        }
        if self.spawn_type == SpawnType::Unknown {
            issues.push(ConfigError::UnknownVariant {
                field: "spawnType",
                fallback: "particles spawn at the origin",
            });
        }

        issues
    }

    /// `max_particles` as a particle count. Negative and NaN read as 0.
    #[inline]
    pub fn particle_limit(&self) -> usize {
        self.max_particles as usize
    }

    /// Consume, sanitize and return the repaired profile with its defects.
    pub fn sanitized(mut self, capacity: usize) -> (Self, Vec<ConfigError>) {
        let issues = self.sanitize(capacity);
        (self, issues)
    }

    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a profile from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save the profile to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProfileError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
