//! Camera-relative size scaling.
//!
//! Packed sizes are in sprite pixels: a particle's simulated size is
//! multiplied by the sprite's pixel width and, when a viewpoint is present,
//! divided by its distance to that viewpoint.

use crate::error::ScaleError;
use glam::Vec3;

/// Distances at or below this are treated as degenerate.
pub const MIN_VIEW_DISTANCE: f32 = 1e-4;

/// Multiplier substituted when the distance is degenerate.
pub const DEGENERATE_DISTANCE_FACTOR: f32 = 1.0 / MIN_VIEW_DISTANCE;

/// Anything that can report an eye position for distance scaling.
pub trait Viewpoint {
    fn eye(&self) -> Vec3;
}

impl Viewpoint for Vec3 {
    fn eye(&self) -> Vec3 {
        *self
    }
}

/// `1 / distance(world, eye)`.
///
/// Fails with [`ScaleError::DegenerateDistance`] when the distance is not
/// finite or not above [`MIN_VIEW_DISTANCE`].
pub fn distance_factor(world: Vec3, eye: Vec3) -> Result<f32, ScaleError> {
    let distance = world.distance(eye);
    if distance.is_finite() && distance > MIN_VIEW_DISTANCE {
        Ok(1.0 / distance)
    } else {
        Err(ScaleError::DegenerateDistance)
    }
}

/// Per-frame size multiplier, resolved once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeScaler {
    sprite_width: f32,
    eye: Option<Vec3>,
}

impl SizeScaler {
    /// Scaler for a sprite `sprite_width` pixels wide, seen from `eye`.
    ///
    /// `None` for either input leaves that factor at 1.
    pub fn new(sprite_width: Option<u32>, eye: Option<Vec3>) -> Self {
        Self {
            sprite_width: sprite_width.map_or(1.0, |w| w as f32),
            eye,
        }
    }

    /// The identity scaler.
    pub fn identity() -> Self {
        Self::new(None, None)
    }

    /// Multiplier for a particle at `world`. Always finite.
    #[inline]
    pub fn multiplier(&self, world: Vec3) -> f32 {
        match self.eye {
            Some(eye) => {
                let factor = distance_factor(world, eye).unwrap_or(DEGENERATE_DISTANCE_FACTOR);
                self.sprite_width * factor
            }
            None => self.sprite_width,
        }
    }
}

impl Default for SizeScaler {
    fn default() -> Self {
        Self::identity()
    }
}
