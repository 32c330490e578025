//! Error types for pointfx.
//!
//! None of these errors abort a simulation tick. Configuration defects are
//! repaired and reported, sprite failures degrade to a neutral scale, and
//! numeric degeneracies are replaced with documented fallbacks.

use thiserror::Error;

/// A defect found while validating a [`ParticleProfile`](crate::ParticleProfile).
///
/// Each defect has already been repaired when it is returned; the value is
/// informational.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A numeric field was outside its declared domain and has been clamped.
    #[error("field `{field}` = {value} is outside {min}..={max}, clamped to {clamped}")]
    OutOfDomain {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
        clamped: f64,
    },
    /// A numeric field was NaN or infinite and has been reset to its default.
    #[error("field `{field}` is not finite, reset to default {default}")]
    NotFinite { field: &'static str, default: f64 },
    /// An enum-valued field held a value outside its closed set.
    #[error("field `{field}` has unknown value, {fallback}")]
    UnknownVariant {
        field: &'static str,
        fallback: &'static str,
    },
    /// A count field held a fraction and has been floored.
    #[error("field `{field}` = {value} is not a whole number, floored to {rounded}")]
    NotWhole {
        field: &'static str,
        value: f64,
        rounded: f64,
    },
    /// `maxParticles` exceeds the fixed buffer allocation.
    #[error("maxParticles = {requested} exceeds buffer capacity {capacity}, clamped")]
    CapacityExceeded { requested: usize, capacity: usize },
    /// A `min`/`max` pair was given in the wrong order and has been swapped.
    #[error("`{min_field}` > `{max_field}`, swapped")]
    InvertedRange {
        min_field: &'static str,
        max_field: &'static str,
    },
}

/// Errors that can occur while loading or saving a profile file.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Failed to read or write the file.
    #[error("failed to access profile file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a valid profile document.
    #[error("failed to parse profile: {0}")]
    Json(#[from] serde_json::Error),
    /// A `#rrggbb` color string could not be parsed.
    #[error("invalid color `{0}`, expected #rrggbb")]
    Color(String),
}

/// Errors that can occur during sprite loading.
#[derive(Debug, Error)]
pub enum TextureError {
    /// Failed to decode the image header.
    #[error("failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),
    /// Failed to read file from disk.
    #[error("failed to read sprite file: {0}")]
    Io(#[from] std::io::Error),
    /// The image decoded but has no pixels.
    #[error("sprite `{0}` has zero width")]
    Empty(String),
}

/// Numeric degeneracies in camera-relative scaling.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ScaleError {
    /// The particle sits on (or numerically at) the viewpoint.
    #[error("particle is at zero distance from the viewpoint")]
    DegenerateDistance,
}
