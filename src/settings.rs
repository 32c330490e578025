//! Declarative configuration surface for particle profiles.
//!
//! [`FIELDS`] maps every profile key to its type, domain and default. UI
//! layers generate their controls from it, and
//! [`ParticleProfile`](crate::ParticleProfile) takes its defaults and
//! validation domains from the same table, so the three can never drift apart.
//!
//! # Example
//!
//! ```ignore
//! use pointfx::settings;
//!
//! let (min, max) = settings::number_domain("spawnFrequency").unwrap();
//! let schema = settings::schema_json()?; // hand to a UI generator
//! ```

use serde::Serialize;

/// Hard buffer capacity used when a system is built without an explicit one.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Type and domain of a single profile field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    /// Bounded number. `min..=max` is the valid domain.
    Number { min: f64, max: f64, default: f64 },
    /// `#rrggbb` color string.
    Color { default: &'static str },
    /// One of a closed set of strings.
    Select {
        options: &'static [&'static str],
        default: &'static str,
    },
    /// Plain toggle.
    Boolean { default: bool },
}

/// One entry of the configuration surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Profile key, as it appears in JSON.
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Only show this field when `(key, value)` matches another field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditional: Option<(&'static str, &'static str)>,
}

const fn number(name: &'static str, min: f64, max: f64, default: f64) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Number { min, max, default },
        conditional: None,
    }
}

const fn number_when(
    name: &'static str,
    min: f64,
    max: f64,
    default: f64,
    key: &'static str,
    value: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Number { min, max, default },
        conditional: Some((key, value)),
    }
}

const fn color(name: &'static str, default: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Color { default },
        conditional: None,
    }
}

const fn select(
    name: &'static str,
    options: &'static [&'static str],
    default: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Select { options, default },
        conditional: None,
    }
}

/// Every profile field, in UI order.
pub const FIELDS: &[FieldSpec] = &[
    number("alphaStart", 0.0, 1.0, 1.0),
    number("alphaStop", 0.0, 1.0, 1.0),
    number("startScale", 0.0, 100.0, 1.0),
    number("stopScale", 0.0, 100.0, 1.0),
    number("scaleRandomizer", 0.0, 1.0, 1.0),
    color("startColor", "#0000ff"),
    color("stopColor", "#ffffff"),
    number("startSpeed", 0.0, 5000.0, 0.0),
    number("stopSpeed", 0.0, 5000.0, 0.0),
    number("speedRandomizer", 0.0, 1.0, 1.0),
    number("directionX", -1.0, 1.0, 0.0),
    number("directionY", -1.0, 1.0, 0.0),
    number("directionZ", -1.0, 1.0, 0.0),
    number("startRotation", 0.0, 360.0, 0.0),
    number("rotationSpeed", 0.0, 3000.0, 0.0),
    number("minLifetime", 0.0, 10.0, 4.0),
    number("maxLifetime", 0.0, 10.0, 4.0),
    number("spawnFrequency", 0.1, 10_000.0, 100.0),
    number("maxParticles", 0.0, DEFAULT_CAPACITY as f64, 1000.0),
    select("src", &["/smoke.png", "/particle.png"], "/smoke.png"),
    select("spawnType", &["point", "rectangle", "circle"], "point"),
    number("spawnX", 0.0, 3000.0, 0.0),
    number("spawnY", 0.0, 3000.0, 0.0),
    number_when("spawnWidth", 0.0, 3000.0, 1.0, "spawnType", "rectangle"),
    number_when("spawnHeight", 0.0, 3000.0, 1.0, "spawnType", "rectangle"),
    number_when("spawnRadius", 0.0, 3000.0, 1.0, "spawnType", "circle"),
    select("blendMode", &["additive", "regular"], "regular"),
    FieldSpec {
        name: "worldSpace",
        kind: FieldKind::Boolean { default: true },
        conditional: None,
    },
];

/// Look up a field by its JSON key.
pub fn field(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.name == name)
}

/// `(min, max)` of a numeric field.
pub fn number_domain(name: &str) -> Option<(f64, f64)> {
    match field(name)?.kind {
        FieldKind::Number { min, max, .. } => Some((min, max)),
        _ => None,
    }
}

/// Default of a numeric field, or 0 for keys that are not numeric.
pub fn number_default(name: &str) -> f64 {
    match field(name).map(|f| f.kind) {
        Some(FieldKind::Number { default, .. }) => default,
        _ => 0.0,
    }
}

/// Default of a color, select or boolean field rendered as a string.
pub fn text_default(name: &str) -> Option<&'static str> {
    match field(name)?.kind {
        FieldKind::Color { default } | FieldKind::Select { default, .. } => Some(default),
        _ => None,
    }
}

/// Default of a boolean field.
pub fn bool_default(name: &str) -> Option<bool> {
    match field(name)?.kind {
        FieldKind::Boolean { default } => Some(default),
        _ => None,
    }
}

/// The whole table as JSON, for UI generation.
pub fn schema_json() -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(FIELDS)
}
