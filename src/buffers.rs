//! Flat attribute buffers for the renderer.
//!
//! Each rendered attribute lives in its own contiguous `f32` array sized for
//! the pool's full capacity. Packing writes live particles into the leading
//! slots, in pool slot order, and records how many were written as the
//! *draw count*. Index `i` in every array describes the same particle.
//! Entries at or past the draw count are stale from earlier frames and must
//! not be read.
//!
//! | Attribute | Components |
//! |-----------|------------|
//! | `position` | 3 |
//! | `color` | 3 |
//! | `rotation` | 1 |
//! | `size` | 1 |
//! | `alpha` | 1 |

use crate::particle::ParticleInstance;
use crate::pool::ParticlePool;
use crate::scaling::SizeScaler;
use glam::Vec3;

/// One rendered vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Position,
    Color,
    Rotation,
    Size,
    Alpha,
}

impl Attribute {
    /// All attributes, in shader location order.
    pub const ALL: [Attribute; 5] = [
        Attribute::Position,
        Attribute::Color,
        Attribute::Rotation,
        Attribute::Size,
        Attribute::Alpha,
    ];

    /// Name the renderer binds this attribute under.
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Position => "position",
            Attribute::Color => "color",
            Attribute::Rotation => "rotation",
            Attribute::Size => "size",
            Attribute::Alpha => "alpha",
        }
    }

    /// `f32` components per particle.
    pub fn components(self) -> usize {
        match self {
            Attribute::Position | Attribute::Color => 3,
            Attribute::Rotation | Attribute::Size | Attribute::Alpha => 1,
        }
    }
}

/// Rendered position of a particle relative to the emitter's current position.
///
/// In world-space mode the particle is offset by how far the emitter has
/// moved since the particle spawned, which pins it in world coordinates.
#[inline]
pub fn rendered_position(particle: &ParticleInstance, emitter_position: Vec3, world_space: bool) -> Vec3 {
    if world_space {
        particle.position + (particle.creation_system_position - emitter_position)
    } else {
        particle.position
    }
}

/// Inputs to one packing pass.
#[derive(Debug, Clone, Copy)]
pub struct PackContext {
    /// Clock reading of the frame; expired particles are skipped.
    pub now: f64,
    /// Emitter world position this frame.
    pub emitter_position: Vec3,
    pub world_space: bool,
    pub scaler: SizeScaler,
}

/// Pre-allocated per-attribute arrays plus the valid prefix length.
#[derive(Debug, Clone)]
pub struct ParticleBuffers {
    position: Vec<f32>,
    color: Vec<f32>,
    rotation: Vec<f32>,
    size: Vec<f32>,
    alpha: Vec<f32>,
    capacity: usize,
    draw_count: usize,
}

impl ParticleBuffers {
    /// Allocate room for `capacity` particles. The draw count starts at 0.
    pub fn with_capacity(capacity: usize) -> Self {
        let alloc = |attr: Attribute| vec![0.0; capacity * attr.components()];
        Self {
            position: alloc(Attribute::Position),
            color: alloc(Attribute::Color),
            rotation: alloc(Attribute::Rotation),
            size: alloc(Attribute::Size),
            alpha: alloc(Attribute::Alpha),
            capacity,
            draw_count: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of leading particles valid this frame.
    #[inline]
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    /// Mark the frame empty. Array contents are left as they are.
    pub fn clear(&mut self) {
        self.draw_count = 0;
    }

    /// Full backing array, including stale entries past the draw count.
    pub fn attribute(&self, attr: Attribute) -> &[f32] {
        match attr {
            Attribute::Position => &self.position,
            Attribute::Color => &self.color,
            Attribute::Rotation => &self.rotation,
            Attribute::Size => &self.size,
            Attribute::Alpha => &self.alpha,
        }
    }

    /// Only the entries valid this frame.
    pub fn valid(&self, attr: Attribute) -> &[f32] {
        &self.attribute(attr)[..self.draw_count * attr.components()]
    }

    /// Valid entries as raw bytes, ready for a GPU upload.
    pub fn valid_bytes(&self, attr: Attribute) -> &[u8] {
        bytemuck::cast_slice(self.valid(attr))
    }

    pub fn positions(&self) -> &[f32] {
        self.valid(Attribute::Position)
    }

    pub fn colors(&self) -> &[f32] {
        self.valid(Attribute::Color)
    }

    pub fn rotations(&self) -> &[f32] {
        self.valid(Attribute::Rotation)
    }

    pub fn sizes(&self) -> &[f32] {
        self.valid(Attribute::Size)
    }

    pub fn alphas(&self) -> &[f32] {
        self.valid(Attribute::Alpha)
    }

    /// Serialize every live particle and return the new draw count.
    ///
    /// Particles already expired at `ctx.now` are skipped, and nothing is
    /// written past the buffer capacity.
    pub fn pack(&mut self, pool: &ParticlePool, ctx: &PackContext) -> usize {
        let mut count = 0;
        for (_, particle) in pool.iter() {
            if count == self.capacity {
                break;
            }
            if particle.is_expired(ctx.now) {
                continue;
            }

            let local = rendered_position(particle, ctx.emitter_position, ctx.world_space);
            let world = local + ctx.emitter_position;

            let v3 = count * 3;
            self.position[v3..v3 + 3].copy_from_slice(&local.to_array());
            self.color[v3..v3 + 3].copy_from_slice(&particle.color.to_array());
            self.size[count] = particle.size * ctx.scaler.multiplier(world);
            self.rotation[count] = particle.rotation;
            self.alpha[count] = particle.alpha;

            count += 1;
        }
        self.draw_count = count;
        count
    }
}
