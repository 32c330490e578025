//! Fixed-capacity particle arena.
//!
//! Slots are allocated once, up front, to match the flat render buffers.
//! Free slots are tracked on a stack so insert and remove are O(1), and
//! iteration always walks slots in index order so packing is deterministic.
//!
//! Every slot carries a generation counter that is bumped when its particle
//! is removed. A [`ParticleId`] therefore never refers to a different
//! particle than the one it was issued for.

use crate::particle::ParticleInstance;

/// Stable identity of a live particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleId {
    index: u32,
    generation: u32,
}

impl ParticleId {
    /// Slot index inside the pool.
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    particle: Option<ParticleInstance>,
}

/// Bounded pool of live particles.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Slot>,
    /// Free slot indices; popped from the back.
    free: Vec<u32>,
    live: usize,
}

impl ParticlePool {
    /// Create a pool with room for exactly `capacity` particles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Slot::default(); capacity],
            free: (0..capacity as u32).rev().collect(),
            live: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    /// Store a particle, or hand it back if every slot is taken.
    pub fn insert(&mut self, particle: ParticleInstance) -> Result<ParticleId, ParticleInstance> {
        let Some(index) = self.free.pop() else {
            return Err(particle);
        };
        let slot = &mut self.slots[index as usize];
        debug_assert!(slot.particle.is_none());
        slot.particle = Some(particle);
        self.live += 1;
        Ok(ParticleId {
            index,
            generation: slot.generation,
        })
    }

    pub fn get(&self, id: ParticleId) -> Option<&ParticleInstance> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.particle.as_ref()
    }

    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut ParticleInstance> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.particle.as_mut()
    }

    /// Remove a particle by identity.
    pub fn remove(&mut self, id: ParticleId) -> Option<ParticleInstance> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        let particle = slot.particle.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(particle)
    }

    /// Keep only particles for which `keep` returns true; returns how many were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&ParticleInstance) -> bool) -> usize {
        let mut removed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(particle) = &slot.particle else {
                continue;
            };
            if keep(particle) {
                continue;
            }
            slot.particle = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(index as u32);
            removed += 1;
        }
        self.live -= removed;
        removed
    }

    /// Drop every particle whose age fraction has reached 1 at `now`.
    pub fn prune_expired(&mut self, now: f64) -> usize {
        self.retain(|p| !p.is_expired(now))
    }

    /// Remove everything. Outstanding ids become invalid.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.particle.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.free.clear();
        self.free.extend((0..self.slots.len() as u32).rev());
        self.live = 0;
    }

    /// Live particles in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ParticleId, &ParticleInstance)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.particle.as_ref().map(|p| {
                (
                    ParticleId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    p,
                )
            })
        })
    }

    /// Live particles in slot order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ParticleInstance> + '_ {
        self.slots.iter_mut().filter_map(|slot| slot.particle.as_mut())
    }
}
