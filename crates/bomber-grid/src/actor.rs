//! Actor handles and their allocation.
//!
//! The grid never owns level actors; it refers to them through an [`ActorId`],
//! a 64-bit handle packing a *generation* in the high 32 bits and a slot
//! *index* in the low 32 bits. Whoever owns actor lifetimes hands out ids from
//! an [`ActorAllocator`], which bumps the slot generation on release so that a
//! handle kept by the registry after its actor died is detected as stale.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ActorId
// ---------------------------------------------------------------------------

/// Opaque, generational handle to a level actor.
///
/// Layout: `[generation: u32 | index: u32]`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u64);

impl ActorId {
    /// Build a handle from a slot index and its generation.
    #[inline]
    pub fn new(index: u32, generation: u32) -> Self {
        Self((generation as u64) << 32 | index as u64)
    }

    /// Slot index (low 32 bits).
    #[inline]
    pub fn index(self) -> u32 {
        self.0 as u32
    }

    /// Slot generation (high 32 bits).
    #[inline]
    pub fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({}v{})", self.index(), self.generation())
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

// ---------------------------------------------------------------------------
// ActorAllocator
// ---------------------------------------------------------------------------

/// Hands out [`ActorId`]s and answers liveness queries for them.
///
/// Released slots are recycled first-in first-out.
#[derive(Debug, Default)]
pub struct ActorAllocator {
    generations: Vec<u32>,
    live: Vec<bool>,
    free: VecDeque<u32>,
}

impl ActorAllocator {
    /// Empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a handle, recycling a released slot when one is available.
    pub fn allocate(&mut self) -> ActorId {
        if let Some(index) = self.free.pop_front() {
            self.live[index as usize] = true;
            return ActorId::new(index, self.generations[index as usize]);
        }
        let index = self.generations.len() as u32;
        self.generations.push(0);
        self.live.push(true);
        ActorId::new(index, 0)
    }

    /// Release a live handle. Returns `false` for stale or unknown ids.
    pub fn release(&mut self, id: ActorId) -> bool {
        if !self.is_live(id) {
            return false;
        }
        let idx = id.index() as usize;
        self.live[idx] = false;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free.push_back(id.index());
        true
    }

    /// `true` if `id` was allocated and has not been released since.
    pub fn is_live(&self, id: ActorId) -> bool {
        let idx = id.index() as usize;
        idx < self.generations.len() && self.live[idx] && self.generations[idx] == id.generation()
    }

    /// Number of live handles.
    pub fn live_count(&self) -> usize {
        self.live.iter().filter(|&&l| l).count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
