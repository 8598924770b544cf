//! Record of one generation pass with a BLAKE3 digest.
//!
//! A [`LevelLayout`] lists, for every cell of the pass in row-major order, the
//! kind that was decided and what became of it. Two passes over the same
//! dimensions with the same RNG sequence produce identical layouts and
//! therefore identical digests, which is what determinism tests compare.
//!
//! Actor ids are deliberately left out of the layout: they depend on the host
//! and not on the placement rules. They are reported separately in
//! [`GenerationReport::spawned`].

use bomber_grid::prelude::*;
use serde::{Deserialize, Serialize};

use crate::generator::MapDimensions;
use crate::LevelError;

// ---------------------------------------------------------------------------
// PlacementOutcome
// ---------------------------------------------------------------------------

/// What happened at one cell during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementOutcome {
    /// A live actor was already there; nothing was decided.
    Occupied,
    /// The rules chose no actor.
    Empty,
    /// The host spawned the decided actor.
    Spawned,
    /// A kind was decided but no class was registered or the host declined.
    Declined,
}

// ---------------------------------------------------------------------------
// LayoutEntry
// ---------------------------------------------------------------------------

/// One visited cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutEntry {
    /// Column in lattice index space (`0..width`).
    pub x: u32,
    /// Row in lattice index space (`0..height`).
    pub y: u32,
    pub cell: Cell,
    /// Decided kind, or the existing occupant's kind for
    /// [`PlacementOutcome::Occupied`].
    pub kind: ActorType,
    pub outcome: PlacementOutcome,
}

impl LayoutEntry {
    pub fn new(x: u32, y: u32, cell: Cell, kind: ActorType, outcome: PlacementOutcome) -> Self {
        Self {
            x,
            y,
            cell,
            kind,
            outcome,
        }
    }
}

// ---------------------------------------------------------------------------
// LevelLayout
// ---------------------------------------------------------------------------

/// Serializable result of the placement half of a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub dimensions: MapDimensions,
    /// One entry per lattice cell, row-major.
    pub entries: Vec<LayoutEntry>,
    /// BLAKE3 hex digest (64 lowercase hex chars) of `dimensions` and
    /// `entries`.
    pub hash: String,
}

impl LevelLayout {
    /// Build a layout and compute its digest.
    pub fn new(dimensions: MapDimensions, entries: Vec<LayoutEntry>) -> Result<Self, LevelError> {
        let hash = compute_hash(dimensions, &entries)?;
        Ok(Self {
            dimensions,
            entries,
            hash,
        })
    }

    /// Recompute the digest and compare it with the stored one.
    pub fn verify(&self) -> Result<bool, LevelError> {
        Ok(compute_hash(self.dimensions, &self.entries)? == self.hash)
    }

    /// Entry at lattice index `(x, y)`.
    pub fn entry(&self, x: u32, y: u32) -> Option<&LayoutEntry> {
        if x >= self.dimensions.width || y >= self.dimensions.height {
            return None;
        }
        self.entries.get(self.dimensions.index(x, y))
    }

    /// Kind recorded at `(x, y)`; `None` kind outside the map.
    pub fn kind_at(&self, x: u32, y: u32) -> ActorType {
        self.entry(x, y).map(|e| e.kind).unwrap_or_default()
    }

    /// Number of cells where `kind` was decided (occupied cells excluded).
    pub fn decided(&self, kind: ActorType) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind == kind && e.outcome != PlacementOutcome::Occupied)
            .count()
    }

    /// Number of cells with the given outcome.
    pub fn count(&self, outcome: PlacementOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    /// Lattice index coordinates of every cell decided as `kind`.
    pub fn positions_of(&self, kind: ActorType) -> Vec<(u32, u32)> {
        self.entries
            .iter()
            .filter(|e| e.kind == kind && e.outcome != PlacementOutcome::Occupied)
            .map(|e| (e.x, e.y))
            .collect()
    }
}

/// Digest over the canonical JSON of the hashable fields. The `hash` field
/// itself is not included.
fn compute_hash(dimensions: MapDimensions, entries: &[LayoutEntry]) -> Result<String, LevelError> {
    #[derive(Serialize)]
    struct HashableLayout<'a> {
        dimensions: MapDimensions,
        entries: &'a [LayoutEntry],
    }

    let json_bytes = serde_json::to_vec(&HashableLayout {
        dimensions,
        entries,
    })?;
    Ok(blake3::hash(&json_bytes).to_hex().to_string())
}

// ---------------------------------------------------------------------------
// GenerationReport
// ---------------------------------------------------------------------------

/// Outcome of a full generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub layout: LevelLayout,
    /// Actors the host spawned, in spawn order.
    pub spawned: Vec<ActorId>,
    /// Stale characters dropped before placement.
    pub pruned_characters: usize,
}

impl GenerationReport {
    pub fn new(layout: LevelLayout, spawned: Vec<ActorId>) -> Self {
        Self {
            layout,
            spawned,
            pruned_characters: 0,
        }
    }

    pub fn spawned_count(&self) -> usize {
        self.spawned.len()
    }

    pub fn declined_count(&self) -> usize {
        self.layout.count(PlacementOutcome::Declined)
    }

    pub fn skipped_count(&self) -> usize {
        self.layout.count(PlacementOutcome::Occupied)
    }
}
