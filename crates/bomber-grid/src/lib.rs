//! Bomber Grid -- cells, actor handles and the cell <-> actor registry of a
//! tile-based arena.
//!
//! The grid maps continuous world positions onto discrete [`Cell`]s and keeps
//! track of which level actor (wall, box, player, ...) occupies which cell.
//! Actors themselves live elsewhere; the grid only holds [`ActorId`] handles
//! and asks its caller whether a handle is still live when it needs to.
//!
//! # Quick Start
//!
//! ```
//! use bomber_grid::prelude::*;
//! use glam::Vec3;
//!
//! let mut grid = GridRegistry::new(200.0).unwrap();
//! let cells = (0..5).flat_map(|y| (0..5).map(move |x| Cell::new(x - 2, y - 2)));
//! grid.rebuild_lattice(cells).unwrap();
//!
//! let mut actors = ActorAllocator::new();
//! let player = actors.allocate();
//! let cell = Cell::nearest_to(Vec3::new(-390.0, -410.0, 100.0), &grid);
//! assert!(grid.insert(cell, player, ActorType::Player));
//!
//! let live: Vec<_> = grid.characters(|id| actors.is_live(id)).collect();
//! assert_eq!(live, vec![player]);
//! ```
//!
//! [`Cell`]: cell::Cell
//! [`ActorId`]: actor::ActorId

#![deny(unsafe_code)]

pub mod actor;
pub mod actor_type;
pub mod catalog;
pub mod cell;
pub mod registry;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by grid operations.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The grid pitch must be a finite, positive number of world units.
    #[error("cell size must be finite and positive, got {cell_size}")]
    InvalidCellSize { cell_size: f32 },

    /// Two lattice positions snapped onto the same cell.
    #[error("lattice contains {cell} more than once")]
    DuplicateCell { cell: cell::Cell },

    /// A lattice position fell outside the representable grid range.
    #[error("lattice position is outside the grid coordinate range")]
    InvalidLatticeCell,

    /// Only real kinds can be bound to a spawn class.
    #[error("cannot register class '{class}' for the 'none' actor type")]
    NoneKind { class: catalog::ActorClass },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::actor::{ActorAllocator, ActorId};
    pub use crate::actor_type::{ActorType, ActorTypes};
    pub use crate::catalog::{ActorClass, ActorTypeCatalog};
    pub use crate::cell::{Cell, DEFAULT_CELL_SIZE, FLOOR_Z};
    pub use crate::registry::{GridRegistry, Occupant};
    pub use crate::GridError;
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------
