//! The [`GridRegistry`] maps lattice cells to the actors occupying them.
//!
//! It owns three structures that are kept in sync on every mutation:
//!
//! - the lattice: every addressable [`Cell`], in the order it was built,
//! - the occupant map: cell -> [`Occupant`], plus its reverse actor -> cell,
//! - the character side index: every occupant whose kind is a character, in
//!   registration order.
//!
//! A cell holds at most one occupant and an actor sits in at most one cell.
//! Inserting an actor that is already registered elsewhere moves it; inserting
//! onto an occupied cell evicts the previous occupant.
//!
//! # Example
//!
//! ```
//! use bomber_grid::prelude::*;
//!
//! let mut grid = GridRegistry::default();
//! grid.rebuild_lattice([Cell::new(0, 0), Cell::new(1, 0)]).unwrap();
//!
//! let wall = ActorId::new(0, 0);
//! assert!(grid.insert(Cell::new(1, 0), wall, ActorType::Wall));
//! assert!(!grid.insert(Cell::new(5, 5), wall, ActorType::Wall)); // not in the lattice
//! assert_eq!(grid.actor_at(Cell::new(1, 0)), Some(wall));
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::actor_type::{ActorType, ActorTypes};
use crate::cell::{Cell, DEFAULT_CELL_SIZE};
use crate::GridError;

// ---------------------------------------------------------------------------
// Occupant
// ---------------------------------------------------------------------------

/// An actor registered at a cell, together with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occupant {
    pub actor: ActorId,
    pub kind: ActorType,
}

// ---------------------------------------------------------------------------
// GridRegistry
// ---------------------------------------------------------------------------

/// Cell <-> actor bookkeeping for one level map.
#[derive(Debug, Clone)]
pub struct GridRegistry {
    cell_size: f32,
    /// Lattice cells in construction order (row-major as built by the generator).
    lattice: Vec<Cell>,
    /// Membership set for `lattice`.
    members: HashSet<Cell>,
    occupants: HashMap<Cell, Occupant>,
    cells_by_actor: HashMap<ActorId, Cell>,
    characters: Vec<ActorId>,
}

impl Default for GridRegistry {
    fn default() -> Self {
        Self::with_valid_size(DEFAULT_CELL_SIZE)
    }
}

impl GridRegistry {
    /// Empty registry for a grid of the given pitch.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidCellSize`] unless `cell_size` is finite and positive.
    pub fn new(cell_size: f32) -> Result<Self, GridError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridError::InvalidCellSize { cell_size });
        }
        Ok(Self::with_valid_size(cell_size))
    }

    fn with_valid_size(cell_size: f32) -> Self {
        Self {
            cell_size,
            lattice: Vec::new(),
            members: HashSet::new(),
            occupants: HashMap::new(),
            cells_by_actor: HashMap::new(),
            characters: Vec::new(),
        }
    }

    /// Grid pitch in world units.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    // -- lattice ------------------------------------------------------------

    /// Replace the set of addressable cells and drop every occupant.
    ///
    /// Returns the number of cells in the new lattice.
    ///
    /// # Errors
    ///
    /// [`GridError::DuplicateCell`] if `cells` yields the same cell twice and
    /// [`GridError::InvalidLatticeCell`] if it yields [`Cell::INVALID`]. The
    /// registry is left untouched in both cases.
    pub fn rebuild_lattice<I>(&mut self, cells: I) -> Result<usize, GridError>
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut lattice = Vec::new();
        let mut members = HashSet::new();
        for cell in cells {
            if !cell.is_valid() {
                return Err(GridError::InvalidLatticeCell);
            }
            if !members.insert(cell) {
                return Err(GridError::DuplicateCell { cell });
            }
            lattice.push(cell);
        }

        self.lattice = lattice;
        self.members = members;
        self.occupants.clear();
        self.cells_by_actor.clear();
        self.characters.clear();
        tracing::trace!(cells = self.lattice.len(), "lattice rebuilt");
        Ok(self.lattice.len())
    }

    /// `true` while no lattice has been built.
    pub fn is_empty(&self) -> bool {
        self.lattice.is_empty()
    }

    /// Number of lattice cells.
    pub fn len(&self) -> usize {
        self.lattice.len()
    }

    pub fn contains_cell(&self, cell: Cell) -> bool {
        self.members.contains(&cell)
    }

    /// Lattice cell at construction index `index` (`y * width + x` for a
    /// generated map).
    pub fn cell_at(&self, index: usize) -> Option<Cell> {
        self.lattice.get(index).copied()
    }

    /// Every lattice cell in construction order. Restartable: each call starts
    /// a fresh traversal.
    pub fn cells(&self) -> impl ExactSizeIterator<Item = Cell> + '_ {
        self.lattice.iter().copied()
    }

    // -- occupants ----------------------------------------------------------

    /// Register `actor` of the given `kind` at `cell`.
    ///
    /// Returns `false` without mutating anything when `cell` is not in the
    /// lattice or `kind` is [`ActorType::None`]. Otherwise any previous cell of
    /// `actor` is released, any other occupant of `cell` is evicted, and
    /// characters are added to the side index.
    pub fn insert(&mut self, cell: Cell, actor: ActorId, kind: ActorType) -> bool {
        if !self.members.contains(&cell) {
            tracing::debug!(%cell, %actor, "insert rejected: cell outside the lattice");
            return false;
        }
        if kind == ActorType::None {
            tracing::debug!(%cell, %actor, "insert rejected: actor has no kind");
            return false;
        }

        let _ = self.remove(actor);
        if let Some(evicted) = self.occupants.get(&cell).copied() {
            let _ = self.remove(evicted.actor);
            tracing::trace!(%cell, evicted = %evicted.actor, "occupant evicted");
        }

        let _ = self.occupants.insert(cell, Occupant { actor, kind });
        let _ = self.cells_by_actor.insert(actor, cell);
        if kind.is_character() && !self.characters.contains(&actor) {
            self.characters.push(actor);
            tracing::trace!(characters = self.characters.len(), "character registered");
        }
        tracing::trace!(%cell, %actor, %kind, "actor added to the grid");
        true
    }

    /// Unregister `actor`. Returns the cell it occupied; absent actors are a
    /// no-op returning `None`.
    pub fn remove(&mut self, actor: ActorId) -> Option<Cell> {
        self.characters.retain(|&c| c != actor);
        let cell = self.cells_by_actor.remove(&actor)?;
        let _ = self.occupants.remove(&cell);
        tracing::trace!(%cell, %actor, "actor removed from the grid");
        Some(cell)
    }

    /// Drop every occupant while keeping the lattice.
    pub fn clear_occupants(&mut self) {
        self.occupants.clear();
        self.cells_by_actor.clear();
        self.characters.clear();
    }

    pub fn occupant_at(&self, cell: Cell) -> Option<Occupant> {
        self.occupants.get(&cell).copied()
    }

    pub fn actor_at(&self, cell: Cell) -> Option<ActorId> {
        self.occupants.get(&cell).map(|o| o.actor)
    }

    /// Cell currently occupied by `actor`.
    pub fn cell_of(&self, actor: ActorId) -> Option<Cell> {
        self.cells_by_actor.get(&actor).copied()
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.occupants.len()
    }

    /// Occupied cells in lattice order.
    pub fn occupants(&self) -> impl Iterator<Item = (Cell, Occupant)> + '_ {
        self.lattice
            .iter()
            .filter_map(|cell| self.occupants.get(cell).map(|o| (*cell, *o)))
    }

    /// Cells of `cells` whose occupant kind is in `kinds`, in input order.
    /// Occupants equal to `exclude` are ignored.
    pub fn cells_by_types<I>(
        &self,
        cells: I,
        kinds: ActorTypes,
        exclude: Option<ActorId>,
    ) -> Vec<Cell>
    where
        I: IntoIterator<Item = Cell>,
    {
        cells
            .into_iter()
            .filter(|cell| {
                self.occupants
                    .get(cell)
                    .is_some_and(|o| kinds.contains(o.kind) && Some(o.actor) != exclude)
            })
            .collect()
    }

    // -- characters ---------------------------------------------------------

    /// Drop characters for which `is_live` fails, from both the side index and
    /// the occupant map. Returns how many were pruned.
    pub fn prune_stale_characters<F>(&mut self, mut is_live: F) -> usize
    where
        F: FnMut(ActorId) -> bool,
    {
        let stale: Vec<ActorId> = self
            .characters
            .iter()
            .copied()
            .filter(|&actor| !is_live(actor))
            .collect();
        for &actor in &stale {
            let _ = self.remove(actor);
        }
        if !stale.is_empty() {
            tracing::debug!(pruned = stale.len(), "stale characters pruned");
        }
        stale.len()
    }

    /// Live characters in registration order. Stale entries are pruned first.
    pub fn characters<F>(&mut self, is_live: F) -> std::iter::Copied<std::slice::Iter<'_, ActorId>>
    where
        F: FnMut(ActorId) -> bool,
    {
        let _ = self.prune_stale_characters(is_live);
        self.characters.iter().copied()
    }

    /// Characters as currently indexed, without a liveness pass.
    pub fn indexed_characters(&self) -> &[ActorId] {
        &self.characters
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorAllocator;

    fn grid_3x3() -> GridRegistry {
        let mut grid = GridRegistry::default();
        let cells = (0..3).flat_map(|y| (0..3).map(move |x| Cell::new(x, y)));
        assert_eq!(grid.rebuild_lattice(cells).unwrap(), 9);
        grid
    }

    #[test]
    fn rejects_bad_cell_size() {
        assert!(GridRegistry::new(0.0).is_err());
        assert!(GridRegistry::new(f32::NAN).is_err());
        assert_eq!(GridRegistry::new(100.0).unwrap().cell_size(), 100.0);
    }

    #[test]
    fn cells_keep_construction_order() {
        let grid = grid_3x3();
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[1], Cell::new(1, 0));
        assert_eq!(cells[3], Cell::new(0, 1));
        assert_eq!(grid.cell_at(8), Some(Cell::new(2, 2)));
        // Restartable.
        assert_eq!(grid.cells().count(), 9);
    }

    #[test]
    fn duplicate_cells_leave_registry_untouched() {
        let mut grid = grid_3x3();
        let err = grid
            .rebuild_lattice([Cell::new(0, 0), Cell::new(0, 0)])
            .unwrap_err();
        assert!(matches!(err, GridError::DuplicateCell { .. }));
        assert_eq!(grid.len(), 9);
    }

    #[test]
    fn invalid_sentinel_never_joins_lattice() {
        let mut grid = grid_3x3();
        let err = grid
            .rebuild_lattice([Cell::new(0, 0), Cell::INVALID])
            .unwrap_err();
        assert!(matches!(err, GridError::InvalidLatticeCell));
        assert_eq!(grid.len(), 9);
        assert!(!grid.contains_cell(Cell::INVALID));
    }

    #[test]
    fn insert_outside_lattice_is_rejected() {
        let mut grid = grid_3x3();
        let outside = Cell::new(7, 7);
        assert!(!grid.insert(outside, ActorId::new(0, 0), ActorType::Box));
        assert_eq!(grid.occupant_at(outside), None);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn insert_without_kind_is_rejected() {
        let mut grid = grid_3x3();
        assert!(!grid.insert(Cell::new(1, 1), ActorId::new(0, 0), ActorType::None));
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn insert_moves_actor() {
        let mut grid = grid_3x3();
        let bomb = ActorId::new(1, 0);
        assert!(grid.insert(Cell::new(0, 0), bomb, ActorType::Bomb));
        assert!(grid.insert(Cell::new(2, 1), bomb, ActorType::Bomb));
        assert_eq!(grid.actor_at(Cell::new(0, 0)), None);
        assert_eq!(grid.cell_of(bomb), Some(Cell::new(2, 1)));
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn insert_on_occupied_cell_evicts() {
        let mut grid = grid_3x3();
        let old = ActorId::new(1, 0);
        let new = ActorId::new(2, 0);
        assert!(grid.insert(Cell::new(1, 0), old, ActorType::Box));
        assert!(grid.insert(Cell::new(1, 0), new, ActorType::Item));
        assert_eq!(grid.actor_at(Cell::new(1, 0)), Some(new));
        assert_eq!(grid.cell_of(old), None);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut grid = grid_3x3();
        assert_eq!(grid.remove(ActorId::new(42, 0)), None);
        let wall = ActorId::new(0, 0);
        assert!(grid.insert(Cell::new(1, 1), wall, ActorType::Wall));
        assert_eq!(grid.remove(wall), Some(Cell::new(1, 1)));
        assert_eq!(grid.remove(wall), None);
    }

    #[test]
    fn characters_are_side_indexed_once() {
        let mut grid = grid_3x3();
        let player = ActorId::new(3, 0);
        assert!(grid.insert(Cell::new(0, 0), player, ActorType::Player));
        assert!(grid.insert(Cell::new(0, 1), player, ActorType::Player));
        assert_eq!(grid.indexed_characters(), &[player]);
        assert_eq!(grid.actor_at(Cell::new(0, 1)), Some(player));
        let _ = grid.remove(player);
        assert!(grid.indexed_characters().is_empty());
    }

    #[test]
    fn stale_characters_are_pruned() {
        let mut alloc = ActorAllocator::new();
        let mut grid = grid_3x3();
        let alive = alloc.allocate();
        let dead = alloc.allocate();
        assert!(grid.insert(Cell::new(0, 0), alive, ActorType::Player));
        assert!(grid.insert(Cell::new(2, 2), dead, ActorType::Player));
        assert!(alloc.release(dead));

        let live: Vec<_> = grid.characters(|id| alloc.is_live(id)).collect();
        assert_eq!(live, vec![alive]);
        assert_eq!(grid.actor_at(Cell::new(2, 2)), None);
    }

    #[test]
    fn rebuild_clears_occupants() {
        let mut grid = grid_3x3();
        assert!(grid.insert(Cell::new(0, 0), ActorId::new(0, 0), ActorType::Player));
        let _ = grid.rebuild_lattice([Cell::new(0, 0)]).unwrap();
        assert_eq!(grid.occupied_count(), 0);
        assert!(grid.indexed_characters().is_empty());
    }

    #[test]
    fn filters_cells_by_types() {
        let mut grid = grid_3x3();
        let wall = ActorId::new(0, 0);
        let boxed = ActorId::new(1, 0);
        let player = ActorId::new(2, 0);
        assert!(grid.insert(Cell::new(1, 1), wall, ActorType::Wall));
        assert!(grid.insert(Cell::new(2, 1), boxed, ActorType::Box));
        assert!(grid.insert(Cell::new(0, 0), player, ActorType::Player));

        let all: Vec<_> = grid.cells().collect();
        let solid =
            grid.cells_by_types(all.iter().copied(), ActorTypes::WALL | ActorType::Box, None);
        assert_eq!(solid, vec![Cell::new(1, 1), Cell::new(2, 1)]);

        let players = grid.cells_by_types(all.iter().copied(), ActorTypes::PLAYER, Some(player));
        assert!(players.is_empty());
    }

    #[test]
    fn occupants_follow_lattice_order() {
        let mut grid = grid_3x3();
        assert!(grid.insert(Cell::new(2, 2), ActorId::new(0, 0), ActorType::Box));
        assert!(grid.insert(Cell::new(1, 0), ActorId::new(1, 0), ActorType::Box));
        let cells: Vec<_> = grid.occupants().map(|(c, _)| c).collect();
        assert_eq!(cells, vec![Cell::new(1, 0), Cell::new(2, 2)]);
    }
}
