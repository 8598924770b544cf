//! Per-actor attachment records.
//!
//! A [`MapComponent`] binds one actor to the cell it is registered under. It
//! is the only thing that inserts actors into the grid: attaching resolves the
//! nearest cell and registers the owner there, detaching removes it again.
//! Moving an actor requires an explicit [`MapComponent::refresh`]; nothing is
//! polled.

use std::sync::Arc;

use bomber_grid::prelude::*;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Static description shared by every actor of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorData {
    pub kind: ActorType,
    pub class: ActorClass,
}

/// Attachment record of one actor.
#[derive(Debug, Clone)]
pub struct MapComponent {
    owner: ActorId,
    kind: ActorType,
    cell: Cell,
    is_dragged: bool,
    data: Option<Arc<ActorData>>,
}

impl MapComponent {
    /// Detached record. `is_dragged` marks actors placed by hand rather than
    /// by generation.
    pub fn new(owner: ActorId, kind: ActorType, is_dragged: bool) -> Self {
        Self {
            owner,
            kind,
            cell: Cell::INVALID,
            is_dragged,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Arc<ActorData>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn owner(&self) -> ActorId {
        self.owner
    }

    pub fn kind(&self) -> ActorType {
        self.kind
    }

    /// Cell recorded at the last attach; [`Cell::INVALID`] when detached or
    /// outside the lattice.
    ///
    /// Another actor attaching onto the same cell evicts the owner without
    /// touching this record, so the value can be stale. Use
    /// [`registered_cell`](Self::registered_cell) or
    /// [`is_attached`](Self::is_attached) for the grid's view.
    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Recorded cell while the grid still lists the owner there,
    /// [`Cell::INVALID`] otherwise.
    pub fn registered_cell(&self, grid: &GridRegistry) -> Cell {
        if self.is_attached(grid) {
            self.cell
        } else {
            Cell::INVALID
        }
    }

    pub fn is_dragged(&self) -> bool {
        self.is_dragged
    }

    pub fn data(&self) -> Option<&ActorData> {
        self.data.as_deref()
    }

    /// Register the owner at the cell nearest to `location`, dropping any
    /// registration it already had.
    ///
    /// Returns `false` when the grid has no lattice or the cell lies outside
    /// it; the record then keeps an invalid cell and the owner is absent from
    /// every grid lookup.
    pub fn attach(&mut self, location: Vec3, grid: &mut GridRegistry) -> bool {
        let _ = grid.remove(self.owner);
        let cell = Cell::nearest_to(location, grid);
        if cell.is_valid() && grid.insert(cell, self.owner, self.kind) {
            self.cell = cell;
            true
        } else {
            tracing::debug!(owner = %self.owner, %location, "actor left off the grid");
            self.cell = Cell::INVALID;
            false
        }
    }

    /// Remove the owner from the grid. Idempotent.
    pub fn detach(&mut self, grid: &mut GridRegistry) {
        let _ = grid.remove(self.owner);
        self.cell = Cell::INVALID;
    }

    /// Re-resolve the owner's cell after it moved to `location`.
    pub fn refresh(&mut self, location: Vec3, grid: &mut GridRegistry) -> bool {
        self.attach(location, grid)
    }

    /// `true` while the grid still lists the owner under the recorded cell.
    pub fn is_attached(&self, grid: &GridRegistry) -> bool {
        self.cell.is_valid() && grid.cell_of(self.owner) == Some(self.cell)
    }
}
