//! Boundary between the level map and whatever owns actor lifetimes.
//!
//! Generation never creates, destroys or registers actors by itself. It reads
//! the map transform, asks an [`ActorHost`] to spawn actors, and trusts the
//! host to attach each new actor to the grid (see
//! [`MapComponent`](crate::map_component::MapComponent)).

use bomber_grid::prelude::*;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Height above the floor at which actors are spawned.
pub const SPAWN_HEIGHT: f32 = 100.0;

// ---------------------------------------------------------------------------
// MapTransform
// ---------------------------------------------------------------------------

/// Placement of the level map in the world.
///
/// The scale is measured in cells: `(9, 7, 1)` is a 9 x 7 arena.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapTransform {
    pub location: Vec3,
    /// Rotation around the vertical axis, in degrees.
    pub yaw: f32,
    pub scale: Vec3,
}

impl Default for MapTransform {
    fn default() -> Self {
        Self {
            location: Vec3::ZERO,
            yaw: 0.0,
            scale: Vec3::new(5.0, 5.0, 1.0),
        }
    }
}

impl MapTransform {
    pub fn new(location: Vec3, yaw: f32, scale: Vec3) -> Self {
        Self {
            location,
            yaw,
            scale,
        }
    }

    /// Copy with the location snapped onto the grid.
    pub fn aligned(self, cell_size: f32) -> Self {
        Self {
            location: Cell::from_position(self.location, cell_size).location(cell_size),
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// SpawnRequest
// ---------------------------------------------------------------------------

/// Everything a host needs to spawn one generated actor.
#[derive(Debug, Clone, Copy)]
pub struct SpawnRequest<'a> {
    pub kind: ActorType,
    pub class: &'a ActorClass,
    pub cell: Cell,
    /// World location: the cell's location raised by [`SPAWN_HEIGHT`].
    pub location: Vec3,
    /// Map yaw, so hosts can align the actor with the map.
    pub yaw: f32,
}

// ---------------------------------------------------------------------------
// ActorHost
// ---------------------------------------------------------------------------

/// Owner of actor lifetimes, as seen by the level map.
///
/// Calls are synchronous: a spawn either returns an actor or declines before
/// the next cell is evaluated. Implementations must not trigger another
/// generation pass from inside these calls.
pub trait ActorHost {
    /// Create an actor for `request` and attach it to `grid`.
    ///
    /// Returning `None` declines the spawn; the cell stays empty.
    fn spawn(&mut self, request: &SpawnRequest<'_>, grid: &mut GridRegistry) -> Option<ActorId>;

    /// `false` once `actor` has been destroyed, whether or not the grid was
    /// told about it.
    fn is_live(&self, actor: ActorId) -> bool;

    /// Destroy `actor`, detaching it from `grid`. Returns `false` if it was
    /// not live.
    fn destroy(&mut self, actor: ActorId, grid: &mut GridRegistry) -> bool;

    /// Re-attach every live actor the host owns after the lattice has been
    /// rebuilt, so manually placed actors keep their cells.
    fn reattach_all(&mut self, _grid: &mut GridRegistry) {}
}
