//! Level population.
//!
//! One generation pass over a map of `W x H` cells:
//!
//! 1. [`MapDimensions::from_scale`] turns the map scale into odd dimensions.
//! 2. [`lattice_cells`] lays out the `W * H` cells row-major (Y outer), centred
//!    on the map location and rotated by the map yaw.
//! 3. [`LevelGenerator::populate`] walks the same index space and decides a
//!    kind per cell with the precedence Wall > Player > Box > None:
//!
//!    - **Wall**: `x` and `y` both odd.
//!    - **Player**: a lattice corner, while fewer than `players_number`
//!      players were placed in this pass.
//!    - **Box**: a uniform roll in `[0, 100)` below `box_chance`, outside the
//!      safe zone of the corners (see [`outside_corner_zone`]).
//!
//!    Cells that already hold a live actor are skipped. Every other decided
//!    kind is resolved to a spawn class and handed to the [`ActorHost`].
//!
//! The only randomness is the box roll, drawn in row-major order from the
//! generator's RNG, so a fixed seed reproduces the whole layout.

use bomber_grid::prelude::*;
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::host::{ActorHost, MapTransform, SpawnRequest, SPAWN_HEIGHT};
use crate::layout::{GenerationReport, LayoutEntry, LevelLayout, PlacementOutcome};
use crate::LevelError;

// ---------------------------------------------------------------------------
// MapDimensions
// ---------------------------------------------------------------------------

/// Odd width and height of a generated map, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    /// Resolve dimensions from a map scale.
    ///
    /// Each horizontal component is truncated to an integer; even values are
    /// bumped up by one. The vertical component is ignored (always 1).
    ///
    /// # Errors
    ///
    /// [`LevelError::DegenerateScale`] if the scale is not finite or either
    /// dimension ends up below 1.
    pub fn from_scale(scale: Vec3) -> Result<Self, LevelError> {
        if !scale.is_finite() {
            return Err(LevelError::DegenerateScale { scale });
        }
        let resolve = |value: f32| -> Option<u32> {
            let mut n = value.trunc() as i64;
            if n % 2 != 1 {
                n += 1;
            }
            u32::try_from(n).ok().filter(|n| *n >= 1)
        };
        match (resolve(scale.x), resolve(scale.y)) {
            (Some(width), Some(height)) => Ok(Self { width, height }),
            _ => Err(LevelError::DegenerateScale { scale }),
        }
    }

    /// The scale vector these dimensions correspond to (`z = 1`).
    pub fn to_scale(self) -> Vec3 {
        Vec3::new(self.width as f32, self.height as f32, 1.0)
    }

    pub fn cell_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major lattice index of `(x, y)`.
    pub fn index(self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn is_corner(self, x: u32, y: u32) -> bool {
        (x == 0 || x == self.width - 1) && (y == 0 || y == self.height - 1)
    }
}

// ---------------------------------------------------------------------------
// Lattice construction
// ---------------------------------------------------------------------------

/// The `W * H` lattice cells of a map, row-major with `y` as the outer loop.
///
/// `transform.location` should already be aligned to the grid.
pub fn lattice_cells(
    transform: &MapTransform,
    dimensions: MapDimensions,
    cell_size: f32,
) -> Vec<Cell> {
    let origin = transform.location;
    let extent = Vec3::new(dimensions.width as f32, dimensions.height as f32, 0.0);
    let half_extent = extent * cell_size / 2.0;
    let mut cells = Vec::with_capacity(dimensions.cell_count());
    for y in 0..dimensions.height {
        for x in 0..dimensions.width {
            let position = Vec3::new(x as f32, y as f32, 0.0) * cell_size + origin - half_extent;
            let cell = Cell::from_position(position, cell_size).rotate_around(
                origin,
                transform.yaw,
                cell_size,
            );
            cells.push(cell);
        }
    }
    cells
}

// ---------------------------------------------------------------------------
// Placement rules
// ---------------------------------------------------------------------------

/// `true` for cells where a box may appear.
///
/// A cell is eligible when its column is neither a corner column nor one step
/// inward from one, or when the same holds for its row. Corners and the cells
/// directly next to them along either edge are therefore never eligible.
pub fn outside_corner_zone(x: u32, y: u32, dimensions: MapDimensions) -> bool {
    let clear = |v: u32, len: u32| {
        let (v, len) = (i64::from(v), i64::from(len));
        v != 0 && v != len - 1 && v != 1 && v != len - 2
    };
    clear(x, dimensions.width) || clear(y, dimensions.height)
}

// ---------------------------------------------------------------------------
// LevelGenerator
// ---------------------------------------------------------------------------

/// Decides and requests the actors of a generation pass.
///
/// Generic over the RNG so tests can drive the box roll with a fixed
/// sequence; the level map uses a seeded [`Pcg64`].
#[derive(Debug, Clone)]
pub struct LevelGenerator<R = Pcg64> {
    rng: R,
    box_chance: u8,
    players_number: u32,
}

impl LevelGenerator<Pcg64> {
    /// Generator seeded with `seed`, or from entropy when `None`.
    pub fn seeded(seed: Option<u64>, box_chance: u8, players_number: u32) -> Self {
        let seed = seed.unwrap_or_else(rand::random::<u64>);
        Self::with_rng(Pcg64::seed_from_u64(seed), box_chance, players_number)
    }

    /// Restart the RNG from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Pcg64::seed_from_u64(seed);
    }
}

impl<R: Rng> LevelGenerator<R> {
    pub fn with_rng(rng: R, box_chance: u8, players_number: u32) -> Self {
        Self {
            rng,
            box_chance: box_chance.min(100),
            players_number,
        }
    }

    pub fn box_chance(&self) -> u8 {
        self.box_chance
    }

    pub fn players_number(&self) -> u32 {
        self.players_number
    }

    pub fn set_box_chance(&mut self, box_chance: u8) {
        self.box_chance = box_chance.min(100);
    }

    pub fn set_players_number(&mut self, players_number: u32) {
        self.players_number = players_number;
    }

    /// Kind for the cell at `(x, y)`, given how many players this pass has
    /// already placed. Draws one box roll only when neither the wall nor the
    /// player rule applies.
    pub fn decide(
        &mut self,
        x: u32,
        y: u32,
        dimensions: MapDimensions,
        players_placed: u32,
    ) -> ActorType {
        if x % 2 == 1 && y % 2 == 1 {
            return ActorType::Wall;
        }
        if dimensions.is_corner(x, y) && players_placed < self.players_number {
            return ActorType::Player;
        }
        let roll: u32 = self.rng.gen_range(0..100);
        if roll < u32::from(self.box_chance) && outside_corner_zone(x, y, dimensions) {
            return ActorType::Box;
        }
        ActorType::None
    }

    /// Run the placement half of a pass over an already built lattice.
    ///
    /// `grid` must hold the lattice produced by [`lattice_cells`] for the same
    /// `dimensions`. Spawned actors are registered by the host, never here.
    pub fn populate<H: ActorHost>(
        &mut self,
        dimensions: MapDimensions,
        yaw: f32,
        grid: &mut GridRegistry,
        catalog: &ActorTypeCatalog,
        host: &mut H,
    ) -> Result<GenerationReport, LevelError> {
        if grid.len() != dimensions.cell_count() {
            return Err(LevelError::LatticeMismatch {
                expected: dimensions.cell_count(),
                actual: grid.len(),
            });
        }

        let cell_size = grid.cell_size();
        let mut entries = Vec::with_capacity(dimensions.cell_count());
        let mut spawned = Vec::new();
        let mut players_placed = 0u32;

        for y in 0..dimensions.height {
            for x in 0..dimensions.width {
                let index = dimensions.index(x, y);
                let Some(cell) = grid.cell_at(index) else {
                    return Err(LevelError::LatticeMismatch {
                        expected: dimensions.cell_count(),
                        actual: index,
                    });
                };

                if let Some(existing) = grid.occupant_at(cell) {
                    if host.is_live(existing.actor) {
                        tracing::debug!(%cell, actor = %existing.actor, "cell already occupied");
                        entries.push(LayoutEntry::new(
                            x,
                            y,
                            cell,
                            existing.kind,
                            PlacementOutcome::Occupied,
                        ));
                        continue;
                    }
                    let _ = grid.remove(existing.actor);
                    tracing::debug!(%cell, actor = %existing.actor, "stale occupant dropped");
                }

                let kind = self.decide(x, y, dimensions, players_placed);
                if kind == ActorType::Player {
                    players_placed += 1;
                }
                tracing::trace!(x, y, %cell, %kind, "placement decided");

                let outcome = match kind {
                    ActorType::None => PlacementOutcome::Empty,
                    _ => match catalog.class_for(kind) {
                        None => {
                            tracing::debug!(%kind, "no spawn class registered");
                            PlacementOutcome::Declined
                        }
                        Some(class) => {
                            let request = SpawnRequest {
                                kind,
                                class,
                                cell,
                                location: cell.location(cell_size) + Vec3::Z * SPAWN_HEIGHT,
                                yaw,
                            };
                            match host.spawn(&request, grid) {
                                Some(actor) => {
                                    spawned.push(actor);
                                    PlacementOutcome::Spawned
                                }
                                None => {
                                    tracing::debug!(%cell, %kind, "spawn declined");
                                    PlacementOutcome::Declined
                                }
                            }
                        }
                    },
                };
                entries.push(LayoutEntry::new(x, y, cell, kind, outcome));
            }
        }

        let layout = LevelLayout::new(dimensions, entries)?;
        Ok(GenerationReport::new(layout, spawned))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
