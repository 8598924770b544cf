//! The grid owner of one arena.
//!
//! [`LevelMap`] ties the pieces together: it holds the map transform, the
//! configuration, the [`GridRegistry`] and the [`LevelGenerator`], and runs
//! generation passes against an [`ActorHost`].
//!
//! A pass ([`LevelMap::generate`]) runs to completion synchronously:
//!
//! 1. Stale characters are pruned.
//! 2. The lattice is rebuilt from the (possibly overridden) map scale.
//! 3. The host re-attaches the actors it still owns, so hand-placed actors
//!    keep their cells and are never overwritten.
//! 4. The generator decides and requests actors cell by cell.
//!
//! The map remembers which actors its passes spawned; [`LevelMap::regenerate`]
//! destroys those first and then runs a fresh pass.

use std::collections::BTreeSet;

use bomber_grid::prelude::*;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::LevelConfig;
use crate::generator::{lattice_cells, LevelGenerator, MapDimensions};
use crate::host::{ActorHost, MapTransform};
use crate::layout::GenerationReport;
use crate::LevelError;

/// How [`LevelMap::side_cells`] treats occupied cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathType {
    /// Blast path: walls stop it, a box stops it after being included, other
    /// actors are passed through.
    #[default]
    Explosion,
    /// Walking path: any occupant stops it.
    Free,
}

/// Owner of the grid of one arena.
#[derive(Debug)]
pub struct LevelMap {
    config: LevelConfig,
    transform: MapTransform,
    registry: GridRegistry,
    catalog: ActorTypeCatalog,
    generator: LevelGenerator,
    dimensions: Option<MapDimensions>,
    /// Actors spawned by generation passes and not destroyed through the map.
    generated: BTreeSet<ActorId>,
}

impl LevelMap {
    /// Validate `config` and build an empty map. No lattice exists until the
    /// first pass.
    pub fn new(config: LevelConfig, transform: MapTransform) -> Result<Self, LevelError> {
        config.validate()?;
        let catalog = config.catalog()?;
        let registry = GridRegistry::new(config.cell_size)?;
        let generator =
            LevelGenerator::seeded(config.seed, config.box_chance, config.players_number);
        Ok(Self {
            config,
            transform,
            registry,
            catalog,
            generator,
            dimensions: None,
            generated: BTreeSet::new(),
        })
    }

    // -- accessors ----------------------------------------------------------

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn transform(&self) -> &MapTransform {
        &self.transform
    }

    /// Replace the map transform. Takes effect on the next pass.
    pub fn set_transform(&mut self, transform: MapTransform) {
        self.transform = transform;
    }

    pub fn catalog(&self) -> &ActorTypeCatalog {
        &self.catalog
    }

    pub fn grid(&self) -> &GridRegistry {
        &self.registry
    }

    /// Mutable grid access for hosts attaching actors outside a pass.
    pub fn grid_mut(&mut self) -> &mut GridRegistry {
        &mut self.registry
    }

    /// Dimensions of the last built lattice.
    pub fn dimensions(&self) -> Option<MapDimensions> {
        self.dimensions
    }

    /// Restart the box-roll sequence from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.generator.reseed(seed);
    }

    /// `true` if `actor` was spawned by a pass of this map.
    pub fn is_generated(&self, actor: ActorId) -> bool {
        self.generated.contains(&actor)
    }

    /// Generated actors in handle order.
    pub fn generated(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.generated.iter().copied()
    }

    // -- queries ------------------------------------------------------------

    pub fn occupant_at(&self, cell: Cell) -> Option<Occupant> {
        self.registry.occupant_at(cell)
    }

    /// Every lattice cell, row-major.
    pub fn cells(&self) -> impl ExactSizeIterator<Item = Cell> + '_ {
        self.registry.cells()
    }

    /// Live characters; stale ones are pruned first.
    pub fn characters<H: ActorHost>(
        &mut self,
        host: &H,
    ) -> std::iter::Copied<std::slice::Iter<'_, ActorId>> {
        self.registry.characters(|actor| host.is_live(actor))
    }

    /// See [`GridRegistry::cells_by_types`].
    pub fn cells_by_types<I>(
        &self,
        cells: I,
        kinds: ActorTypes,
        exclude: Option<ActorId>,
    ) -> Vec<Cell>
    where
        I: IntoIterator<Item = Cell>,
    {
        self.registry.cells_by_types(cells, kinds, exclude)
    }

    /// Cells reachable from `center` along the four grid axes, up to
    /// `side_length` steps each way.
    ///
    /// `center` comes first when it is on the lattice; an off-lattice center
    /// yields nothing. A direction ends at the lattice edge or where `path`
    /// says so.
    pub fn side_cells(&self, center: Cell, side_length: u32, path: PathType) -> Vec<Cell> {
        let mut cells = Vec::new();
        if !self.registry.contains_cell(center) {
            return cells;
        }
        cells.push(center);

        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let mut current = center;
            for _ in 0..side_length {
                let Some(next) = current.offset(dx, dy) else {
                    break;
                };
                if !self.registry.contains_cell(next) {
                    break;
                }
                match (path, self.registry.occupant_at(next).map(|o| o.kind)) {
                    (_, None) => cells.push(next),
                    (PathType::Free, Some(_)) => break,
                    (PathType::Explosion, Some(ActorType::Wall)) => break,
                    (PathType::Explosion, Some(ActorType::Box)) => {
                        cells.push(next);
                        break;
                    }
                    (PathType::Explosion, Some(_)) => cells.push(next),
                }
                current = next;
            }
        }
        cells
    }

    // -- generation ---------------------------------------------------------

    /// Rebuild the lattice from the current transform.
    ///
    /// A non-zero `map_scale` in the configuration replaces the transform's
    /// scale first. The transform is then aligned to the grid and its scale
    /// set to the resolved odd dimensions. Every occupant is dropped.
    pub fn rebuild_lattice(&mut self) -> Result<MapDimensions, LevelError> {
        if let Some(scale) = self.config.map_scale {
            if scale != Vec3::ZERO && scale != self.transform.scale {
                tracing::debug!(from = %self.transform.scale, to = %scale, "map scale overridden");
                self.transform.scale = scale;
            }
        }

        let cell_size = self.registry.cell_size();
        let dimensions = MapDimensions::from_scale(self.transform.scale)?;
        let transform = MapTransform {
            scale: dimensions.to_scale(),
            ..self.transform.aligned(cell_size)
        };
        let cells = lattice_cells(&transform, dimensions, cell_size);
        let count = self.registry.rebuild_lattice(cells)?;

        self.transform = transform;
        self.dimensions = Some(dimensions);
        tracing::info!(
            width = dimensions.width,
            height = dimensions.height,
            cells = count,
            "lattice rebuilt"
        );
        Ok(dimensions)
    }

    /// Run one generation pass. Actors the host still owns keep their cells.
    pub fn generate<H: ActorHost>(&mut self, host: &mut H) -> Result<GenerationReport, LevelError> {
        let mut pruned = self.registry.prune_stale_characters(|actor| host.is_live(actor));
        let dimensions = self.rebuild_lattice()?;

        host.reattach_all(&mut self.registry);
        pruned += self.registry.prune_stale_characters(|actor| host.is_live(actor));
        self.generated.retain(|actor| host.is_live(*actor));

        let mut report = self.generator.populate(
            dimensions,
            self.transform.yaw,
            &mut self.registry,
            &self.catalog,
            host,
        )?;
        report.pruned_characters = pruned;
        self.generated.extend(report.spawned.iter().copied());

        tracing::info!(
            spawned = report.spawned_count(),
            declined = report.declined_count(),
            skipped = report.skipped_count(),
            hash = %report.layout.hash,
            "level generated"
        );
        Ok(report)
    }

    /// Destroy the actors of earlier passes, then run a fresh pass.
    pub fn regenerate<H: ActorHost>(
        &mut self,
        host: &mut H,
    ) -> Result<GenerationReport, LevelError> {
        let _ = self.destroy_attached(host, true);
        self.generate(host)
    }

    // -- teardown -----------------------------------------------------------

    /// Destroy the occupants of `cells`. Returns how many the host destroyed.
    pub fn destroy_actors_at<H, I>(&mut self, cells: I, host: &mut H) -> usize
    where
        H: ActorHost,
        I: IntoIterator<Item = Cell>,
    {
        let mut destroyed = 0;
        for cell in cells {
            let Some(actor) = self.registry.actor_at(cell) else {
                continue;
            };
            if host.destroy(actor, &mut self.registry) {
                destroyed += 1;
            }
            let _ = self.registry.remove(actor);
            let _ = self.generated.remove(&actor);
        }
        tracing::debug!(destroyed, "actors destroyed from map");
        destroyed
    }

    /// Destroy every registered occupant, or only the actors spawned by
    /// generation when `generated_only` is set. Returns how many the host
    /// destroyed.
    pub fn destroy_attached<H: ActorHost>(&mut self, host: &mut H, generated_only: bool) -> usize {
        let mut targets: BTreeSet<ActorId> = self.generated.clone();
        if !generated_only {
            targets.extend(self.registry.occupants().map(|(_, occupant)| occupant.actor));
        }

        let mut destroyed = 0;
        for actor in targets {
            if host.destroy(actor, &mut self.registry) {
                destroyed += 1;
            }
            let _ = self.registry.remove(actor);
        }
        self.generated.clear();
        tracing::debug!(destroyed, generated_only, "attached actors destroyed");
        destroyed
    }
}
