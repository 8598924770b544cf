//! Bomber Level -- procedural arena generation on top of `bomber-grid`.
//!
//! A [`LevelMap`] owns the grid of one arena. On every generation pass it
//! resolves odd dimensions from the map scale, lays out a lattice of cells
//! centred on the map and rotated with it, then walks the lattice row by row
//! deciding walls, player spawns and boxes. Actor lifetimes stay with an
//! [`ActorHost`]; the map only asks it to spawn, destroy and re-attach.
//!
//! # Quick Start
//!
//! ```
//! use bomber_level::prelude::*;
//!
//! let config = LevelConfig { seed: Some(42), ..LevelConfig::default() };
//! let mut map = LevelMap::new(config, MapTransform::default()).unwrap();
//! let mut world = ActorWorld::new(map.catalog().clone());
//!
//! let report = map.generate(&mut world).unwrap();
//! assert_eq!(map.grid().len(), 25);
//! assert_eq!(report.layout.decided(ActorType::Wall), 4);
//! assert_eq!(map.characters(&world).count(), 4);
//! ```
//!
//! [`LevelMap`]: level_map::LevelMap
//! [`ActorHost`]: host::ActorHost

#![deny(unsafe_code)]

pub mod actor_world;
pub mod config;
pub mod generator;
pub mod host;
pub mod layout;
pub mod level_map;
pub mod map_component;

pub use bomber_grid;

use bomber_grid::GridError;
use glam::Vec3;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while configuring or generating a level.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// The map scale does not resolve to at least one cell per axis.
    #[error("map scale {scale} does not describe a playable lattice")]
    DegenerateScale { scale: Vec3 },

    /// The registry lattice does not match the dimensions of the pass.
    #[error("lattice holds {actual} cells, expected {expected}")]
    LatticeMismatch { expected: usize, actual: usize },

    /// A configuration value is out of range.
    #[error("invalid level configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization failed.
    #[error("json error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A grid operation failed.
    #[error(transparent)]
    Grid(#[from] GridError),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use bomber_grid::prelude::*;

    pub use crate::actor_world::{ActorRecord, ActorWorld};
    pub use crate::config::{LevelConfig, DEFAULT_BOX_CHANCE, DEFAULT_PLAYERS_NUMBER};
    pub use crate::generator::{LevelGenerator, MapDimensions};
    pub use crate::host::{ActorHost, MapTransform, SpawnRequest, SPAWN_HEIGHT};
    pub use crate::layout::{GenerationReport, LayoutEntry, LevelLayout, PlacementOutcome};
    pub use crate::level_map::{LevelMap, PathType};
    pub use crate::map_component::{ActorData, MapComponent};
    pub use crate::LevelError;
}
