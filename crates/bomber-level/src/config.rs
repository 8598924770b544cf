//! Level configuration.
//!
//! [`LevelConfig`] carries the persisted settings a generation pass reads but
//! does not own: grid pitch, box density, player capacity, an optional map
//! scale override, the RNG seed and the kind -> spawn-class table. It is
//! usually loaded from JSON:
//!
//! ```
//! use bomber_level::config::LevelConfig;
//!
//! let json = r#"{ "box_chance": 30, "players_number": 2 }"#;
//! let config = LevelConfig::from_json_str(json).unwrap();
//! assert_eq!(config.box_chance, 30);
//! assert_eq!(config.cell_size, 200.0); // default
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use bomber_grid::prelude::*;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::LevelError;

/// Default percent chance of a box on an eligible cell.
pub const DEFAULT_BOX_CHANCE: u8 = 50;

/// Default number of player spawn slots.
pub const DEFAULT_PLAYERS_NUMBER: u32 = 4;

/// Settings consumed by a generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Grid pitch in world units. Must be positive and finite.
    pub cell_size: f32,
    /// Percent chance, in `[0, 100]`, that an eligible cell receives a box.
    pub box_chance: u8,
    /// Maximum number of players placed on corners per pass.
    pub players_number: u32,
    /// Persisted map scale. When present, non-zero and different from the
    /// map's current scale it replaces that scale before the lattice is built.
    pub map_scale: Option<Vec3>,
    /// Seed for the generator RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Spawn class for each actor kind.
    pub actor_classes: BTreeMap<ActorType, String>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        let actor_classes = ActorType::ALL
            .iter()
            .map(|kind| (*kind, format!("/Game/Bomber/Assets/{}", class_stem(*kind))))
            .collect();
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            box_chance: DEFAULT_BOX_CHANCE,
            players_number: DEFAULT_PLAYERS_NUMBER,
            map_scale: None,
            seed: None,
            actor_classes,
        }
    }
}

fn class_stem(kind: ActorType) -> &'static str {
    match kind {
        ActorType::None => "None",
        ActorType::Wall => "WallBlueprint",
        ActorType::Box => "BoxBlueprint",
        ActorType::Player => "PlayerCharacter",
        ActorType::Bomb => "BombBlueprint",
        ActorType::Item => "ItemBlueprint",
    }
}

impl LevelConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        let config: LevelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), LevelError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(LevelError::InvalidConfig(format!(
                "cell_size must be finite and positive, got {}",
                self.cell_size
            )));
        }
        if self.box_chance > 100 {
            return Err(LevelError::InvalidConfig(format!(
                "box_chance is a percentage, got {}",
                self.box_chance
            )));
        }
        if let Some(scale) = self.map_scale {
            if !scale.is_finite() {
                return Err(LevelError::InvalidConfig(format!(
                    "map_scale must be finite, got {scale}"
                )));
            }
        }
        if self.actor_classes.contains_key(&ActorType::None) {
            return Err(LevelError::InvalidConfig(
                "actor_classes cannot contain the 'none' kind".to_owned(),
            ));
        }
        Ok(())
    }

    /// Build the kind <-> class catalog from `actor_classes`.
    pub fn catalog(&self) -> Result<ActorTypeCatalog, LevelError> {
        let table = self
            .actor_classes
            .iter()
            .map(|(kind, class)| (*kind, ActorClass::new(class.as_str())));
        Ok(ActorTypeCatalog::from_table(table)?)
    }
}
