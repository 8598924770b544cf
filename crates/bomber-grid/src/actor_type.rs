//! Level actor kinds and kind bitmasks.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ActorType
// ---------------------------------------------------------------------------

/// Abstract category of a level actor. Drives spawn-class selection and
/// placement rules.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    /// No actor; an empty cell.
    #[default]
    None,
    /// Indestructible lattice wall.
    Wall,
    /// Destructible box.
    Box,
    /// Playable character.
    Player,
    /// Placed bomb.
    Bomb,
    /// Pick-up item.
    Item,
}

impl ActorType {
    /// Every kind except [`ActorType::None`].
    pub const ALL: [ActorType; 5] = [
        ActorType::Wall,
        ActorType::Box,
        ActorType::Player,
        ActorType::Bomb,
        ActorType::Item,
    ];

    /// Characters are tracked in the registry's side index.
    pub fn is_character(self) -> bool {
        matches!(self, ActorType::Player)
    }

    /// Single-bit mask for this kind (empty for `None`).
    pub fn mask(self) -> ActorTypes {
        match self {
            ActorType::None => ActorTypes::NONE,
            ActorType::Wall => ActorTypes::WALL,
            ActorType::Box => ActorTypes::BOX,
            ActorType::Player => ActorTypes::PLAYER,
            ActorType::Bomb => ActorTypes::BOMB,
            ActorType::Item => ActorTypes::ITEM,
        }
    }
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActorType::None => "none",
            ActorType::Wall => "wall",
            ActorType::Box => "box",
            ActorType::Player => "player",
            ActorType::Bomb => "bomb",
            ActorType::Item => "item",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// ActorTypes
// ---------------------------------------------------------------------------

/// Set of [`ActorType`]s packed into a bitmask.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorTypes(u8);

impl ActorTypes {
    /// Empty set.
    pub const NONE: ActorTypes = ActorTypes(0);
    pub const WALL: ActorTypes = ActorTypes(1 << 0);
    pub const BOX: ActorTypes = ActorTypes(1 << 1);
    pub const PLAYER: ActorTypes = ActorTypes(1 << 2);
    pub const BOMB: ActorTypes = ActorTypes(1 << 3);
    pub const ITEM: ActorTypes = ActorTypes(1 << 4);
    /// Every kind.
    pub const ALL: ActorTypes = ActorTypes(0b1_1111);

    /// Raw bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, dropping unknown ones.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// `true` if `kind` is in the set. `None` is never contained.
    pub fn contains(self, kind: ActorType) -> bool {
        self.intersects(kind.mask())
    }

    /// `true` if the two sets share at least one kind.
    pub fn intersects(self, other: ActorTypes) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<ActorType> for ActorTypes {
    fn from(kind: ActorType) -> Self {
        kind.mask()
    }
}

impl BitOr for ActorTypes {
    type Output = ActorTypes;

    fn bitor(self, rhs: ActorTypes) -> ActorTypes {
        ActorTypes(self.0 | rhs.0)
    }
}

impl BitOr<ActorType> for ActorTypes {
    type Output = ActorTypes;

    fn bitor(self, rhs: ActorType) -> ActorTypes {
        self | rhs.mask()
    }
}

impl BitOrAssign for ActorTypes {
    fn bitor_assign(&mut self, rhs: ActorTypes) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ActorTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(ActorType::ALL.iter().filter(|k| self.contains(**k)))
            .finish()
    }
}
