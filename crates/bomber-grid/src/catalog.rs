//! Association between actor kinds and the spawn classes that realise them.
//!
//! The catalog is filled once from configuration and read during generation
//! to decide what to ask the host to spawn. Lookups work in both directions;
//! an unknown class maps back to [`ActorType::None`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actor_type::ActorType;
use crate::GridError;

// ---------------------------------------------------------------------------
// ActorClass
// ---------------------------------------------------------------------------

/// Opaque name of a spawnable class (an asset path, a prefab key, ...).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorClass(String);

impl ActorClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ActorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorClass({})", self.0)
    }
}

impl fmt::Display for ActorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// ActorTypeCatalog
// ---------------------------------------------------------------------------

/// Bidirectional kind <-> class table.
///
/// Each kind maps to exactly one class and each class to exactly one kind.
/// Re-registering a kind replaces its class; re-registering a class under a
/// new kind moves it.
#[derive(Debug, Clone, Default)]
pub struct ActorTypeCatalog {
    by_type: HashMap<ActorType, ActorClass>,
    by_class: HashMap<ActorClass, ActorType>,
}

impl ActorTypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from `(kind, class)` pairs. Later pairs win.
    pub fn from_table<I>(table: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = (ActorType, ActorClass)>,
    {
        let mut catalog = Self::new();
        for (kind, class) in table {
            let _ = catalog.register(kind, class)?;
        }
        Ok(catalog)
    }

    /// Associate `kind` with `class`, returning the class it replaced.
    ///
    /// # Errors
    ///
    /// [`GridError::NoneKind`] if `kind` is [`ActorType::None`].
    pub fn register(
        &mut self,
        kind: ActorType,
        class: ActorClass,
    ) -> Result<Option<ActorClass>, GridError> {
        if kind == ActorType::None {
            return Err(GridError::NoneKind { class });
        }
        if let Some(previous_kind) = self.by_class.get(&class).copied() {
            if previous_kind != kind {
                self.by_type.remove(&previous_kind);
            }
        }
        let replaced = self.by_type.insert(kind, class.clone());
        if let Some(old) = &replaced {
            self.by_class.remove(old);
        }
        self.by_class.insert(class, kind);
        Ok(replaced)
    }

    /// Class registered for `kind`, if any.
    pub fn class_for(&self, kind: ActorType) -> Option<&ActorClass> {
        self.by_type.get(&kind)
    }

    /// Kind registered for `class`; [`ActorType::None`] when unknown.
    pub fn kind_of(&self, class: &ActorClass) -> ActorType {
        self.by_class.get(class).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// All registrations, sorted by kind.
    pub fn entries(&self) -> Vec<(ActorType, &ActorClass)> {
        let mut entries: Vec<_> = self.by_type.iter().map(|(k, c)| (*k, c)).collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str) -> ActorClass {
        ActorClass::new(name)
    }

    #[test]
    fn lookup_both_ways() {
        let catalog = ActorTypeCatalog::from_table([
            (ActorType::Wall, class("/Game/Wall")),
            (ActorType::Box, class("/Game/Box")),
        ])
        .unwrap();
        assert_eq!(catalog.class_for(ActorType::Wall), Some(&class("/Game/Wall")));
        assert_eq!(catalog.kind_of(&class("/Game/Box")), ActorType::Box);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn unknown_class_is_none_kind() {
        let catalog = ActorTypeCatalog::new();
        assert_eq!(catalog.kind_of(&class("/Game/Nothing")), ActorType::None);
        assert_eq!(catalog.class_for(ActorType::Player), None);
    }

    #[test]
    fn reregistering_kind_overwrites() {
        let mut catalog = ActorTypeCatalog::new();
        catalog.register(ActorType::Box, class("old")).unwrap();
        let replaced = catalog.register(ActorType::Box, class("new")).unwrap();
        assert_eq!(replaced, Some(class("old")));
        assert_eq!(catalog.class_for(ActorType::Box), Some(&class("new")));
        assert_eq!(catalog.kind_of(&class("old")), ActorType::None);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn reregistering_class_moves_it() {
        let mut catalog = ActorTypeCatalog::new();
        catalog.register(ActorType::Bomb, class("shared")).unwrap();
        catalog.register(ActorType::Item, class("shared")).unwrap();
        assert_eq!(catalog.class_for(ActorType::Bomb), None);
        assert_eq!(catalog.kind_of(&class("shared")), ActorType::Item);
    }

    #[test]
    fn none_kind_is_rejected() {
        let mut catalog = ActorTypeCatalog::new();
        let err = catalog.register(ActorType::None, class("ghost")).unwrap_err();
        assert!(matches!(err, GridError::NoneKind { .. }));
        assert!(catalog.is_empty());
    }

    #[test]
    fn entries_are_sorted_by_kind() {
        let catalog = ActorTypeCatalog::from_table([
            (ActorType::Player, class("p")),
            (ActorType::Wall, class("w")),
        ])
        .unwrap();
        let kinds: Vec<_> = catalog.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![ActorType::Wall, ActorType::Player]);
    }
}
