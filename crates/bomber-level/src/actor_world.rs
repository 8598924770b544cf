//! In-memory [`ActorHost`].
//!
//! [`ActorWorld`] owns a set of level actors: their handles, classes, world
//! locations and attachment records. It is what the demo program and the
//! tests generate into, and a template for wiring the level map to a real
//! engine: spawning allocates a handle, builds a [`MapComponent`] and attaches
//! it; destroying detaches and releases.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use bomber_grid::prelude::*;
use glam::Vec3;

use crate::host::{ActorHost, SpawnRequest};
use crate::map_component::{ActorData, MapComponent};

/// One actor owned by an [`ActorWorld`].
#[derive(Debug, Clone)]
pub struct ActorRecord {
    pub class: ActorClass,
    pub location: Vec3,
    pub yaw: f32,
    pub component: MapComponent,
}

/// Actor storage implementing [`ActorHost`].
#[derive(Debug, Default)]
pub struct ActorWorld {
    catalog: ActorTypeCatalog,
    allocator: ActorAllocator,
    /// Keyed by handle; `BTreeMap` keeps re-attachment order stable.
    actors: BTreeMap<ActorId, ActorRecord>,
    data: HashMap<ActorType, Arc<ActorData>>,
    declined: HashSet<ActorType>,
}

impl ActorWorld {
    /// World that spawns the classes known to `catalog`.
    pub fn new(catalog: ActorTypeCatalog) -> Self {
        let data = catalog
            .entries()
            .into_iter()
            .map(|(kind, class)| {
                let data = ActorData {
                    kind,
                    class: class.clone(),
                };
                (kind, Arc::new(data))
            })
            .collect();
        Self {
            catalog,
            data,
            ..Self::default()
        }
    }

    /// Make every future spawn of `kind` decline.
    pub fn decline(&mut self, kind: ActorType) {
        let _ = self.declined.insert(kind);
    }

    /// Place an actor by hand (the "dragged" path) and attach it.
    ///
    /// Returns `None` if `kind` has no class in the catalog. The actor is
    /// created even when its location lies outside the lattice; it just stays
    /// off the grid.
    pub fn place(
        &mut self,
        kind: ActorType,
        location: Vec3,
        grid: &mut GridRegistry,
    ) -> Option<ActorId> {
        let class = self.catalog.class_for(kind)?.clone();
        Some(self.create(kind, class, location, 0.0, true, grid))
    }

    /// Move an actor and re-resolve its cell.
    pub fn move_to(&mut self, actor: ActorId, location: Vec3, grid: &mut GridRegistry) -> bool {
        match self.actors.get_mut(&actor) {
            Some(record) => {
                record.location = location;
                record.component.refresh(location, grid)
            }
            None => false,
        }
    }

    /// Destroy an actor without telling the grid, the way editor-time deletes
    /// bypass the registry. The grid keeps a stale handle until it prunes.
    pub fn destroy_untracked(&mut self, actor: ActorId) -> bool {
        if self.actors.remove(&actor).is_none() {
            return false;
        }
        self.allocator.release(actor)
    }

    pub fn get(&self, actor: ActorId) -> Option<&ActorRecord> {
        self.actors.get(&actor)
    }

    /// Kind of a live actor, [`ActorType::None`] otherwise.
    pub fn kind_of(&self, actor: ActorId) -> ActorType {
        self.actors
            .get(&actor)
            .map(|r| self.catalog.kind_of(&r.class))
            .unwrap_or_default()
    }

    /// `true` if `actor` is live and of a kind in `kinds`.
    pub fn is_of_types(&self, actor: ActorId, kinds: ActorTypes) -> bool {
        kinds.contains(self.kind_of(actor))
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Live actors in handle order.
    pub fn actors(&self) -> impl Iterator<Item = (ActorId, &ActorRecord)> + '_ {
        self.actors.iter().map(|(id, r)| (*id, r))
    }

    fn create(
        &mut self,
        kind: ActorType,
        class: ActorClass,
        location: Vec3,
        yaw: f32,
        is_dragged: bool,
        grid: &mut GridRegistry,
    ) -> ActorId {
        let id = self.allocator.allocate();
        let mut component = MapComponent::new(id, kind, is_dragged);
        if let Some(data) = self.data.get(&kind) {
            component = component.with_data(Arc::clone(data));
        }
        let _ = component.attach(location, grid);
        let _ = self.actors.insert(
            id,
            ActorRecord {
                class,
                location,
                yaw,
                component,
            },
        );
        id
    }
}

impl ActorHost for ActorWorld {
    fn spawn(&mut self, request: &SpawnRequest<'_>, grid: &mut GridRegistry) -> Option<ActorId> {
        let kind = self.catalog.kind_of(request.class);
        if kind == ActorType::None || self.declined.contains(&kind) {
            return None;
        }
        Some(self.create(kind, request.class.clone(), request.location, request.yaw, false, grid))
    }

    fn is_live(&self, actor: ActorId) -> bool {
        self.allocator.is_live(actor)
    }

    fn destroy(&mut self, actor: ActorId, grid: &mut GridRegistry) -> bool {
        match self.actors.remove(&actor) {
            Some(mut record) => {
                record.component.detach(grid);
                self.allocator.release(actor)
            }
            None => false,
        }
    }

    fn reattach_all(&mut self, grid: &mut GridRegistry) {
        for record in self.actors.values_mut() {
            let _ = record.component.attach(record.location, grid);
        }
    }
}
