//! Entity registry owned by a single match.
//!
//! The registry stores every structure and combatant of a duel together with
//! three capability sets (collidable, damageable, updatable). It replaces
//! process-wide entity lists: each [`Duel`](crate::duel::Duel) owns one
//! registry and passes it explicitly to the code that queries it, so several
//! matches can run side by side.
//!
//! # Invariants
//!
//! - Entities are only ever added; the registry has no removal API.
//! - Capability sets are written once, at spawn time.
//! - Iteration is in ascending [`EntityId`] order (`BTreeMap`/`BTreeSet`),
//!   which is spawn order.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;
use crate::entity::{Capabilities, Entity, EntityId, EntityInner, StructureComponents};
use crate::grid::DestructibleGrid;

/// Append-only storage of duel entities and their capabilities.
///
/// # Example
///
/// ```
/// use salvo_core::registry::EntityRegistry;
/// use salvo_core::combatant::Combatant;
/// use salvo_core::grid::DestructibleGrid;
/// use glam::{IVec2, Vec2};
///
/// let mut registry = EntityRegistry::new();
/// let player = registry.spawn_combatant(Combatant::new(Vec2::new(30.0, 33.0), 2, 30, 60));
/// let tower = registry.spawn_structure(player, DestructibleGrid::new(IVec2::new(43, 31), 5, 5));
///
/// let ids: Vec<_> = registry.collidables().collect();
/// assert_eq!(ids, vec![player, tower]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityRegistry {
    next_id: u64,
    entities: BTreeMap<EntityId, Entity>,
    collidable: BTreeSet<EntityId>,
    damageable: BTreeSet<EntityId>,
    updatable: BTreeSet<EntityId>,
}

impl EntityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity with explicit capabilities and returns its id.
    pub fn spawn(&mut self, inner: EntityInner, capabilities: Capabilities) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;

        if capabilities.contains(Capabilities::COLLIDABLE) {
            self.collidable.insert(id);
        }
        if capabilities.contains(Capabilities::DAMAGEABLE) {
            self.damageable.insert(id);
        }
        if capabilities.contains(Capabilities::UPDATABLE) {
            self.updatable.insert(id);
        }

        self.entities.insert(id, Entity::new(id, inner));
        id
    }

    /// Adds a combatant with [`Capabilities::COMBATANT`].
    pub fn spawn_combatant(&mut self, combatant: Combatant) -> EntityId {
        self.spawn(EntityInner::Combatant(combatant), Capabilities::COMBATANT)
    }

    /// Adds a structure owned by `owner` with [`Capabilities::STRUCTURE`].
    pub fn spawn_structure(&mut self, owner: EntityId, grid: DestructibleGrid) -> EntityId {
        self.spawn(
            EntityInner::Structure(StructureComponents::new(owner, grid)),
            Capabilities::STRUCTURE,
        )
    }

    /// Returns a reference to an entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by id.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns the combatant with `id`, if it is one.
    #[must_use]
    pub fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        self.get(id).and_then(Entity::as_combatant)
    }

    /// Returns the mutable combatant with `id`, if it is one.
    #[must_use]
    pub fn combatant_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.get_mut(id).and_then(Entity::as_combatant_mut)
    }

    /// Returns the structure with `id`, if it is one.
    #[must_use]
    pub fn structure(&self, id: EntityId) -> Option<&StructureComponents> {
        self.get(id).and_then(Entity::as_structure)
    }

    /// Returns the mutable structure with `id`, if it is one.
    #[must_use]
    pub fn structure_mut(&mut self, id: EntityId) -> Option<&mut StructureComponents> {
        self.get_mut(id).and_then(Entity::as_structure_mut)
    }

    /// Iterates over collidable entity ids in ascending order.
    pub fn collidables(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.collidable.iter().copied()
    }

    /// Iterates over updatable entity ids in ascending order.
    pub fn updatables(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.updatable.iter().copied()
    }

    /// Returns `true` if the entity was registered as collidable.
    #[must_use]
    pub fn is_collidable(&self, id: EntityId) -> bool {
        self.collidable.contains(&id)
    }

    /// Returns `true` if the entity was registered as damageable.
    #[must_use]
    pub fn is_damageable(&self, id: EntityId) -> bool {
        self.damageable.contains(&id)
    }

    /// Returns `true` if the entity was registered as updatable.
    #[must_use]
    pub fn is_updatable(&self, id: EntityId) -> bool {
        self.updatable.contains(&id)
    }

    /// Capabilities the entity was registered with.
    #[must_use]
    pub fn capabilities(&self, id: EntityId) -> Capabilities {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::COLLIDABLE, self.is_collidable(id));
        caps.set(Capabilities::DAMAGEABLE, self.is_damageable(id));
        caps.set(Capabilities::UPDATABLE, self.is_updatable(id));
        caps
    }

    /// Iterates over all entities in ascending id order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if nothing has been spawned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
