//! Entity types for the duel.
//!
//! The set of things a projectile can hit is closed and small, so entities
//! are tagged variants rather than trait objects:
//! - [`EntityId`]: Unique identifier, ordered for deterministic iteration
//! - [`EntityTag`]: Which kind of entity this is
//! - [`EntityInner`]: Type-safe storage for the variant's state
//! - [`Capabilities`]: What the collision resolver may do with the entity
//!
//! # Example
//!
//! ```
//! use salvo_core::entity::{Entity, EntityId, EntityInner, EntityTag};
//! use salvo_core::combatant::Combatant;
//! use glam::Vec2;
//!
//! let player = Entity::new(
//!     EntityId::new(0),
//!     EntityInner::Combatant(Combatant::new(Vec2::new(30.0, 33.0), 2, 30, 60)),
//! );
//!
//! assert_eq!(player.tag(), EntityTag::Combatant);
//! assert!(player.as_combatant().is_some());
//! ```

pub mod components;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::combatant::Combatant;
use crate::grid::DestructibleGrid;

pub use components::StructureComponents;

/// Unique identifier for an entity.
///
/// Entity IDs are assigned monotonically by the
/// [`EntityRegistry`](crate::registry::EntityRegistry) and ordered by value,
/// which fixes the order in which the resolver visits entities.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Entity kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// Destructible building owned by a combatant
    Structure,
    /// Player-controlled combatant
    Combatant,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure => write!(f, "Structure"),
            Self::Combatant => write!(f, "Combatant"),
        }
    }
}

bitflags! {
    /// What the simulation may do with an entity.
    ///
    /// Registered once when the entity is spawned and never changed.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Capabilities: u8 {
        /// Projectiles test for overlap against this entity.
        const COLLIDABLE = 1 << 0;
        /// Overlaps may damage this entity.
        const DAMAGEABLE = 1 << 1;
        /// The entity has per-frame state a renderer should refresh.
        const UPDATABLE = 1 << 2;
    }
}

impl Capabilities {
    /// Default capabilities of a structure: collidable, damageable, updatable.
    pub const STRUCTURE: Self = Self::all();
    /// Default capabilities of a combatant: collidable and damageable.
    pub const COMBATANT: Self = Self::COLLIDABLE.union(Self::DAMAGEABLE);
}

/// Type-safe storage for entity state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Structure state (owner and cell grid)
    Structure(StructureComponents),
    /// Combatant state (life, score, footprint)
    Combatant(Combatant),
}

impl EntityInner {
    /// Returns the tag matching this variant.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Structure(_) => EntityTag::Structure,
            Self::Combatant(_) => EntityTag::Combatant,
        }
    }
}

/// An entity in the duel: an id plus variant state.
///
/// Unlike a free-standing tag, the tag here is always derived from
/// [`EntityInner`], so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    inner: EntityInner,
}

impl Entity {
    /// Creates a new entity.
    #[must_use]
    pub const fn new(id: EntityId, inner: EntityInner) -> Self {
        Self { id, inner }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's type tag.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.inner.tag()
    }

    /// Returns a reference to the variant state.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Returns the structure components if this is a structure.
    #[must_use]
    pub const fn as_structure(&self) -> Option<&StructureComponents> {
        match &self.inner {
            EntityInner::Structure(s) => Some(s),
            EntityInner::Combatant(_) => None,
        }
    }

    /// Returns mutable structure components if this is a structure.
    #[must_use]
    pub fn as_structure_mut(&mut self) -> Option<&mut StructureComponents> {
        match &mut self.inner {
            EntityInner::Structure(s) => Some(s),
            EntityInner::Combatant(_) => None,
        }
    }

    /// Returns the combatant if this is a combatant.
    #[must_use]
    pub const fn as_combatant(&self) -> Option<&Combatant> {
        match &self.inner {
            EntityInner::Combatant(c) => Some(c),
            EntityInner::Structure(_) => None,
        }
    }

    /// Returns the mutable combatant if this is a combatant.
    #[must_use]
    pub fn as_combatant_mut(&mut self) -> Option<&mut Combatant> {
        match &mut self.inner {
            EntityInner::Combatant(c) => Some(c),
            EntityInner::Structure(_) => None,
        }
    }

    /// Shortcut to the structure's grid.
    #[must_use]
    pub fn grid(&self) -> Option<&DestructibleGrid> {
        self.as_structure().map(|s| &s.grid)
    }
}
