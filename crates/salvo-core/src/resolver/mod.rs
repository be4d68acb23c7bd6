//! Collision resolution for the in-flight projectile.
//!
//! The resolver runs once after every [`Projectile::step`](crate::projectile::Projectile::step).
//! It classifies the projectile's position against the registry, applies the
//! consequences (cell destruction, damage, healing, score) and reports what
//! happened as a [`Resolution`].
//!
//! # Processing Order
//!
//! 1. Structures, in ascending id order. The first damageable structure whose
//!    intact cells contain the projectile wins.
//! 2. Combatants, in ascending id order.
//! 3. Ground level.
//!
//! A projectile overlapping a structure and a combatant in the same tick
//! therefore resolves as a structure hit.
//!
//! # Invariants
//!
//! - At most one hit is applied per call.
//! - Every outcome other than [`Resolution::InFlight`] destroys the projectile.
//! - Given the same registry, projectile and participants the result is
//!   deterministic; the sink cannot influence it.

mod collision;

pub use collision::CollisionResolver;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// The two combatants taking part in the current turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participants {
    /// Combatant that fired
    pub attacker: EntityId,
    /// Combatant on the receiving end
    pub defender: EntityId,
}

impl Participants {
    /// Creates a participant pair.
    #[must_use]
    pub const fn new(attacker: EntityId, defender: EntityId) -> Self {
        Self { attacker, defender }
    }

    /// The same pair with roles swapped.
    #[must_use]
    pub const fn swapped(self) -> Self {
        Self {
            attacker: self.defender,
            defender: self.attacker,
        }
    }

    /// Returns `true` if `id` is either participant.
    #[must_use]
    pub fn involves(&self, id: EntityId) -> bool {
        self.attacker == id || self.defender == id
    }
}

/// Outcome of one resolution tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Resolution {
    /// Nothing was hit; the projectile keeps flying.
    InFlight,
    /// The projectile struck a structure.
    StructureHit {
        /// Structure that was hit
        structure: EntityId,
        /// Destroyed cell, `None` if the struck cell was already gone
        cell: Option<IVec2>,
        /// `true` if the structure belongs to the attacker
        own: bool,
    },
    /// The projectile struck a combatant.
    CombatantHit {
        /// Combatant that was hit
        combatant: EntityId,
    },
    /// The projectile reached the ground.
    Ground {
        /// Impact position
        position: Vec2,
    },
}

impl Resolution {
    /// Returns `true` if the projectile is still in the air.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }
}
