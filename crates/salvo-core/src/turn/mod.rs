//! One turn of a duel as a tickable state machine.
//!
//! ```text
//! AngleSelect -> PowerSelect -> Launch -> Flight -> Resolve -> NextTurn | MatchOver
//! ```
//!
//! [`TurnController::tick`] performs one step of whichever phase is active
//! and reports whether the phase changed. It never sleeps and never reads
//! a device; the host decides how fast to tick and where input comes from.
//! [`Duel::play_turn`](crate::duel::Duel::play_turn) is the blocking driver
//! that paces ticks with a [`Clock`](crate::input::Clock).

mod controller;
mod oscillator;

pub use controller::{TurnContext, TurnController};
pub use oscillator::{AngleOscillator, PowerCounter};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::event::LossReason;
use crate::registry::EntityRegistry;
use crate::resolver::Resolution;

/// Phase of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Angle oscillates until confirmed.
    AngleSelect,
    /// Power counts up while held until confirmed.
    PowerSelect,
    /// Projectile is reset to the attacker and launched.
    Launch,
    /// One integration step plus collision resolution per tick.
    Flight,
    /// Match-over check.
    Resolve,
    /// Turn complete; the other side attacks next.
    NextTurn,
    /// Turn complete and the match has ended.
    MatchOver,
}

impl TurnPhase {
    /// Returns `true` for the two terminal phases.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::NextTurn | Self::MatchOver)
    }

    /// Returns `true` while waiting on player input.
    #[must_use]
    pub const fn is_selecting(self) -> bool {
        matches!(self, Self::AngleSelect | Self::PowerSelect)
    }
}

/// How the flight of a shot ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShotResult {
    /// The resolver stopped the projectile.
    Impact(Resolution),
    /// The flight loop removed the projectile.
    Lost {
        /// Last position
        position: Vec2,
        /// Why it was removed
        reason: LossReason,
    },
}

/// Summary of a completed turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Combatant that fired
    pub attacker: EntityId,
    /// Committed angle in degrees
    pub angle: f32,
    /// Committed force
    pub force: f32,
    /// How the flight ended
    pub result: ShotResult,
    /// Flight steps simulated
    pub steps: u32,
    /// `true` if this turn ended the match
    pub match_over: bool,
}

/// Returns `true` if `combatant` is eliminated or owns a fully destroyed structure.
#[must_use]
pub fn has_lost(registry: &EntityRegistry, combatant: EntityId) -> bool {
    let eliminated = registry
        .combatant(combatant)
        .is_some_and(crate::combatant::Combatant::is_eliminated);
    eliminated
        || registry
            .entities_sorted()
            .filter_map(|e| e.as_structure())
            .any(|s| s.owner == combatant && !s.grid.is_structure_intact())
}
