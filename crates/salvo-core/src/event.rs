//! Notifications emitted by the core for renderers, audio and telemetry.
//!
//! The core never depends on what a sink does with an event. Every
//! simulation outcome is decided before the sink is called, so a match
//! plays out identically with [`NullSink`], [`EventLog`] or a terminal
//! renderer.
//!
//! A sink either overrides [`RenderSink::on_event`] to see every event, or
//! overrides the specific `on_*` hooks it cares about; the default
//! `on_event` dispatches to those hooks.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Which value the turn prompt is currently selecting.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromptKind {
    /// Firing angle in degrees
    Angle,
    /// Launch force
    Power,
}

/// Why a projectile left play without hitting anything.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossReason {
    /// Left the horizontal arena bounds
    OutOfBounds,
    /// Exceeded the flight step limit
    StepLimit,
    /// Position or velocity became NaN or infinite
    NonFinite,
}

/// Everything observable that happens during a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// Entities are placed and the first turn is about to start.
    MatchStarted,
    /// A turn begins for `attacker`.
    TurnStarted {
        /// Attacking combatant
        attacker: EntityId,
        /// Zero-based turn number
        turn: u32,
    },
    /// The selection prompt shows a new value.
    TurnPrompt {
        /// Angle or power
        kind: PromptKind,
        /// Value currently displayed
        value: f32,
    },
    /// The projectile left the attacker.
    ProjectileLaunched {
        /// Launch point
        origin: Vec2,
        /// Initial velocity
        velocity: Vec2,
    },
    /// The projectile advanced one step.
    ProjectileMoved {
        /// Position before the step
        from: Vec2,
        /// Position after the step
        to: Vec2,
    },
    /// A structure cell was destroyed.
    CellDestroyed {
        /// Structure entity
        structure: EntityId,
        /// Cell relative to the structure origin
        cell: IVec2,
    },
    /// A combatant lost life points.
    CombatantDamaged {
        /// Damaged combatant
        combatant: EntityId,
        /// Life points after the hit
        life_points: u8,
    },
    /// A combatant regained life points.
    CombatantHealed {
        /// Healed combatant
        combatant: EntityId,
        /// Life points after healing
        life_points: u8,
    },
    /// A combatant is down to its last life point.
    LowLife {
        /// Combatant at one life point
        combatant: EntityId,
    },
    /// A combatant's score changed.
    ScoreChanged {
        /// Scoring combatant
        combatant: EntityId,
        /// Score after the change
        score: i32,
    },
    /// The projectile reached the ground.
    GroundImpact {
        /// Where it landed
        position: Vec2,
    },
    /// The projectile was removed without hitting anything solid.
    ProjectileLost {
        /// Last known position
        position: Vec2,
        /// Why it was removed
        reason: LossReason,
    },
    /// The match ended.
    MatchOver {
        /// Winning combatant, `None` for a draw
        winner: Option<EntityId>,
    },
}

/// Consumer of match notifications.
///
/// All methods have no-op defaults.
pub trait RenderSink {
    /// Called for every event. The default dispatches to the specific hooks.
    fn on_event(&mut self, event: &MatchEvent) {
        match *event {
            MatchEvent::ProjectileMoved { from, to } => self.on_projectile_moved(from, to),
            MatchEvent::CellDestroyed { structure, cell } => {
                self.on_cell_destroyed(structure, cell.x, cell.y);
            }
            MatchEvent::CombatantDamaged { combatant, life_points } => {
                self.on_combatant_damaged(combatant, life_points);
            }
            MatchEvent::ScoreChanged { combatant, score } => self.on_score_changed(combatant, score),
            MatchEvent::TurnPrompt { kind, value } => self.on_turn_prompt(kind, value),
            _ => {}
        }
    }

    /// The projectile moved from `prev` to `new`.
    fn on_projectile_moved(&mut self, _prev: Vec2, _new: Vec2) {}

    /// Cell `(x, y)` of structure `grid` was destroyed.
    fn on_cell_destroyed(&mut self, _grid: EntityId, _x: i32, _y: i32) {}

    /// Combatant `id` now has `life_points`.
    fn on_combatant_damaged(&mut self, _id: EntityId, _life_points: u8) {}

    /// Combatant `id` now has `score`.
    fn on_score_changed(&mut self, _id: EntityId, _score: i32) {}

    /// The selection prompt for `kind` now shows `value`.
    fn on_turn_prompt(&mut self, _kind: PromptKind, _value: f32) {}
}

/// Sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RenderSink for NullSink {}

/// Sink that records every event in order.
///
/// Useful for replays, tests and telemetry. Drain with [`take_events`](Self::take_events).
///
/// # Example
///
/// ```
/// use salvo_core::event::{EventLog, MatchEvent, RenderSink};
///
/// let mut log = EventLog::new();
/// log.on_event(&MatchEvent::MatchStarted);
/// assert_eq!(log.len(), 1);
///
/// let events = log.take_events();
/// assert_eq!(events, vec![MatchEvent::MatchStarted]);
/// assert!(log.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<MatchEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    /// Drains and returns all recorded events.
    pub fn take_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clears the log.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl RenderSink for EventLog {
    fn on_event(&mut self, event: &MatchEvent) {
        self.events.push(event.clone());
    }
}
