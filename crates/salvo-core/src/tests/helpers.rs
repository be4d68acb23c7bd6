//! Test helper functions for building duels and inspecting them.

use crate::config::{MatchConfig, Side};
use crate::duel::Duel;
use crate::entity::EntityId;
use crate::event::{EventLog, MatchEvent};

// =============================================================================
// Configurations
// =============================================================================

/// Weak gravity and a flat-firing left player.
///
/// With force 6 at angle 0 the left player's shot moves 3.6 columns per
/// step and drops `0.009 * n * (n - 1)` rows after `n` steps, which keeps
/// hand-computed trajectories simple.
pub fn flat_config() -> MatchConfig {
    let mut config = MatchConfig::default();
    config.physics.gravity = 0.05;
    config.players[0].angle_min = 0;
    config
}

/// Flat config with the left player's structure behind it, so the shot
/// crosses open ground toward the right player's structure.
pub fn open_lane_config() -> MatchConfig {
    let mut config = flat_config();
    config.players[0].structure_side = Side::Left;
    config
}

/// Open lane with the right player's structure moved behind it too, so the
/// shot reaches the right player's body.
pub fn exposed_config() -> MatchConfig {
    let mut config = open_lane_config();
    config.players[1].structure_side = Side::Right;
    config
}

/// Builds a duel, panicking on an invalid configuration.
pub fn duel(config: MatchConfig) -> Duel {
    Duel::new(config).expect("test config should be valid")
}

// =============================================================================
// Inspection
// =============================================================================

/// Life points of `id`.
pub fn life(duel: &Duel, id: EntityId) -> u8 {
    duel.combatant(id).expect("combatant exists").life_points()
}

/// Intact cells in the structure owned by player `index`.
pub fn intact(duel: &Duel, index: usize) -> usize {
    let id = duel.structures()[index];
    duel.registry()
        .structure(id)
        .expect("structure exists")
        .grid
        .intact_count()
}

/// Number of logged events matching `pred`.
pub fn count_events(log: &EventLog, pred: impl Fn(&MatchEvent) -> bool) -> usize {
    log.events().iter().filter(|e| pred(e)).count()
}
