//! A complete two-player match.
//!
//! [`Duel`] owns every piece of match state: the entity registry, the single
//! projectile and the oscillator RNG. Turns are played one at a time, either
//! interactively through [`Duel::play_turn`] or from pre-chosen numbers via
//! [`Duel::play_shot`] and [`Duel::play_scripted_turn`].
//!
//! # Turn alternation
//!
//! The first configured player attacks first. Roles swap after every
//! completed turn. A turn rejected with a [`TurnError`] changes nothing, so
//! the same attacker simply tries again.
//!
//! # Example
//!
//! ```
//! use salvo_core::config::MatchConfig;
//! use salvo_core::duel::Duel;
//! use salvo_core::event::NullSink;
//!
//! let mut duel = Duel::new(MatchConfig::default()).unwrap();
//! let first = duel.attacker();
//!
//! duel.play_scripted_turn("45 3", &mut NullSink).unwrap();
//! assert_ne!(duel.attacker(), first);
//!
//! assert!(duel.play_scripted_turn("forty five", &mut NullSink).is_err());
//! assert_ne!(duel.attacker(), first);
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::combatant::Combatant;
use crate::config::MatchConfig;
use crate::entity::EntityId;
use crate::error::{ConfigResult, TurnError};
use crate::event::{MatchEvent, RenderSink};
use crate::grid::DestructibleGrid;
use crate::input::{Clock, InputSource};
use crate::projectile::Projectile;
use crate::registry::EntityRegistry;
use crate::resolver::Participants;
use crate::turn::{has_lost, TurnContext, TurnController, TurnOutcome, TurnPhase};

// =============================================================================
// Duel
// =============================================================================

/// Match state and turn driver.
#[derive(Debug, Clone)]
pub struct Duel {
    config: MatchConfig,
    registry: EntityRegistry,
    projectile: Projectile,
    rng: ChaCha8Rng,
    players: [EntityId; 2],
    structures: [EntityId; 2],
    attacker: usize,
    turn: u32,
    started: bool,
    over: bool,
}

impl Duel {
    /// Validates `config` and places both combatants and their structures.
    ///
    /// # Errors
    ///
    /// Returns the first configuration constraint that is violated.
    pub fn new(config: MatchConfig) -> ConfigResult<Self> {
        config.validate()?;

        let mut registry = EntityRegistry::new();
        let players = config.players.clone().map(|p| {
            registry.spawn_combatant(Combatant::new(
                p.position,
                p.life_points,
                p.angle_min,
                p.angle_max,
            ))
        });
        let structures = [0, 1].map(|i| {
            let player = &config.players[i];
            let origin = config
                .structure
                .origin_for(player.position, player.structure_side);
            registry.spawn_structure(
                players[i],
                DestructibleGrid::new(origin, config.structure.width, config.structure.height),
            )
        });

        info!(seed = config.seed, entities = registry.len(), "duel created");

        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            registry,
            projectile: Projectile::new(),
            players,
            structures,
            attacker: 0,
            turn: 0,
            started: false,
            over: false,
        })
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Configuration the match was created with.
    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Entity registry.
    #[must_use]
    pub const fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// The match's projectile.
    #[must_use]
    pub const fn projectile(&self) -> &Projectile {
        &self.projectile
    }

    /// Combatant ids in configuration order.
    #[must_use]
    pub const fn players(&self) -> [EntityId; 2] {
        self.players
    }

    /// Structure ids, `structures()[i]` owned by `players()[i]`.
    #[must_use]
    pub const fn structures(&self) -> [EntityId; 2] {
        self.structures
    }

    /// Combatant whose turn it is.
    #[must_use]
    pub const fn attacker(&self) -> EntityId {
        self.players[self.attacker]
    }

    /// Combatant on the receiving end this turn.
    #[must_use]
    pub const fn defender(&self) -> EntityId {
        self.players[1 - self.attacker]
    }

    /// Attacker and defender of the current turn.
    #[must_use]
    pub const fn participants(&self) -> Participants {
        Participants::new(self.attacker(), self.defender())
    }

    /// Number of completed turns.
    #[must_use]
    pub const fn turns_played(&self) -> u32 {
        self.turn
    }

    /// Combatant by id.
    #[must_use]
    pub fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        self.registry.combatant(id)
    }

    // -------------------------------------------------------------------------
    // Outcome
    // -------------------------------------------------------------------------

    /// Returns `true` once either side is eliminated or has lost its structure.
    #[must_use]
    pub fn is_match_over(&self) -> bool {
        self.over || self.players.iter().any(|&id| has_lost(&self.registry, id))
    }

    /// Winning combatant id, if the match is over and not drawn.
    ///
    /// If both sides lose at once the higher score wins; equal scores draw.
    #[must_use]
    pub fn winner(&self) -> Option<EntityId> {
        let [a, b] = self.players;
        match (has_lost(&self.registry, a), has_lost(&self.registry, b)) {
            (false, false) => None,
            (true, false) => Some(b),
            (false, true) => Some(a),
            (true, true) => {
                let (sa, sb) = self.scores();
                match sa.cmp(&sb) {
                    std::cmp::Ordering::Greater => Some(a),
                    std::cmp::Ordering::Less => Some(b),
                    std::cmp::Ordering::Equal => None,
                }
            }
        }
    }

    /// Winning combatant, if any.
    #[must_use]
    pub fn winner_combatant(&self) -> Option<&Combatant> {
        self.winner().and_then(|id| self.registry.combatant(id))
    }

    /// Scores in configuration order.
    #[must_use]
    pub fn scores(&self) -> (i32, i32) {
        let score = |id| self.registry.combatant(id).map_or(0, Combatant::score);
        (score(self.players[0]), score(self.players[1]))
    }

    // -------------------------------------------------------------------------
    // Turns
    // -------------------------------------------------------------------------

    /// Starts an interactive turn for the current attacker.
    ///
    /// The returned controller must be ticked with [`tick`](Self::tick) and
    /// handed back to [`finish_turn`](Self::finish_turn).
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::MatchOver`] if the match has ended.
    pub fn begin_turn(&mut self, sink: &mut dyn RenderSink) -> Result<TurnController, TurnError> {
        let attacker = self.attacker_combatant()?;
        let controller = TurnController::new(&self.config, self.participants(), attacker);
        self.announce_turn(sink);
        Ok(controller)
    }

    /// Runs one tick of `controller` against this match.
    pub fn tick(
        &mut self,
        controller: &mut TurnController,
        input: &mut dyn InputSource,
        sink: &mut dyn RenderSink,
    ) -> bool {
        let mut ctx = TurnContext {
            registry: &mut self.registry,
            projectile: &mut self.projectile,
            rng: &mut self.rng,
            sink,
        };
        controller.tick(input, &mut ctx)
    }

    /// Completes a turn: records match over or hands the turn to the defender.
    ///
    /// Returns `None` if `controller` has not reached a terminal phase.
    pub fn finish_turn(
        &mut self,
        controller: &TurnController,
        sink: &mut dyn RenderSink,
    ) -> Option<TurnOutcome> {
        let outcome = controller.outcome()?;
        self.turn += 1;
        if controller.phase() == TurnPhase::MatchOver {
            self.over = true;
            let winner = self.winner();
            let (left, right) = self.scores();
            info!(winner = ?winner, left, right, turns = self.turn, "match over");
            sink.on_event(&MatchEvent::MatchOver { winner });
        } else {
            self.attacker = 1 - self.attacker;
        }
        Some(outcome)
    }

    /// Plays a full interactive turn, blocking on `clock` between ticks.
    ///
    /// Selection ticks wait the input cadence and flight ticks the flight
    /// cadence. The loop only ends on confirmation and end of flight; an
    /// input source that never confirms keeps it polling.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::MatchOver`] if the match has ended.
    pub fn play_turn(
        &mut self,
        input: &mut dyn InputSource,
        clock: &mut dyn Clock,
        sink: &mut dyn RenderSink,
    ) -> Result<TurnOutcome, TurnError> {
        let mut controller = self.begin_turn(sink)?;
        loop {
            let phase = controller.phase();
            self.tick(&mut controller, input, sink);
            if let Some(outcome) = self.finish_turn(&controller, sink) {
                return Ok(outcome);
            }
            if phase.is_selecting() {
                clock.sleep(self.config.pacing.input_tick());
            } else if phase == TurnPhase::Flight {
                clock.sleep(self.config.pacing.flight_tick());
            }
        }
    }

    /// Plays a turn with a pre-chosen angle and force, without pacing.
    ///
    /// # Errors
    ///
    /// Rejects the turn, leaving the match untouched, if the match is over,
    /// either value is not finite, the angle is outside the attacker's range
    /// or the force is outside the power range.
    pub fn play_shot(
        &mut self,
        angle: f32,
        force: f32,
        sink: &mut dyn RenderSink,
    ) -> Result<TurnOutcome, TurnError> {
        let result = self.aim(angle, force);
        let mut controller = match result {
            Ok(controller) => controller,
            Err(err) => {
                warn!(attacker = %self.attacker(), %err, "turn aborted");
                return Err(err);
            }
        };
        self.announce_turn(sink);

        let mut input = crate::input::ScriptedInput::default();
        loop {
            self.tick(&mut controller, &mut input, sink);
            if let Some(outcome) = self.finish_turn(&controller, sink) {
                return Ok(outcome);
            }
        }
    }

    /// Parses an `"<angle> <force>"` line and plays it with [`play_shot`](Self::play_shot).
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::MalformedLine`] or [`TurnError::Unparseable`] for
    /// bad text, otherwise as [`play_shot`](Self::play_shot).
    pub fn play_scripted_turn(
        &mut self,
        line: &str,
        sink: &mut dyn RenderSink,
    ) -> Result<TurnOutcome, TurnError> {
        let (angle, force) = parse_shot(line).inspect_err(|err| {
            warn!(attacker = %self.attacker(), %err, "turn aborted");
        })?;
        self.play_shot(angle, force, sink)
    }

    fn attacker_combatant(&self) -> Result<&Combatant, TurnError> {
        if self.is_match_over() {
            return Err(TurnError::MatchOver);
        }
        self.registry
            .combatant(self.attacker())
            .ok_or(TurnError::MatchOver)
    }

    #[allow(clippy::cast_precision_loss)]
    fn aim(&self, angle: f32, force: f32) -> Result<TurnController, TurnError> {
        let attacker = self.attacker_combatant()?;
        if !angle.is_finite() {
            return Err(TurnError::NonFinite { field: "angle" });
        }
        if !force.is_finite() {
            return Err(TurnError::NonFinite { field: "force" });
        }
        let (min, max) = (attacker.angle_min(), attacker.angle_max());
        if angle < min as f32 || angle > max as f32 {
            return Err(TurnError::AngleOutOfRange { angle, min, max });
        }
        let (pmin, pmax) = (self.config.aiming.power_min, self.config.aiming.power_max);
        if force < f32::from(pmin) || force > f32::from(pmax) {
            return Err(TurnError::ForceOutOfRange {
                force,
                min: pmin,
                max: pmax,
            });
        }
        Ok(TurnController::aimed(
            &self.config,
            self.participants(),
            attacker,
            angle,
            force,
        ))
    }

    fn announce_turn(&mut self, sink: &mut dyn RenderSink) {
        if !self.started {
            self.started = true;
            sink.on_event(&MatchEvent::MatchStarted);
        }
        sink.on_event(&MatchEvent::TurnStarted {
            attacker: self.attacker(),
            turn: self.turn,
        });
    }
}

/// Parses `"<angle> <force>"` separated by whitespace.
///
/// # Errors
///
/// [`TurnError::MalformedLine`] unless there are exactly two fields,
/// [`TurnError::Unparseable`] if either is not a number.
pub fn parse_shot(line: &str) -> Result<(f32, f32), TurnError> {
    let mut fields = line.split_whitespace();
    let (Some(angle), Some(force), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(TurnError::MalformedLine(line.trim().to_string()));
    };
    let number = |field: &'static str, text: &str| {
        text.parse::<f32>().map_err(|_| TurnError::Unparseable {
            field,
            input: text.to_string(),
        })
    };
    Ok((number("angle", angle)?, number("force", force)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventLog, NullSink};
    use crate::input::{ManualClock, ScriptedInput};
    use std::time::Duration;

    mod setup_tests {
        use super::*;

        #[test]
        fn default_layout() {
            let duel = Duel::new(MatchConfig::default()).unwrap();
            let [p1, p2] = duel.players();
            let [s1, s2] = duel.structures();

            assert_eq!(duel.registry().len(), 4);
            assert_eq!(duel.attacker(), p1);
            assert_eq!(duel.defender(), p2);
            assert_eq!(duel.registry().structure(s1).unwrap().owner, p1);
            assert_eq!(
                duel.registry().structure(s2).unwrap().grid.origin(),
                glam::IVec2::new(67, 31)
            );
            assert_eq!(duel.scores(), (0, 0));
            assert!(!duel.is_match_over());
            assert_eq!(duel.winner(), None);
        }

        #[test]
        fn invalid_config_is_rejected() {
            let mut config = MatchConfig::default();
            config.aiming.angle_points = 0;
            assert!(Duel::new(config).is_err());
        }

        #[test]
        fn far_away_player_is_rejected() {
            let mut config = MatchConfig::default();
            config.players[0].position = glam::Vec2::new(3.0e9, 33.0);
            assert!(matches!(
                Duel::new(config),
                Err(crate::error::ConfigError::OutOfRange { .. })
            ));
        }
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn accepts_two_numbers() {
            assert_eq!(parse_shot("  45 3 "), Ok((45.0, 3.0)));
            assert_eq!(parse_shot("30.5\t6"), Ok((30.5, 6.0)));
        }

        #[test]
        fn rejects_wrong_field_count() {
            assert!(matches!(parse_shot("45"), Err(TurnError::MalformedLine(_))));
            assert!(matches!(parse_shot("45 3 1"), Err(TurnError::MalformedLine(_))));
            assert!(matches!(parse_shot(""), Err(TurnError::MalformedLine(_))));
        }

        #[test]
        fn rejects_non_numbers() {
            assert_eq!(
                parse_shot("45 hard"),
                Err(TurnError::Unparseable {
                    field: "force",
                    input: "hard".to_string()
                })
            );
        }
    }

    mod abort_tests {
        use super::*;

        fn assert_untouched(duel: &Duel, first: EntityId) {
            assert_eq!(duel.attacker(), first);
            assert_eq!(duel.turns_played(), 0);
            assert_eq!(duel.scores(), (0, 0));
        }

        #[test]
        fn out_of_range_input_aborts_only_the_turn() {
            let mut duel = Duel::new(MatchConfig::default()).unwrap();
            let first = duel.attacker();
            let mut log = EventLog::new();

            assert!(matches!(
                duel.play_shot(90.0, 3.0, &mut log),
                Err(TurnError::AngleOutOfRange { min: 30, max: 60, .. })
            ));
            assert!(matches!(
                duel.play_shot(45.0, 7.0, &mut log),
                Err(TurnError::ForceOutOfRange { .. })
            ));
            assert_eq!(
                duel.play_shot(f32::NAN, 3.0, &mut log),
                Err(TurnError::NonFinite { field: "angle" })
            );
            assert!(duel.play_scripted_turn("x 3", &mut log).is_err());

            assert_untouched(&duel, first);
            assert!(log.is_empty());
        }

        #[test]
        fn retry_after_abort_succeeds() {
            let mut duel = Duel::new(MatchConfig::default()).unwrap();
            let first = duel.attacker();
            assert!(duel.play_scripted_turn("45", &mut NullSink).is_err());
            let outcome = duel.play_scripted_turn("45 2", &mut NullSink).unwrap();
            assert_eq!(outcome.attacker, first);
            assert_eq!(duel.turns_played(), 1);
        }
    }

    mod pacing_tests {
        use super::*;

        #[test]
        fn interactive_turn_sleeps_per_phase() {
            let mut duel = Duel::new(MatchConfig::default()).unwrap();
            let mut input = ScriptedInput::shot(2, 1);
            let mut clock = ManualClock::new();

            let outcome = duel.play_turn(&mut input, &mut clock, &mut NullSink).unwrap();

            let input_sleeps = clock
                .sleeps()
                .iter()
                .filter(|&&d| d == Duration::from_millis(100))
                .count();
            let flight_sleeps = clock
                .sleeps()
                .iter()
                .filter(|&&d| d == Duration::from_millis(50))
                .count();
            // Two idle angle ticks, the angle confirm, one hold, the power confirm.
            assert_eq!(input_sleeps, 5);
            assert_eq!(u32::try_from(flight_sleeps).unwrap(), outcome.steps);
            assert_eq!(outcome.force, 2.0);
            assert!((30.0..=60.0).contains(&outcome.angle));
        }
    }

    #[test]
    fn match_over_rejects_further_turns() {
        let mut config = MatchConfig::default();
        config.players[1].life_points = 1;
        let mut duel = Duel::new(config).unwrap();
        let p2 = duel.defender();
        // Knock the defender out directly.
        if let Some(c) = duel.registry.combatant_mut(p2) {
            c.take_damage(1);
        }
        assert!(duel.is_match_over());
        assert_eq!(duel.winner(), Some(duel.players()[0]));
        assert_eq!(
            duel.play_scripted_turn("45 3", &mut NullSink),
            Err(TurnError::MatchOver)
        );
    }

    #[test]
    fn simultaneous_loss_goes_to_higher_score() {
        let mut duel = Duel::new(MatchConfig::default()).unwrap();
        let [p1, p2] = duel.players();
        for id in [p1, p2] {
            if let Some(c) = duel.registry.combatant_mut(id) {
                c.take_damage(2);
            }
        }
        assert_eq!(duel.winner(), None);

        if let Some(c) = duel.registry.combatant_mut(p2) {
            c.add_score(5);
        }
        assert_eq!(duel.winner(), Some(p2));
        assert_eq!(duel.winner_combatant().map(Combatant::score), Some(5));
    }
}
