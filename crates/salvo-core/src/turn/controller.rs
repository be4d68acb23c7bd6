use glam::Vec2;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use crate::combatant::Combatant;
use crate::config::{MatchConfig, PhysicsConfig};
use crate::event::{LossReason, MatchEvent, PromptKind, RenderSink};
use crate::input::InputSource;
use crate::projectile::Projectile;
use crate::registry::EntityRegistry;
use crate::resolver::{CollisionResolver, Participants};

use super::{has_lost, AngleOscillator, PowerCounter, ShotResult, TurnOutcome, TurnPhase};

/// Match state a turn reads and mutates.
pub struct TurnContext<'a> {
    /// Entities of the match
    pub registry: &'a mut EntityRegistry,
    /// The match's single projectile
    pub projectile: &'a mut Projectile,
    /// Jitter source for the angle oscillator
    pub rng: &'a mut ChaCha8Rng,
    /// Notification sink
    pub sink: &'a mut dyn RenderSink,
}

/// Drives one turn from angle selection to the match-over check.
///
/// # Processing Order
///
/// Each [`tick`](Self::tick) runs exactly one phase:
///
/// - `AngleSelect`: a pending confirmation commits the angle. Otherwise the
///   oscillator advances and a prompt is emitted.
/// - `PowerSelect`: a pending confirmation commits the power. Otherwise, if
///   the button is held, the counter increments and a prompt is emitted.
///   Confirmation is polled before hold.
/// - `Launch`: the projectile is reset to the attacker and launched.
/// - `Flight`: one integration step, then either the flight-loop guards
///   (non-finite, out of bounds, step limit) or the collision resolver.
/// - `Resolve`: the match-over predicate picks the terminal phase.
///
/// # Invariants
///
/// - The phase only moves forward.
/// - Nothing happens once a terminal phase is reached.
#[derive(Debug, Clone)]
pub struct TurnController {
    participants: Participants,
    origin: Vec2,
    phase: TurnPhase,
    oscillator: AngleOscillator,
    power: PowerCounter,
    angle: Option<f32>,
    force: Option<f32>,
    resolver: CollisionResolver,
    physics: PhysicsConfig,
    arena_width: f32,
    steps: u32,
    result: Option<ShotResult>,
}

impl TurnController {
    /// Creates an interactive turn starting in `AngleSelect`.
    #[must_use]
    pub fn new(config: &MatchConfig, participants: Participants, attacker: &Combatant) -> Self {
        Self {
            participants,
            origin: attacker.position(),
            phase: TurnPhase::AngleSelect,
            oscillator: AngleOscillator::new(
                attacker.angle_min(),
                attacker.angle_max(),
                config.aiming.angle_points,
            ),
            power: PowerCounter::new(config.aiming.power_min, config.aiming.power_max),
            angle: None,
            force: None,
            resolver: CollisionResolver::with_scoring(
                config.arena.ground_level,
                config.scoring.clone(),
            ),
            physics: config.physics.clone(),
            arena_width: config.arena.width,
            steps: 0,
            result: None,
        }
    }

    /// Creates a turn with angle and force already chosen, starting in `Launch`.
    #[must_use]
    pub fn aimed(
        config: &MatchConfig,
        participants: Participants,
        attacker: &Combatant,
        angle: f32,
        force: f32,
    ) -> Self {
        Self {
            phase: TurnPhase::Launch,
            angle: Some(angle),
            force: Some(force),
            ..Self::new(config, participants, attacker)
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Attacker and defender of this turn.
    #[must_use]
    pub const fn participants(&self) -> Participants {
        self.participants
    }

    /// Angle oscillator state.
    #[must_use]
    pub const fn oscillator(&self) -> &AngleOscillator {
        &self.oscillator
    }

    /// Power counter state.
    #[must_use]
    pub const fn power(&self) -> &PowerCounter {
        &self.power
    }

    /// Committed angle, once selected.
    #[must_use]
    pub const fn angle(&self) -> Option<f32> {
        self.angle
    }

    /// Committed force, once selected.
    #[must_use]
    pub const fn force(&self) -> Option<f32> {
        self.force
    }

    /// Flight steps simulated so far.
    #[must_use]
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Returns `true` once a terminal phase is reached.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    /// Summary of the turn, available once it is finished.
    #[must_use]
    pub fn outcome(&self) -> Option<TurnOutcome> {
        if !self.is_finished() {
            return None;
        }
        Some(TurnOutcome {
            attacker: self.participants.attacker,
            angle: self.angle?,
            force: self.force?,
            result: self.result?,
            steps: self.steps,
            match_over: self.phase == TurnPhase::MatchOver,
        })
    }

    /// Runs one tick of the current phase. Returns `true` if the phase changed.
    pub fn tick(&mut self, input: &mut dyn InputSource, ctx: &mut TurnContext<'_>) -> bool {
        let before = self.phase;
        match self.phase {
            TurnPhase::AngleSelect => self.tick_angle(input, ctx),
            TurnPhase::PowerSelect => self.tick_power(input, ctx),
            TurnPhase::Launch => self.tick_launch(ctx),
            TurnPhase::Flight => self.tick_flight(ctx),
            TurnPhase::Resolve => self.tick_resolve(ctx),
            TurnPhase::NextTurn | TurnPhase::MatchOver => {}
        }
        self.phase != before
    }

    fn tick_angle(&mut self, input: &mut dyn InputSource, ctx: &mut TurnContext<'_>) {
        if input.poll_confirmation() {
            let angle = self.oscillator.value();
            debug!(attacker = %self.participants.attacker, angle, "angle committed");
            self.angle = Some(angle);
            self.phase = TurnPhase::PowerSelect;
            ctx.sink.on_event(&MatchEvent::TurnPrompt {
                kind: PromptKind::Power,
                value: f32::from(self.power.value()),
            });
            return;
        }
        let value = self.oscillator.advance(ctx.rng);
        ctx.sink.on_event(&MatchEvent::TurnPrompt {
            kind: PromptKind::Angle,
            value,
        });
    }

    fn tick_power(&mut self, input: &mut dyn InputSource, ctx: &mut TurnContext<'_>) {
        if input.poll_confirmation() {
            let force = f32::from(self.power.value());
            debug!(attacker = %self.participants.attacker, force, "power committed");
            self.force = Some(force);
            self.phase = TurnPhase::Launch;
            return;
        }
        if input.poll_hold() {
            let value = self.power.increment();
            ctx.sink.on_event(&MatchEvent::TurnPrompt {
                kind: PromptKind::Power,
                value: f32::from(value),
            });
        }
    }

    fn tick_launch(&mut self, ctx: &mut TurnContext<'_>) {
        // Anything not committed yet fires at the current selection value.
        let angle = *self.angle.get_or_insert(self.oscillator.value());
        let force = *self.force.get_or_insert(f32::from(self.power.value()));
        ctx.projectile.reset(self.origin);
        ctx.projectile.launch(angle, force);
        ctx.sink.on_event(&MatchEvent::ProjectileLaunched {
            origin: self.origin,
            velocity: ctx.projectile.velocity(),
        });
        self.phase = TurnPhase::Flight;
    }

    fn tick_flight(&mut self, ctx: &mut TurnContext<'_>) {
        let from = ctx.projectile.position();
        ctx.projectile.step(self.physics.time_step, self.physics.gravity);
        self.steps += 1;
        let to = ctx.projectile.position();
        trace!(step = self.steps, x = to.x, y = to.y, "flight step");
        ctx.sink.on_event(&MatchEvent::ProjectileMoved { from, to });

        if let Some(reason) = self.flight_guard(ctx.projectile) {
            debug!(?reason, x = to.x, y = to.y, "projectile lost");
            ctx.projectile.destroy();
            ctx.sink.on_event(&MatchEvent::ProjectileLost {
                position: to,
                reason,
            });
            self.result = Some(ShotResult::Lost {
                position: to,
                reason,
            });
        } else {
            let resolution =
                self.resolver
                    .resolve(ctx.registry, ctx.projectile, self.participants, ctx.sink);
            if !resolution.is_in_flight() {
                self.result = Some(ShotResult::Impact(resolution));
            }
        }

        if ctx.projectile.is_destroyed() {
            self.phase = TurnPhase::Resolve;
        }
    }

    fn flight_guard(&self, projectile: &Projectile) -> Option<LossReason> {
        let position = projectile.position();
        if !projectile.is_finite() {
            Some(LossReason::NonFinite)
        } else if position.x < 0.0 || position.x >= self.arena_width {
            Some(LossReason::OutOfBounds)
        } else if self.steps >= self.physics.max_flight_steps {
            Some(LossReason::StepLimit)
        } else {
            None
        }
    }

    fn tick_resolve(&mut self, ctx: &mut TurnContext<'_>) {
        let Participants { attacker, defender } = self.participants;
        let over = has_lost(ctx.registry, attacker) || has_lost(ctx.registry, defender);
        info!(%attacker, steps = self.steps, result = ?self.result, over, "turn resolved");
        self.phase = if over {
            TurnPhase::MatchOver
        } else {
            TurnPhase::NextTurn
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;
    use crate::event::{EventLog, NullSink};
    use crate::grid::DestructibleGrid;
    use crate::input::{InputFrame, ScriptedInput};
    use crate::resolver::Resolution;
    use glam::IVec2;
    use rand::SeedableRng;

    struct Fixture {
        config: MatchConfig,
        registry: EntityRegistry,
        projectile: Projectile,
        rng: ChaCha8Rng,
        turn: Participants,
    }

    impl Fixture {
        fn new(config: MatchConfig) -> Self {
            let mut registry = EntityRegistry::new();
            let ids: Vec<EntityId> = config
                .players
                .iter()
                .map(|p| {
                    registry.spawn_combatant(Combatant::new(
                        p.position,
                        p.life_points,
                        p.angle_min,
                        p.angle_max,
                    ))
                })
                .collect();
            for (player, &owner) in config.players.iter().zip(&ids) {
                let origin = config.structure.origin_for(player.position, player.structure_side);
                registry.spawn_structure(
                    owner,
                    DestructibleGrid::new(origin, config.structure.width, config.structure.height),
                );
            }
            Self {
                rng: ChaCha8Rng::seed_from_u64(config.seed),
                config,
                registry,
                projectile: Projectile::new(),
                turn: Participants::new(ids[0], ids[1]),
            }
        }

        fn controller(&self) -> TurnController {
            let attacker = self.registry.combatant(self.turn.attacker).unwrap();
            TurnController::new(&self.config, self.turn, attacker)
        }

        fn aimed(&self, angle: f32, force: f32) -> TurnController {
            let attacker = self.registry.combatant(self.turn.attacker).unwrap();
            TurnController::aimed(&self.config, self.turn, attacker, angle, force)
        }

        fn run(
            &mut self,
            controller: &mut TurnController,
            input: &mut dyn InputSource,
            sink: &mut dyn RenderSink,
            max_ticks: usize,
        ) {
            let mut ctx = TurnContext {
                registry: &mut self.registry,
                projectile: &mut self.projectile,
                rng: &mut self.rng,
                sink,
            };
            for _ in 0..max_ticks {
                if controller.is_finished() {
                    break;
                }
                controller.tick(input, &mut ctx);
            }
        }
    }

    /// Flat shots with weak gravity so trajectories are easy to follow.
    fn flat_config() -> MatchConfig {
        let mut config = MatchConfig::default();
        config.physics.gravity = 0.05;
        config.players[0].angle_min = 0;
        config
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn angle_oscillates_until_confirmed() {
            let mut fx = Fixture::new(MatchConfig::default());
            let mut controller = fx.controller();
            let mut input = ScriptedInput::new([InputFrame::IDLE, InputFrame::IDLE]);
            let mut log = EventLog::new();

            let mut ctx = TurnContext {
                registry: &mut fx.registry,
                projectile: &mut fx.projectile,
                rng: &mut fx.rng,
                sink: &mut log,
            };
            assert!(!controller.tick(&mut input, &mut ctx));
            assert!(!controller.tick(&mut input, &mut ctx));
            assert_eq!(controller.phase(), TurnPhase::AngleSelect);

            let prompts: Vec<_> = log
                .events()
                .iter()
                .filter_map(|e| match e {
                    MatchEvent::TurnPrompt { kind: PromptKind::Angle, value } => Some(*value),
                    _ => None,
                })
                .collect();
            assert_eq!(prompts.len(), 2);
            assert!(prompts.iter().all(|v| (30.0..=60.0).contains(v)));
        }

        #[test]
        fn confirmation_commits_current_angle() {
            let mut fx = Fixture::new(MatchConfig::default());
            let mut controller = fx.controller();
            let mut input = ScriptedInput::new([InputFrame::CONFIRM]);
            let mut ctx = TurnContext {
                registry: &mut fx.registry,
                projectile: &mut fx.projectile,
                rng: &mut fx.rng,
                sink: &mut NullSink,
            };

            assert!(controller.tick(&mut input, &mut ctx));
            assert_eq!(controller.phase(), TurnPhase::PowerSelect);
            assert_eq!(controller.angle(), Some(30.0));
        }

        #[test]
        fn power_only_counts_while_held() {
            let mut fx = Fixture::new(MatchConfig::default());
            let mut controller = fx.controller();
            let mut input = ScriptedInput::new([
                InputFrame::CONFIRM,
                InputFrame::HOLD,
                InputFrame::IDLE,
                InputFrame::HOLD,
                InputFrame::CONFIRM,
            ]);
            fx.run(&mut controller, &mut input, &mut NullSink, 5);

            assert_eq!(controller.force(), Some(3.0));
            assert_eq!(controller.phase(), TurnPhase::Launch);
        }

        #[test]
        fn power_wraps_after_max() {
            let mut fx = Fixture::new(MatchConfig::default());
            let mut controller = fx.controller();
            let mut input = ScriptedInput::shot(0, 6);
            fx.run(&mut controller, &mut input, &mut NullSink, 8);

            assert_eq!(controller.force(), Some(1.0));
        }
    }

    mod flight_tests {
        use super::*;

        #[test]
        fn vertical_shot_lands_on_the_ground() {
            let mut config = MatchConfig::default();
            config.players[0].angle_max = 90;
            let mut fx = Fixture::new(config);
            let mut controller = fx.aimed(90.0, 1.0);
            fx.run(&mut controller, &mut ScriptedInput::default(), &mut NullSink, 500);

            let outcome = controller.outcome().unwrap();
            assert!(matches!(
                outcome.result,
                ShotResult::Impact(Resolution::Ground { .. })
            ));
            assert!(!outcome.match_over);
            assert_eq!(controller.phase(), TurnPhase::NextTurn);
            assert!(fx.projectile.is_destroyed());
        }

        #[test]
        fn flat_shot_hits_own_structure() {
            let mut fx = Fixture::new(flat_config());
            let mut controller = fx.aimed(0.0, 6.0);
            fx.run(&mut controller, &mut ScriptedInput::default(), &mut NullSink, 100);

            let outcome = controller.outcome().unwrap();
            assert!(matches!(
                outcome.result,
                ShotResult::Impact(Resolution::StructureHit { own: true, .. })
            ));
            assert_eq!(outcome.steps, 4);
            assert_eq!(fx.registry.combatant(fx.turn.attacker).unwrap().score(), -5);
        }

        #[test]
        fn leaving_the_arena_is_a_loss() {
            let mut config = flat_config();
            config.arena.width = 40.0;
            let mut fx = Fixture::new(config);
            let mut controller = fx.aimed(0.0, 6.0);
            let mut log = EventLog::new();
            fx.run(&mut controller, &mut ScriptedInput::default(), &mut log, 100);

            let outcome = controller.outcome().unwrap();
            assert!(matches!(
                outcome.result,
                ShotResult::Lost {
                    reason: LossReason::OutOfBounds,
                    ..
                }
            ));
            assert_eq!(outcome.steps, 3);
            assert!(log
                .events()
                .iter()
                .any(|e| matches!(e, MatchEvent::ProjectileLost { .. })));
        }

        #[test]
        fn step_limit_ends_flight() {
            let mut config = MatchConfig::default();
            config.physics.max_flight_steps = 3;
            config.players[0].angle_max = 90;
            let mut fx = Fixture::new(config);
            let mut controller = fx.aimed(90.0, 6.0);
            fx.run(&mut controller, &mut ScriptedInput::default(), &mut NullSink, 100);

            let outcome = controller.outcome().unwrap();
            assert_eq!(outcome.steps, 3);
            assert!(matches!(
                outcome.result,
                ShotResult::Lost {
                    reason: LossReason::StepLimit,
                    ..
                }
            ));
        }

        #[test]
        fn non_finite_launch_is_lost_immediately() {
            let mut fx = Fixture::new(MatchConfig::default());
            let mut controller = fx.aimed(45.0, f32::NAN);
            fx.run(&mut controller, &mut ScriptedInput::default(), &mut NullSink, 10);

            let outcome = controller.outcome().unwrap();
            assert_eq!(outcome.steps, 1);
            assert!(matches!(
                outcome.result,
                ShotResult::Lost {
                    reason: LossReason::NonFinite,
                    ..
                }
            ));
        }

        #[test]
        fn destroying_last_cell_ends_match() {
            let mut config = flat_config();
            config.structure.width = 1;
            config.structure.height = 5;
            config.structure.offset_x = 14;
            let mut fx = Fixture::new(config);
            let mut controller = fx.aimed(0.0, 6.0);
            // Leave only the row the shot will cross.
            let own = fx
                .registry
                .entities_sorted()
                .find(|e| e.as_structure().is_some_and(|s| s.owner == fx.turn.attacker))
                .map(crate::entity::Entity::id)
                .unwrap();
            let grid = &mut fx.registry.structure_mut(own).unwrap().grid;
            for y in [0, 1, 3, 4] {
                grid.destroy(0, y);
            }
            assert_eq!(grid.origin(), IVec2::new(44, 31));

            fx.run(&mut controller, &mut ScriptedInput::default(), &mut NullSink, 100);

            let outcome = controller.outcome().unwrap();
            assert!(outcome.match_over);
            assert_eq!(controller.phase(), TurnPhase::MatchOver);
        }
    }

    #[test]
    fn launch_without_commits_uses_current_selection() {
        let mut fx = Fixture::new(MatchConfig::default());
        let mut controller = fx.controller();
        controller.phase = TurnPhase::Launch;

        fx.run(&mut controller, &mut ScriptedInput::default(), &mut NullSink, 500);

        assert!(controller.is_finished());
        assert_eq!(controller.angle(), Some(30.0));
        assert_eq!(controller.force(), Some(1.0));
        let outcome = controller.outcome().unwrap();
        assert_eq!(outcome.angle, 30.0);
        assert!(outcome.steps > 0);
    }

    #[test]
    fn finished_turn_ignores_ticks() {
        let mut config = MatchConfig::default();
        config.players[0].angle_max = 90;
        let mut fx = Fixture::new(config);
        let mut controller = fx.aimed(90.0, 1.0);
        fx.run(&mut controller, &mut ScriptedInput::default(), &mut NullSink, 500);
        assert!(controller.is_finished());

        let position = fx.projectile.position();
        let mut ctx = TurnContext {
            registry: &mut fx.registry,
            projectile: &mut fx.projectile,
            rng: &mut fx.rng,
            sink: &mut NullSink,
        };
        assert!(!controller.tick(&mut ScriptedInput::default(), &mut ctx));
        assert_eq!(fx.projectile.position(), position);
    }
}
