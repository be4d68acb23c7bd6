//! Projectile versus structure/combatant/ground resolution.

use glam::IVec2;
use tracing::{debug, info};

use crate::config::ScoringConfig;
use crate::entity::EntityId;
use crate::event::{MatchEvent, RenderSink};
use crate::projectile::Projectile;
use crate::registry::EntityRegistry;

use super::{Participants, Resolution};

/// Applies the consequences of the projectile's current position.
///
/// # Example
///
/// ```
/// use salvo_core::resolver::{CollisionResolver, Participants, Resolution};
/// use salvo_core::registry::EntityRegistry;
/// use salvo_core::combatant::Combatant;
/// use salvo_core::grid::DestructibleGrid;
/// use salvo_core::projectile::Projectile;
/// use salvo_core::event::NullSink;
/// use glam::{IVec2, Vec2};
///
/// let mut registry = EntityRegistry::new();
/// let p1 = registry.spawn_combatant(Combatant::new(Vec2::new(30.0, 33.0), 2, 30, 60));
/// let p2 = registry.spawn_combatant(Combatant::new(Vec2::new(80.0, 33.0), 2, 120, 150));
/// let tower = registry.spawn_structure(p2, DestructibleGrid::new(IVec2::new(67, 31), 5, 5));
///
/// let mut ball = Projectile::new();
/// ball.reset(Vec2::new(67.0, 31.0));
///
/// let resolver = CollisionResolver::new(36.0);
/// let outcome = resolver.resolve(&mut registry, &mut ball, Participants::new(p1, p2), &mut NullSink);
///
/// assert!(matches!(outcome, Resolution::StructureHit { own: false, .. }));
/// assert!(ball.is_destroyed());
/// assert_eq!(registry.combatant(p1).unwrap().score(), 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResolver {
    ground_level: f32,
    scoring: ScoringConfig,
}

impl CollisionResolver {
    /// Creates a resolver with default scoring and the given ground level.
    #[must_use]
    pub fn new(ground_level: f32) -> Self {
        Self::with_scoring(ground_level, ScoringConfig::default())
    }

    /// Creates a resolver with custom scoring.
    #[must_use]
    pub fn with_scoring(ground_level: f32, scoring: ScoringConfig) -> Self {
        Self {
            ground_level,
            scoring,
        }
    }

    /// Ground level Y coordinate.
    #[must_use]
    pub fn ground_level(&self) -> f32 {
        self.ground_level
    }

    /// Scoring in effect.
    #[must_use]
    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Resolves one tick for `projectile`.
    ///
    /// A destroyed projectile is left alone and reported as in flight; the
    /// flight loop stops on destruction, not on the returned value.
    pub fn resolve(
        &self,
        registry: &mut EntityRegistry,
        projectile: &mut Projectile,
        turn: Participants,
        sink: &mut dyn RenderSink,
    ) -> Resolution {
        if projectile.is_destroyed() {
            return Resolution::InFlight;
        }

        if let Some(hit) = self.resolve_structures(registry, projectile, turn, sink) {
            return hit;
        }
        if let Some(hit) = self.resolve_combatants(registry, projectile, turn, sink) {
            return hit;
        }

        let position = projectile.position();
        if position.y >= self.ground_level {
            debug!(x = position.x, y = position.y, "projectile reached the ground");
            projectile.destroy();
            sink.on_event(&MatchEvent::GroundImpact { position });
            return Resolution::Ground { position };
        }

        Resolution::InFlight
    }

    fn resolve_structures(
        &self,
        registry: &mut EntityRegistry,
        projectile: &mut Projectile,
        turn: Participants,
        sink: &mut dyn RenderSink,
    ) -> Option<Resolution> {
        let position = projectile.position();

        let struck = registry.collidables().find(|&id| {
            registry.is_damageable(id)
                && registry
                    .structure(id)
                    .is_some_and(|s| turn.involves(s.owner) && s.grid.check_collision(position))
        })?;

        let structure = registry.structure_mut(struck)?;
        let own = structure.owner == turn.attacker;
        let cell: IVec2 = structure.grid.cell_at(position);
        let destroyed = structure.grid.destroy(cell.x, cell.y).then_some(cell);

        projectile.destroy();

        if let Some(cell) = destroyed {
            let delta = if own {
                self.scoring.own_structure
            } else {
                self.scoring.opponent_structure
            };
            info!(structure = %struck, cell_x = cell.x, cell_y = cell.y, own, "structure cell destroyed");
            sink.on_event(&MatchEvent::CellDestroyed {
                structure: struck,
                cell,
            });
            Self::award(registry, turn.attacker, delta, sink);
        }

        Some(Resolution::StructureHit {
            structure: struck,
            cell: destroyed,
            own,
        })
    }

    fn resolve_combatants(
        &self,
        registry: &mut EntityRegistry,
        projectile: &mut Projectile,
        turn: Participants,
        sink: &mut dyn RenderSink,
    ) -> Option<Resolution> {
        let position = projectile.position();

        // The shooter cannot hit itself: the projectile starts inside its footprint.
        let struck = registry.collidables().find(|&id| {
            id != turn.attacker
                && registry.is_damageable(id)
                && registry
                    .combatant(id)
                    .is_some_and(|c| c.check_collision(position))
        })?;

        projectile.destroy();

        if let Some(target) = registry.combatant_mut(struck) {
            let life_points = target.take_damage(self.scoring.damage);
            info!(combatant = %struck, life_points, "combatant hit");
            sink.on_event(&MatchEvent::CombatantDamaged {
                combatant: struck,
                life_points,
            });
            if life_points == 1 {
                sink.on_event(&MatchEvent::LowLife { combatant: struck });
            }
        }

        if let Some(attacker) = registry.combatant_mut(turn.attacker) {
            let life_points = attacker.heal(self.scoring.heal);
            sink.on_event(&MatchEvent::CombatantHealed {
                combatant: turn.attacker,
                life_points,
            });
        }
        Self::award(registry, turn.attacker, self.scoring.combatant_hit, sink);

        Some(Resolution::CombatantHit { combatant: struck })
    }

    fn award(registry: &mut EntityRegistry, id: EntityId, delta: i32, sink: &mut dyn RenderSink) {
        if let Some(combatant) = registry.combatant_mut(id) {
            let score = combatant.add_score(delta);
            sink.on_event(&MatchEvent::ScoreChanged {
                combatant: id,
                score,
            });
        }
    }
}
