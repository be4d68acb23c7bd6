//! Player-controlled combatants: life points, score and hit footprint.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::round_to_cell;

/// Occupied cells of a combatant, expressed as row widths from the anchor.
///
/// Row `r` covers columns `0..widths[r]` relative to the anchor, at row
/// offset `r`. The default is the three-row glyph (head, torso, legs) used
/// by both players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    rows: Vec<u8>,
}

impl Footprint {
    /// Creates a footprint from per-row widths, top row first.
    #[must_use]
    pub fn new(rows: Vec<u8>) -> Self {
        Self { rows }
    }

    /// Returns `true` if the relative cell `(dx, dy)` is occupied.
    #[must_use]
    pub fn covers(&self, dx: i32, dy: i32) -> bool {
        usize::try_from(dy)
            .ok()
            .and_then(|row| self.rows.get(row))
            .is_some_and(|&width| dx >= 0 && dx < i32::from(width))
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::new(vec![2, 3, 3])
    }
}

/// A combatant taking part in the duel.
///
/// Life points are bounded to `0..=max_life`: damage saturates at zero and
/// healing is capped at the starting value. Elimination is signalled by
/// `life_points() == 0`; combatants are never removed during a match.
///
/// # Example
///
/// ```
/// use salvo_core::combatant::Combatant;
/// use glam::Vec2;
///
/// let mut player = Combatant::new(Vec2::new(30.0, 33.0), 2, 30, 60);
/// player.take_damage(5);
/// assert_eq!(player.life_points(), 0);
/// assert!(player.is_eliminated());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    position: Vec2,
    life_points: u8,
    max_life: u8,
    score: i32,
    angle_min: i32,
    angle_max: i32,
    footprint: Footprint,
}

impl Combatant {
    /// Creates a combatant at full life with zero score and the default footprint.
    #[must_use]
    pub fn new(position: Vec2, life_points: u8, angle_min: i32, angle_max: i32) -> Self {
        Self {
            position,
            life_points,
            max_life: life_points,
            score: 0,
            angle_min,
            angle_max,
            footprint: Footprint::default(),
        }
    }

    /// Replaces the hit footprint.
    #[must_use]
    pub fn with_footprint(mut self, footprint: Footprint) -> Self {
        self.footprint = footprint;
        self
    }

    /// Anchor position (top-left of the footprint); also the launch point.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Remaining life points.
    #[must_use]
    pub const fn life_points(&self) -> u8 {
        self.life_points
    }

    /// Starting life points, also the heal cap.
    #[must_use]
    pub const fn max_life(&self) -> u8 {
        self.max_life
    }

    /// Current score; may be negative.
    #[must_use]
    pub const fn score(&self) -> i32 {
        self.score
    }

    /// Smallest firing angle in degrees.
    #[must_use]
    pub const fn angle_min(&self) -> i32 {
        self.angle_min
    }

    /// Largest firing angle in degrees.
    #[must_use]
    pub const fn angle_max(&self) -> i32 {
        self.angle_max
    }

    /// Returns `true` once life points reach zero.
    #[must_use]
    pub const fn is_eliminated(&self) -> bool {
        self.life_points == 0
    }

    /// Returns `true` if `point` lands on one of the footprint cells.
    ///
    /// The point is snapped to the nearest cell (ties to even) before the
    /// lookup, so a projectile grazing the glyph still counts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn check_collision(&self, point: Vec2) -> bool {
        let rel = round_to_cell(point) - self.position.floor();
        if !rel.is_finite() {
            return false;
        }
        // Rows are at most u8::MAX wide; anything farther is a miss before the cast.
        let rows = self.footprint.height() as f32;
        if rel.x < 0.0 || rel.x > f32::from(u8::MAX) || rel.y < 0.0 || rel.y >= rows {
            return false;
        }
        let rel = rel.as_ivec2();
        self.footprint.covers(rel.x, rel.y)
    }

    /// Removes `amount` life points, stopping at zero. Returns the new value.
    pub fn take_damage(&mut self, amount: u8) -> u8 {
        self.life_points = self.life_points.saturating_sub(amount);
        self.life_points
    }

    /// Restores `amount` life points, capped at [`max_life`](Self::max_life).
    /// Returns the new value.
    pub fn heal(&mut self, amount: u8) -> u8 {
        self.life_points = self.life_points.saturating_add(amount).min(self.max_life);
        self.life_points
    }

    /// Adjusts the score by `delta`. Returns the new score.
    pub fn add_score(&mut self, delta: i32) -> i32 {
        self.score = self.score.saturating_add(delta);
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player_one() -> Combatant {
        Combatant::new(Vec2::new(30.0, 33.0), 2, 30, 60)
    }

    mod footprint_tests {
        use super::*;

        #[test]
        fn default_is_three_rows() {
            let fp = Footprint::default();
            assert_eq!(fp.height(), 3);
            assert!(fp.covers(0, 0));
            assert!(fp.covers(1, 0));
            assert!(!fp.covers(2, 0));
            assert!(fp.covers(2, 1));
            assert!(fp.covers(2, 2));
        }

        #[test]
        fn out_of_range_is_not_covered() {
            let fp = Footprint::default();
            assert!(!fp.covers(-1, 0));
            assert!(!fp.covers(0, -1));
            assert!(!fp.covers(0, 3));
            assert!(!fp.covers(3, 1));
        }
    }

    mod collision_tests {
        use super::*;

        #[test]
        fn anchor_cell_is_hit() {
            assert!(player_one().check_collision(Vec2::new(30.0, 33.0)));
        }

        #[test]
        fn nearby_point_rounds_onto_glyph() {
            let p = player_one();
            assert!(p.check_collision(Vec2::new(29.6, 32.7)));
            assert!(p.check_collision(Vec2::new(32.4, 35.3)));
        }

        #[test]
        fn empty_head_corner_is_missed() {
            // Row 0 is two cells wide.
            assert!(!player_one().check_collision(Vec2::new(32.0, 33.0)));
        }

        #[test]
        fn points_outside_footprint_miss() {
            let p = player_one();
            assert!(!p.check_collision(Vec2::new(28.0, 33.0)));
            assert!(!p.check_collision(Vec2::new(30.0, 36.6)));
            assert!(!p.check_collision(Vec2::new(f32::NAN, 33.0)));
        }

        #[test]
        fn far_away_points_miss() {
            let p = player_one();
            assert!(!p.check_collision(Vec2::new(-3.0e9, 33.0)));
            assert!(!p.check_collision(Vec2::new(30.0, 3.0e9)));
            assert!(!p.check_collision(Vec2::new(f32::MAX, f32::MIN)));

            let far = Combatant::new(Vec2::new(3.0e9, -3.0e9), 2, 30, 60);
            assert!(!far.check_collision(Vec2::new(-3.0e9, 3.0e9)));
            assert!(far.check_collision(Vec2::new(3.0e9, -3.0e9)));
        }

        #[test]
        fn custom_footprint() {
            let p = player_one().with_footprint(Footprint::new(vec![1]));
            assert!(p.check_collision(Vec2::new(30.0, 33.0)));
            assert!(!p.check_collision(Vec2::new(31.0, 33.0)));
            assert!(!p.check_collision(Vec2::new(30.0, 34.0)));
        }
    }

    mod life_tests {
        use super::*;

        #[test]
        fn damage_twice_eliminates() {
            let mut p = player_one();
            assert_eq!(p.take_damage(1), 1);
            assert_eq!(p.take_damage(1), 0);
            assert!(p.is_eliminated());
        }

        #[test]
        fn heal_is_capped_at_starting_life() {
            let mut p = player_one();
            assert_eq!(p.heal(1), 2);
            p.take_damage(1);
            assert_eq!(p.heal(10), 2);
        }

        #[test]
        fn score_can_go_negative() {
            let mut p = player_one();
            assert_eq!(p.add_score(-5), -5);
            assert_eq!(p.add_score(15), 10);
        }
    }

    proptest! {
        #[test]
        fn damage_never_underflows(start in 0u8..=255, hits in proptest::collection::vec(0u8..=255, 0..10)) {
            let mut p = Combatant::new(Vec2::ZERO, start, 0, 90);
            for amount in hits {
                let before = p.life_points();
                let after = p.take_damage(amount);
                prop_assert!(after <= before);
                prop_assert_eq!(after, before.saturating_sub(amount));
            }
        }
    }
}
