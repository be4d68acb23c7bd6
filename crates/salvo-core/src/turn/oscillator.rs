//! Angle and power selectors driven by the turn prompt.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Jittered oscillator sweeping the attacker's firing range.
///
/// Starts at `min`. Every [`advance`](Self::advance) moves the value by
/// `step * (1 + u)` with `u` uniform in `[-1, 1]`, where
/// `step = (max - min) / (points - 1)`. Overshooting either end reflects
/// back into range, so the value always lies in `[min, max]`.
///
/// # Example
///
/// ```
/// use salvo_core::turn::AngleOscillator;
///
/// let mut osc = AngleOscillator::new(30, 60, 5);
/// assert_eq!(osc.value(), 30.0);
/// assert_eq!(osc.step(), 7.5);
///
/// osc.advance_by(35.0);
/// assert_eq!(osc.value(), 35.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleOscillator {
    min: f32,
    max: f32,
    step: f32,
    value: f32,
}

impl AngleOscillator {
    /// Creates an oscillator over `[min, max]` with `points` display points.
    ///
    /// Fewer than two points behave as two. An inverted range collapses to
    /// `min`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(min: i32, max: i32, points: u32) -> Self {
        let max = max.max(min);
        let min = min as f32;
        let max = max as f32;
        let intervals = points.max(2) - 1;
        Self {
            min,
            max,
            step: (max - min) / intervals as f32,
            value: min,
        }
    }

    /// Current angle in degrees.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Nominal step between display points.
    #[must_use]
    pub const fn step(&self) -> f32 {
        self.step
    }

    /// Advances by a jittered step drawn from `rng`. Returns the new value.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f32 {
        let jitter: f32 = rng.gen_range(-1.0..=1.0);
        self.advance_by(self.step * (1.0 + jitter))
    }

    /// Advances by an explicit `delta`, reflecting at the bounds.
    pub fn advance_by(&mut self, delta: f32) -> f32 {
        let mut next = self.value + delta;
        if next > self.max {
            next = self.min + (next - self.max);
        } else if next < self.min {
            next = self.max - (self.min - next);
        }
        // A jump longer than the whole range still lands inside it.
        self.value = next.clamp(self.min, self.max);
        self.value
    }
}

/// Wrapping power counter.
///
/// Counts up by one per held tick and wraps from `max` back to `min`.
///
/// ```
/// use salvo_core::turn::PowerCounter;
///
/// let mut power = PowerCounter::new(1, 3);
/// assert_eq!(power.increment(), 2);
/// assert_eq!(power.increment(), 3);
/// assert_eq!(power.increment(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerCounter {
    min: u8,
    max: u8,
    value: u8,
}

impl PowerCounter {
    /// Creates a counter over `[min, max]` starting at `min`.
    #[must_use]
    pub fn new(min: u8, max: u8) -> Self {
        let max = max.max(min);
        Self {
            min,
            max,
            value: min,
        }
    }

    /// Current power.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Steps up by one, wrapping past `max`. Returns the new value.
    pub fn increment(&mut self) -> u8 {
        self.value = if self.value >= self.max {
            self.min
        } else {
            self.value + 1
        };
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    mod angle_tests {
        use super::*;

        #[test]
        fn reflects_above_max() {
            let mut osc = AngleOscillator::new(30, 60, 5);
            osc.advance_by(28.0);
            assert_eq!(osc.advance_by(5.0), 33.0);
        }

        #[test]
        fn reflects_below_min() {
            let mut osc = AngleOscillator::new(120, 150, 5);
            assert_eq!(osc.advance_by(-4.0), 146.0);
        }

        #[test]
        fn inverted_range_collapses() {
            let mut osc = AngleOscillator::new(60, 30, 5);
            assert_eq!(osc.step(), 0.0);
            assert_eq!(osc.advance_by(1.0), 60.0);
            assert_eq!(osc.advance_by(-1.0), 60.0);
            assert_eq!(osc.advance(&mut ChaCha8Rng::seed_from_u64(3)), 60.0);
        }

        #[test]
        fn oversized_jump_is_clamped() {
            let mut osc = AngleOscillator::new(30, 60, 2);
            assert_eq!(osc.advance_by(95.0), 60.0);
        }

        #[test]
        fn single_point_behaves_as_two() {
            assert_eq!(AngleOscillator::new(30, 60, 1).step(), 30.0);
        }

        #[test]
        fn seeded_sequences_repeat() {
            let run = |seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let mut osc = AngleOscillator::new(30, 60, 5);
                (0..20).map(|_| osc.advance(&mut rng)).collect::<Vec<_>>()
            };
            assert_eq!(run(9), run(9));
            assert_ne!(run(9), run(10));
        }
    }

    mod power_tests {
        use super::*;

        #[test]
        fn held_for_seven_ticks_wraps_once() {
            let mut power = PowerCounter::new(1, 6);
            let mut seen = vec![power.value()];
            for _ in 0..6 {
                seen.push(power.increment());
            }
            assert_eq!(seen, vec![1, 2, 3, 4, 5, 6, 1]);
        }

        #[test]
        fn inverted_range_is_pinned() {
            let mut power = PowerCounter::new(4, 2);
            assert_eq!(power.increment(), 4);
        }
    }

    proptest! {
        #[test]
        fn angle_stays_in_range(seed in any::<u64>(), ticks in 0usize..500) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut osc = AngleOscillator::new(30, 60, 5);
            for _ in 0..ticks {
                let value = osc.advance(&mut rng);
                prop_assert!((30.0..=60.0).contains(&value));
            }
        }

        #[test]
        fn power_stays_in_range(min in 0u8..10, span in 0u8..10, ticks in 0usize..50) {
            let mut power = PowerCounter::new(min, min + span);
            for _ in 0..ticks {
                let value = power.increment();
                prop_assert!(value >= min && value <= min + span);
            }
        }
    }
}
