//! The single in-flight projectile and its discrete-time integration.
//!
//! # Integration
//!
//! [`Projectile::step`] is a semi-implicit update that advances position with
//! the *old* velocity and then applies gravity to the vertical component:
//!
//! ```text
//! last_position = position
//! position     += velocity * dt
//! velocity.y   += gravity * dt
//! ```
//!
//! The projectile never validates its inputs. Non-finite values propagate;
//! the flight loop is responsible for noticing them (see
//! [`Projectile::is_finite`]).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::deg_to_rad;

/// Projectile state for one match, reset before every turn.
///
/// # Example
///
/// ```
/// use salvo_core::projectile::Projectile;
/// use glam::Vec2;
///
/// let mut ball = Projectile::new();
/// ball.reset(Vec2::new(30.0, 33.0));
/// ball.launch(0.0, 4.0);
/// ball.step(0.5, 0.0);
///
/// assert_eq!(ball.position(), Vec2::new(32.0, 33.0));
/// assert_eq!(ball.last_position(), Some(Vec2::new(30.0, 33.0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    position: Vec2,
    velocity: Vec2,
    last_position: Option<Vec2>,
    destroyed: bool,
}

impl Projectile {
    /// Creates a projectile at the origin with zero velocity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places the projectile at `origin`, at rest and not destroyed.
    pub fn reset(&mut self, origin: Vec2) {
        self.position = origin;
        self.velocity = Vec2::ZERO;
        self.last_position = None;
        self.destroyed = false;
    }

    /// Sets the launch velocity from an angle in degrees and a force.
    ///
    /// An angle of 0 fires to the right, 90 fires straight up (negative Y).
    /// Any real angle and force are accepted.
    pub fn launch(&mut self, angle_degrees: f32, force: f32) {
        let theta = deg_to_rad(angle_degrees);
        self.velocity = Vec2::new(force * theta.cos(), -force * theta.sin());
    }

    /// Advances the projectile by one time step under gravity.
    pub fn step(&mut self, dt: f32, gravity: f32) {
        self.last_position = Some(self.position);
        self.position += self.velocity * dt;
        self.velocity.y += gravity * dt;
    }

    /// Marks the projectile as destroyed. Idempotent.
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Position before the most recent step, `None` right after a reset.
    #[must_use]
    pub const fn last_position(&self) -> Option<Vec2> {
        self.last_position
    }

    /// Returns `true` once the projectile has hit something or left play.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Returns `true` if both position and velocity are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}
