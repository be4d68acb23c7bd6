//! # Salvo Core
//!
//! Deterministic simulation core for a two-player artillery duel.
//!
//! Each side aims and fires a single projectile per turn at the opponent's
//! destructible structure or body. This crate owns everything that decides
//! an outcome: fixed-step trajectory integration, per-cell collision against
//! destructible grids, footprint collision against combatants, and the
//! tickable angle/power selection state machine. Rendering, audio and real
//! input devices live outside and plug in through [`event::RenderSink`] and
//! [`input::InputSource`].
//!
//! ## Architecture
//!
//! - **Entities**: structures and combatants, stored in an [`registry::EntityRegistry`]
//!   owned by each match
//! - **Resolver**: [`resolver::CollisionResolver`] applies one tick of hits
//! - **Turn**: [`turn::TurnController`] steps a turn from aiming to the match-over check
//! - **Duel**: [`duel::Duel`] holds match state and alternates turns
//!
//! ## Usage
//!
//! ```
//! use salvo_core::config::MatchConfig;
//! use salvo_core::duel::Duel;
//! use salvo_core::event::EventLog;
//!
//! let mut duel = Duel::new(MatchConfig::default()).unwrap();
//! let mut log = EventLog::new();
//!
//! let outcome = duel.play_shot(45.0, 4.0, &mut log).unwrap();
//! assert!(outcome.steps > 0);
//! assert!(!log.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod combatant;
pub mod config;
pub mod duel;
pub mod entity;
pub mod error;
pub mod event;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod projectile;
pub mod registry;
pub mod resolver;
pub mod turn;

pub use config::MatchConfig;
pub use duel::Duel;
pub use error::{ConfigError, TurnError};
pub use event::{MatchEvent, RenderSink};

#[cfg(test)]
mod tests;
