//! Crate-level scenario tests.
//!
//! - `determinism.rs`: same seed and input give identical matches
//! - `integration.rs`: full turns and matches through [`Duel`](crate::duel::Duel)
//! - `helpers.rs`: configuration and inspection utilities

mod helpers;

pub use helpers::*;
