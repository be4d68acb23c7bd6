//! Player input and wall-clock pacing.
//!
//! The turn state machine never reads a keyboard or sleeps on its own. It
//! polls an [`InputSource`] once per tick, and the blocking driver in
//! [`Duel::play_turn`](crate::duel::Duel::play_turn) waits on a [`Clock`]
//! between ticks. Tests substitute [`ScriptedInput`] and [`ManualClock`] so
//! a full turn runs instantly and deterministically.

use std::collections::VecDeque;
use std::time::Duration;

/// Source of the single "fire" button.
pub trait InputSource {
    /// Returns `true` if a confirmation press arrived since the last poll.
    ///
    /// Consumes the press.
    fn poll_confirmation(&mut self) -> bool;

    /// Returns `true` while the button is held down.
    fn poll_hold(&mut self) -> bool;
}

/// One tick of scripted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputFrame {
    /// A confirmation press happens on this tick
    pub confirm: bool,
    /// The button is held during this tick
    pub hold: bool,
}

impl InputFrame {
    /// Nothing pressed.
    pub const IDLE: Self = Self {
        confirm: false,
        hold: false,
    };

    /// A single confirmation press.
    pub const CONFIRM: Self = Self {
        confirm: true,
        hold: false,
    };

    /// Button held without a new press.
    pub const HOLD: Self = Self {
        confirm: false,
        hold: true,
    };
}

/// Replays a fixed sequence of frames, then reports idle forever.
///
/// Each frame is consumed by the first call to [`poll_confirmation`]; a
/// following [`poll_hold`] in the same tick reads the same frame.
///
/// [`poll_confirmation`]: InputSource::poll_confirmation
/// [`poll_hold`]: InputSource::poll_hold
///
/// # Example
///
/// ```
/// use salvo_core::input::{InputFrame, InputSource, ScriptedInput};
///
/// let mut input = ScriptedInput::new([InputFrame::IDLE, InputFrame::CONFIRM]);
/// assert!(!input.poll_confirmation());
/// assert!(input.poll_confirmation());
/// assert!(!input.poll_confirmation());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputFrame>,
    current: InputFrame,
    polled: usize,
}

impl ScriptedInput {
    /// Creates a script from frames in tick order.
    pub fn new(frames: impl IntoIterator<Item = InputFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            current: InputFrame::IDLE,
            polled: 0,
        }
    }

    /// Script that waits `angle_ticks`, confirms, holds for `power_ticks`,
    /// then confirms again.
    #[must_use]
    pub fn shot(angle_ticks: usize, power_ticks: usize) -> Self {
        let frames = std::iter::repeat(InputFrame::IDLE)
            .take(angle_ticks)
            .chain(std::iter::once(InputFrame::CONFIRM))
            .chain(std::iter::repeat(InputFrame::HOLD).take(power_ticks))
            .chain(std::iter::once(InputFrame::CONFIRM));
        Self::new(frames)
    }

    /// Frames not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Number of frames consumed so far.
    #[must_use]
    pub const fn polled(&self) -> usize {
        self.polled
    }
}

impl InputSource for ScriptedInput {
    fn poll_confirmation(&mut self) -> bool {
        self.current = self.frames.pop_front().unwrap_or(InputFrame::IDLE);
        self.polled += 1;
        self.current.confirm
    }

    fn poll_hold(&mut self) -> bool {
        self.current.hold
    }
}

/// Wall-clock delay between ticks.
pub trait Clock {
    /// Blocks for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Real time via [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Clock that returns immediately and records what was requested.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    sleeps: Vec<Duration>,
}

impl ManualClock {
    /// Creates a clock with no recorded sleeps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every requested delay, in order.
    #[must_use]
    pub fn sleeps(&self) -> &[Duration] {
        &self.sleeps
    }

    /// Sum of all requested delays.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.sleeps.iter().sum()
    }
}

impl Clock for ManualClock {
    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
    }
}
