//! Error types.
//!
//! Nothing in the core is fatal. Configuration errors surface before a match
//! starts; turn errors abort only the turn that produced them and leave the
//! match exactly as it was.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid or unreadable match configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}")]
    Io {
        /// File that was requested
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The JSON document is malformed or has wrongly typed fields.
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A player's firing range is empty.
    #[error("player {player}: angle_min ({min}) must be below angle_max ({max})")]
    InvalidAngleRange {
        /// Player index (0 or 1)
        player: usize,
        /// Configured minimum
        min: i32,
        /// Configured maximum
        max: i32,
    },

    /// The power range is empty.
    #[error("power_min ({min}) must not exceed power_max ({max})")]
    InvalidPowerRange {
        /// Configured minimum
        min: u8,
        /// Configured maximum
        max: u8,
    },

    /// The angle oscillator needs at least two display points.
    #[error("angle_points must be at least 2, got {0}")]
    TooFewAnglePoints(u32),

    /// A physical quantity that must be strictly positive is not.
    #[error("{field} must be finite and positive, got {value}")]
    NonPositive {
        /// Offending field
        field: &'static str,
        /// Configured value
        value: f32,
    },

    /// A coordinate is NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Offending field
        field: &'static str,
        /// Configured value
        value: f32,
    },

    /// Structures must have at least one cell.
    #[error("structure must be at least 1x1, got {width}x{height}")]
    EmptyStructure {
        /// Configured width
        width: i32,
        /// Configured height
        height: i32,
    },

    /// A coordinate is finite but too far from the origin to address cells.
    #[error("{field} must be within +/-{limit}, got {value}")]
    OutOfRange {
        /// Offending field
        field: &'static str,
        /// Largest magnitude found
        value: f32,
        /// Accepted magnitude
        limit: f32,
    },

    /// Structures are capped so cell indices stay small.
    #[error("structure must be at most {max}x{max}, got {width}x{height}")]
    StructureTooLarge {
        /// Configured width
        width: i32,
        /// Configured height
        height: i32,
        /// Largest accepted side
        max: i32,
    },

    /// A player would start the match already eliminated.
    #[error("player {player}: life_points must be at least 1")]
    ZeroLife {
        /// Player index (0 or 1)
        player: usize,
    },
}

/// Malformed input for a single turn. The turn is abandoned; the match is not.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TurnError {
    /// A numeric field could not be parsed.
    #[error("could not parse {field} from {input:?}")]
    Unparseable {
        /// `"angle"` or `"force"`
        field: &'static str,
        /// Raw text that was supplied
        input: String,
    },

    /// A numeric field parsed to NaN or infinity.
    #[error("{field} must be finite")]
    NonFinite {
        /// `"angle"` or `"force"`
        field: &'static str,
    },

    /// The angle is outside the attacker's firing range.
    #[error("angle {angle} outside firing range {min}..={max}")]
    AngleOutOfRange {
        /// Requested angle
        angle: f32,
        /// Attacker's minimum
        min: i32,
        /// Attacker's maximum
        max: i32,
    },

    /// The force is outside the configured power range.
    #[error("force {force} outside power range {min}..={max}")]
    ForceOutOfRange {
        /// Requested force
        force: f32,
        /// Configured minimum
        min: u8,
        /// Configured maximum
        max: u8,
    },

    /// A line of a shot script did not contain exactly two fields.
    #[error("expected \"<angle> <force>\", got {0:?}")]
    MalformedLine(String),

    /// The match has already ended.
    #[error("the match is over")]
    MatchOver,
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
