//! Match configuration.
//!
//! Every field has a default, so a JSON file only needs to mention what it
//! changes. The defaults describe the classic 150x40 console layout: two
//! players 50 columns apart, each with a 5x5 tower between them.
//!
//! # Example
//!
//! ```
//! use salvo_core::config::MatchConfig;
//!
//! let config = MatchConfig::from_json_str(r#"{ "physics": { "gravity": 0.8 } }"#).unwrap();
//! assert!((config.physics.gravity - 0.8).abs() < f32::EPSILON);
//! assert!((config.physics.time_step - 0.6).abs() < f32::EPSILON);
//! ```

use std::path::Path;
use std::time::Duration;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Largest accepted magnitude for a player coordinate.
pub const MAX_COORDINATE: f32 = 1.0e6;

/// Largest accepted structure width or height, in cells.
pub const MAX_STRUCTURE_SIDE: i32 = 1024;

/// Projectile integration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration per unit time
    pub gravity: f32,
    /// Integration time step
    pub time_step: f32,
    /// Flight is abandoned after this many steps
    pub max_flight_steps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            time_step: 0.6,
            max_flight_steps: 2_000,
        }
    }
}

/// Playfield limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Y coordinate of the ground; projectiles at or below it are stopped
    pub ground_level: f32,
    /// Projectiles leaving `[0, width)` horizontally are stopped
    pub width: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            ground_level: 36.0,
            width: 150.0,
        }
    }
}

/// Which side of its owner a structure stands on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Toward smaller X
    Left,
    /// Toward larger X
    Right,
}

/// Per-player setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Anchor of the combatant glyph, also the launch point
    pub position: Vec2,
    /// Smallest firing angle in degrees
    pub angle_min: i32,
    /// Largest firing angle in degrees
    pub angle_max: i32,
    /// Starting (and maximum) life points
    pub life_points: u8,
    /// Where the player's structure stands
    pub structure_side: Side,
}

impl PlayerConfig {
    /// Default left-hand player, firing up and to the right.
    #[must_use]
    pub fn left() -> Self {
        Self {
            position: Vec2::new(30.0, 33.0),
            angle_min: 30,
            angle_max: 60,
            life_points: 2,
            structure_side: Side::Right,
        }
    }

    /// Default right-hand player, firing up and to the left.
    #[must_use]
    pub fn right() -> Self {
        Self {
            position: Vec2::new(80.0, 33.0),
            angle_min: 120,
            angle_max: 150,
            life_points: 2,
            structure_side: Side::Left,
        }
    }
}

/// Structure dimensions and placement relative to the owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Columns
    pub width: i32,
    /// Rows
    pub height: i32,
    /// Horizontal distance from the owner, applied toward `structure_side`
    pub offset_x: i32,
    /// Vertical offset from the owner's anchor row
    pub offset_y: i32,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
            offset_x: 13,
            offset_y: -2,
        }
    }
}

impl StructureConfig {
    /// Grid origin for a structure owned by a player at `owner` on `side`.
    #[must_use]
    pub fn origin_for(&self, owner: Vec2, side: Side) -> IVec2 {
        let anchor = owner.floor().as_ivec2();
        let dx = match side {
            Side::Left => self.offset_x.saturating_neg(),
            Side::Right => self.offset_x,
        };
        IVec2::new(
            anchor.x.saturating_add(dx),
            anchor.y.saturating_add(self.offset_y),
        )
    }
}

/// Angle and power selection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AimingConfig {
    /// Number of display points across the firing range
    pub angle_points: u32,
    /// Smallest launch force
    pub power_min: u8,
    /// Largest launch force
    pub power_max: u8,
}

impl Default for AimingConfig {
    fn default() -> Self {
        Self {
            angle_points: 5,
            power_min: 1,
            power_max: 6,
        }
    }
}

/// Score and life adjustments applied on hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Attacker score change for destroying an opponent's cell
    pub opponent_structure: i32,
    /// Attacker score change for destroying one of its own cells
    pub own_structure: i32,
    /// Attacker score change for hitting a combatant
    pub combatant_hit: i32,
    /// Life points removed from a struck combatant
    pub damage: u8,
    /// Life points restored to the attacker on a combatant hit
    pub heal: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            opponent_structure: 5,
            own_structure: -5,
            combatant_hit: 10,
            damage: 1,
            heal: 1,
        }
    }
}

/// Real-time cadence of the blocking loops. Not physically meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Delay between angle/power selection ticks, in milliseconds
    pub input_tick_ms: u64,
    /// Delay between flight steps, in milliseconds
    pub flight_tick_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            input_tick_ms: 100,
            flight_tick_ms: 50,
        }
    }
}

impl PacingConfig {
    /// Input tick delay.
    #[must_use]
    pub const fn input_tick(&self) -> Duration {
        Duration::from_millis(self.input_tick_ms)
    }

    /// Flight tick delay.
    #[must_use]
    pub const fn flight_tick(&self) -> Duration {
        Duration::from_millis(self.flight_tick_ms)
    }
}

/// Complete match configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Projectile integration
    pub physics: PhysicsConfig,
    /// Playfield limits
    pub arena: ArenaConfig,
    /// The two players; index 0 moves first
    pub players: [PlayerConfig; 2],
    /// Structure shape and placement
    pub structure: StructureConfig,
    /// Angle/power selection
    pub aiming: AimingConfig,
    /// Hit rewards and penalties
    pub scoring: ScoringConfig,
    /// Real-time pacing
    pub pacing: PacingConfig,
    /// Seed for the angle oscillator jitter
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            arena: ArenaConfig::default(),
            players: [PlayerConfig::left(), PlayerConfig::right()],
            structure: StructureConfig::default(),
            aiming: AimingConfig::default(),
            scoring: ScoringConfig::default(),
            pacing: PacingConfig::default(),
            seed: 0,
        }
    }
}

impl MatchConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or the first
    /// validation failure.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Serialises the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if serialisation fails.
    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks semantic constraints that the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> ConfigResult<()> {
        for (name, value) in [
            ("physics.gravity", self.physics.gravity),
            ("physics.time_step", self.physics.time_step),
            ("arena.width", self.arena.width),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field: name, value });
            }
        }
        if !self.arena.ground_level.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "arena.ground_level",
                value: self.arena.ground_level,
            });
        }

        for (player, cfg) in self.players.iter().enumerate() {
            if !cfg.position.is_finite() {
                return Err(ConfigError::NonFinite {
                    field: "players.position",
                    value: if cfg.position.x.is_finite() { cfg.position.y } else { cfg.position.x },
                });
            }
            let far = cfg.position.abs().max_element();
            if far > MAX_COORDINATE {
                return Err(ConfigError::OutOfRange {
                    field: "players.position",
                    value: far,
                    limit: MAX_COORDINATE,
                });
            }
            if cfg.angle_min >= cfg.angle_max {
                return Err(ConfigError::InvalidAngleRange {
                    player,
                    min: cfg.angle_min,
                    max: cfg.angle_max,
                });
            }
            if cfg.life_points == 0 {
                return Err(ConfigError::ZeroLife { player });
            }
        }

        if self.aiming.power_min > self.aiming.power_max {
            return Err(ConfigError::InvalidPowerRange {
                min: self.aiming.power_min,
                max: self.aiming.power_max,
            });
        }
        if self.aiming.angle_points < 2 {
            return Err(ConfigError::TooFewAnglePoints(self.aiming.angle_points));
        }
        if self.structure.width < 1 || self.structure.height < 1 {
            return Err(ConfigError::EmptyStructure {
                width: self.structure.width,
                height: self.structure.height,
            });
        }
        if self.structure.width > MAX_STRUCTURE_SIDE || self.structure.height > MAX_STRUCTURE_SIDE {
            return Err(ConfigError::StructureTooLarge {
                width: self.structure.width,
                height: self.structure.height,
                max: MAX_STRUCTURE_SIDE,
            });
        }
        Ok(())
    }
}
