//! Screen-space geometry shared by the physics and collision code.
//!
//! All positions and velocities are [`Vector2`] values (an alias of
//! [`glam::Vec2`], which already provides addition, scaling and distance).
//! The coordinate system is screen space: X grows to the right and Y grows
//! downward, so "up" is negative Y.
//!
//! Structures and combatants occupy whole unit cells. A cell at integer
//! coordinate `(cx, cy)` covers the half-open square
//! `[cx, cx + 1) x [cy, cy + 1)`.

use glam::{IVec2, Vec2};

/// 2D floating-point vector used for every position and velocity.
pub type Vector2 = Vec2;

/// Integer cell coordinate, either absolute or relative to a grid origin.
pub type CellCoord = IVec2;

/// Converts an angle in degrees to radians.
#[must_use]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Returns `true` if `point` lies inside the unit cell anchored at `cell`.
///
/// The lower edges are inclusive and the upper edges exclusive, so a point
/// on a shared edge belongs to exactly one cell.
#[must_use]
pub fn cell_contains(cell: Vec2, point: Vec2) -> bool {
    point.x >= cell.x && point.x < cell.x + 1.0 && point.y >= cell.y && point.y < cell.y + 1.0
}

/// Returns the cell containing `point`, relative to `origin` (floor of the offset).
///
/// The float-to-int cast saturates (NaN maps to 0), so only call this after
/// a containment test, which non-finite points never pass.
#[must_use]
pub fn cell_of(point: Vec2, origin: Vec2) -> CellCoord {
    (point - origin).floor().as_ivec2()
}

/// Rounds a point to the nearest whole cell, ties to even on both axes.
///
/// Used for combatant footprints, which snap the projectile to the nearest
/// glyph cell rather than flooring it. The result stays in float space;
/// range-check it before converting to a [`CellCoord`].
#[must_use]
pub fn round_to_cell(point: Vec2) -> Vec2 {
    Vec2::new(point.x.round_ties_even(), point.y.round_ties_even())
}
