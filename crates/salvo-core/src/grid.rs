//! Destructible structure made of unit cells.
//!
//! Each combatant owns one [`DestructibleGrid`]: a dense `width x height`
//! array of cells anchored at an integer origin. A cell is either intact or
//! destroyed; once destroyed it never comes back.
//!
//! # Out-of-range addressing
//!
//! Every cell accessor is bounds-checked. Reading outside the grid returns
//! `false` and writing outside it does nothing. Callers never need to
//! validate coordinates first.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::geometry::{cell_contains, cell_of, CellCoord};

/// A rectangular grid of independently destructible cells.
///
/// Cells are stored row-major (`index = y * width + x`).
///
/// # Example
///
/// ```
/// use salvo_core::grid::DestructibleGrid;
/// use glam::{IVec2, Vec2};
///
/// let mut grid = DestructibleGrid::new(IVec2::new(43, 31), 5, 5);
/// assert!(grid.check_collision(Vec2::new(43.2, 31.7)));
///
/// grid.destroy(0, 0);
/// assert!(!grid.is_intact(0, 0));
/// assert!(!grid.check_collision(Vec2::new(43.2, 31.7)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestructibleGrid {
    origin: IVec2,
    width: i32,
    height: i32,
    cells: Vec<bool>,
}

impl DestructibleGrid {
    /// Creates a fully intact grid. Negative dimensions are treated as zero.
    #[must_use]
    pub fn new(origin: IVec2, width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        // Both factors are clamped non-negative above.
        #[allow(clippy::cast_sign_loss)]
        let len = (width as usize) * (height as usize);
        Self {
            origin,
            width,
            height,
            cells: vec![true; len],
        }
    }

    /// Top-left corner of the grid in screen cells.
    #[must_use]
    pub const fn origin(&self) -> IVec2 {
        self.origin
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    // Bounds are checked first, so every cast below is non-negative.
    #[allow(clippy::cast_sign_loss)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            Some((y as usize) * (self.width as usize) + x as usize)
        } else {
            None
        }
    }

    /// Returns `true` if the cell exists and is intact.
    #[must_use]
    pub fn is_intact(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.cells[i])
    }

    /// Destroys the cell if it exists.
    ///
    /// Returns `true` if an intact cell was destroyed by this call.
    pub fn destroy(&mut self, x: i32, y: i32) -> bool {
        match self.index(x, y) {
            Some(i) if self.cells[i] => {
                self.cells[i] = false;
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if `point` falls inside any intact cell.
    ///
    /// Scans every cell; grids are a handful of cells wide and this runs
    /// once per simulation tick.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn check_collision(&self, point: Vec2) -> bool {
        let origin = self.origin.as_vec2();
        (0..self.height).any(|y| {
            (0..self.width).any(|x| {
                self.is_intact(x, y) && cell_contains(origin + Vec2::new(x as f32, y as f32), point)
            })
        })
    }

    /// Cell coordinate (relative to the origin) that contains `point`.
    ///
    /// The result may lie outside the grid.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> CellCoord {
        cell_of(point, self.origin.as_vec2())
    }

    /// Returns `true` while at least one cell remains intact.
    #[must_use]
    pub fn is_structure_intact(&self) -> bool {
        self.cells.iter().any(|&c| c)
    }

    /// Number of intact cells.
    #[must_use]
    pub fn intact_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
