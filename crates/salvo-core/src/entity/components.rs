//! Component structs stored inside entities.

use serde::{Deserialize, Serialize};

use crate::grid::DestructibleGrid;

use super::EntityId;

/// Components for Structure entities.
///
/// A structure is one combatant's destructible building. The `owner` decides
/// whether a hit rewards or penalises the attacker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureComponents {
    /// Combatant that owns this structure.
    pub owner: EntityId,
    /// Cell grid of the structure.
    pub grid: DestructibleGrid,
}

impl StructureComponents {
    /// Creates structure components for `owner`.
    #[must_use]
    pub const fn new(owner: EntityId, grid: DestructibleGrid) -> Self {
        Self { owner, grid }
    }
}
