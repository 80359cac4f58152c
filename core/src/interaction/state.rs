use crate::charges::ChargeSet;
use serde::{Deserialize, Serialize};

/// Which optional layers are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityState {
    pub field_lines: bool,
    pub equipotential_lines: bool,
    pub equipotential_map: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityFlag {
    FieldLines,
    EquipotentialLines,
    EquipotentialMap,
}

impl VisibilityState {
    /// Every optional layer off; charge markers are still drawn.
    pub fn hidden() -> Self {
        Self {
            field_lines: false,
            equipotential_lines: false,
            equipotential_map: false,
        }
    }

    /// Flips one flag and returns its new value.
    pub fn toggle(&mut self, flag: VisibilityFlag) -> bool {
        let slot = match flag {
            VisibilityFlag::FieldLines => &mut self.field_lines,
            VisibilityFlag::EquipotentialLines => &mut self.equipotential_lines,
            VisibilityFlag::EquipotentialMap => &mut self.equipotential_map,
        };
        *slot = !*slot;
        *slot
    }
}

impl Default for VisibilityState {
    fn default() -> Self {
        Self {
            field_lines: true,
            equipotential_lines: true,
            equipotential_map: false,
        }
    }
}

/// Everything a user edit can change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub charges: ChargeSet,
    pub visibility: VisibilityState,
}
