use super::state::VisibilityFlag;
use crate::charges::Charge;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Input already translated into data coordinates by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Pointer {
        button: PointerButton,
        modifier: bool,
        x: f64,
        y: f64,
    },
    Key(char),
}

impl InputEvent {
    pub fn primary(x: f64, y: f64) -> Self {
        Self::Pointer {
            button: PointerButton::Primary,
            modifier: false,
            x,
            y,
        }
    }

    pub fn secondary(x: f64, y: f64) -> Self {
        Self::Pointer {
            button: PointerButton::Secondary,
            modifier: false,
            x,
            y,
        }
    }

    pub fn primary_with_modifier(x: f64, y: f64) -> Self {
        Self::Pointer {
            button: PointerButton::Primary,
            modifier: true,
            x,
            y,
        }
    }
}

/// What handling an event did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Added { index: usize, charge: Charge },
    Removed { index: usize, charge: Charge },
    Modified { index: usize, from: f64, to: f64 },
    EditCancelled { index: usize },
    Toggled { flag: VisibilityFlag, visible: bool },
    Cleared { removed: usize },
    Exported(PathBuf),
    ExportCancelled,
    /// Event has no mapped action (unknown key, click off the viewport, or a
    /// plain primary click on an existing charge).
    Ignored,
}

impl Outcome {
    /// Whether the scene was recomputed as a result.
    pub fn rerendered(&self) -> bool {
        matches!(
            self,
            Outcome::Added { .. }
                | Outcome::Removed { .. }
                | Outcome::Modified { .. }
                | Outcome::Toggled { .. }
                | Outcome::Cleared { .. }
        )
    }
}
