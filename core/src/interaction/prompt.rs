use crate::charges::Charge;
use std::path::PathBuf;

/// Blocking collaborators the controller consults for user input. Returning
/// `None` means the prompt was cancelled.
pub trait Prompts {
    fn edit_magnitude(&mut self, charge: &Charge) -> Option<f64>;
    fn export_path(&mut self) -> Option<PathBuf>;
}

/// Prompts with fixed answers; `Default` cancels everything.
#[derive(Debug, Clone, Default)]
pub struct FixedPrompts {
    pub magnitude: Option<f64>,
    pub export_path: Option<PathBuf>,
}

impl FixedPrompts {
    pub fn magnitude(value: f64) -> Self {
        Self {
            magnitude: Some(value),
            ..Self::default()
        }
    }

    pub fn export_to(path: impl Into<PathBuf>) -> Self {
        Self {
            export_path: Some(path.into()),
            ..Self::default()
        }
    }
}

impl Prompts for FixedPrompts {
    fn edit_magnitude(&mut self, _charge: &Charge) -> Option<f64> {
        self.magnitude
    }

    fn export_path(&mut self) -> Option<PathBuf> {
        self.export_path.clone()
    }
}
