use crate::session::config::SessionConfig;
use anyhow::Context;
use fieldcore::interaction::{FixedPrompts, InputEvent, InteractionController, Outcome};
use fieldcore::render::SceneSummary;
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Machine-readable result of a headless session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub charges: usize,
    pub renders: usize,
    pub mutations: usize,
    pub exports: usize,
    pub outcomes: Vec<String>,
    pub exported: Option<PathBuf>,
    pub scene: SceneSummary,
}

pub struct Runner {
    controller: InteractionController,
}

impl Runner {
    pub fn new(config: SessionConfig) -> anyhow::Result<Self> {
        let mut controller =
            InteractionController::new(config.field).context("building interaction controller")?;
        for charge in &config.initial_charges {
            controller.place_charge(charge.magnitude, charge.x, charge.y);
        }
        Ok(Self { controller })
    }

    /// Replays `keys` as key presses. The save key writes to `output`; when
    /// no save key was pressed and `output` is set, the final frame is
    /// exported there.
    pub fn execute(&mut self, keys: &str, output: Option<&Path>) -> anyhow::Result<SessionReport> {
        let mut prompts = match output {
            Some(path) => FixedPrompts::export_to(path),
            None => FixedPrompts::default(),
        };

        let mut outcomes = Vec::new();
        let mut exported = None;
        for key in keys.chars().filter(|c| !c.is_whitespace()) {
            let outcome = self
                .controller
                .handle(InputEvent::Key(key), &mut prompts)
                .with_context(|| format!("handling key '{key}'"))?;
            if let Outcome::Exported(path) = &outcome {
                exported = Some(path.clone());
            }
            outcomes.push(format!("{outcome:?}"));
        }

        if let (None, Some(path)) = (&exported, output) {
            self.controller
                .export(path)
                .with_context(|| format!("exporting frame to {}", path.display()))?;
            exported = Some(path.to_path_buf());
        }
        if let Some(path) = &exported {
            info!("frame written to {}", path.display());
        }

        let metrics = self.controller.metrics();
        Ok(SessionReport {
            charges: self.controller.charges().len(),
            renders: metrics.renders,
            mutations: metrics.mutations,
            exports: metrics.exports,
            outcomes,
            exported,
            scene: self.controller.scene().summary(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldcore::charges::Charge;

    fn dipole() -> SessionConfig {
        SessionConfig::default()
            .with_overrides(Some(161), &[Charge::new(1.0, 0.0, 0.0), Charge::new(-1.0, 2.0, 0.0)])
    }

    #[test]
    fn runner_places_configured_charges() {
        let mut runner = Runner::new(dipole()).unwrap();
        let report = runner.execute("", None).unwrap();
        assert_eq!(report.charges, 2);
        assert_eq!(report.scene.markers, 2);
        assert!(report.scene.field_lines > 0);
        assert!(report.scene.closed_equipotentials >= 2);
        assert!(!report.scene.heatmap);
        assert!(report.exported.is_none());
    }

    #[test]
    fn runner_replays_toggle_and_clear_keys() {
        let mut runner = Runner::new(dipole()).unwrap();
        let report = runner.execute("3 c", None).unwrap();
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.charges, 0);
        assert_eq!(report.scene.markers, 0);
        assert_eq!(report.scene.field_lines, 0);
    }

    #[test]
    fn runner_exports_on_save_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.svg");
        let mut runner = Runner::new(dipole()).unwrap();
        let report = runner.execute("3s", Some(&path)).unwrap();
        assert_eq!(report.exports, 1);
        assert_eq!(report.exported.as_deref(), Some(path.as_path()));
        assert!(report.scene.heatmap);
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn runner_exports_final_frame_without_save_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("final.svg");
        let mut runner = Runner::new(dipole()).unwrap();
        let report = runner.execute("1", Some(&path)).unwrap();
        assert_eq!(report.exports, 1);
        assert!(path.exists());
    }

    #[test]
    fn runner_rejects_invalid_field_config() {
        let config = SessionConfig::default().with_overrides(Some(1), &[]);
        assert!(Runner::new(config).is_err());
    }
}
