use super::event::{InputEvent, Outcome, PointerButton};
use super::prompt::Prompts;
use super::state::{AppState, VisibilityFlag, VisibilityState};
use crate::charges::ChargeSet;
use crate::field::SampleGrid;
use crate::prelude::{FieldConfig, FieldError, FieldResult};
use crate::render::{render_frame, Scene, SvgExporter};
use crate::telemetry::{LogManager, MetricsSnapshot, RenderMetrics};
use log::debug;
use std::path::Path;

/// Owns the application state and turns input events into charge edits,
/// visibility flips and exports. Every edit ends in a synchronous full
/// re-render, so [`InteractionController::scene`] always reflects the state.
pub struct InteractionController {
    config: FieldConfig,
    grid: SampleGrid,
    state: AppState,
    scene: Scene,
    metrics: RenderMetrics,
    logger: LogManager,
}

impl InteractionController {
    pub fn new(config: FieldConfig) -> FieldResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: FieldConfig) -> Self {
        let grid = SampleGrid::from_config(&config.grid);
        let scene = Scene::empty(grid.bounds());
        let mut controller = Self {
            config,
            grid,
            state: AppState::default(),
            scene,
            metrics: RenderMetrics::new(),
            logger: LogManager::new("controller"),
        };
        controller.rerender();
        controller
    }

    pub fn handle(&mut self, event: InputEvent, prompts: &mut dyn Prompts) -> FieldResult<Outcome> {
        let outcome = match event {
            InputEvent::Pointer {
                button,
                modifier,
                x,
                y,
            } => self.handle_pointer(button, modifier, x, y, prompts)?,
            InputEvent::Key(key) => self.handle_key(key, prompts)?,
        };

        if matches!(
            outcome,
            Outcome::Added { .. }
                | Outcome::Removed { .. }
                | Outcome::Modified { .. }
                | Outcome::Cleared { .. }
        ) {
            self.metrics.record_mutation();
        }
        if outcome.rerendered() {
            self.rerender();
        }
        self.logger.record(&format!("{event:?} -> {outcome:?}"));
        Ok(outcome)
    }

    /// Index of the first charge within the hit radius of `(x, y)`.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.state
            .charges
            .find_near(x, y, self.config.charges.hit_radius)
    }

    /// Adds a charge of arbitrary magnitude and re-renders.
    pub fn place_charge(&mut self, magnitude: f64, x: f64, y: f64) -> usize {
        let index = self.state.charges.add(magnitude, x, y);
        self.metrics.record_mutation();
        self.rerender();
        index
    }

    pub fn export(&self, path: &Path) -> FieldResult<()> {
        SvgExporter::new(&self.config.export).write(&self.scene, path)?;
        self.metrics.record_export();
        Ok(())
    }

    pub fn rerender(&mut self) {
        self.scene = render_frame(
            &self.grid,
            &self.state.charges,
            self.state.visibility,
            &self.config,
        );
        self.metrics.record_render();
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn charges(&self) -> &ChargeSet {
        &self.state.charges
    }

    pub fn visibility(&self) -> VisibilityState {
        self.state.visibility
    }

    pub fn grid(&self) -> &SampleGrid {
        &self.grid
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn handle_pointer(
        &mut self,
        button: PointerButton,
        modifier: bool,
        x: f64,
        y: f64,
        prompts: &mut dyn Prompts,
    ) -> FieldResult<Outcome> {
        if !self.grid.bounds().contains(x, y) {
            debug!("click at ({x:.3}, {y:.3}) is outside the viewport");
            return Ok(Outcome::Ignored);
        }

        let outcome = match (button, self.hit_test(x, y)) {
            (PointerButton::Secondary, Some(index)) => {
                let charge = self.state.charges.remove_at(index)?;
                Outcome::Removed { index, charge }
            }
            (PointerButton::Primary, Some(index)) if modifier => self.edit_magnitude(index, prompts)?,
            (PointerButton::Primary, Some(index)) => {
                debug!("plain primary click on charge {index} has no action");
                Outcome::Ignored
            }
            (button, None) => {
                let magnitude = match button {
                    PointerButton::Primary => 1.0,
                    PointerButton::Secondary => -1.0,
                };
                let index = self.state.charges.add(magnitude, x, y);
                Outcome::Added {
                    index,
                    charge: self.state.charges.as_slice()[index],
                }
            }
        };
        Ok(outcome)
    }

    fn edit_magnitude(&mut self, index: usize, prompts: &mut dyn Prompts) -> FieldResult<Outcome> {
        let charge = *self
            .state
            .charges
            .get(index)
            .ok_or(FieldError::ChargeIndex {
                index,
                len: self.state.charges.len(),
            })?;

        match prompts.edit_magnitude(&charge).filter(|value| value.is_finite()) {
            Some(to) => {
                let from = self.state.charges.set_magnitude_at(index, to)?;
                Ok(Outcome::Modified { index, from, to })
            }
            None => Ok(Outcome::EditCancelled { index }),
        }
    }

    fn handle_key(&mut self, key: char, prompts: &mut dyn Prompts) -> FieldResult<Outcome> {
        let flag = match key {
            '1' => VisibilityFlag::FieldLines,
            '2' => VisibilityFlag::EquipotentialLines,
            '3' => VisibilityFlag::EquipotentialMap,
            'c' => {
                let removed = self.state.charges.len();
                self.state.charges.clear();
                return Ok(Outcome::Cleared { removed });
            }
            's' => {
                return match prompts.export_path() {
                    Some(path) => {
                        self.export(&path)?;
                        Ok(Outcome::Exported(path))
                    }
                    None => Ok(Outcome::ExportCancelled),
                };
            }
            _ => return Ok(Outcome::Ignored),
        };
        let visible = self.state.visibility.toggle(flag);
        Ok(Outcome::Toggled { flag, visible })
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::build(FieldConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charges::Charge;
    use crate::interaction::FixedPrompts;

    fn controller() -> InteractionController {
        let mut config = FieldConfig::default();
        config.grid.resolution = 101;
        InteractionController::new(config).unwrap()
    }

    fn cancel() -> FixedPrompts {
        FixedPrompts::default()
    }

    #[test]
    fn click_adds_then_secondary_click_removes() {
        let mut ctl = controller();
        let added = ctl.handle(InputEvent::primary(0.0, 0.0), &mut cancel()).unwrap();
        assert_eq!(
            added,
            Outcome::Added {
                index: 0,
                charge: Charge::new(1.0, 0.0, 0.0)
            }
        );
        assert_eq!(ctl.charges().as_slice(), &[Charge::new(1.0, 0.0, 0.0)]);

        let removed = ctl.handle(InputEvent::secondary(0.1, 0.1), &mut cancel()).unwrap();
        assert!(matches!(removed, Outcome::Removed { index: 0, .. }));
        assert!(ctl.charges().is_empty());
    }

    #[test]
    fn secondary_click_on_empty_space_adds_negative_charge() {
        let mut ctl = controller();
        ctl.handle(InputEvent::secondary(3.0, -2.0), &mut cancel()).unwrap();
        assert_eq!(ctl.charges().get(0), Some(&Charge::new(-1.0, 3.0, -2.0)));
        assert_eq!(ctl.scene().markers().len(), 1);
    }

    #[test]
    fn secondary_click_removes_first_inserted_overlap() {
        let mut ctl = controller();
        ctl.place_charge(2.0, 0.1, 0.0);
        ctl.place_charge(-3.0, 0.0, 0.0);
        let outcome = ctl.handle(InputEvent::secondary(0.0, 0.0), &mut cancel()).unwrap();
        assert!(matches!(
            outcome,
            Outcome::Removed { index: 0, charge } if charge.magnitude == 2.0
        ));
        assert_eq!(ctl.charges().get(0).map(|c| c.magnitude), Some(-3.0));
    }

    #[test]
    fn plain_primary_click_on_charge_is_a_no_op() {
        let mut ctl = controller();
        ctl.place_charge(1.0, 1.0, 1.0);
        let renders = ctl.metrics().renders;
        let outcome = ctl.handle(InputEvent::primary(1.1, 1.0), &mut FixedPrompts::magnitude(5.0));
        assert_eq!(outcome.unwrap(), Outcome::Ignored);
        assert_eq!(ctl.charges().len(), 1);
        assert_eq!(ctl.charges().get(0).map(|c| c.magnitude), Some(1.0));
        assert_eq!(ctl.metrics().renders, renders);
    }

    #[test]
    fn modifier_click_edits_magnitude_in_place() {
        let mut ctl = controller();
        ctl.place_charge(1.0, 1.0, 1.0);
        let outcome = ctl
            .handle(
                InputEvent::primary_with_modifier(1.0, 1.2),
                &mut FixedPrompts::magnitude(-2.5),
            )
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Modified {
                index: 0,
                from: 1.0,
                to: -2.5
            }
        );
        assert_eq!(ctl.charges().get(0), Some(&Charge::new(-2.5, 1.0, 1.0)));
        assert_eq!(ctl.scene().markers()[0].color, crate::render::Rgba::BLUE);
    }

    #[test]
    fn cancelled_or_non_finite_edit_changes_nothing() {
        let mut ctl = controller();
        ctl.place_charge(1.0, 0.0, 0.0);
        let event = InputEvent::primary_with_modifier(0.0, 0.0);
        assert_eq!(
            ctl.handle(event, &mut cancel()).unwrap(),
            Outcome::EditCancelled { index: 0 }
        );
        assert_eq!(
            ctl.handle(event, &mut FixedPrompts::magnitude(f64::NAN)).unwrap(),
            Outcome::EditCancelled { index: 0 }
        );
        assert_eq!(ctl.charges().get(0).map(|c| c.magnitude), Some(1.0));
    }

    #[test]
    fn modifier_click_on_empty_space_still_adds() {
        let mut ctl = controller();
        ctl.handle(InputEvent::primary_with_modifier(4.0, 4.0), &mut cancel())
            .unwrap();
        assert_eq!(ctl.charges().get(0), Some(&Charge::new(1.0, 4.0, 4.0)));
    }

    #[test]
    fn heat_map_double_toggle_is_idempotent() {
        let mut ctl = controller();
        let before = ctl.visibility();
        let first = ctl.handle(InputEvent::Key('3'), &mut cancel()).unwrap();
        assert_eq!(
            first,
            Outcome::Toggled {
                flag: VisibilityFlag::EquipotentialMap,
                visible: true
            }
        );
        assert!(ctl.scene().heatmap().is_some());
        ctl.handle(InputEvent::Key('3'), &mut cancel()).unwrap();
        assert_eq!(ctl.visibility(), before);
        assert!(ctl.scene().heatmap().is_none());
    }

    #[test]
    fn number_keys_toggle_their_layers() {
        let mut ctl = controller();
        ctl.place_charge(1.0, 0.0, 0.0);
        ctl.handle(InputEvent::Key('1'), &mut cancel()).unwrap();
        ctl.handle(InputEvent::Key('2'), &mut cancel()).unwrap();
        assert!(!ctl.visibility().field_lines);
        assert!(!ctl.visibility().equipotential_lines);
        assert!(ctl.scene().field_lines().is_none());
        assert!(ctl.scene().equipotentials().is_none());
    }

    #[test]
    fn clear_empties_charges_and_markers() {
        let mut ctl = controller();
        ctl.place_charge(1.0, 0.0, 0.0);
        ctl.place_charge(-1.0, 2.0, 0.0);
        let outcome = ctl.handle(InputEvent::Key('c'), &mut cancel()).unwrap();
        assert_eq!(outcome, Outcome::Cleared { removed: 2 });
        assert!(ctl.charges().is_empty());
        assert!(ctl.scene().markers().is_empty());
        assert!(ctl.scene().field_lines().is_none());
    }

    #[test]
    fn save_key_exports_through_the_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dipole.svg");
        let mut ctl = controller();
        ctl.place_charge(1.0, 0.0, 0.0);
        let renders = ctl.metrics().renders;

        let outcome = ctl
            .handle(InputEvent::Key('s'), &mut FixedPrompts::export_to(&path))
            .unwrap();
        assert_eq!(outcome, Outcome::Exported(path.clone()));
        assert!(path.exists());
        assert_eq!(ctl.metrics().exports, 1);
        assert_eq!(ctl.metrics().renders, renders);

        let cancelled = ctl.handle(InputEvent::Key('s'), &mut cancel()).unwrap();
        assert_eq!(cancelled, Outcome::ExportCancelled);
    }

    #[test]
    fn export_to_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.svg");
        let mut ctl = controller();
        let result = ctl.handle(InputEvent::Key('s'), &mut FixedPrompts::export_to(path));
        assert!(matches!(result, Err(FieldError::Export(_))));
    }

    #[test]
    fn clicks_off_viewport_and_unknown_keys_are_ignored() {
        let mut ctl = controller();
        assert_eq!(
            ctl.handle(InputEvent::primary(12.0, 0.0), &mut cancel()).unwrap(),
            Outcome::Ignored
        );
        assert_eq!(
            ctl.handle(InputEvent::Key('x'), &mut cancel()).unwrap(),
            Outcome::Ignored
        );
        assert!(ctl.charges().is_empty());
    }

    #[test]
    fn every_mutation_triggers_a_render() {
        let mut ctl = controller();
        assert_eq!(ctl.metrics().renders, 1);
        ctl.handle(InputEvent::primary(1.0, 1.0), &mut cancel()).unwrap();
        ctl.handle(InputEvent::Key('2'), &mut cancel()).unwrap();
        ctl.handle(InputEvent::Key('c'), &mut cancel()).unwrap();
        let metrics = ctl.metrics();
        assert_eq!(metrics.renders, 4);
        assert_eq!(metrics.mutations, 2);
    }

    #[test]
    fn default_controller_starts_empty_with_default_visibility() {
        let ctl = InteractionController::default();
        assert!(ctl.charges().is_empty());
        assert_eq!(ctl.visibility(), VisibilityState::default());
        assert_eq!(ctl.grid().resolution(), 1200);
        assert!(ctl.scene().markers().is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = FieldConfig::default();
        config.equipotentials.levels = 0;
        assert!(matches!(
            InteractionController::new(config),
            Err(FieldError::InvalidConfig(_))
        ));
    }
}
