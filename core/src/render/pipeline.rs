use super::color::Rgba;
use super::contour::ContourExtractor;
use super::heatmap::HeatMap;
use super::scene::{
    ChargeMarker, EquipotentialLayer, FieldLineLayer, Layer, Scene, StrokeStyle,
};
use super::streamline::StreamlineTracer;
use crate::charges::ChargeSet;
use crate::field::{FieldData, FieldSampler, SampleGrid, SeedGenerator};
use crate::interaction::VisibilityState;
use crate::prelude::FieldConfig;
use crate::telemetry::{LogManager, Scope};

/// Composes the toggleable layers into a [`Scene`], back to front: field
/// lines, equipotentials, heat-map, then charge markers.
pub struct RenderPipeline<'a> {
    config: &'a FieldConfig,
    logger: LogManager,
}

impl<'a> RenderPipeline<'a> {
    pub fn new(config: &'a FieldConfig) -> Self {
        Self {
            config,
            logger: LogManager::new("render"),
        }
    }

    pub fn render(
        &self,
        grid: &SampleGrid,
        field: &FieldData,
        seeds: &[(f64, f64)],
        charges: &ChargeSet,
        visibility: VisibilityState,
    ) -> Scene {
        let mut scene = Scene::empty(grid.bounds());

        if visibility.field_lines && !seeds.is_empty() {
            let _scope = Scope::new("field lines");
            let lines = StreamlineTracer::new(field, &self.config.streamlines).trace_all(seeds);
            scene.layers.push(Layer::FieldLines(FieldLineLayer {
                lines,
                style: StrokeStyle {
                    color: Rgba::BLUE,
                    width: self.config.streamlines.width,
                },
            }));
        }

        if visibility.equipotential_lines {
            let _scope = Scope::new("equipotentials");
            let contours = &self.config.equipotentials;
            scene.layers.push(Layer::Equipotentials(EquipotentialLayer {
                levels: ContourExtractor::from_config(contours).extract(field),
                style: StrokeStyle {
                    color: Rgba::BLACK.with_alpha(contours.alpha),
                    width: contours.width,
                },
            }));
        }

        if visibility.equipotential_map {
            let _scope = Scope::new("heat-map");
            match HeatMap::build(field, &self.config.heatmap) {
                Some(map) => scene.layers.push(Layer::HeatMap(map)),
                None => self.logger.record("heat-map skipped: no valid samples"),
            }
        }

        let radius = self.config.charges.marker_radius;
        scene.layers.push(Layer::Charges(
            charges
                .iter()
                .map(|charge| ChargeMarker {
                    x: charge.x,
                    y: charge.y,
                    radius,
                    color: if charge.is_positive() {
                        Rgba::RED
                    } else {
                        Rgba::BLUE
                    },
                })
                .collect(),
        ));

        scene
    }
}

/// Full recompute: sample the field, seed field lines, render every visible
/// layer. Deterministic in its inputs.
pub fn render_frame(
    grid: &SampleGrid,
    charges: &ChargeSet,
    visibility: VisibilityState,
    config: &FieldConfig,
) -> Scene {
    let _scope = Scope::new("render frame");
    let field = FieldSampler::from_config(&config.charges).compute(grid, charges);
    let seeds = SeedGenerator::from_config(&config.seeds).seeds(charges);
    let scene = RenderPipeline::new(config).render(grid, &field, &seeds, charges, visibility);
    LogManager::new("render").record(&format!(
        "{} charges, {} seeds, {} layers",
        charges.len(),
        seeds.len(),
        scene.layers.len()
    ));
    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> FieldConfig {
        let mut config = FieldConfig::default();
        config.grid.resolution = 201;
        config
    }

    fn dipole() -> ChargeSet {
        let mut charges = ChargeSet::new();
        charges.add(1.0, 0.0, 0.0);
        charges.add(-1.0, 2.0, 0.0);
        charges
    }

    #[test]
    fn layers_follow_back_to_front_order() {
        let config = test_config();
        let grid = SampleGrid::from_config(&config.grid);
        let visibility = VisibilityState {
            field_lines: true,
            equipotential_lines: true,
            equipotential_map: true,
        };
        let scene = render_frame(&grid, &dipole(), visibility, &config);
        let order: Vec<_> = scene
            .layers
            .iter()
            .map(|layer| match layer {
                Layer::FieldLines(_) => "lines",
                Layer::Equipotentials(_) => "contours",
                Layer::HeatMap(_) => "heat",
                Layer::Charges(_) => "charges",
            })
            .collect();
        assert_eq!(order, vec!["lines", "contours", "heat", "charges"]);
    }

    #[test]
    fn default_visibility_hides_only_the_heat_map() {
        let config = test_config();
        let grid = SampleGrid::from_config(&config.grid);
        let scene = render_frame(&grid, &dipole(), VisibilityState::default(), &config);
        assert!(scene.field_lines().is_some());
        assert!(scene.equipotentials().is_some());
        assert!(scene.heatmap().is_none());
    }

    #[test]
    fn markers_are_colored_by_sign() {
        let config = test_config();
        let grid = SampleGrid::from_config(&config.grid);
        let mut charges = dipole();
        charges.add(0.0, -4.0, 4.0);
        let scene = render_frame(&grid, &charges, VisibilityState::hidden(), &config);
        let colors: Vec<_> = scene.markers().iter().map(|m| m.color).collect();
        assert_eq!(colors, vec![Rgba::RED, Rgba::BLUE, Rgba::BLUE]);
        assert!(scene.markers().iter().all(|m| m.radius == 0.2));
        assert_eq!(scene.layers.len(), 1);
    }

    #[test]
    fn empty_charge_set_skips_field_lines_layer() {
        let config = test_config();
        let grid = SampleGrid::from_config(&config.grid);
        let scene = render_frame(&grid, &ChargeSet::new(), VisibilityState::default(), &config);
        assert!(scene.field_lines().is_none());
        assert_eq!(scene.summary().equipotential_paths, 0);
        assert!(scene.markers().is_empty());
    }

    #[test]
    fn dipole_contours_enclose_each_charge_and_respect_the_bisector() {
        let config = test_config();
        let grid = SampleGrid::from_config(&config.grid);
        let scene = render_frame(&grid, &dipole(), VisibilityState::default(), &config);
        let layer = scene.equipotentials().unwrap();

        let encloses = |cx: f64| {
            layer.paths().any(|path| {
                path.closed
                    && path
                        .centroid()
                        .is_some_and(|(x, y)| (x - cx).abs() < 0.1 && y.abs() < 0.1)
            })
        };
        assert!(encloses(0.0));
        assert!(encloses(2.0));

        // V is zero on x = 1; positive levels stay left of it, negative right
        let slack = grid.spacing();
        for level in &layer.levels {
            for path in &level.paths {
                for &(x, _) in &path.points {
                    if level.level > 0.0 {
                        assert!(x < 1.0 + slack);
                    } else {
                        assert!(x > 1.0 - slack);
                    }
                }
            }
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let config = test_config();
        let grid = SampleGrid::from_config(&config.grid);
        let a = render_frame(&grid, &dipole(), VisibilityState::default(), &config);
        let b = render_frame(&grid, &dipole(), VisibilityState::default(), &config);
        assert_eq!(a, b);
    }
}
