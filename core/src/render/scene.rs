use super::color::Rgba;
use super::contour::ContourLevel;
use super::heatmap::HeatMap;
use crate::field::Bounds;
use serde::Serialize;

/// Sequence of data-space points; `closed` paths implicitly join last to first.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<(f64, f64)>,
    pub closed: bool,
}

impl Polyline {
    pub fn open(points: Vec<(f64, f64)>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    pub fn closed(points: Vec<(f64, f64)>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    pub fn length(&self) -> f64 {
        let open: f64 = self
            .points
            .windows(2)
            .map(|pair| (pair[1].0 - pair[0].0).hypot(pair[1].1 - pair[0].1))
            .sum();
        match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) => open + (first.0 - last.0).hypot(first.1 - last.1),
            _ => open,
        }
    }

    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x, sy + y));
        Some((sx / n, sy / n))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldLineLayer {
    pub lines: Vec<Polyline>,
    pub style: StrokeStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquipotentialLayer {
    pub levels: Vec<ContourLevel>,
    pub style: StrokeStyle,
}

impl EquipotentialLayer {
    pub fn paths(&self) -> impl Iterator<Item = &Polyline> {
        self.levels.iter().flat_map(|level| level.paths.iter())
    }
}

/// Filled disc marking a charge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeMarker {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    FieldLines(FieldLineLayer),
    Equipotentials(EquipotentialLayer),
    HeatMap(HeatMap),
    Charges(Vec<ChargeMarker>),
}

/// A fully rendered frame: layers ordered back to front over a fixed,
/// equal-aspect viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub viewport: Bounds,
    pub layers: Vec<Layer>,
}

/// Counts describing a scene, for logs and machine-readable reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SceneSummary {
    pub field_lines: usize,
    pub equipotential_paths: usize,
    pub closed_equipotentials: usize,
    pub heatmap: bool,
    pub heatmap_range: Option<(f64, f64)>,
    pub markers: usize,
}

impl Scene {
    pub fn empty(viewport: Bounds) -> Self {
        Self {
            viewport,
            layers: Vec::new(),
        }
    }

    pub fn field_lines(&self) -> Option<&FieldLineLayer> {
        self.layers.iter().find_map(|layer| match layer {
            Layer::FieldLines(lines) => Some(lines),
            _ => None,
        })
    }

    pub fn equipotentials(&self) -> Option<&EquipotentialLayer> {
        self.layers.iter().find_map(|layer| match layer {
            Layer::Equipotentials(contours) => Some(contours),
            _ => None,
        })
    }

    pub fn heatmap(&self) -> Option<&HeatMap> {
        self.layers.iter().find_map(|layer| match layer {
            Layer::HeatMap(map) => Some(map),
            _ => None,
        })
    }

    pub fn markers(&self) -> &[ChargeMarker] {
        self.layers
            .iter()
            .find_map(|layer| match layer {
                Layer::Charges(markers) => Some(markers.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn summary(&self) -> SceneSummary {
        let (equipotential_paths, closed_equipotentials) = self
            .equipotentials()
            .map(|layer| {
                layer.paths().fold((0, 0), |(total, closed), path| {
                    (total + 1, closed + usize::from(path.closed))
                })
            })
            .unwrap_or((0, 0));
        SceneSummary {
            field_lines: self.field_lines().map_or(0, |layer| layer.lines.len()),
            equipotential_paths,
            closed_equipotentials,
            heatmap: self.heatmap().is_some(),
            heatmap_range: self.heatmap().map(|map| (map.vmin, map.vmax)),
            markers: self.markers().len(),
        }
    }
}
