use crate::math::StatsHelper;
use crate::prelude::GridConfig;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn square(half_extent: f64) -> Self {
        Self {
            min_x: -half_extent,
            max_x: half_extent,
            min_y: -half_extent,
            max_y: half_extent,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

/// Uniform square sample grid with linspace semantics: both endpoints are
/// sample positions. Row `j` runs along y, column `i` along x.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    half_extent: f64,
    coords: Vec<f64>,
}

impl SampleGrid {
    pub fn new(resolution: usize, half_extent: f64) -> Self {
        Self {
            half_extent,
            coords: StatsHelper::linspace(-half_extent, half_extent, resolution.max(2)),
        }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(config.resolution, config.half_extent)
    }

    pub fn resolution(&self) -> usize {
        self.coords.len()
    }

    /// Sample coordinates along either axis.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    pub fn spacing(&self) -> f64 {
        2.0 * self.half_extent / (self.coords.len() - 1) as f64
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::square(self.half_extent)
    }

    /// Continuous index of a data coordinate along either axis.
    pub fn fractional_index(&self, value: f64) -> f64 {
        (value + self.half_extent) / self.spacing()
    }
}

impl Default for SampleGrid {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_spans_reference_domain() {
        let grid = SampleGrid::default();
        assert_eq!(grid.resolution(), 1200);
        assert_eq!(grid.coords()[0], -10.0);
        assert!((grid.coords()[1199] - 10.0).abs() < 1e-12);
        assert_eq!(grid.bounds(), Bounds::square(10.0));
    }

    #[test]
    fn fractional_index_maps_endpoints() {
        let grid = SampleGrid::new(5, 2.0);
        assert_eq!(grid.spacing(), 1.0);
        assert_eq!(grid.fractional_index(-2.0), 0.0);
        assert_eq!(grid.fractional_index(0.5), 2.5);
        assert_eq!(grid.fractional_index(2.0), 4.0);
    }
}
