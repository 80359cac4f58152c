use serde::{Deserialize, Serialize};

/// Upper bound on `streamlines.density`; the occupancy grid holds
/// `(30 * density)²` cells.
pub const MAX_STREAMLINE_DENSITY: f64 = 100.0;

/// Sampling grid extent and resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub resolution: usize,
    pub half_extent: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution: 1200,
            half_extent: 10.0,
        }
    }
}

/// Radii that govern picking, masking and marker drawing around each charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeConfig {
    pub hit_radius: f64,
    pub exclusion_radius: f64,
    pub marker_radius: f64,
}

impl Default for ChargeConfig {
    fn default() -> Self {
        Self {
            hit_radius: 0.3,
            exclusion_radius: 0.22,
            marker_radius: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub lines_per_unit_charge: f64,
    pub radius: f64,
    pub max_per_charge: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            lines_per_unit_charge: 16.0,
            radius: 0.35,
            max_per_charge: 1024,
        }
    }
}

/// Tuning knobs for field-line tracing. None of these are correctness
/// contracts; they only decide how continuous and how sparse lines look.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamlineConfig {
    pub step: f64,
    pub max_steps: usize,
    /// Occupancy density; the occupancy grid has `30 * density` cells per axis.
    pub density: f64,
    pub min_length: f64,
    pub min_field: f64,
    pub width: f32,
}

impl Default for StreamlineConfig {
    fn default() -> Self {
        Self {
            step: 0.02,
            max_steps: 4000,
            density: 10.0,
            min_length: 2.0,
            min_field: 1e-12,
            width: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourConfig {
    pub min_level: f64,
    pub max_level: f64,
    pub levels: usize,
    pub alpha: f32,
    pub width: f32,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            min_level: -20.0,
            max_level: 20.0,
            levels: 100,
            alpha: 0.7,
            width: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatMapConfig {
    pub low_percentile: f64,
    pub high_percentile: f64,
    pub alpha: f32,
}

impl Default for HeatMapConfig {
    fn default() -> Self {
        Self {
            low_percentile: 10.0,
            high_percentile: 90.0,
            alpha: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub size_px: u32,
    pub heatmap_cells: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            size_px: 1000,
            heatmap_cells: 200,
        }
    }
}

/// Shared configuration for the sampler, seeding, render layers and export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub grid: GridConfig,
    pub charges: ChargeConfig,
    pub seeds: SeedConfig,
    pub streamlines: StreamlineConfig,
    pub equipotentials: ContourConfig,
    pub heatmap: HeatMapConfig,
    pub export: ExportConfig,
}

impl FieldConfig {
    pub fn validate(&self) -> FieldResult<()> {
        fn check(ok: bool, message: &str) -> FieldResult<()> {
            if ok {
                Ok(())
            } else {
                Err(FieldError::InvalidConfig(message.to_string()))
            }
        }

        check(self.grid.resolution >= 2, "grid.resolution must be at least 2")?;
        check(
            self.grid.half_extent.is_finite() && self.grid.half_extent > 0.0,
            "grid.half_extent must be positive",
        )?;
        check(
            self.charges.hit_radius >= 0.0
                && self.charges.exclusion_radius >= 0.0
                && self.charges.marker_radius >= 0.0,
            "charge radii must be non-negative",
        )?;
        check(
            self.seeds.lines_per_unit_charge >= 0.0 && self.seeds.radius > 0.0,
            "seed density must be non-negative and seed radius positive",
        )?;
        check(
            self.streamlines.step > 0.0 && self.streamlines.density > 0.0,
            "streamline step and density must be positive",
        )?;
        check(
            self.streamlines.density <= MAX_STREAMLINE_DENSITY,
            "streamline density must not exceed 100",
        )?;
        check(
            self.equipotentials.levels >= 1
                && self.equipotentials.min_level <= self.equipotentials.max_level,
            "equipotential levels must be at least 1 over a non-empty range",
        )?;
        check(
            (0.0..=100.0).contains(&self.heatmap.low_percentile)
                && (0.0..=100.0).contains(&self.heatmap.high_percentile)
                && self.heatmap.low_percentile <= self.heatmap.high_percentile,
            "heatmap percentiles must satisfy 0 <= low <= high <= 100",
        )?;
        check(
            self.export.size_px > 0 && self.export.heatmap_cells > 0,
            "export size and heatmap cells must be positive",
        )?;
        Ok(())
    }
}

/// Common error type for the field core.
#[derive(thiserror::Error, Debug)]
pub enum FieldError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("charge index {index} out of range for {len} charges")]
    ChargeIndex { index: usize, len: usize },
    #[error("export failed: {0}")]
    Export(#[from] std::io::Error),
}

pub type FieldResult<T> = Result<T, FieldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_reference_constants() {
        let cfg = FieldConfig::default();
        assert_eq!(cfg.grid.resolution, 1200);
        assert_eq!(cfg.grid.half_extent, 10.0);
        assert_eq!(cfg.charges.exclusion_radius, 0.22);
        assert_eq!(cfg.equipotentials.levels, 100);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_inverted_percentiles() {
        let mut cfg = FieldConfig::default();
        cfg.heatmap.low_percentile = 95.0;
        assert!(matches!(
            cfg.validate(),
            Err(FieldError::InvalidConfig(_))
        ));
    }

    #[test]
    fn validate_bounds_streamline_density() {
        let mut cfg = FieldConfig::default();
        cfg.streamlines.density = MAX_STREAMLINE_DENSITY;
        assert!(cfg.validate().is_ok());
        cfg.streamlines.density = 1e9;
        assert!(matches!(
            cfg.validate(),
            Err(FieldError::InvalidConfig(_))
        ));
        cfg.streamlines.density = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_degenerate_grid() {
        let mut cfg = FieldConfig::default();
        cfg.grid.resolution = 1;
        assert!(cfg.validate().is_err());
    }
}
