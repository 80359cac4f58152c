use super::color::{Colormap, Rgba};
use crate::field::{Bounds, FieldData};
use crate::math::StatsHelper;
use crate::prelude::HeatMapConfig;
use ndarray::Array2;

/// Qualitative colorbar label at a position along the bar (0 = low end).
#[derive(Debug, Clone, PartialEq)]
pub struct LegendTick {
    pub label: &'static str,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub ticks: Vec<LegendTick>,
}

/// One downsampled heat-map rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatCell {
    pub bounds: Bounds,
    pub color: Rgba,
}

/// Potential normalized into `0.0..=1.0` between two percentiles of the valid
/// samples, clipped at both ends. Masked samples stay transparent.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatMap {
    pub bounds: Bounds,
    pub normalized: Array2<f64>,
    pub mask: Array2<bool>,
    pub vmin: f64,
    pub vmax: f64,
    pub alpha: f32,
    pub colormap: Colormap,
    pub legend: Legend,
}

impl HeatMap {
    /// `None` when no sample is valid, since the percentiles are undefined.
    pub fn build(field: &FieldData, config: &HeatMapConfig) -> Option<Self> {
        let mut values = field.valid_potentials();
        let vmin = StatsHelper::percentile(&mut values, config.low_percentile)?;
        let vmax = StatsHelper::percentile(&mut values, config.high_percentile)?;
        let span = vmax - vmin;
        let normalize = |value: f64| {
            if span > 0.0 {
                ((value - vmin) / span).clamp(0.0, 1.0)
            } else {
                0.5
            }
        };

        Some(Self {
            bounds: field.grid().bounds(),
            normalized: field.potential.mapv(normalize),
            mask: field.mask.clone(),
            vmin,
            vmax,
            alpha: config.alpha,
            colormap: Colormap::CoolWarm,
            legend: Legend {
                ticks: vec![
                    LegendTick {
                        label: "−",
                        position: 0.0,
                    },
                    LegendTick {
                        label: "0",
                        position: normalize(0.0),
                    },
                    LegendTick {
                        label: "+",
                        position: 1.0,
                    },
                ],
            },
        })
    }

    pub fn resolution(&self) -> usize {
        self.normalized.nrows()
    }

    pub fn color_at(&self, j: usize, i: usize) -> Option<Rgba> {
        self.mask[[j, i]]
            .then(|| self.colormap.map(self.normalized[[j, i]]).with_alpha(self.alpha))
    }

    /// Averages the normalized value over roughly `target × target` blocks.
    /// Blocks without a valid sample are dropped.
    pub fn cells(&self, target: usize) -> Vec<HeatCell> {
        let n = self.resolution();
        let block = n.div_ceil(target.clamp(1, n));
        let step_x = self.bounds.width() / n as f64;
        let step_y = self.bounds.height() / n as f64;
        let mut cells = Vec::new();

        for j0 in (0..n).step_by(block) {
            let j1 = (j0 + block).min(n);
            for i0 in (0..n).step_by(block) {
                let i1 = (i0 + block).min(n);
                let (sum, count) = (j0..j1)
                    .flat_map(|j| (i0..i1).map(move |i| (j, i)))
                    .filter(|&(j, i)| self.mask[[j, i]])
                    .fold((0.0, 0usize), |(sum, count), (j, i)| {
                        (sum + self.normalized[[j, i]], count + 1)
                    });
                if count == 0 {
                    continue;
                }
                cells.push(HeatCell {
                    bounds: Bounds {
                        min_x: self.bounds.min_x + i0 as f64 * step_x,
                        max_x: self.bounds.min_x + i1 as f64 * step_x,
                        min_y: self.bounds.min_y + j0 as f64 * step_y,
                        max_y: self.bounds.min_y + j1 as f64 * step_y,
                    },
                    color: self
                        .colormap
                        .map(sum / count as f64)
                        .with_alpha(self.alpha),
                });
            }
        }
        cells
    }
}
