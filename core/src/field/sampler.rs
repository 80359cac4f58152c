use super::grid::SampleGrid;
use crate::charges::ChargeSet;
use crate::prelude::ChargeConfig;
use ndarray::Array2;

/// Added to every distance so a sample exactly on a charge cannot divide by zero.
pub const DISTANCE_EPSILON: f64 = 1e-20;

/// Field components, potential and the shared validity mask on a sample grid.
#[derive(Debug, Clone)]
pub struct FieldData {
    grid: SampleGrid,
    pub ex: Array2<f64>,
    pub ey: Array2<f64>,
    pub potential: Array2<f64>,
    /// `false` wherever a sample lies within the exclusion radius of any charge.
    pub mask: Array2<bool>,
}

impl FieldData {
    pub fn grid(&self) -> &SampleGrid {
        &self.grid
    }

    pub fn is_valid(&self, j: usize, i: usize) -> bool {
        self.mask[[j, i]]
    }

    pub fn potential_at(&self, j: usize, i: usize) -> Option<f64> {
        self.mask[[j, i]].then(|| self.potential[[j, i]])
    }

    pub fn field_at(&self, j: usize, i: usize) -> Option<(f64, f64)> {
        self.mask[[j, i]].then(|| (self.ex[[j, i]], self.ey[[j, i]]))
    }

    /// Potential values at every valid sample, in row-major order.
    pub fn valid_potentials(&self) -> Vec<f64> {
        self.potential
            .iter()
            .zip(self.mask.iter())
            .filter_map(|(&value, &valid)| valid.then_some(value))
            .collect()
    }

    pub fn valid_fraction(&self) -> f64 {
        let valid = self.mask.iter().filter(|&&valid| valid).count();
        valid as f64 / self.mask.len() as f64
    }

    /// Bilinearly interpolated (Ex, Ey) at a data-space point. `None` when the
    /// point is off the grid or any of the four surrounding samples is masked.
    pub fn sample(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let last = (self.grid.resolution() - 1) as f64;
        let fi = self.grid.fractional_index(x);
        let fj = self.grid.fractional_index(y);
        if !(0.0..=last).contains(&fi) || !(0.0..=last).contains(&fj) {
            return None;
        }

        let i0 = (fi.floor() as usize).min(self.grid.resolution() - 2);
        let j0 = (fj.floor() as usize).min(self.grid.resolution() - 2);
        let tx = fi - i0 as f64;
        let ty = fj - j0 as f64;

        let corners = [(j0, i0), (j0, i0 + 1), (j0 + 1, i0), (j0 + 1, i0 + 1)];
        if corners.iter().any(|&(j, i)| !self.mask[[j, i]]) {
            return None;
        }

        let lerp2 = |field: &Array2<f64>| {
            let bottom = field[[j0, i0]] * (1.0 - tx) + field[[j0, i0 + 1]] * tx;
            let top = field[[j0 + 1, i0]] * (1.0 - tx) + field[[j0 + 1, i0 + 1]] * tx;
            bottom * (1.0 - ty) + top * ty
        };
        Some((lerp2(&self.ex), lerp2(&self.ey)))
    }
}

/// Superposes Coulomb contributions of every charge on every grid sample.
#[derive(Debug, Clone, Copy)]
pub struct FieldSampler {
    exclusion_radius: f64,
}

impl FieldSampler {
    pub fn new(exclusion_radius: f64) -> Self {
        Self { exclusion_radius }
    }

    pub fn from_config(config: &ChargeConfig) -> Self {
        Self::new(config.exclusion_radius)
    }

    pub fn compute(&self, grid: &SampleGrid, charges: &ChargeSet) -> FieldData {
        let n = grid.resolution();
        let coords = grid.coords();
        let mut ex = Array2::<f64>::zeros((n, n));
        let mut ey = Array2::<f64>::zeros((n, n));
        let mut potential = Array2::<f64>::zeros((n, n));
        let mut mask = Array2::from_elem((n, n), true);

        for (j, &y) in coords.iter().enumerate() {
            for (i, &x) in coords.iter().enumerate() {
                let mut sum_x = 0.0;
                let mut sum_y = 0.0;
                let mut sum_v = 0.0;
                let mut valid = true;
                for charge in charges {
                    let dx = x - charge.x;
                    let dy = y - charge.y;
                    let r = (dx * dx + dy * dy).sqrt() + DISTANCE_EPSILON;
                    valid &= r > self.exclusion_radius;
                    let r3 = r * r * r;
                    sum_x += charge.magnitude * dx / r3;
                    sum_y += charge.magnitude * dy / r3;
                    sum_v += charge.magnitude / r;
                }
                ex[[j, i]] = sum_x;
                ey[[j, i]] = sum_y;
                potential[[j, i]] = sum_v;
                mask[[j, i]] = valid;
            }
        }

        FieldData {
            grid: grid.clone(),
            ex,
            ey,
            potential,
            mask,
        }
    }
}

impl Default for FieldSampler {
    fn default() -> Self {
        Self::from_config(&ChargeConfig::default())
    }
}
