use crate::charges::ChargeSet;
use crate::prelude::SeedConfig;
use std::f64::consts::PI;

/// Places field-line start points on a ring around every charge, with a count
/// proportional to the charge's absolute magnitude.
#[derive(Debug, Clone)]
pub struct SeedGenerator {
    lines_per_unit_charge: f64,
    radius: f64,
    max_per_charge: usize,
}

impl SeedGenerator {
    pub fn from_config(config: &SeedConfig) -> Self {
        Self {
            lines_per_unit_charge: config.lines_per_unit_charge,
            radius: config.radius,
            max_per_charge: config.max_per_charge,
        }
    }

    /// `floor(lines_per_unit_charge * |magnitude|)`, capped at `max_per_charge`.
    pub fn count_for(&self, magnitude: f64) -> usize {
        let count = (self.lines_per_unit_charge * magnitude.abs()).floor();
        if count.is_finite() && count > 0.0 {
            (count as usize).min(self.max_per_charge)
        } else {
            0
        }
    }

    pub fn seeds(&self, charges: &ChargeSet) -> Vec<(f64, f64)> {
        let mut out = Vec::new();
        for charge in charges {
            let n = self.count_for(charge.magnitude);
            for k in 0..n {
                let angle = 2.0 * PI * k as f64 / n as f64;
                out.push((
                    charge.x + self.radius * angle.cos(),
                    charge.y + self.radius * angle.sin(),
                ));
            }
        }
        out
    }
}

impl Default for SeedGenerator {
    fn default() -> Self {
        Self::from_config(&SeedConfig::default())
    }
}
