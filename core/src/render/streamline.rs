use super::scene::Polyline;
use crate::field::{Bounds, FieldData};
use crate::prelude::StreamlineConfig;

/// Coarse occupancy grid that keeps field lines from bunching up. A trace
/// stops when it steps into a cell claimed by an earlier trace.
struct OccupancyMask {
    size: usize,
    bounds: Bounds,
    occupied: Vec<bool>,
}

impl OccupancyMask {
    fn new(bounds: Bounds, density: f64) -> Self {
        let size = ((30.0 * density).round() as usize).max(1);
        Self {
            size,
            bounds,
            occupied: vec![false; size * size],
        }
    }

    fn cell(&self, x: f64, y: f64) -> Option<usize> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let scale = self.size as f64;
        let ci = (((x - self.bounds.min_x) / self.bounds.width()) * scale) as usize;
        let cj = (((y - self.bounds.min_y) / self.bounds.height()) * scale) as usize;
        Some(cj.min(self.size - 1) * self.size + ci.min(self.size - 1))
    }

    fn release(&mut self, cells: &[usize]) {
        for &cell in cells {
            self.occupied[cell] = false;
        }
    }
}

/// Traces field lines through a sampled field with fixed-step RK4 on the
/// unit direction of E.
pub struct StreamlineTracer<'a> {
    field: &'a FieldData,
    config: &'a StreamlineConfig,
}

impl<'a> StreamlineTracer<'a> {
    pub fn new(field: &'a FieldData, config: &'a StreamlineConfig) -> Self {
        Self { field, config }
    }

    pub fn trace_all(&self, seeds: &[(f64, f64)]) -> Vec<Polyline> {
        let bounds = self.field.grid().bounds();
        let mut mask = OccupancyMask::new(bounds, self.config.density);
        let mut lines = Vec::new();

        for &seed in seeds {
            let Some(start) = mask.cell(seed.0, seed.1) else {
                continue;
            };
            if mask.occupied[start] {
                continue;
            }
            mask.occupied[start] = true;
            let mut claimed = vec![start];

            let forward = self.walk(seed, 1.0, start, &mut mask, &mut claimed);
            let backward = self.walk(seed, -1.0, start, &mut mask, &mut claimed);

            let mut points = Vec::with_capacity(backward.len() + forward.len() + 1);
            points.extend(backward.into_iter().rev());
            points.push(seed);
            points.extend(forward);

            let line = Polyline::open(points);
            if line.points.len() < 2 || line.length() < self.config.min_length {
                mask.release(&claimed);
                continue;
            }
            lines.push(line);
        }
        lines
    }

    fn walk(
        &self,
        seed: (f64, f64),
        sign: f64,
        start: usize,
        mask: &mut OccupancyMask,
        claimed: &mut Vec<usize>,
    ) -> Vec<(f64, f64)> {
        let mut points = Vec::new();
        let mut position = seed;
        let mut current = start;

        for _ in 0..self.config.max_steps {
            let Some(next) = self.rk4_step(position, sign) else {
                break;
            };
            let Some(cell) = mask.cell(next.0, next.1) else {
                break;
            };
            if cell != current {
                if mask.occupied[cell] {
                    break;
                }
                mask.occupied[cell] = true;
                claimed.push(cell);
                current = cell;
            }
            points.push(next);
            position = next;
        }
        points
    }

    fn direction(&self, (x, y): (f64, f64), sign: f64) -> Option<(f64, f64)> {
        let (ex, ey) = self.field.sample(x, y)?;
        let magnitude = ex.hypot(ey);
        if !magnitude.is_finite() || magnitude < self.config.min_field {
            return None;
        }
        Some((sign * ex / magnitude, sign * ey / magnitude))
    }

    fn rk4_step(&self, p: (f64, f64), sign: f64) -> Option<(f64, f64)> {
        let h = self.config.step;
        let k1 = self.direction(p, sign)?;
        let k2 = self.direction((p.0 + 0.5 * h * k1.0, p.1 + 0.5 * h * k1.1), sign)?;
        let k3 = self.direction((p.0 + 0.5 * h * k2.0, p.1 + 0.5 * h * k2.1), sign)?;
        let k4 = self.direction((p.0 + h * k3.0, p.1 + h * k3.1), sign)?;
        let dx = (k1.0 + 2.0 * k2.0 + 2.0 * k3.0 + k4.0) / 6.0;
        let dy = (k1.1 + 2.0 * k2.1 + 2.0 * k3.1 + k4.1) / 6.0;
        Some((p.0 + h * dx, p.1 + h * dy))
    }
}
