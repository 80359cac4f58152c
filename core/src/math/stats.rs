pub struct StatsHelper;

impl StatsHelper {
    /// Percentile `p` (0..=100) with linear interpolation between the two
    /// nearest order statistics. Reorders `values` in place. Returns `None`
    /// for an empty slice.
    pub fn percentile(values: &mut [f64], p: f64) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let rank = (p.clamp(0.0, 100.0) / 100.0) * (values.len() - 1) as f64;
        let lower = rank.floor() as usize;
        let fraction = rank - lower as f64;

        let (_, lower_value, upper_part) = values.select_nth_unstable_by(lower, f64::total_cmp);
        let lower_value = *lower_value;
        if fraction == 0.0 || upper_part.is_empty() {
            return Some(lower_value);
        }
        let upper_value = upper_part
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        Some(lower_value + (upper_value - lower_value) * fraction)
    }

    /// Evenly spaced values over `[start, end]`, endpoints included.
    pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (end - start) / (count - 1) as f64;
                (0..count).map(|i| start + step * i as f64).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_of_empty_slice_is_none() {
        assert_eq!(StatsHelper::percentile(&mut [], 50.0), None);
    }

    #[test]
    fn percentile_interpolates_between_order_statistics() {
        let mut values = vec![4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(StatsHelper::percentile(&mut values, 50.0), Some(3.0));
        let mut values = vec![10.0, 0.0];
        let p = StatsHelper::percentile(&mut values, 10.0).unwrap();
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn percentile_extremes_hit_min_and_max() {
        let mut values: Vec<f64> = (0..101).rev().map(f64::from).collect();
        assert_eq!(StatsHelper::percentile(&mut values, 0.0), Some(0.0));
        assert_eq!(StatsHelper::percentile(&mut values, 100.0), Some(100.0));
        assert_eq!(StatsHelper::percentile(&mut values, 90.0), Some(90.0));
    }

    #[test]
    fn linspace_includes_both_endpoints() {
        let levels = StatsHelper::linspace(-20.0, 20.0, 100);
        assert_eq!(levels.len(), 100);
        assert_eq!(levels[0], -20.0);
        assert!((levels[99] - 20.0).abs() < 1e-12);
    }
}
