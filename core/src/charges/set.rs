use super::charge::Charge;
use crate::prelude::{FieldError, FieldResult};

/// Ordered charge collection; insertion order decides which charge wins a
/// proximity query when several overlap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargeSet {
    charges: Vec<Charge>,
}

impl ChargeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, magnitude: f64, x: f64, y: f64) -> usize {
        self.charges.push(Charge::new(magnitude, x, y));
        self.charges.len() - 1
    }

    /// Lowest index whose distance to `(x, y)` is strictly below `radius`.
    pub fn find_near(&self, x: f64, y: f64, radius: f64) -> Option<usize> {
        self.charges
            .iter()
            .position(|charge| charge.distance_to(x, y) < radius)
    }

    pub fn remove_at(&mut self, index: usize) -> FieldResult<Charge> {
        self.check_index(index)?;
        Ok(self.charges.remove(index))
    }

    /// Replaces the magnitude in place and returns the previous one.
    pub fn set_magnitude_at(&mut self, index: usize, magnitude: f64) -> FieldResult<f64> {
        self.check_index(index)?;
        let slot = &mut self.charges[index];
        let previous = slot.magnitude;
        *slot = slot.with_magnitude(magnitude);
        Ok(previous)
    }

    pub fn clear(&mut self) {
        self.charges.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Charge> {
        self.charges.get(index)
    }

    pub fn len(&self) -> usize {
        self.charges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Charge> {
        self.charges.iter()
    }

    pub fn as_slice(&self) -> &[Charge] {
        &self.charges
    }

    fn check_index(&self, index: usize) -> FieldResult<()> {
        if index < self.charges.len() {
            Ok(())
        } else {
            Err(FieldError::ChargeIndex {
                index,
                len: self.charges.len(),
            })
        }
    }
}

impl FromIterator<Charge> for ChargeSet {
    fn from_iter<I: IntoIterator<Item = Charge>>(iter: I) -> Self {
        Self {
            charges: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ChargeSet {
    type Item = &'a Charge;
    type IntoIter = std::slice::Iter<'a, Charge>;

    fn into_iter(self) -> Self::IntoIter {
        self.charges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_appends_in_creation_order() {
        let mut set = ChargeSet::new();
        assert_eq!(set.add(1.0, 0.0, 0.0), 0);
        assert_eq!(set.add(-1.0, 2.0, 0.0), 1);
        assert_eq!(set.get(1), Some(&Charge::new(-1.0, 2.0, 0.0)));
    }

    #[test]
    fn find_near_prefers_lowest_index_over_closest() {
        let mut set = ChargeSet::new();
        set.add(1.0, 0.2, 0.0);
        set.add(-1.0, 0.0, 0.0);
        set.add(1.0, 0.1, 0.0);
        assert_eq!(set.find_near(0.0, 0.0, 0.3), Some(0));
        assert_eq!(set.find_near(-0.25, 0.0, 0.3), Some(1));
    }

    #[test]
    fn find_near_radius_is_exclusive() {
        let mut set = ChargeSet::new();
        set.add(1.0, 0.0, 0.0);
        assert_eq!(set.find_near(0.3, 0.0, 0.3), None);
        assert_eq!(set.find_near(0.29, 0.0, 0.3), Some(0));
        assert_eq!(set.find_near(5.0, 5.0, 0.3), None);
    }

    #[test]
    fn remove_at_shifts_later_indices() {
        let mut set: ChargeSet = vec![
            Charge::new(1.0, 0.0, 0.0),
            Charge::new(2.0, 1.0, 0.0),
            Charge::new(3.0, 2.0, 0.0),
        ]
        .into_iter()
        .collect();
        let removed = set.remove_at(0).unwrap();
        assert_eq!(removed.magnitude, 1.0);
        assert_eq!(set.get(0).map(|c| c.magnitude), Some(2.0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn set_magnitude_keeps_position() {
        let mut set = ChargeSet::new();
        set.add(1.0, 3.0, -4.0);
        let previous = set.set_magnitude_at(0, -2.5).unwrap();
        assert_eq!(previous, 1.0);
        assert_eq!(set.get(0), Some(&Charge::new(-2.5, 3.0, -4.0)));
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let mut set = ChargeSet::new();
        assert!(matches!(
            set.remove_at(0),
            Err(FieldError::ChargeIndex { index: 0, len: 0 })
        ));
        assert!(set.set_magnitude_at(3, 1.0).is_err());
    }

    #[test]
    fn clear_empties_the_set() {
        let mut set = ChargeSet::new();
        set.add(1.0, 0.0, 0.0);
        set.add(1.0, 0.0, 0.0);
        set.clear();
        assert!(set.is_empty());
    }
}
