use serde::{Deserialize, Serialize};

/// A point source with a signed magnitude. The sign selects polarity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub magnitude: f64,
    pub x: f64,
    pub y: f64,
}

impl Charge {
    pub fn new(magnitude: f64, x: f64, y: f64) -> Self {
        Self { magnitude, x, y }
    }

    pub fn is_positive(&self) -> bool {
        self.magnitude > 0.0
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (x - self.x).hypot(y - self.y)
    }

    /// Same position, different magnitude.
    pub fn with_magnitude(&self, magnitude: f64) -> Self {
        Self { magnitude, ..*self }
    }
}
