use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const RED: Rgba = Rgba::rgb(1.0, 0.0, 0.0);
    pub const BLUE: Rgba = Rgba::rgb(0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(&self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

// Matplotlib "coolwarm" anchors.
const COOLWARM: [(f32, [f32; 3]); 5] = [
    (0.0, [0.230, 0.299, 0.754]),
    (0.25, [0.552, 0.690, 0.996]),
    (0.5, [0.865, 0.865, 0.865]),
    (0.75, [0.958, 0.604, 0.482]),
    (1.0, [0.706, 0.016, 0.150]),
];

/// Diverging blue-white-red colormap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Colormap {
    #[default]
    CoolWarm,
}

impl Colormap {
    /// Color for a normalized value; `t` is clamped into `0.0..=1.0`.
    pub fn map(&self, t: f64) -> Rgba {
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) as f32 };
        match self {
            Colormap::CoolWarm => {
                let upper = COOLWARM
                    .iter()
                    .position(|(stop, _)| *stop >= t)
                    .unwrap_or(COOLWARM.len() - 1)
                    .max(1);
                let (t0, c0) = COOLWARM[upper - 1];
                let (t1, c1) = COOLWARM[upper];
                let f = (t - t0) / (t1 - t0);
                Rgba::rgb(
                    c0[0] + (c1[0] - c0[0]) * f,
                    c0[1] + (c1[1] - c0[1]) * f,
                    c0[2] + (c1[2] - c0[2]) * f,
                )
            }
        }
    }
}
