//! Field-computation and re-render core for the interactive electrostatics
//! visualizer.
//!
//! Charges live in a [`charges::ChargeSet`]; every edit re-runs the full
//! sampler → seeds → render pipeline and yields a backend-neutral
//! [`render::Scene`] that front-ends draw or export.

pub mod charges;
pub mod field;
pub mod interaction;
pub mod math;
pub mod prelude;
pub mod render;
pub mod telemetry;

pub use prelude::{FieldConfig, FieldError, FieldResult};
