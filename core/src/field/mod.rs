pub mod grid;
pub mod sampler;
pub mod seeds;

pub use grid::{Bounds, SampleGrid};
pub use sampler::{FieldData, FieldSampler};
pub use seeds::SeedGenerator;
