pub mod log;
pub mod metrics;
pub mod perf;

pub use log::LogManager;
pub use metrics::{MetricsSnapshot, RenderMetrics};
pub use perf::Scope;
