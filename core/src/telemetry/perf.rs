use log::debug;
use std::time::Instant;

/// Logs the wall time of the enclosing block when dropped.
pub struct Scope<'a> {
    label: &'a str,
    start: Instant,
}

impl<'a> Scope<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        debug!(
            "[perf] {}: {:.3} ms",
            self.label,
            elapsed.as_secs_f64() * 1000.0
        );
    }
}
