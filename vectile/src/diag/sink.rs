//! Diagnostics sink trait definition.

use std::time::Duration;

use crate::diag::stats::BuildStats;

/// Receiver for builder diagnostics.
///
/// Implementations must be `Send + Sync`; the pyramid shares one sink across
/// construction and every drill-down. All methods default to no-ops so a
/// sink can observe only the events it cares about.
pub trait DiagSink: Send + Sync {
    /// A tile was created at `(z, x, y)`.
    fn tile_created(
        &self,
        z: u8,
        x: u32,
        y: u32,
        num_features: u32,
        num_points: u32,
        num_simplified: u32,
    ) {
        let _ = (z, x, y, num_features, num_points, num_simplified);
    }

    /// A query is drilling down towards `(z, x, y)`.
    fn drill_down(&self, z: u8, x: u32, y: u32) {
        let _ = (z, x, y);
    }

    /// A named build activity finished.
    fn activity(&self, name: &str, elapsed: Duration) {
        let _ = (name, elapsed);
    }

    /// Construction finished with the given accumulated counters.
    fn build_complete(&self, stats: &BuildStats) {
        let _ = stats;
    }
}
