//! Tracing library adapter for build diagnostics.

use std::time::Duration;

use crate::diag::sink::DiagSink;
use crate::diag::stats::BuildStats;

/// Sink that forwards builder diagnostics to the `tracing` crate.
///
/// Per-tile events go to `debug`, drill-downs and the end-of-build summary
/// to `info`. Installed automatically when the debug option is set and no
/// custom sink was injected.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Create a new tracing sink.
    pub fn new() -> Self {
        Self
    }
}

impl DiagSink for TracingSink {
    fn tile_created(
        &self,
        z: u8,
        x: u32,
        y: u32,
        num_features: u32,
        num_points: u32,
        num_simplified: u32,
    ) {
        tracing::debug!(
            z,
            x,
            y,
            num_features,
            num_points,
            num_simplified,
            "tile created"
        );
    }

    fn drill_down(&self, z: u8, x: u32, y: u32) {
        tracing::info!(z, x, y, "drilling down");
    }

    fn activity(&self, name: &str, elapsed: Duration) {
        tracing::debug!(activity = name, elapsed_us = elapsed.as_micros() as u64, "activity");
    }

    fn build_complete(&self, stats: &BuildStats) {
        let mut zooms: Vec<_> = stats.tiles_per_zoom.iter().collect();
        zooms.sort();
        tracing::info!(
            tiles = stats.tiles_created,
            per_zoom = ?zooms,
            "tile index built"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_sink_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TracingSink>();
    }

    #[test]
    fn test_tracing_sink_as_trait_object() {
        // Events are dropped without a subscriber; this only exercises the
        // dispatch path.
        let sink: Box<dyn DiagSink> = Box::new(TracingSink::new());
        sink.tile_created(1, 0, 0, 1, 2, 2);
        sink.drill_down(2, 1, 1);
        sink.build_complete(&BuildStats::default());
    }
}
