//! No-operation diagnostics sink.

use crate::diag::sink::DiagSink;

/// A sink that discards every event.
///
/// The default for quiet builds and the right choice for benchmarks and
/// unit tests where diagnostic output would be noise.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagSink for NoopSink {}
