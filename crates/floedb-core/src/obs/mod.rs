//! Module: obs — observability boundary.
//!
//! Responsibility: metric event vocabulary and the sink that aggregates it.
//! Core code emits events through `record`; it never touches counter state.

pub mod sink;

pub use sink::{EventReport, metrics_report, metrics_reset};

///
/// CursorKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CursorKind {
    IndexScan,
    Partitioned,
    Dummy,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    CursorOpen { kind: CursorKind },
    RowsScanned { rows: u64 },
}

/// Emit one metric event into the sink.
pub(crate) fn record(event: MetricsEvent) {
    sink::record(event);
}
