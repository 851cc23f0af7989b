use crate::obs::{CursorKind, MetricsEvent};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

thread_local! {
    static EVENT_STATE: RefCell<EventReport> = RefCell::new(EventReport::default());
}

///
/// EventReport
///
/// Aggregated counters since the last reset.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub cursors_index_scan: u64,
    pub cursors_partitioned: u64,
    pub cursors_dummy: u64,
    pub rows_scanned: u64,
}

pub(crate) fn record(event: MetricsEvent) {
    EVENT_STATE.with_borrow_mut(|state| match event {
        MetricsEvent::CursorOpen { kind } => match kind {
            CursorKind::IndexScan => state.cursors_index_scan += 1,
            CursorKind::Partitioned => state.cursors_partitioned += 1,
            CursorKind::Dummy => state.cursors_dummy += 1,
        },
        MetricsEvent::RowsScanned { rows } => state.rows_scanned += rows,
    });
}

/// Snapshot the aggregated counters.
#[must_use]
pub fn metrics_report() -> EventReport {
    EVENT_STATE.with_borrow(Clone::clone)
}

/// Reset all counters to zero.
pub fn metrics_reset() {
    EVENT_STATE.with_borrow_mut(|state| *state = EventReport::default());
}

///
/// TESTS
///
