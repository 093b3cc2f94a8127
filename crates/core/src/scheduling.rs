//! Evaluation-cycle scheduling helpers.
//!
//! Pure logic — the scheduler fetches per-company alert settings and passes
//! them in.

use chrono::Duration;

use crate::Timestamp;

/// True when `hour` (0-23, UTC) falls inside the quiet window.
///
/// The window is start-inclusive, end-exclusive and may wrap past midnight:
/// start 22, end 6 covers 22:00-23:59 and 00:00-05:59. A window with either
/// bound unset, or with start == end, is disabled.
pub fn in_quiet_hours(hour: u8, start: Option<i16>, end: Option<i16>) -> bool {
    let (Some(start), Some(end)) = (start, end) else {
        return false;
    };
    if start == end {
        return false;
    }
    let h = i16::from(hour);
    if start < end {
        start <= h && h < end
    } else {
        h >= start || h < end
    }
}

/// True when a company is due for an evaluation cycle.
///
/// Companies that have never been evaluated are always due.
pub fn due_for_check(
    last_evaluated_at: Option<Timestamp>,
    check_interval_minutes: i32,
    now: Timestamp,
) -> bool {
    match last_evaluated_at {
        None => true,
        Some(last) => now - last >= Duration::minutes(i64::from(check_interval_minutes)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
