//! Availability windows for a single resource on a single day

use chrono::NaiveTime;

use super::ValidationError;

/// Default opening hours used when the caller gives none
pub fn default_open() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN)
}

pub fn default_close() -> NaiveTime {
    NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Half-open `[start, end)` window within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Window {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Window {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Compute the free gaps left inside `[open, close)` by `booked`.
///
/// `booked` may arrive unsorted, overlapping, or spilling past the opening
/// hours; the result is sorted, disjoint and maximal.
///
/// # Example
/// ```
/// use chrono::NaiveTime;
/// use campus_server::models::{free_windows, Window};
///
/// let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
/// let free = free_windows(&[Window::new(t(10), t(12))], t(8), t(18)).unwrap();
/// assert_eq!(free, vec![Window::new(t(8), t(10)), Window::new(t(12), t(18))]);
/// ```
pub fn free_windows(
    booked: &[Window],
    open: NaiveTime,
    close: NaiveTime,
) -> Result<Vec<Window>, ValidationError> {
    if open >= close {
        return Err(ValidationError::InvalidTimeRange {
            reason: "open must be before close",
        });
    }

    let mut clipped: Vec<Window> = booked
        .iter()
        .map(|w| Window::new(w.start.max(open), w.end.min(close)))
        .filter(|w| w.start < w.end)
        .collect();
    clipped.sort();

    let mut free = Vec::new();
    let mut cursor = open;
    for w in clipped {
        if w.start > cursor {
            free.push(Window::new(cursor, w.start));
        }
        cursor = cursor.max(w.end);
    }
    if cursor < close {
        free.push(Window::new(cursor, close));
    }

    Ok(free)
}
