// ── Query time windows ──

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A closed time range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The trailing window `[now - hours, now]`. Saturates at the earliest
    /// representable time.
    pub fn trailing(hours: u32, now: DateTime<Utc>) -> Self {
        let start = Duration::try_hours(i64::from(hours))
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end: now }
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn trailing_window_is_closed_on_both_ends() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap_or_default();
        let w = TimeWindow::trailing(24, now);
        assert_eq!(w.start, now - Duration::hours(24));
        assert!(w.contains(w.start));
        assert!(w.contains(now));
        assert!(!w.contains(now + Duration::seconds(1)));
    }

    #[test]
    fn oversized_window_saturates() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap_or_default();
        let w = TimeWindow::trailing(u32::MAX, now);
        assert_eq!(w.start, DateTime::<Utc>::MIN_UTC);
        assert_eq!(w.end, now);
        assert!(w.contains(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).single().unwrap_or_default()));
    }
}
