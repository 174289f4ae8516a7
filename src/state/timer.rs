//! Timer and completion record structures

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Opaque timer / record identifier, stored as creation-time epoch milliseconds
pub type TimerId = String;

/// A named, categorized countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub id: TimerId,
    pub name: String,
    pub category: String,
    /// Total length in seconds, fixed at creation
    pub duration: u64,
    /// Seconds left, always within `0..=duration`
    pub remaining: u64,
    pub running: bool,
}

impl Timer {
    /// Create a stopped timer with the full duration remaining
    pub fn new(id: TimerId, name: String, category: String, duration: u64) -> Self {
        Self {
            id,
            name,
            category,
            duration,
            remaining: duration,
            running: false,
        }
    }

    /// Whether the countdown has reached zero
    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Elapsed share of the duration as a whole percentage
    pub fn progress_percent(&self) -> u8 {
        if self.duration == 0 {
            return 100;
        }
        let duration = u128::from(self.duration);
        let elapsed = duration - u128::from(self.remaining.min(self.duration));
        ((elapsed * 100 + duration / 2) / duration) as u8
    }

    pub(crate) fn reset(&mut self) {
        self.remaining = self.duration;
        self.running = false;
    }
}

/// An entry in the completion history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub id: TimerId,
    /// Name of the timer at the moment it completed
    pub name: String,
    /// Human readable local completion time
    pub time: String,
}

impl CompletionRecord {
    pub fn new(id: TimerId, name: String, completed_at: DateTime<Local>) -> Self {
        Self {
            id,
            name,
            time: format_completion_time(&completed_at),
        }
    }
}

/// Format a timestamp the way the history view shows it, e.g. `10/15/2026, 3:04:05 PM`
pub fn format_completion_time(at: &DateTime<Local>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Issues strictly increasing millisecond ids
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id: the current epoch millis, bumped past the last issued value
    pub fn next_id(&mut self) -> TimerId {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        self.last = now.max(self.last.saturating_add(1));
        self.last.to_string()
    }

    /// Make sure future ids sort after every numeric id in `ids`
    pub fn observe<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            if let Ok(value) = id.parse::<u64>() {
                self.last = self.last.max(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_timer_starts_full_and_stopped() {
        let timer = Timer::new("1".into(), "Study".into(), "Work".into(), 25);
        assert_eq!(timer.remaining, 25);
        assert!(!timer.running);
        assert_eq!(timer.progress_percent(), 0);
    }

    #[test]
    fn progress_rounds_to_nearest_percent() {
        let mut timer = Timer::new("1".into(), "Tea".into(), "Home".into(), 3);
        timer.remaining = 2;
        assert_eq!(timer.progress_percent(), 33);
        timer.remaining = 0;
        assert_eq!(timer.progress_percent(), 100);
    }

    #[test]
    fn progress_handles_huge_durations() {
        let mut timer = Timer::new("1".into(), "Epoch".into(), "Long".into(), 1_000_000_000_000_000_000);
        timer.remaining = 0;
        assert_eq!(timer.progress_percent(), 100);
        timer.remaining = u64::MAX;
        assert_eq!(timer.progress_percent(), 0);
    }

    #[test]
    fn ids_are_unique_within_one_millisecond() {
        let mut ids = IdGenerator::new();
        let a: u64 = ids.next_id().parse().unwrap();
        let b: u64 = ids.next_id().parse().unwrap();
        assert!(b > a);
    }

    #[test]
    fn observed_ids_are_never_reissued() {
        let mut ids = IdGenerator::new();
        ids.observe(["99999999999999", "not-a-number"]);
        assert_eq!(ids.next_id(), "100000000000000");
    }

    #[test]
    fn completion_time_is_locale_style() {
        let at = Local.with_ymd_and_hms(2026, 3, 7, 15, 4, 5).unwrap();
        assert_eq!(format_completion_time(&at), "3/7/2026, 3:04:05 PM");
    }

    #[test]
    fn timer_json_uses_plain_field_names() {
        let timer = Timer::new("42".into(), "Study".into(), "Work".into(), 25);
        let json = serde_json::to_value(&timer).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "42",
                "name": "Study",
                "category": "Work",
                "duration": 25,
                "remaining": 25,
                "running": false
            })
        );
    }
}
