//! Clock port for testable timestamps.

use chrono::{DateTime, Utc};

/// Source of "now" for event records and locally created entities.
#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
