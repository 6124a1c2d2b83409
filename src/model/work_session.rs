use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkSession {
    pub user_id: String,
    pub clock_in_time: DateTime<Utc>,
    pub clock_out_time: Option<DateTime<Utc>>,
    /// Milliseconds spent paused inside the session.
    pub total_pause_duration: Option<i64>,
}

impl WorkSession {
    /// Worked hours net of pauses. Open sessions are measured up to `now`.
    pub fn worked_hours(&self, now: DateTime<Utc>) -> f64 {
        let end = self.clock_out_time.unwrap_or(now);
        let gross_ms = (end - self.clock_in_time).num_milliseconds();
        let net_ms = (gross_ms - self.pause_ms()).max(0);
        net_ms as f64 / 3_600_000.0
    }

    pub fn pause_ms(&self) -> i64 {
        self.total_pause_duration.unwrap_or(0).max(0)
    }
}
