use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScheduledShift {
    pub user_id: String,
    pub date: NaiveDate,
    pub expected_hours: f64,
    /// "HH:MM" wall-clock time in the company's offset.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl ScheduledShift {
    pub fn start(&self) -> Option<NaiveTime> {
        self.start_time.as_deref().and_then(parse_clock_time)
    }

    pub fn end(&self) -> Option<NaiveTime> {
        self.end_time.as_deref().and_then(parse_clock_time)
    }
}

/// Accepts "HH:MM" and the "HH:MM:SS" form MySQL TIME columns render as.
fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_time_forms() {
        let shift = ScheduledShift {
            user_id: "u1".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            expected_hours: 8.0,
            start_time: Some("09:00".into()),
            end_time: Some("17:30:00".into()),
        };
        assert_eq!(shift.start(), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(shift.end(), NaiveTime::from_hms_opt(17, 30, 0));
    }

    #[test]
    fn garbage_time_is_treated_as_undefined() {
        assert_eq!(parse_clock_time("9am"), None);
    }
}
