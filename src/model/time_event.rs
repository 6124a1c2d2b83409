use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{Display, EnumString};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventType {
    ClockIn,
    ClockOut,
    PauseStart,
    PauseEnd,
}

/// A single clock action. Read-only for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEvent {
    pub id: String,
    pub user_id: String,
    pub event_type: EventType,
    pub event_time: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl TimeEvent {
    pub fn is_clock_in(&self) -> bool {
        self.event_type == EventType::ClockIn
    }

    /// Both coordinates, when the device reported a position.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// Raw `time_events` row; `event_type` is kept as text until validated.
#[derive(Debug, sqlx::FromRow)]
pub struct TimeEventRow {
    pub id: String,
    pub user_id: String,
    pub event_type: String,
    pub event_time: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl TryFrom<TimeEventRow> for TimeEvent {
    type Error = String;

    fn try_from(row: TimeEventRow) -> Result<Self, Self::Error> {
        let event_type = EventType::from_str(&row.event_type)
            .map_err(|_| format!("unknown event_type '{}'", row.event_type))?;

        Ok(TimeEvent {
            id: row.id,
            user_id: row.user_id,
            event_type,
            event_time: row.event_time,
            latitude: row.latitude,
            longitude: row.longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(event_type: &str) -> TimeEventRow {
        TimeEventRow {
            id: "e1".into(),
            user_id: "u1".into(),
            event_type: event_type.into(),
            event_time: Utc.with_ymd_and_hms(2024, 3, 3, 9, 0, 0).unwrap(),
            latitude: Some(40.4168),
            longitude: None,
        }
    }

    #[test]
    fn converts_known_event_types() {
        let event = TimeEvent::try_from(row("pause_start")).unwrap();
        assert_eq!(event.event_type, EventType::PauseStart);
        assert_eq!(event.coordinates(), None);
    }

    #[test]
    fn rejects_unknown_event_types() {
        let err = TimeEvent::try_from(row("lunch")).unwrap_err();
        assert!(err.contains("lunch"));
    }
}
