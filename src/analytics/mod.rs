//! Workforce integrity analytics: anomaly detection over company clock events
//! and per-employee performance insights. Everything in here is pure; data is
//! loaded by `crate::repository` and handed in.

pub mod aggregator;
pub mod compliance;
pub mod insight_composer;
pub mod pattern_detector;
pub mod thresholds;
pub mod trend;

use crate::model::{
    absence::Absence, incident::Incident, scheduled_shift::ScheduledShift, time_event::TimeEvent,
    work_session::WorkSession,
};
use chrono::{DateTime, Datelike, FixedOffset, Months, NaiveDate, Offset, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Everything the anomaly detectors need for one company run.
#[derive(Debug, Clone, Default)]
pub struct CompanyActivity {
    pub company_id: String,
    /// employee_id -> display name
    pub employee_names: HashMap<String, String>,
    pub events: Vec<TimeEvent>,
    /// Approved absences of the company's employees.
    pub absences: Vec<Absence>,
}

impl CompanyActivity {
    /// Events grouped per employee, ordered by employee id then event time.
    pub fn events_by_employee(&self) -> BTreeMap<&str, Vec<&TimeEvent>> {
        let mut grouped: BTreeMap<&str, Vec<&TimeEvent>> = BTreeMap::new();
        for event in &self.events {
            grouped.entry(event.user_id.as_str()).or_default().push(event);
        }
        for events in grouped.values_mut() {
            events.sort_by(|a, b| a.event_time.cmp(&b.event_time).then(a.id.cmp(&b.id)));
        }
        grouped
    }

    pub fn employee_name<'a>(&'a self, employee_id: &'a str) -> &'a str {
        self.employee_names
            .get(employee_id)
            .map(String::as_str)
            .unwrap_or(employee_id)
    }
}

/// Trailing history of a single employee, used for insights.
#[derive(Debug, Clone, Default)]
pub struct EmployeeHistory {
    pub employee_id: String,
    pub employee_name: String,
    pub events: Vec<TimeEvent>,
    pub sessions: Vec<WorkSession>,
    pub absences: Vec<Absence>,
    pub shifts: Vec<ScheduledShift>,
    pub incidents: Vec<Incident>,
}

/// Strings produced by the compliance and trend calculators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings {
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub recommendations: Vec<String>,
    pub recognition_suggestions: Vec<String>,
}

impl Findings {
    pub fn strength(&mut self, text: impl Into<String>) {
        self.strengths.push(text.into());
    }

    pub fn improvement(&mut self, text: impl Into<String>) {
        self.areas_for_improvement.push(text.into());
    }

    pub fn recommend(&mut self, text: impl Into<String>) {
        self.recommendations.push(text.into());
    }

    pub fn recognize(&mut self, text: impl Into<String>) {
        self.recognition_suggestions.push(text.into());
    }

    pub fn merge(&mut self, other: Findings) {
        self.strengths.extend(other.strengths);
        self.areas_for_improvement.extend(other.areas_for_improvement);
        self.recommendations.extend(other.recommendations);
        self.recognition_suggestions
            .extend(other.recognition_suggestions);
    }
}

/// Wall-clock view of "now" in the company's offset, with the month windows
/// the insight calculators sample from.
#[derive(Debug, Clone, Copy)]
pub struct Calendar {
    pub offset: FixedOffset,
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
    pub month_start: NaiveDate,
    pub last_month_start: NaiveDate,
    pub lookback_start: NaiveDate,
}

impl Calendar {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let today = now.with_timezone(&offset).date_naive();
        let month_start = today.with_day(1).unwrap_or(today);
        let last_month_start = month_start
            .checked_sub_months(Months::new(1))
            .unwrap_or(month_start);
        let lookback_start = today
            .checked_sub_months(Months::new(thresholds::INSIGHT_LOOKBACK_MONTHS))
            .unwrap_or(today);

        Self {
            offset,
            now,
            today,
            month_start,
            last_month_start,
            lookback_start,
        }
    }

    pub fn local(&self, ts: DateTime<Utc>) -> DateTime<FixedOffset> {
        ts.with_timezone(&self.offset)
    }

    pub fn local_date(&self, ts: DateTime<Utc>) -> NaiveDate {
        self.local(ts).date_naive()
    }

    pub fn in_current_month(&self, date: NaiveDate) -> bool {
        self.month_start <= date && date <= self.today
    }

    pub fn in_last_month(&self, date: NaiveDate) -> bool {
        self.last_month_start <= date && date < self.month_start
    }

    /// Earliest UTC instant worth loading for insights; one extra day absorbs
    /// any offset between the company's wall clock and UTC.
    pub fn lookback_since(&self) -> DateTime<Utc> {
        self.lookback_start
            .pred_opt()
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|start| start.and_utc())
            .unwrap_or(self.now)
    }

    pub fn in_lookback(&self, date: NaiveDate) -> bool {
        self.lookback_start <= date && date <= self.today
    }

    /// Days inside the lookback window covered by an approved absence.
    pub fn absence_days(&self, absences: &[Absence]) -> BTreeSet<NaiveDate> {
        let mut days = BTreeSet::new();
        for absence in absences.iter().filter(|a| a.is_approved()) {
            let from = absence.start_date.max(self.lookback_start);
            let to = absence.end_date.min(self.today);
            if from > to {
                continue;
            }
            days.extend(from.iter_days().take_while(|d| *d <= to));
        }
        days
    }
}

/// Builds a fixed offset from minutes east of UTC, falling back to UTC for
/// values chrono rejects.
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
}

pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { part * 100.0 / whole }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::model::time_event::EventType;
    use chrono::TimeZone;

    pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn event(user_id: &str, event_type: EventType, at: DateTime<Utc>) -> TimeEvent {
        TimeEvent {
            id: format!("{user_id}-{}-{}", event_type, at.timestamp()),
            user_id: user_id.to_string(),
            event_type,
            event_time: at,
            latitude: None,
            longitude: None,
        }
    }

    pub fn clock_in(user_id: &str, at: DateTime<Utc>) -> TimeEvent {
        event(user_id, EventType::ClockIn, at)
    }

    pub fn clock_in_at(user_id: &str, at: DateTime<Utc>, lat: f64, lng: f64) -> TimeEvent {
        TimeEvent {
            latitude: Some(lat),
            longitude: Some(lng),
            ..clock_in(user_id, at)
        }
    }

    pub fn approved_absence(user_id: &str, start: NaiveDate, end: NaiveDate) -> Absence {
        Absence {
            user_id: user_id.to_string(),
            start_date: start,
            end_date: end,
            status: "approved".to_string(),
        }
    }

    pub fn shift(
        user_id: &str,
        day: NaiveDate,
        expected_hours: f64,
        start: Option<&str>,
        end: Option<&str>,
    ) -> ScheduledShift {
        ScheduledShift {
            user_id: user_id.to_string(),
            date: day,
            expected_hours,
            start_time: start.map(str::to_string),
            end_time: end.map(str::to_string),
        }
    }

    pub fn session(
        user_id: &str,
        clock_in: DateTime<Utc>,
        clock_out: Option<DateTime<Utc>>,
        pause_minutes: i64,
    ) -> WorkSession {
        WorkSession {
            user_id: user_id.to_string(),
            clock_in_time: clock_in,
            clock_out_time: clock_out,
            total_pause_duration: Some(pause_minutes * 60_000),
        }
    }

    pub fn incident(user_id: &str, status: &str, at: DateTime<Utc>) -> Incident {
        Incident {
            user_id: user_id.to_string(),
            status: status.to_string(),
            created_at: at,
        }
    }
}
