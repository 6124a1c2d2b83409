use super::thresholds::*;
use super::{Calendar, EmployeeHistory, Findings, percentage};
use crate::error::AnalyticsError;
use crate::model::scheduled_shift::ScheduledShift;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Punctuality {
    pub on_time: usize,
    pub total: usize,
    /// Minutes late for every clock-in past the grace period.
    pub late_minutes: Vec<f64>,
}

impl Punctuality {
    pub fn rate(&self) -> f64 {
        percentage(self.on_time as f64, self.total as f64)
    }

    pub fn average_lateness(&self) -> Option<f64> {
        if self.late_minutes.is_empty() {
            None
        } else {
            Some(self.late_minutes.iter().sum::<f64>() / self.late_minutes.len() as f64)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourCompliance {
    pub days: usize,
    pub expected_hours: f64,
    pub actual_hours: f64,
}

impl HourCompliance {
    pub fn rate(&self) -> f64 {
        percentage(self.actual_hours, self.expected_hours)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleAdherence {
    pub total: usize,
    pub adhering: usize,
    pub entry_deviations: usize,
    pub exit_deviations: usize,
}

impl ScheduleAdherence {
    pub fn rate(&self) -> f64 {
        percentage(self.adhering as f64, self.total as f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PauseSummary {
    pub sessions: usize,
    pub average_minutes: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentSummary {
    pub total: usize,
    pub pending: usize,
}

/// Compliance metrics for one employee plus the sentences derived from them.
/// Metrics below their sample floor are `None` and produce no sentences.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceReport {
    pub punctuality: Option<Punctuality>,
    pub hours: Option<HourCompliance>,
    pub adherence: Option<ScheduleAdherence>,
    pub pauses: Option<PauseSummary>,
    pub incidents: IncidentSummary,
    pub absence_day_events: usize,
    pub findings: Findings,
}

/// Days eligible for rate sampling and the shift assigned to each day.
struct SampleFrame<'a> {
    calendar: &'a Calendar,
    absence_days: BTreeSet<NaiveDate>,
    shifts: HashMap<NaiveDate, &'a ScheduledShift>,
}

impl<'a> SampleFrame<'a> {
    fn new(history: &'a EmployeeHistory, calendar: &'a Calendar) -> Self {
        let mut shifts = HashMap::new();
        for shift in &history.shifts {
            shifts.entry(shift.date).or_insert(shift);
        }

        Self {
            calendar,
            absence_days: calendar.absence_days(&history.absences),
            shifts,
        }
    }

    /// Current-month day not covered by an approved absence.
    fn is_rate_day(&self, date: NaiveDate) -> bool {
        self.calendar.in_current_month(date) && !self.absence_days.contains(&date)
    }

    fn shift(&self, date: NaiveDate) -> Option<&'a ScheduledShift> {
        self.shifts.get(&date).copied()
    }

    fn local(&self, ts: chrono::DateTime<chrono::Utc>) -> NaiveDateTime {
        self.calendar.local(ts).naive_local()
    }
}

impl ComplianceReport {
    /// Refuses to run on fewer than `MIN_EVENTS_FOR_INSIGHTS` time events.
    pub fn compute(history: &EmployeeHistory, calendar: &Calendar) -> Result<Self, AnalyticsError> {
        if history.events.len() < MIN_EVENTS_FOR_INSIGHTS {
            return Err(AnalyticsError::InsufficientData {
                message: format!(
                    "At least {MIN_EVENTS_FOR_INSIGHTS} clock events are required to generate insights ({} found)",
                    history.events.len()
                ),
            });
        }

        let frame = SampleFrame::new(history, calendar);

        let mut report = ComplianceReport {
            punctuality: punctuality(history, &frame),
            hours: hour_compliance(history, &frame),
            adherence: schedule_adherence(history, &frame),
            pauses: pause_summary(history, calendar),
            incidents: incident_summary(history, calendar),
            absence_day_events: history
                .events
                .iter()
                .filter(|e| frame.absence_days.contains(&calendar.local_date(e.event_time)))
                .count(),
            findings: Findings::default(),
        };
        report.findings = report.describe(&history.employee_name);

        Ok(report)
    }

    fn describe(&self, name: &str) -> Findings {
        let mut f = Findings::default();

        if let Some(p) = &self.punctuality {
            let rate = p.rate();
            if rate >= PUNCTUALITY_STRENGTH_RATE {
                f.strength(format!("Excellent punctuality: {rate:.0}% of clock-ins on time"));
                f.recognize(format!("Recognize {name} for consistent punctuality"));
            } else if rate < PUNCTUALITY_IMPROVEMENT_RATE {
                let late = p.average_lateness().unwrap_or_default();
                f.improvement(format!(
                    "Punctuality below target: {rate:.0}% of clock-ins on time, {late:.0} minutes late on average when late"
                ));
                f.recommend("Agree on a plan to arrive before the scheduled start time");
            }
        }

        if let Some(h) = &self.hours {
            let rate = h.rate();
            let diff = (h.actual_hours - h.expected_hours).abs();
            if (HOURS_STRENGTH_MIN_RATE..=HOURS_STRENGTH_MAX_RATE).contains(&rate) {
                f.strength(format!(
                    "Hour compliance on target: {rate:.0}% of scheduled hours worked"
                ));
            } else if rate < HOURS_SHORT_RATE {
                f.improvement(format!(
                    "Hour compliance at {rate:.0}%: {diff:.1} hours short of schedule this month"
                ));
                f.recommend("Review missed hours against the assigned schedule");
            } else if rate > HOURS_OVER_RATE {
                f.improvement(format!(
                    "Hour compliance at {rate:.0}%: {diff:.1} hours over schedule this month"
                ));
                f.recommend("Review workload to keep overtime under control");
            }
        }

        if let Some(a) = &self.adherence {
            let rate = a.rate();
            if rate >= ADHERENCE_STRENGTH_RATE {
                f.strength(format!(
                    "Strong schedule adherence: {rate:.0}% of shifts started and ended on time"
                ));
            } else if rate < ADHERENCE_IMPROVEMENT_RATE {
                f.improvement(format!(
                    "Schedule adherence at {rate:.0}%: shifts often deviate more than {ADHERENCE_GRACE_MINUTES} minutes"
                ));
                let (focus, count) = if a.entry_deviations > a.exit_deviations {
                    ("entry times", a.entry_deviations)
                } else if a.exit_deviations > a.entry_deviations {
                    ("exit times", a.exit_deviations)
                } else {
                    ("both entry and exit times", a.entry_deviations)
                };
                f.recommend(format!(
                    "Focus on {focus}: {count} shifts deviated more than {ADHERENCE_GRACE_MINUTES} minutes"
                ));
            }
        }

        if let Some(p) = &self.pauses {
            let avg = p.average_minutes;
            if avg <= PAUSE_STRENGTH_MAX_MINUTES {
                f.strength(format!("Well-managed breaks: {avg:.0} minutes average pause"));
            } else if avg > PAUSE_IMPROVEMENT_MIN_MINUTES {
                f.improvement(format!("Long breaks: {avg:.0} minutes average pause"));
                f.recommend("Review break durations against company policy");
            }
        }

        let months = INSIGHT_LOOKBACK_MONTHS;
        match self.incidents.total {
            0 => {
                f.strength(format!("No incidents in the last {months} months"));
                f.recognize(format!("Recognize {name} for an incident-free record"));
            }
            n if n <= INCIDENTS_MINOR_MAX => {
                f.strength(format!("Only {n} incident(s) in the last {months} months"));
            }
            n => {
                f.improvement(format!("{n} incidents in the last {months} months"));
                f.recommend(format!(
                    "Follow up on the {} pending incidents",
                    self.incidents.pending
                ));
            }
        }

        if self.absence_day_events > 0 {
            f.improvement(format!(
                "{} clock events recorded on approved absence days",
                self.absence_day_events
            ));
            f.recommend("Verify that clock events recorded during approved absences are correct");
        }

        f
    }
}

/// First clock-in of each scheduled day against the shift start.
fn punctuality(history: &EmployeeHistory, frame: &SampleFrame<'_>) -> Option<Punctuality> {
    let mut first_clock_in: BTreeMap<NaiveDate, NaiveDateTime> = BTreeMap::new();
    for event in history.events.iter().filter(|e| e.is_clock_in()) {
        let at = frame.local(event.event_time);
        let date = at.date();
        if !frame.is_rate_day(date) {
            continue;
        }
        first_clock_in
            .entry(date)
            .and_modify(|t| *t = (*t).min(at))
            .or_insert(at);
    }

    let mut result = Punctuality::default();
    for (date, at) in first_clock_in {
        let Some(start) = frame.shift(date).and_then(|s| s.start()) else {
            continue;
        };
        let minutes_late = (at - date.and_time(start)).num_seconds() as f64 / 60.0;
        result.total += 1;
        if minutes_late <= PUNCTUALITY_GRACE_MINUTES {
            result.on_time += 1;
        } else {
            result.late_minutes.push(minutes_late);
        }
    }

    (result.total >= MIN_SAMPLES_FOR_RATE).then_some(result)
}

/// Worked versus expected hours over days with a non-zero expectation.
fn hour_compliance(history: &EmployeeHistory, frame: &SampleFrame<'_>) -> Option<HourCompliance> {
    let mut actual_by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for session in &history.sessions {
        let date = frame.local(session.clock_in_time).date();
        if !frame.is_rate_day(date) {
            continue;
        }
        if frame.shift(date).is_some_and(|s| s.expected_hours > 0.0) {
            *actual_by_day.entry(date).or_default() += session.worked_hours(frame.calendar.now);
        }
    }

    let result = HourCompliance {
        days: actual_by_day.len(),
        expected_hours: actual_by_day
            .keys()
            .filter_map(|d| frame.shift(*d))
            .map(|s| s.expected_hours)
            .sum(),
        actual_hours: actual_by_day.values().sum(),
    };

    (result.days >= MIN_SAMPLES_FOR_RATE).then_some(result)
}

/// Closed sessions whose start and end stay within the grace window of the
/// assigned shift boundaries.
fn schedule_adherence(
    history: &EmployeeHistory,
    frame: &SampleFrame<'_>,
) -> Option<ScheduleAdherence> {
    let grace_secs = ADHERENCE_GRACE_MINUTES * 60;
    let mut result = ScheduleAdherence::default();

    for session in &history.sessions {
        let Some(clock_out) = session.clock_out_time else {
            continue;
        };
        let actual_start = frame.local(session.clock_in_time);
        let actual_end = frame.local(clock_out);
        let date = actual_start.date();
        if !frame.is_rate_day(date) {
            continue;
        }
        let Some(shift) = frame.shift(date) else {
            continue;
        };
        let (start, end) = (shift.start(), shift.end());
        if start.is_none() && end.is_none() {
            continue;
        }

        let entry_ok = start.is_none_or(|start| {
            (actual_start - date.and_time(start)).num_seconds().abs() <= grace_secs
        });
        let exit_ok = end.is_none_or(|end| {
            let mut scheduled_end = date.and_time(end);
            // overnight shift
            if start.is_some_and(|start| end <= start) {
                scheduled_end += Duration::days(1);
            }
            (actual_end - scheduled_end).num_seconds().abs() <= grace_secs
        });

        result.total += 1;
        if !entry_ok {
            result.entry_deviations += 1;
        }
        if !exit_ok {
            result.exit_deviations += 1;
        }
        if entry_ok && exit_ok {
            result.adhering += 1;
        }
    }

    (result.total >= MIN_SAMPLES_FOR_RATE).then_some(result)
}

fn pause_summary(history: &EmployeeHistory, calendar: &Calendar) -> Option<PauseSummary> {
    let pauses: Vec<f64> = history
        .sessions
        .iter()
        .filter(|s| calendar.in_lookback(calendar.local_date(s.clock_in_time)))
        .map(|s| s.pause_ms())
        .filter(|ms| *ms > 0)
        .map(|ms| ms as f64 / 60_000.0)
        .collect();

    if pauses.len() < MIN_SAMPLES_FOR_RATE {
        return None;
    }

    Some(PauseSummary {
        sessions: pauses.len(),
        average_minutes: pauses.iter().sum::<f64>() / pauses.len() as f64,
    })
}

fn incident_summary(history: &EmployeeHistory, calendar: &Calendar) -> IncidentSummary {
    let recent: Vec<_> = history
        .incidents
        .iter()
        .filter(|i| calendar.in_lookback(calendar.local_date(i.created_at)))
        .collect();

    IncidentSummary {
        total: recent.len(),
        pending: recent.iter().filter(|i| i.is_pending()).count(),
    }
}
