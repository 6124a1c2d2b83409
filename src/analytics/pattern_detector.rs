use super::CompanyActivity;
use super::thresholds::*;
use crate::model::{
    absence::Absence,
    anomaly::{Anomaly, AnomalyType},
    time_event::TimeEvent,
};
use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Rounded coordinate cell, in thousandths of a degree.
pub type LocationCell = (i64, i64);

pub fn location_cell(lat: f64, lng: f64) -> LocationCell {
    (
        (lat * LOCATION_GRID_SCALE).round() as i64,
        (lng * LOCATION_GRID_SCALE).round() as i64,
    )
}

/// Which employees have at least one event in each cell. Built once per
/// company run so the location cross-check never rescans all events.
#[derive(Debug, Default)]
pub struct LocationIndex<'a> {
    cells: HashMap<LocationCell, BTreeSet<&'a str>>,
}

impl<'a> LocationIndex<'a> {
    pub fn build(events: &'a [TimeEvent]) -> Self {
        let mut cells: HashMap<LocationCell, BTreeSet<&'a str>> = HashMap::new();
        for event in events {
            if let Some((lat, lng)) = event.coordinates() {
                cells
                    .entry(location_cell(lat, lng))
                    .or_default()
                    .insert(event.user_id.as_str());
            }
        }
        Self { cells }
    }

    pub fn other_employees_at(&self, cell: LocationCell, employee_id: &str) -> usize {
        self.cells
            .get(&cell)
            .map(|ids| ids.iter().filter(|id| **id != employee_id).count())
            .unwrap_or(0)
    }
}

/// Employee an anomaly is attributed to.
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    pub id: &'a str,
    pub name: &'a str,
}

impl Subject<'_> {
    fn anomaly(
        &self,
        anomaly_type: AnomalyType,
        description: String,
        confidence: u8,
        evidence: Vec<String>,
    ) -> Anomaly {
        Anomaly {
            anomaly_type,
            employee_id: self.id.to_string(),
            employee_name: self.name.to_string(),
            description,
            confidence,
            evidence,
        }
    }
}

/// Runs every heuristic for every employee of the company. Output is ordered
/// by employee id, then by heuristic.
pub fn detect_company_anomalies(activity: &CompanyActivity, offset: FixedOffset) -> Vec<Anomaly> {
    let location_index = LocationIndex::build(&activity.events);

    let mut absences_by_employee: HashMap<&str, Vec<&Absence>> = HashMap::new();
    for absence in activity.absences.iter().filter(|a| a.is_approved()) {
        absences_by_employee
            .entry(absence.user_id.as_str())
            .or_default()
            .push(absence);
    }

    activity
        .events_by_employee()
        .into_iter()
        .flat_map(|(employee_id, events)| {
            let subject = Subject {
                id: employee_id,
                name: activity.employee_name(employee_id),
            };
            let absences = absences_by_employee
                .get(employee_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            detect_employee_anomalies(subject, &events, absences, &location_index, offset)
        })
        .collect()
}

/// Heuristics for one employee. `events` holds all of the employee's events;
/// employees with too few clock-ins are skipped entirely.
pub fn detect_employee_anomalies(
    subject: Subject<'_>,
    events: &[&TimeEvent],
    absences: &[&Absence],
    location_index: &LocationIndex<'_>,
    offset: FixedOffset,
) -> Vec<Anomaly> {
    let clock_ins: Vec<DateTime<FixedOffset>> = events
        .iter()
        .filter(|e| e.is_clock_in())
        .map(|e| e.event_time.with_timezone(&offset))
        .collect();

    if clock_ins.len() < MIN_CLOCK_INS_FOR_PATTERNS {
        return Vec::new();
    }

    let found: Vec<Anomaly> = [
        exact_time_pattern(subject, &clock_ins),
        same_location(subject, events, location_index),
        perfect_pattern(subject, &clock_ins),
        off_hours(subject, &clock_ins),
        absence_conflict(subject, events, absences, offset),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !found.is_empty() {
        debug!(employee_id = subject.id, anomalies = found.len(), "Anomalies detected");
    }

    found
}

/// Many clock-ins sharing the same hour, minute and second.
pub fn exact_time_pattern(
    subject: Subject<'_>,
    clock_ins: &[DateTime<FixedOffset>],
) -> Option<Anomaly> {
    let total = clock_ins.len();
    if total == 0 {
        return None;
    }

    let mut buckets: BTreeMap<(u32, u32, u32), usize> = BTreeMap::new();
    for ts in clock_ins {
        *buckets
            .entry((ts.hour(), ts.minute(), ts.second()))
            .or_default() += 1;
    }

    let ((h, m, s), count) = buckets.into_iter().find(|(_, count)| {
        *count >= EXACT_TIME_MIN_COUNT && *count as f64 / total as f64 >= EXACT_TIME_MIN_RATIO
    })?;

    let weighted = count as f64 * EXACT_TIME_RATIO_WEIGHT / total as f64;
    let confidence = (EXACT_TIME_BASE_CONFIDENCE + weighted)
        .min(EXACT_TIME_MAX_CONFIDENCE)
        .round() as u8;
    let time = format!("{h:02}:{m:02}:{s:02}");

    Some(subject.anomaly(
        AnomalyType::ExactTimePattern,
        format!("{count} of {total} clock-ins happened at exactly {time}"),
        confidence,
        vec![
            format!("Clock-in time {time} repeated {count}/{total} times"),
            format!(
                "{:.0}% of clock-ins share the same second",
                count as f64 / total as f64 * 100.0
            ),
        ],
    ))
}

/// Repeated clock-ins from a cell where at least two other employees also
/// clock in.
pub fn same_location(
    subject: Subject<'_>,
    events: &[&TimeEvent],
    location_index: &LocationIndex<'_>,
) -> Option<Anomaly> {
    let mut own_cells: BTreeMap<LocationCell, usize> = BTreeMap::new();
    for (lat, lng) in events.iter().filter_map(|e| e.coordinates()) {
        *own_cells.entry(location_cell(lat, lng)).or_default() += 1;
    }

    own_cells.into_iter().find_map(|(cell, count)| {
        if count < LOCATION_MIN_EVENTS {
            return None;
        }
        let others = location_index.other_employees_at(cell, subject.id);
        if others < LOCATION_MIN_OTHER_EMPLOYEES {
            return None;
        }

        let (lat, lng) = (
            cell.0 as f64 / LOCATION_GRID_SCALE,
            cell.1 as f64 / LOCATION_GRID_SCALE,
        );
        Some(subject.anomaly(
            AnomalyType::SameLocation,
            format!("{count} events from a location shared with {others} other employees"),
            SAME_LOCATION_CONFIDENCE,
            vec![
                format!("{count} events at ({lat:.3}, {lng:.3})"),
                format!("{others} other employees clocked at the same location"),
            ],
        ))
    })
}

/// Clock-ins so regular they are unlikely to be manual.
pub fn perfect_pattern(
    subject: Subject<'_>,
    clock_ins: &[DateTime<FixedOffset>],
) -> Option<Anomaly> {
    if clock_ins.len() < MIN_CLOCK_INS_FOR_PERFECT_PATTERN {
        return None;
    }

    let minutes: Vec<f64> = clock_ins
        .iter()
        .map(|ts| (ts.hour() * 60 + ts.minute()) as f64)
        .collect();
    let (mean, stddev) = mean_and_stddev(&minutes);

    if stddev >= PERFECT_PATTERN_MAX_STDDEV_MINUTES {
        return None;
    }

    let avg = mean.round() as u32;
    let avg_time = format!("{:02}:{:02}", avg / 60 % 24, avg % 60);

    Some(subject.anomaly(
        AnomalyType::PerfectPattern,
        format!(
            "Clock-ins average {avg_time} with a standard deviation of only {stddev:.2} minutes"
        ),
        PERFECT_PATTERN_CONFIDENCE,
        vec![
            format!("{} clock-ins analysed", minutes.len()),
            format!("Average clock-in {avg_time}"),
            format!("Standard deviation {stddev:.2} minutes"),
        ],
    ))
}

/// Population mean and standard deviation.
pub fn mean_and_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// A large share of clock-ins between 22:00 and 06:00.
pub fn off_hours(subject: Subject<'_>, clock_ins: &[DateTime<FixedOffset>]) -> Option<Anomaly> {
    let total = clock_ins.len();
    if total == 0 {
        return None;
    }

    let mut by_hour: BTreeMap<u32, usize> = BTreeMap::new();
    for ts in clock_ins {
        *by_hour.entry(ts.hour()).or_default() += 1;
    }
    let off_count: usize = by_hour
        .iter()
        .filter(|(hour, _)| **hour < OFF_HOURS_EARLY_BEFORE || **hour >= OFF_HOURS_LATE_FROM)
        .map(|(_, count)| count)
        .sum();

    if (off_count as f64 / total as f64) < OFF_HOURS_MIN_RATIO {
        return None;
    }

    Some(subject.anomaly(
        AnomalyType::OffHours,
        format!("{off_count} of {total} clock-ins happened between 22:00 and 06:00"),
        OFF_HOURS_CONFIDENCE,
        vec![format!("{off_count}/{total} off-hours clock-ins")],
    ))
}

/// Any event recorded inside an approved absence. Stops at the first
/// conflicting absence.
pub fn absence_conflict(
    subject: Subject<'_>,
    events: &[&TimeEvent],
    absences: &[&Absence],
    offset: FixedOffset,
) -> Option<Anomaly> {
    let mut ordered: Vec<&Absence> = absences.iter().copied().filter(|a| a.is_approved()).collect();
    ordered.sort_by_key(|a| (a.start_date, a.end_date));

    let local_dates: Vec<NaiveDate> = events
        .iter()
        .map(|e| e.event_time.with_timezone(&offset).date_naive())
        .collect();

    ordered.into_iter().find_map(|absence| {
        let count = local_dates.iter().filter(|d| absence.covers(**d)).count();
        if count == 0 {
            return None;
        }

        Some(subject.anomaly(
            AnomalyType::AbsenceConflict,
            format!(
                "{count} clock events recorded during an approved absence ({} to {})",
                absence.start_date, absence.end_date
            ),
            ABSENCE_CONFLICT_CONFIDENCE,
            vec![
                format!("Approved absence {} to {}", absence.start_date, absence.end_date),
                format!("{count} events inside the absence"),
            ],
        ))
    })
}
