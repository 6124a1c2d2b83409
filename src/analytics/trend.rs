use super::thresholds::*;
use super::{Calendar, EmployeeHistory, Findings, percentage};
use crate::model::insight::PerformanceTrend;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct TrendResult {
    pub trend: PerformanceTrend,
    /// `None` when the sample floor is not met, never a sentinel zero.
    pub trend_percentage: Option<f64>,
    pub this_month_avg: Option<f64>,
    pub last_month_avg: Option<f64>,
    pub findings: Findings,
}

impl TrendResult {
    fn no_signal() -> Self {
        TrendResult {
            trend: PerformanceTrend::Stable,
            trend_percentage: None,
            this_month_avg: None,
            last_month_avg: None,
            findings: Findings::default(),
        }
    }
}

pub fn classify(trend_percentage: f64) -> PerformanceTrend {
    if trend_percentage > TREND_THRESHOLD_PERCENT {
        PerformanceTrend::Improving
    } else if trend_percentage < -TREND_THRESHOLD_PERCENT {
        PerformanceTrend::Declining
    } else {
        PerformanceTrend::Stable
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Month-over-month change of the average per-session hour compliance.
pub fn analyze(history: &EmployeeHistory, calendar: &Calendar) -> TrendResult {
    if history.sessions.len() < MIN_SESSIONS_FOR_TREND {
        return TrendResult::no_signal();
    }

    let mut expected_by_day = HashMap::new();
    for shift in history.shifts.iter().filter(|s| s.expected_hours > 0.0) {
        expected_by_day.entry(shift.date).or_insert(shift.expected_hours);
    }
    let absence_days = calendar.absence_days(&history.absences);

    let mut this_month = Vec::new();
    let mut last_month = Vec::new();
    for session in &history.sessions {
        let date = calendar.local_date(session.clock_in_time);
        if absence_days.contains(&date) {
            continue;
        }
        let Some(expected) = expected_by_day.get(&date) else {
            continue;
        };
        let ratio = percentage(session.worked_hours(calendar.now), *expected);
        if calendar.in_current_month(date) {
            this_month.push(ratio);
        } else if calendar.in_last_month(date) {
            last_month.push(ratio);
        }
    }

    let (Some(this_avg), Some(last_avg)) = (mean(&this_month), mean(&last_month)) else {
        return TrendResult::no_signal();
    };
    if last_avg <= 0.0 {
        return TrendResult::no_signal();
    }

    let change = (this_avg - last_avg) * 100.0 / last_avg;
    // classify the exact change; rounding is for display only
    let trend = classify(change);
    let trend_percentage = (change * 100.0).round() / 100.0;

    let mut findings = Findings::default();
    match trend {
        PerformanceTrend::Improving => {
            findings.strength(format!(
                "Performance improving: hour compliance up {trend_percentage:.1}% versus last month"
            ));
            findings.recognize(format!(
                "Recognize {} for improving hour compliance",
                history.employee_name
            ));
        }
        PerformanceTrend::Declining => {
            findings.improvement(format!(
                "Performance declining: hour compliance down {:.1}% versus last month",
                trend_percentage.abs()
            ));
            findings.recommend("Schedule a check-in to understand the drop in hour compliance");
        }
        PerformanceTrend::Stable => {}
    }

    TrendResult {
        trend,
        trend_percentage: Some(trend_percentage),
        this_month_avg: Some(this_avg),
        last_month_avg: Some(last_avg),
        findings,
    }
}
