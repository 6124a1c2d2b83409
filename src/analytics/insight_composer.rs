use super::compliance::ComplianceReport;
use super::thresholds::TREND_NOISE_FLOOR;
use super::trend::{self, TrendResult};
use super::{Calendar, EmployeeHistory, Findings};
use crate::error::AnalyticsError;
use crate::model::insight::Insight;

pub const INSUFFICIENT_DATA_STRENGTH: &str =
    "Not enough recent activity yet to identify strengths";

/// Full insight pipeline for one employee: compliance, trend, composition.
pub fn generate_insight(
    history: &EmployeeHistory,
    calendar: &Calendar,
) -> Result<Insight, AnalyticsError> {
    let compliance = ComplianceReport::compute(history, calendar)?;
    let trend = trend::analyze(history, calendar);

    Ok(compose(
        &history.employee_id,
        &history.employee_name,
        compliance.findings,
        trend,
    ))
}

pub fn compose(
    employee_id: &str,
    employee_name: &str,
    compliance: Findings,
    trend: TrendResult,
) -> Insight {
    let mut findings = compliance;
    findings.merge(trend.findings);

    if findings.strengths.is_empty() {
        findings.strength(INSUFFICIENT_DATA_STRENGTH);
    }

    let recognition_suggestions =
        (!findings.recognition_suggestions.is_empty()).then_some(findings.recognition_suggestions);

    Insight {
        employee_id: employee_id.to_string(),
        employee_name: employee_name.to_string(),
        strengths: findings.strengths,
        areas_for_improvement: findings.areas_for_improvement,
        recommendations: findings.recommendations,
        performance_trend: trend.trend,
        trend_percentage: trend
            .trend_percentage
            .filter(|pct| pct.abs() > TREND_NOISE_FLOOR),
        recognition_suggestions,
    }
}
