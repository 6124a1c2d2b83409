use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PerformanceTrend {
    Improving,
    Stable,
    Declining,
}

/// Per-employee performance summary returned by the insights endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "employee_id": "6f1c2a9e-0b7d-4a3e-9d55-2f8f1c0a7b11",
    "employee_name": "Ana Torres",
    "strengths": ["Excellent punctuality: 97% of clock-ins on time"],
    "areas_for_improvement": [],
    "recommendations": [],
    "performance_trend": "improving",
    "trend_percentage": 7.5,
    "recognition_suggestions": ["Recognize Ana Torres for consistent punctuality"]
}))]
pub struct Insight {
    pub employee_id: String,
    pub employee_name: String,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub recommendations: Vec<String>,
    pub performance_trend: PerformanceTrend,
    /// Absent when there is no trend signal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognition_suggestions: Option<Vec<String>>,
}
