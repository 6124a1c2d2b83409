use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnomalyType {
    ExactTimePattern,
    SameLocation,
    PerfectPattern,
    OffHours,
    AbsenceConflict,
}

impl AnomalyType {
    /// Short label used in notification titles.
    pub fn label(&self) -> &'static str {
        match self {
            AnomalyType::ExactTimePattern => "Identical clock-in times",
            AnomalyType::SameLocation => "Shared clock-in location",
            AnomalyType::PerfectPattern => "Unnaturally regular clock-ins",
            AnomalyType::OffHours => "Off-hours clock-ins",
            AnomalyType::AbsenceConflict => "Activity during approved absence",
        }
    }
}

/// Suspicious clocking behaviour found for one employee. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "type": "exact_time_pattern",
    "employee_id": "6f1c2a9e-0b7d-4a3e-9d55-2f8f1c0a7b11",
    "employee_name": "Ana Torres",
    "description": "7 of 10 clock-ins happened at exactly 09:00:00",
    "confidence": 85,
    "evidence": ["Clock-in time 09:00:00 repeated 7/10 times"]
}))]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    pub employee_id: String,
    pub employee_name: String,
    pub description: String,
    /// Heuristic score in [0, 100].
    #[schema(example = 85)]
    pub confidence: u8,
    pub evidence: Vec<String>,
}
