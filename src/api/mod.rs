pub mod anomalies;
pub mod insights;

use crate::analytics::offset_from_minutes;
use crate::error::AnalyticsError;
use crate::repository::activity::company_utc_offset;
use chrono::FixedOffset;
use serde::Serialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;
use uuid::Uuid;

/// Error body shared by the analytics endpoints.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "company_id is required")]
    pub error: String,
    #[schema(example = "At least 5 clock events are required to generate insights (4 found)")]
    pub message: Option<String>,
}

/// Canonical (lowercase, hyphenated) form of a UUID field.
pub(crate) fn parse_uuid(value: &str, field: &str) -> Result<String, AnalyticsError> {
    Uuid::parse_str(value.trim())
        .map(|id| id.to_string())
        .map_err(|_| AnalyticsError::Validation(format!("{field} must be a valid UUID")))
}

/// Treats blank strings like missing fields.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Company offset, or the configured default when the company has none.
pub(crate) async fn resolve_offset(
    pool: &MySqlPool,
    company_id: &str,
    default_minutes: i32,
) -> Result<FixedOffset, AnalyticsError> {
    let minutes = company_utc_offset(pool, company_id)
        .await?
        .unwrap_or(default_minutes);
    Ok(offset_from_minutes(minutes))
}
