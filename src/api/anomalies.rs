use super::{ErrorResponse, parse_uuid, present, resolve_offset};
use crate::analytics::aggregator::{AggregatedAnomalies, aggregate};
use crate::analytics::pattern_detector::detect_company_anomalies;
use crate::analytics::thresholds::ANOMALY_LOOKBACK_DAYS;
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::AnalyticsError;
use crate::model::notification::NotificationPayload;
use crate::repository::{activity::load_company_activity, members, notifications};
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct AnomalyDetectionRequest {
    #[schema(example = "6f1c2a9e-0b7d-4a3e-9d55-2f8f1c0a7b11")]
    pub company_id: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AnomalyDetectionResponse {
    /// Number of anomalies found across the company
    #[schema(example = 3)]
    pub anomalies: usize,
    /// Notification rows generated for owners and admins
    #[schema(example = 6)]
    pub notifications_created: usize,
    #[schema(example = "Detected 3 anomalies")]
    pub message: String,
}

/// One full company scan: load the last 30 days, run the detectors, notify
/// owners and admins. Shared by the HTTP handler and the scheduled scan.
///
/// A failed notification insert is logged and does not fail the scan.
pub async fn run_company_scan(
    pool: &MySqlPool,
    default_offset_minutes: i32,
    company_id: &str,
    now: DateTime<Utc>,
) -> Result<AggregatedAnomalies, AnalyticsError> {
    let offset = resolve_offset(pool, company_id, default_offset_minutes).await?;
    let since = now - Duration::days(ANOMALY_LOOKBACK_DAYS);

    let activity = load_company_activity(pool, company_id, since).await?;
    let anomalies = detect_company_anomalies(&activity, offset);

    let admins = members::company_admins(pool, company_id)
        .await
        .map_err(AnalyticsError::upstream("Failed to load company admins"))?;
    let result = aggregate(company_id, anomalies, &admins);

    dispatch_notifications(pool, company_id, &result.notifications).await;

    info!(
        company_id = %company_id,
        employees = activity.employee_names.len(),
        anomalies = result.anomalies.len(),
        notifications = result.notifications.len(),
        "Anomaly scan finished"
    );

    Ok(result)
}

/// Stores the payloads and returns the rows written, or `None` when the
/// insert failed. Failures are logged and never surface to the caller.
pub async fn dispatch_notifications(
    pool: &MySqlPool,
    company_id: &str,
    payloads: &[NotificationPayload],
) -> Option<u64> {
    if payloads.is_empty() {
        return Some(0);
    }

    match notifications::insert_notifications(pool, payloads).await {
        Ok(rows) => Some(rows),
        Err(e) => {
            error!(
                error = %e,
                company_id = %company_id,
                notifications = payloads.len(),
                "Failed to store anomaly notifications"
            );
            None
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/analytics/anomalies",
    request_body = AnomalyDetectionRequest,
    responses(
        (status = 200, description = "Scan completed", body = AnomalyDetectionResponse),
        (status = 400, description = "Missing or malformed company_id", body = ErrorResponse, example = json!({
            "error": "company_id is required"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Failed to read company activity", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Analytics"
)]
pub async fn detect_anomalies(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<AnomalyDetectionRequest>,
) -> Result<impl Responder, AnalyticsError> {
    let company_id = present(&payload.company_id)
        .ok_or_else(|| AnalyticsError::Validation("company_id is required".into()))?;
    let company_id = parse_uuid(company_id, "company_id")?;

    auth.require_company(&company_id)?;

    let result = run_company_scan(
        &pool,
        config.default_utc_offset_minutes,
        &company_id,
        Utc::now(),
    )
    .await
    .inspect_err(|e| error!(error = %e, company_id = %company_id, "Anomaly detection failed"))?;

    Ok(HttpResponse::Ok().json(AnomalyDetectionResponse {
        anomalies: result.anomalies.len(),
        notifications_created: result.notifications.len(),
        message: result.summary_message(),
    }))
}
