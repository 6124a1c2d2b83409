use super::{ErrorResponse, parse_uuid, present, resolve_offset};
use crate::analytics::Calendar;
use crate::analytics::insight_composer::generate_insight;
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::AnalyticsError;
use crate::model::insight::Insight;
use crate::repository::activity::load_employee_history;
use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Deserialize;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct InsightRequest {
    #[schema(example = "0b8e7f3c-5a41-4c1e-8f0d-3e2b9a6c4d17")]
    pub employee_id: Option<String>,
    #[schema(example = "6f1c2a9e-0b7d-4a3e-9d55-2f8f1c0a7b11")]
    pub company_id: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/analytics/insights",
    request_body = InsightRequest,
    responses(
        (status = 200, description = "Insight for the employee", body = Insight),
        (status = 400, description = "Missing identifiers or not enough history", body = ErrorResponse, example = json!({
            "error": "Insufficient data",
            "message": "At least 5 clock events are required to generate insights (2 found)"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Failed to read employee history", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Analytics"
)]
pub async fn employee_insights(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<InsightRequest>,
) -> Result<impl Responder, AnalyticsError> {
    let (Some(employee_id), Some(company_id)) =
        (present(&payload.employee_id), present(&payload.company_id))
    else {
        return Err(AnalyticsError::Validation(
            "employee_id and company_id are required".into(),
        ));
    };
    let employee_id = parse_uuid(employee_id, "employee_id")?;
    let company_id = parse_uuid(company_id, "company_id")?;

    auth.require_insight_access(&company_id, &employee_id)?;

    let offset = resolve_offset(&pool, &company_id, config.default_utc_offset_minutes).await?;
    let calendar = Calendar::new(Utc::now(), offset);

    let history = load_employee_history(&pool, &employee_id, &company_id, calendar.lookback_since())
        .await
        .inspect_err(|e| {
            error!(error = %e, employee_id = %employee_id, company_id = %company_id, "Failed to load employee history")
        })?;

    match generate_insight(&history, &calendar) {
        Ok(insight) => {
            info!(
                employee_id = %employee_id,
                strengths = insight.strengths.len(),
                areas = insight.areas_for_improvement.len(),
                trend = %insight.performance_trend,
                "Insight generated"
            );
            Ok(HttpResponse::Ok().json(insight))
        }
        Err(e) => {
            info!(employee_id = %employee_id, reason = %e, "Insight refused");
            Err(e)
        }
    }
}
