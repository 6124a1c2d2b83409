use crate::api::ErrorResponse;
use crate::api::anomalies::{AnomalyDetectionRequest, AnomalyDetectionResponse};
use crate::api::insights::InsightRequest;
use crate::model::anomaly::{Anomaly, AnomalyType};
use crate::model::insight::{Insight, PerformanceTrend};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Workforce Integrity Analytics API",
        version = "1.0.0",
        description = r#"
## Workforce Integrity Analytics

Read-mostly analytics over employee clock events, work sessions, schedules and absences.

### 🔹 Endpoints
- **Anomaly detection**
  - Scans the last 30 days of a company's clock events for suspicious patterns
    (repeated exact times, shared locations, unnaturally regular schedules,
    off-hours clock-ins, clocking in during approved absences) and notifies owners and admins
- **Employee insights**
  - Punctuality, hour compliance, schedule adherence, breaks and incidents,
    plus the month-over-month performance trend

### 🔐 Security
Endpoints require a **JWT Bearer** token issued by the identity platform.
Callers only see data from their own company; employees only see their own insights.
"#,
    ),
    paths(
        crate::api::anomalies::detect_anomalies,
        crate::api::insights::employee_insights,
    ),
    components(
        schemas(
            AnomalyDetectionRequest,
            AnomalyDetectionResponse,
            InsightRequest,
            Anomaly,
            AnomalyType,
            Insight,
            PerformanceTrend,
            ErrorResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Analytics", description = "Anomaly detection and employee insight APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
