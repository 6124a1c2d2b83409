use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Missing or malformed identifiers in the request.
    #[error("{0}")]
    Validation(String),

    /// Not enough history to say anything meaningful.
    #[error("Insufficient data: {message}")]
    InsufficientData { message: String },

    #[error("Forbidden")]
    Forbidden,

    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl AnalyticsError {
    pub fn upstream(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| AnalyticsError::Upstream { context, source }
    }
}

impl ResponseError for AnalyticsError {
    fn status_code(&self) -> StatusCode {
        match self {
            AnalyticsError::Validation(_) | AnalyticsError::InsufficientData { .. } => {
                StatusCode::BAD_REQUEST
            }
            AnalyticsError::Forbidden => StatusCode::FORBIDDEN,
            AnalyticsError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AnalyticsError::Validation(msg) => json!({ "error": msg }),
            AnalyticsError::InsufficientData { message } => json!({
                "error": "Insufficient data",
                "message": message
            }),
            AnalyticsError::Forbidden => json!({ "error": "Forbidden" }),
            AnalyticsError::Upstream { context, source } => json!({
                "error": source.to_string(),
                "message": context
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(err: AnalyticsError) -> (StatusCode, serde_json::Value) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn validation_is_a_bare_error_message() {
        let (status, body) =
            body_of(AnalyticsError::Validation("company_id is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "company_id is required" }));
    }

    #[actix_web::test]
    async fn insufficient_data_is_distinguishable_from_validation() {
        let (status, body) = body_of(AnalyticsError::InsufficientData {
            message: "At least 5 clock events are required".into(),
        })
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Insufficient data");
        assert_eq!(body["message"], "At least 5 clock events are required");
    }

    #[actix_web::test]
    async fn upstream_failures_are_500() {
        let err = AnalyticsError::upstream("Failed to load time events")(sqlx::Error::RowNotFound);
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to load time events");
        assert!(body["error"].as_str().is_some());
    }
}
