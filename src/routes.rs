use crate::{
    api::{anomalies, insights},
    auth::middleware::auth_middleware,
    config::Config,
    error::AnalyticsError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, Responder, get, middleware::from_fn, web};
use serde_json::json;
use std::sync::Arc;

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst are both non-zero");
    Governor::new(&cfg)
}

/// Unreadable bodies get the same `{error}` shape as field validation.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AnalyticsError::Validation(format!("Invalid request body: {err}")).into())
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let analytics_limiter = Arc::new(build_limiter(config.rate_analytics_per_min));

    // Public
    cfg.service(health);

    // Authenticated, rate limited
    cfg.service(
        web::scope(&config.api_prefix).service(
            web::scope("/analytics")
                .app_data(json_config())
                .wrap(from_fn(auth_middleware))
                .wrap(analytics_limiter)
                .service(
                    web::resource("/anomalies").route(web::post().to(anomalies::detect_anomalies)),
                )
                .service(
                    web::resource("/insights").route(web::post().to(insights::employee_insights)),
                ),
        ),
    );
}
