use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use std::io;
use tracing::{Level, info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use workforce_integrity::{
    config::Config, db::init_db, docs::ApiDoc, routes, utils::anomaly_scheduler,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = Config::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("{e:#}")))?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "analytics.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let parsed_level = config.log_level.parse::<Level>();
    let level = parsed_level.as_ref().copied().unwrap_or(Level::DEBUG);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    if parsed_level.is_err() {
        warn!(log_level = %config.log_level, "Unknown LOG_LEVEL, using debug");
    }
    info!(addr = %config.server_addr, prefix = %config.api_prefix, "Server starting...");

    let pool = init_db(&config.database_url)
        .await
        .map_err(|e| io::Error::other(format!("Failed to connect to database: {e}")))?;

    anomaly_scheduler::spawn(
        pool.clone(),
        config.anomaly_scan_interval_secs,
        config.default_utc_offset_minutes,
    );

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard serves the JS/CSS assets
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .configure(|cfg| routes::configure(cfg, config.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
