use crate::api::anomalies::run_company_scan;
use crate::repository::members::company_ids;
use anyhow::Result;
use chrono::Utc;
use futures::{StreamExt, stream};
use sqlx::MySqlPool;
use std::time::Duration;
use tracing::{error, info};

/// Companies scanned at the same time.
const SCAN_CONCURRENCY: usize = 4;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub companies: usize,
    pub failed: usize,
    pub anomalies: usize,
    pub notifications: usize,
}

impl ScanSummary {
    fn record(mut self, outcome: Option<(usize, usize)>) -> Self {
        self.companies += 1;
        match outcome {
            Some((anomalies, notifications)) => {
                self.anomalies += anomalies;
                self.notifications += notifications;
            }
            None => self.failed += 1,
        }
        self
    }
}

/// Runs the anomaly pipeline for every company. One company failing is
/// logged and does not stop the others.
pub async fn scan_all_companies(pool: &MySqlPool, default_offset_minutes: i32) -> Result<ScanSummary> {
    let ids = company_ids(pool).await?;
    let now = Utc::now();

    let summary = stream::iter(ids)
        .map(|company_id| async move {
            match run_company_scan(pool, default_offset_minutes, &company_id, now).await {
                Ok(result) => Some((result.anomalies.len(), result.notifications.len())),
                Err(e) => {
                    error!(error = %e, company_id = %company_id, "Scheduled anomaly scan failed");
                    None
                }
            }
        })
        .buffer_unordered(SCAN_CONCURRENCY)
        .fold(ScanSummary::default(), |summary, outcome| async move {
            summary.record(outcome)
        })
        .await;

    Ok(summary)
}

/// Spawns the periodic scan on the actix runtime. An interval of zero
/// disables it.
pub fn spawn(pool: MySqlPool, interval_secs: u64, default_offset_minutes: i32) {
    if interval_secs == 0 {
        info!("Scheduled anomaly scans disabled");
        return;
    }

    actix_web::rt::spawn(async move {
        let mut ticker = actix_web::rt::time::interval(Duration::from_secs(interval_secs));
        // first tick fires immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match scan_all_companies(&pool, default_offset_minutes).await {
                Ok(summary) => info!(
                    companies = summary.companies,
                    failed = summary.failed,
                    anomalies = summary.anomalies,
                    notifications = summary.notifications,
                    "Scheduled anomaly scan complete"
                ),
                Err(e) => error!(error = %e, "Failed to list companies for anomaly scan"),
            }
        }
    });
}
