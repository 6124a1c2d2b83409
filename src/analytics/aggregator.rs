use super::thresholds::NOTIFICATION_MIN_CONFIDENCE;
use crate::model::{
    anomaly::Anomaly,
    notification::{ENTITY_TYPE_ANOMALY, NOTIFICATION_TYPE_WARNING, NotificationPayload},
};

/// Result of one company run: every anomaly found plus the notifications
/// owed to the company's owners and admins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedAnomalies {
    pub anomalies: Vec<Anomaly>,
    pub notifications: Vec<NotificationPayload>,
}

impl AggregatedAnomalies {
    pub fn summary_message(&self) -> String {
        match self.anomalies.len() {
            0 => "No anomalies detected".to_string(),
            1 => "Detected 1 anomaly".to_string(),
            n => format!("Detected {n} anomalies"),
        }
    }
}

/// Confidence gate applied before any notification is generated.
pub fn notifiable(anomalies: &[Anomaly]) -> impl Iterator<Item = &Anomaly> {
    anomalies
        .iter()
        .filter(|a| a.confidence >= NOTIFICATION_MIN_CONFIDENCE)
}

pub fn notification_for(company_id: &str, admin_id: &str, anomaly: &Anomaly) -> NotificationPayload {
    NotificationPayload {
        company_id: company_id.to_string(),
        user_id: admin_id.to_string(),
        title: format!("Anomaly detected: {}", anomaly.anomaly_type.label()),
        message: format!("{}: {}", anomaly.employee_name, anomaly.description),
        notification_type: NOTIFICATION_TYPE_WARNING,
        entity_type: ENTITY_TYPE_ANOMALY,
        entity_id: anomaly.employee_id.clone(),
    }
}

/// One notification per (gated anomaly, admin) pair. A company without
/// admins simply gets no notifications.
pub fn aggregate(company_id: &str, anomalies: Vec<Anomaly>, admin_ids: &[String]) -> AggregatedAnomalies {
    let notifications = notifiable(&anomalies)
        .flat_map(|anomaly| {
            admin_ids
                .iter()
                .map(move |admin_id| notification_for(company_id, admin_id, anomaly))
        })
        .collect();

    AggregatedAnomalies {
        anomalies,
        notifications,
    }
}
