use serde::Serialize;

pub const NOTIFICATION_TYPE_WARNING: &str = "warning";
pub const ENTITY_TYPE_ANOMALY: &str = "anomaly";

/// Row destined for the `notifications` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPayload {
    pub company_id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: &'static str,
    pub entity_type: &'static str,
    pub entity_id: String,
}
