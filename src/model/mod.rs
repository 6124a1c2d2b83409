pub mod absence;
pub mod anomaly;
pub mod incident;
pub mod insight;
pub mod notification;
pub mod role;
pub mod scheduled_shift;
pub mod time_event;
pub mod work_session;
