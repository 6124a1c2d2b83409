pub mod anomaly_scheduler;
