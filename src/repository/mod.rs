//! MySQL access for the analytics engine. Reads feed `crate::analytics`;
//! the only write is the notification insert.

pub mod activity;
pub mod members;
pub mod notifications;
