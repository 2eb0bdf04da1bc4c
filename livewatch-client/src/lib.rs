//! Client half of livewatch: polls the status endpoint and keeps the alert
//! state a display surface renders from.

pub mod alert_store;
pub mod poll_scheduler;
pub mod primary;
pub mod status_client;

pub use alert_store::{AlertState, AlertStore};
pub use poll_scheduler::{PollScheduler, DEFAULT_POLL_INTERVAL};
pub use primary::select_primary;
pub use status_client::{HttpStatusClient, StatusSource};
