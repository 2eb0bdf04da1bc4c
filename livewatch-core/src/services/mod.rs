pub mod status_service;

pub use status_service::{sort_streams, StatusService, DEFAULT_PLATFORM_TIMEOUT};
