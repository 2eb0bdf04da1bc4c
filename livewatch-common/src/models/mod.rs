// File: livewatch-common/src/models/mod.rs
pub mod platform;
pub mod channel;
pub mod stream;

pub use platform::Platform;
pub use channel::{ManualOverride, TrackedChannel};
pub use stream::{LiveStream, StatusSnapshot, OVERRIDE_CHANNEL_ID, OVERRIDE_PRIORITY, UNTRACKED_PRIORITY};
