// File: src/platforms/twitch/mod.rs

pub mod auth;
pub mod client;
pub mod streams;

pub use auth::{AppToken, AppTokenCache};
pub use client::TwitchLiveClient;
