// File: src/platforms/youtube/mod.rs

pub mod client;
pub mod search;

pub use client::YouTubeLiveClient;
