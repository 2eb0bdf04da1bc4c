// src/lib.rs

pub mod db;
pub mod http;
pub mod platforms;
pub mod repositories;
pub mod services;

pub use db::Database;
pub use livewatch_common::error::Error;
pub use http::{DefaultHttpClient, HttpClient, HttpResponse};
