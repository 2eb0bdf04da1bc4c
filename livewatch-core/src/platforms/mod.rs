// File: src/platforms/mod.rs

pub mod credentials;
pub mod twitch;
pub mod youtube;

pub use credentials::{CredentialProvider, EnvCredentials, StaticCredentials, TwitchCredentials};
pub use twitch::TwitchLiveClient;
pub use youtube::YouTubeLiveClient;

use crate::Error;
use crate::http::HttpResponse;

/// Turns a non-success response into `Error::Upstream`, keeping the status and body
/// for the log line.
pub(crate) fn ensure_success(context: &str, resp: &HttpResponse) -> Result<(), Error> {
    if resp.is_success() {
        return Ok(());
    }
    Err(Error::Upstream(format!(
        "{}: HTTP {} => {}",
        context, resp.status, resp.body
    )))
}

/// Deserializes a platform payload, reporting malformed JSON as an upstream failure.
pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(context: &str, resp: &HttpResponse) -> Result<T, Error> {
    serde_json::from_str(&resp.body)
        .map_err(|e| Error::Upstream(format!("{} parse error: {}", context, e)))
}
