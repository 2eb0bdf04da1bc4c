// File: src/platforms/credentials.rs
//
// Platform credentials are looked up on every call instead of once at start-up,
// so rotating a key in the environment takes effect on the next poll.

use std::env;

pub const TWITCH_CLIENT_ID_VAR: &str = "TWITCH_CLIENT_ID";
pub const TWITCH_CLIENT_SECRET_VAR: &str = "TWITCH_CLIENT_SECRET";
pub const YOUTUBE_API_KEY_VAR: &str = "YOUTUBE_API_KEY";

/// Application credentials for the Twitch client-credentials grant.
#[derive(Debug, Clone, PartialEq)]
pub struct TwitchCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Source of platform credentials. `None` disables that platform for the call.
pub trait CredentialProvider: Send + Sync {
    fn twitch(&self) -> Option<TwitchCredentials>;
    fn youtube_api_key(&self) -> Option<String>;
}

/// Reads `TWITCH_CLIENT_ID`, `TWITCH_CLIENT_SECRET` and `YOUTUBE_API_KEY`.
/// Blank values count as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl CredentialProvider for EnvCredentials {
    fn twitch(&self) -> Option<TwitchCredentials> {
        Some(TwitchCredentials {
            client_id: non_empty_var(TWITCH_CLIENT_ID_VAR)?,
            client_secret: non_empty_var(TWITCH_CLIENT_SECRET_VAR)?,
        })
    }

    fn youtube_api_key(&self) -> Option<String> {
        non_empty_var(YOUTUBE_API_KEY_VAR)
    }
}

/// Fixed credentials, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    pub twitch: Option<TwitchCredentials>,
    pub youtube_api_key: Option<String>,
}

impl CredentialProvider for StaticCredentials {
    fn twitch(&self) -> Option<TwitchCredentials> {
        self.twitch.clone()
    }

    fn youtube_api_key(&self) -> Option<String> {
        self.youtube_api_key.clone()
    }
}
