use std::time::Duration;

use sitebook_core::roles::Role;

use crate::error::ApiError;

/// Default API base URL for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every service path is joined onto.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Bearer token to start the session with, if already signed in.
    pub token: Option<String>,
    /// Role recorded at sign-in, used for local permission checks.
    pub role: Option<Role>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            token: None,
            role: None,
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                     |
    /// |---------------------------------|-----------------------------|
    /// | `SITEBOOK_API_URL`              | `http://localhost:5000/api` |
    /// | `SITEBOOK_REQUEST_TIMEOUT_SECS` | `30`                        |
    /// | `SITEBOOK_TOKEN`                | unset                       |
    /// | `SITEBOOK_ROLE`                 | unset                       |
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("SITEBOOK_API_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "SITEBOOK_API_URL must be an http(s) URL, got '{base_url}'"
            )));
        }

        let request_timeout_secs = match lookup("SITEBOOK_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                ApiError::Config(format!(
                    "SITEBOOK_REQUEST_TIMEOUT_SECS must be a positive integer, got '{raw}'"
                ))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let token = lookup("SITEBOOK_TOKEN")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let role = lookup("SITEBOOK_ROLE")
            .filter(|s| !s.trim().is_empty())
            .map(|s| Role::from_name(&s));

        Ok(Self {
            base_url,
            request_timeout_secs,
            token,
            role,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
