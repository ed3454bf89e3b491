//! Process configuration read from environment variables.

use crate::error::ApiframeError;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.apiframe.pro/";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

pub const API_KEY_VAR: &str = "API_KEY";
pub const BASE_URL_VAR: &str = "APIFRAME_BASE_URL";
pub const REQUEST_TIMEOUT_VAR: &str = "APIFRAME_REQUEST_TIMEOUT_SECS";
pub const BIND_ADDR_VAR: &str = "APIFRAME_BIND_ADDR";

/// Everything a binary needs to talk to the provider.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: Url,
    /// Per-call transport timeout, distinct from any poll budget.
    pub request_timeout: Duration,
    pub bind_addr: SocketAddr,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("request_timeout", &self.request_timeout)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    ///
    /// # Errors
    ///
    /// - `ApiframeError::MissingApiKey` if `API_KEY` is unset or blank.
    /// - `ApiframeError::InvalidConfig` / `UrlParseFailed` for malformed optional values.
    pub fn from_env() -> Result<Self, ApiframeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiframeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ApiframeError::MissingApiKey)?;

        let base_url = lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.into());
        let base_url = Url::parse(&base_url)?;

        let request_timeout = match lookup(REQUEST_TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ApiframeError::InvalidConfig(format!("{REQUEST_TIMEOUT_VAR}={raw:?} is not a whole number of seconds"))
                })?;
                if secs == 0 {
                    return Err(ApiframeError::InvalidConfig(format!(
                        "{REQUEST_TIMEOUT_VAR} must be positive"
                    )));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let bind_raw = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr: SocketAddr = bind_raw.parse().map_err(|_| {
            ApiframeError::InvalidConfig(format!("{BIND_ADDR_VAR}={bind_raw:?} is not a socket address"))
        })?;

        Ok(Self {
            api_key,
            base_url,
            request_timeout,
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let settings = Settings::from_lookup(lookup(&[("API_KEY", "secret")])).unwrap();
        assert_eq!(settings.api_key, "secret");
        assert_eq!(settings.base_url.as_str(), DEFAULT_API_URL);
        assert_eq!(settings.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(settings.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert!(!format!("{settings:?}").contains("secret"));
    }

    #[test]
    fn missing_or_blank_key_is_fatal() {
        assert!(matches!(
            Settings::from_lookup(lookup(&[])),
            Err(ApiframeError::MissingApiKey)
        ));
        assert!(matches!(
            Settings::from_lookup(lookup(&[("API_KEY", "  ")])),
            Err(ApiframeError::MissingApiKey)
        ));
    }

    #[test]
    fn overrides_are_parsed() {
        let settings = Settings::from_lookup(lookup(&[
            ("API_KEY", "k"),
            ("APIFRAME_BASE_URL", "http://localhost:9000/"),
            ("APIFRAME_REQUEST_TIMEOUT_SECS", "5"),
            ("APIFRAME_BIND_ADDR", "0.0.0.0:9999"),
        ]))
        .unwrap();
        assert_eq!(settings.base_url.as_str(), "http://localhost:9000/");
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.bind_addr.port(), 9999);
    }

    #[test]
    fn malformed_overrides_are_rejected() {
        for (var, value) in [
            ("APIFRAME_REQUEST_TIMEOUT_SECS", "soon"),
            ("APIFRAME_REQUEST_TIMEOUT_SECS", "0"),
            ("APIFRAME_BIND_ADDR", "localhost"),
        ] {
            let result = Settings::from_lookup(lookup(&[("API_KEY", "k"), (var, value)]));
            assert!(matches!(result, Err(ApiframeError::InvalidConfig(_))), "{var}={value}");
        }
        assert!(matches!(
            Settings::from_lookup(lookup(&[("API_KEY", "k"), ("APIFRAME_BASE_URL", "not a url")])),
            Err(ApiframeError::UrlParseFailed(_))
        ));
    }
}
