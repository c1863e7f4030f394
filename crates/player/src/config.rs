//! Client configuration from environment variables.
//!
//! Supported variables:
//! - RALLY_API_URL: REST base URL (default http://127.0.0.1:3000/)
//! - RALLY_CHAT_WS_URL / RALLY_NOTIFICATIONS_WS_URL: push channel endpoints
//! - RALLY_AUTH_TOKEN: bearer token; without it the push channels stay disabled
//! - RALLY_USER_ID: the authenticated user to bootstrap
//! - RALLY_REQUEST_TIMEOUT_MS, RALLY_HISTORY_CAP, RALLY_NOTIFICATION_CAP
//! - RALLY_RECONNECT_INITIAL_MS, RALLY_RECONNECT_MAX_MS, RALLY_RECONNECT_MAX_ATTEMPTS
//! - RALLY_SEARCH_DEBOUNCE_MS
//!
//! Numeric values that fail to parse are ignored with a warning.

use std::str::FromStr;
use std::time::Duration;

use url::Url;

use rally_domain::{UserId, DEFAULT_HISTORY_CAP, DEFAULT_NOTIFICATION_CAP};

use crate::application::{SessionLimits, DEFAULT_SEARCH_DEBOUNCE_MS};
use crate::infrastructure::http_client::DEFAULT_REQUEST_TIMEOUT_MS;
use crate::infrastructure::realtime::ChannelEndpoints;
use crate::infrastructure::websocket::{
    ReconnectPolicy, BACKOFF_MULTIPLIER, INITIAL_RETRY_DELAY_MS, MAX_RETRY_ATTEMPTS,
    MAX_RETRY_DELAY_MS,
};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/";
pub const DEFAULT_CHAT_WS_URL: &str = "ws://127.0.0.1:3000/ws/chat";
pub const DEFAULT_NOTIFICATIONS_WS_URL: &str = "ws://127.0.0.1:3000/ws/notifications";

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },
    #[error("{var} is not a valid user id: {value}")]
    InvalidUserId { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: Url,
    pub endpoints: ChannelEndpoints,
    pub auth_token: Option<String>,
    pub user_id: Option<UserId>,
    pub request_timeout_ms: u64,
    pub limits: SessionLimits,
    pub reconnect: ReconnectPolicy,
    pub search_debounce: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let url = |name: &'static str, default: &str| -> Result<Url, ConfigError> {
            let raw = var(name).unwrap_or_else(|| default.to_string());
            Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
                var: name,
                reason: e.to_string(),
            })
        };

        let user_id = match var("RALLY_USER_ID") {
            Some(raw) => Some(raw.trim().parse::<UserId>().map_err(|_| {
                ConfigError::InvalidUserId {
                    var: "RALLY_USER_ID",
                    value: raw.clone(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            api_url: with_trailing_slash(url("RALLY_API_URL", DEFAULT_API_URL)?),
            endpoints: ChannelEndpoints {
                chat: url("RALLY_CHAT_WS_URL", DEFAULT_CHAT_WS_URL)?,
                notifications: url("RALLY_NOTIFICATIONS_WS_URL", DEFAULT_NOTIFICATIONS_WS_URL)?,
            },
            auth_token: var("RALLY_AUTH_TOKEN").map(|t| t.trim().to_string()),
            user_id,
            request_timeout_ms: number(&var, "RALLY_REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS),
            limits: SessionLimits {
                history_cap: number(&var, "RALLY_HISTORY_CAP", DEFAULT_HISTORY_CAP),
                notification_cap: number(&var, "RALLY_NOTIFICATION_CAP", DEFAULT_NOTIFICATION_CAP),
            },
            reconnect: ReconnectPolicy {
                initial_delay_ms: number(&var, "RALLY_RECONNECT_INITIAL_MS", INITIAL_RETRY_DELAY_MS),
                max_delay_ms: number(&var, "RALLY_RECONNECT_MAX_MS", MAX_RETRY_DELAY_MS),
                max_attempts: number(&var, "RALLY_RECONNECT_MAX_ATTEMPTS", MAX_RETRY_ATTEMPTS),
                multiplier: BACKOFF_MULTIPLIER,
            },
            search_debounce: Duration::from_millis(number(
                &var,
                "RALLY_SEARCH_DEBOUNCE_MS",
                DEFAULT_SEARCH_DEBOUNCE_MS,
            )),
        })
    }
}

fn number<T: FromStr + Copy>(var: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    match var(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(val = %raw, "{} is not a valid number, ignoring", name);
            default
        }),
        None => default,
    }
}

/// Relative API paths only join under the base path when it ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(move |name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config(&[]).expect("defaults parse");
        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.endpoints.chat.as_str(), DEFAULT_CHAT_WS_URL);
        assert_eq!(config.auth_token, None);
        assert_eq!(config.user_id, None);
        assert_eq!(config.limits, SessionLimits::default());
        assert_eq!(config.reconnect, ReconnectPolicy::default());
        assert_eq!(config.search_debounce, Duration::from_millis(300));
    }

    #[test]
    fn overrides_are_applied_and_bad_numbers_ignored() {
        let user = UserId::new();
        let user_raw = user.to_string();
        let config = config(&[
            ("RALLY_API_URL", "https://rally.example/v1"),
            ("RALLY_AUTH_TOKEN", " secret "),
            ("RALLY_USER_ID", &user_raw),
            ("RALLY_HISTORY_CAP", "20"),
            ("RALLY_NOTIFICATION_CAP", "lots"),
            ("RALLY_RECONNECT_MAX_ATTEMPTS", "3"),
        ])
        .expect("valid config");

        assert_eq!(config.api_url.as_str(), "https://rally.example/v1/");
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.user_id, Some(user));
        assert_eq!(config.limits.history_cap, 20);
        assert_eq!(config.limits.notification_cap, DEFAULT_NOTIFICATION_CAP);
        assert_eq!(config.reconnect.max_attempts, 3);
    }

    #[test]
    fn invalid_urls_are_errors() {
        assert!(matches!(
            config(&[("RALLY_CHAT_WS_URL", "not a url")]),
            Err(ConfigError::InvalidUrl {
                var: "RALLY_CHAT_WS_URL",
                ..
            })
        ));
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let config = config(&[("RALLY_AUTH_TOKEN", "   ")]).expect("valid config");
        assert_eq!(config.auth_token, None);
    }
}
