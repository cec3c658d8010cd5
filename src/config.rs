use crate::chat::driver::DEFAULT_POLL_INTERVAL;
use crate::cookie::{CSRF_COOKIE, cookie_value};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::time::Duration;

pub const SERVER_URL_VAR: &str = "COMPANION_SERVER_URL";
pub const POLL_INTERVAL_VAR: &str = "COMPANION_POLL_INTERVAL_MS";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Bundled config for builds that ship without a `.env` (web, mobile).
pub const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

static BUNDLED_PAIRS: Lazy<Vec<(String, String)>> =
    Lazy::new(|| parse_env_lines(BUNDLED_CONFIG));

/// Value from the bundled config file, if it names `key`.
pub fn bundled_value(key: &str) -> Option<String> {
    BUNDLED_PAIRS
        .iter()
        .find(|(candidate, _)| candidate == key)
        .map(|(_, value)| value.clone())
}

/// Parses `KEY=VALUE` lines, skipping blanks and `#` comments.
pub fn parse_env_lines(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

/// Settings read from the environment at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// `None` means "same origin as the page".
    pub server_url: Option<String>,
    pub poll_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Process environment on native builds. The browser has none, so web
    /// builds read the bundled file directly.
    pub fn load() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::from_env()
        }
        #[cfg(target_arch = "wasm32")]
        {
            Self::from_lookup(bundled_value)
        }
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let server_url = lookup(SERVER_URL_VAR)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        let poll_interval = match lookup(POLL_INTERVAL_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => {
                    tracing::warn!(value = %raw, "ignoring invalid {POLL_INTERVAL_VAR}");
                    DEFAULT_POLL_INTERVAL
                }
            },
            None => DEFAULT_POLL_INTERVAL,
        };
        Self {
            server_url,
            poll_interval,
        }
    }

    /// Base URL for the chat endpoints: configured server, else the page's
    /// own origin, else the local development server.
    pub fn base_url(&self, page: &PageContext) -> String {
        self.server_url
            .clone()
            .or_else(|| page.origin.clone())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }
}

/// Values the hosting page exposes through data attributes and cookies.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PageContext {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub other_mood: Option<String>,
    #[serde(default)]
    pub saved_mood: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub cookies: Option<String>,
}

impl PageContext {
    /// Drops blank values so absent and empty attributes mean the same.
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty() && v != "null")
        }
        Self {
            user: keep(self.user),
            other_mood: keep(self.other_mood),
            saved_mood: keep(self.saved_mood),
            origin: keep(self.origin),
            cookies: keep(self.cookies),
        }
    }

    pub fn csrf_token(&self) -> Option<String> {
        self.cookies
            .as_deref()
            .and_then(|jar| cookie_value(jar, CSRF_COOKIE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parses_bundled_file() {
        assert_eq!(bundled_value(SERVER_URL_VAR).as_deref(), Some(""));
        let config = AppConfig::from_lookup(bundled_value);
        assert_eq!(config.server_url, None);
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn env_lines_skip_comments() {
        let pairs = parse_env_lines("# note\n\nA = 1\nB=two=2\njunk\n");
        assert_eq!(
            pairs,
            [
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "two=2".to_string())
            ]
        );
    }

    #[test]
    fn defaults_without_env() {
        assert_eq!(AppConfig::from_lookup(lookup(&[])), AppConfig::default());
    }

    #[test]
    fn reads_env_values() {
        let config = AppConfig::from_lookup(lookup(&[
            (SERVER_URL_VAR, " https://us.example "),
            (POLL_INTERVAL_VAR, "2000"),
        ]));
        assert_eq!(config.server_url.as_deref(), Some("https://us.example"));
        assert_eq!(config.poll_interval, Duration::from_millis(2000));

        let bad = AppConfig::from_lookup(lookup(&[(POLL_INTERVAL_VAR, "soon")]));
        assert_eq!(bad.poll_interval, DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn base_url_prefers_config_then_origin() {
        let page = PageContext {
            origin: Some("https://page.example".into()),
            ..Default::default()
        };
        let configured = AppConfig {
            server_url: Some("https://api.example".into()),
            ..Default::default()
        };
        assert_eq!(configured.base_url(&page), "https://api.example");
        assert_eq!(AppConfig::default().base_url(&page), "https://page.example");
        assert_eq!(
            AppConfig::default().base_url(&PageContext::default()),
            DEFAULT_SERVER_URL
        );
    }

    #[test]
    fn page_context_from_host_json() {
        let raw = r#"{
            "user": "leo",
            "other_mood": "",
            "saved_mood": "Feliz",
            "origin": "https://x",
            "cookies": "csrftoken=abc"
        }"#;
        let page: PageContext = serde_json::from_str::<PageContext>(raw).unwrap().normalized();
        assert_eq!(page.user.as_deref(), Some("leo"));
        assert_eq!(page.other_mood, None);
        assert_eq!(page.csrf_token().as_deref(), Some("abc"));
    }
}
