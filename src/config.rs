//! Process configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

/// Default provider endpoint.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default `HTTP-Referer` sent to the provider.
pub const DEFAULT_REFERER: &str = "http://localhost:3001";

/// Default `X-Title` sent to the provider.
pub const DEFAULT_APP_TITLE: &str = "Software Project Scope Tool Backend";

/// Maximum accepted request body (base64 PDFs travel inline).
pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Backend and provider settings.
///
/// Read once at startup; the result is shared read-only by every request.
#[derive(Clone, Debug)]
pub struct Config {
    /// Provider credential (from OPENROUTER_API_KEY)
    pub api_key: Option<String>,
    /// Provider base URL (from OPENROUTER_BASE_URL)
    pub base_url: String,
    /// `HTTP-Referer` header (from SAGE_HTTP_REFERER)
    pub referer: String,
    /// `X-Title` header (from SAGE_APP_TITLE)
    pub app_title: String,
    /// Optional client timeout (from SAGE_UPSTREAM_TIMEOUT_SECS); none by default
    pub upstream_timeout: Option<Duration>,
    /// Retries for transient failures (from SAGE_UPSTREAM_MAX_RETRIES)
    pub max_retries: u32,
    /// Backoff base delay (from SAGE_UPSTREAM_RETRY_DELAY_MS)
    pub retry_base_delay: Duration,
    /// Directory for `local_transcript` / `local_files` inputs (from SAGE_LOCAL_DIR)
    pub local_dir: Option<PathBuf>,
    /// Allowed CORS origins (from SAGE_CORS_ORIGINS, comma-separated)
    pub cors_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let upstream_timeout = non_empty("SAGE_UPSTREAM_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let max_retries = non_empty("SAGE_UPSTREAM_MAX_RETRIES")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(0);

        let retry_base_delay = non_empty("SAGE_UPSTREAM_RETRY_DELAY_MS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(500));

        let cors_origins = non_empty("SAGE_CORS_ORIGINS").map(|s| {
            s.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Self {
            api_key: non_empty("OPENROUTER_API_KEY"),
            base_url: non_empty("OPENROUTER_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            referer: non_empty("SAGE_HTTP_REFERER").unwrap_or_else(|| DEFAULT_REFERER.to_string()),
            app_title: non_empty("SAGE_APP_TITLE")
                .unwrap_or_else(|| DEFAULT_APP_TITLE.to_string()),
            upstream_timeout,
            max_retries,
            retry_base_delay,
            local_dir: non_empty("SAGE_LOCAL_DIR").map(PathBuf::from),
            cors_origins,
        }
    }

    /// A config pointing at `base_url` with the given key and nothing else set (for testing).
    pub fn with_provider(api_key: Option<&str>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.map(str::to_string),
            base_url: base_url.into(),
            ..Self::from_lookup(|_| None)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
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
    fn defaults_match_the_hosted_provider() {
        let config = Config::from_lookup(|_| None);
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.app_title, DEFAULT_APP_TITLE);
        assert_eq!(config.max_retries, 0);
        assert!(config.upstream_timeout.is_none());
        assert!(config.local_dir.is_none());
        assert!(config.cors_origins.is_none());
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            ("OPENROUTER_API_KEY", "sk-or-test"),
            ("OPENROUTER_BASE_URL", "http://127.0.0.1:9000/v1/"),
            ("SAGE_UPSTREAM_TIMEOUT_SECS", "30"),
            ("SAGE_UPSTREAM_MAX_RETRIES", "2"),
            ("SAGE_UPSTREAM_RETRY_DELAY_MS", "50"),
            ("SAGE_LOCAL_DIR", "/srv/sage"),
            ("SAGE_CORS_ORIGINS", "http://a.test, http://b.test,"),
        ]));

        assert_eq!(config.api_key.as_deref(), Some("sk-or-test"));
        assert_eq!(config.base_url, "http://127.0.0.1:9000/v1");
        assert_eq!(config.upstream_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.retry_base_delay, Duration::from_millis(50));
        assert_eq!(config.local_dir, Some(PathBuf::from("/srv/sage")));
        assert_eq!(
            config.cors_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = Config::from_lookup(lookup(&[("OPENROUTER_API_KEY", "  ")]));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn unparsable_numbers_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[("SAGE_UPSTREAM_MAX_RETRIES", "lots")]));
        assert_eq!(config.max_retries, 0);
    }
}
