use std::time::Duration;

use shared_types::Timestamp;

use crate::comparison::DEFAULT_TOP_POOLS;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the analytics service, without a trailing `/api`
    pub base_url: String,
    /// Per-request timeout; none means the HTTP client's default
    pub request_timeout: Option<Duration>,
    /// How many pools the bounded pool chart shows
    pub top_pools: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout: None,
            top_pools: DEFAULT_TOP_POOLS,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let request_timeout = timeout_from_secs(env_parse("THREADSCOPE_HTTP_TIMEOUT_SECS", 0)?);

        Ok(Self {
            base_url: env_str("THREADSCOPE_API_URL", "http://localhost:8080"),
            request_timeout,
            top_pools: env_parse("THREADSCOPE_TOP_POOLS", DEFAULT_TOP_POOLS)?,
        })
    }
}

/// Zero means no timeout.
fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// What the headless report looks at
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub file_name: String,
    pub hour: u32,
    pub minutes: Vec<Timestamp>,
    /// Thread state whose traces are paged through, if any
    pub state: Option<String>,
    /// Upper bound on trace pages fetched for `state`
    pub max_pages: u32,
}

impl ReportConfig {
    /// Call after [`ClientConfig::from_env`], which loads `.env`.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            file_name: env_str("THREADSCOPE_FILE", ""),
            hour: env_parse("THREADSCOPE_HOUR", 0)?,
            minutes: env_csv("THREADSCOPE_MINUTES", &[]),
            state: std::env::var("THREADSCOPE_STATE")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            max_pages: env_parse("THREADSCOPE_MAX_PAGES", 50)?,
        })
    }
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse env var {key}={val}: {e}")),
        Err(_) => Ok(default),
    }
}

fn env_csv(key: &str, default: &[&str]) -> Vec<String> {
    match std::env::var(key) {
        Ok(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect(),
        Err(_) => default.iter().map(|s| (*s).to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_local_service() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.top_pools, 5);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        assert_eq!(timeout_from_secs(0), None);
        assert_eq!(timeout_from_secs(30), Some(Duration::from_secs(30)));

        std::env::set_var("THREADSCOPE_HTTP_TIMEOUT_SECS", "0");
        let config = ClientConfig::from_env().unwrap();
        assert!(config.request_timeout.is_none());
        std::env::remove_var("THREADSCOPE_HTTP_TIMEOUT_SECS");
    }

    #[test]
    fn test_env_helpers_fall_back_and_reject_garbage() {
        assert_eq!(env_str("THREADSCOPE_TEST_UNSET_STR", "x"), "x");
        assert_eq!(env_parse("THREADSCOPE_TEST_UNSET_NUM", 7u32).unwrap(), 7);
        assert_eq!(env_csv("THREADSCOPE_TEST_UNSET_CSV", &["a"]), vec!["a"]);

        std::env::set_var("THREADSCOPE_TEST_BAD_NUM", "seven");
        assert!(env_parse("THREADSCOPE_TEST_BAD_NUM", 7u32).is_err());

        std::env::set_var("THREADSCOPE_TEST_CSV", " 10:05, ,10:10 ");
        assert_eq!(env_csv("THREADSCOPE_TEST_CSV", &[]), vec!["10:05", "10:10"]);
    }
}
