//! Configuration Module
//!
//! Handles loading server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cache::DEFAULT_CAPACITY;
use crate::paging::{DEFAULT_OVERHEAD_TOKENS, DEFAULT_TOKEN_BUDGET};

/// Server configuration parameters.
///
/// All values can be configured via environment variables; unparseable
/// values fall back to the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Token budget of one response page
    pub token_budget: usize,
    /// Tokens reserved for the header and footer of a page
    pub overhead_tokens: usize,
    /// Maximum number of cached results
    pub cache_capacity: usize,
    /// TTL in seconds for volatile data
    pub short_ttl: u64,
    /// TTL in seconds for slow-changing data
    pub long_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Expiry sweep interval in seconds, 0 disables the sweep
    pub cleanup_interval: u64,
    /// Directory of JSON fixtures served as market data
    pub fixture_dir: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TOKEN_BUDGET` - Tokens per page (default: 6000)
    /// - `OVERHEAD_TOKENS` - Tokens reserved for header/footer (default: 500)
    /// - `CACHE_CAPACITY` - Maximum cached results (default: 100)
    /// - `SHORT_TTL` - TTL of volatile data in seconds (default: 300)
    /// - `LONG_TTL` - TTL of slow-changing data in seconds (default: 3600)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `FIXTURE_DIR` - Fixture directory (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            token_budget: parse_var("TOKEN_BUDGET").unwrap_or(defaults.token_budget),
            overhead_tokens: parse_var("OVERHEAD_TOKENS").unwrap_or(defaults.overhead_tokens),
            cache_capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.cache_capacity),
            short_ttl: parse_var("SHORT_TTL").unwrap_or(defaults.short_ttl),
            long_ttl: parse_var("LONG_TTL").unwrap_or(defaults.long_ttl),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            fixture_dir: env::var("FIXTURE_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_budget: DEFAULT_TOKEN_BUDGET,
            overhead_tokens: DEFAULT_OVERHEAD_TOKENS,
            cache_capacity: DEFAULT_CAPACITY,
            short_ttl: 300,
            long_ttl: 3600,
            server_port: 3000,
            cleanup_interval: 60,
            fixture_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 8] = [
        "TOKEN_BUDGET",
        "OVERHEAD_TOKENS",
        "CACHE_CAPACITY",
        "SHORT_TTL",
        "LONG_TTL",
        "SERVER_PORT",
        "CLEANUP_INTERVAL",
        "FIXTURE_DIR",
    ];

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.token_budget, 6000);
        assert_eq!(config.overhead_tokens, 500);
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.short_ttl, 300);
        assert_eq!(config.long_ttl, 3600);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 60);
        assert!(config.fixture_dir.is_none());
    }

    // Env vars are process-wide, so every env case lives in one test.
    #[test]
    fn test_config_from_env() {
        for name in VARS {
            env::remove_var(name);
        }
        assert_eq!(Config::from_env(), Config::default());

        env::set_var("TOKEN_BUDGET", "8000");
        env::set_var("SHORT_TTL", " 60 ");
        env::set_var("CACHE_CAPACITY", "lots");
        env::set_var("FIXTURE_DIR", "./fixtures");

        let config = Config::from_env();
        assert_eq!(config.token_budget, 8000);
        assert_eq!(config.short_ttl, 60);
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.fixture_dir, Some(PathBuf::from("./fixtures")));

        for name in VARS {
            env::remove_var(name);
        }
    }
}
