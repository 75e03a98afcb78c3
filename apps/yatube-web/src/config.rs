//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use yatube_core::pagination::POSTS_PER_PAGE;
use yatube_infra::{DatabaseConfig, JwtConfig, PasswordConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub run_migrations: bool,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub site: SiteConfig,
}

/// Settings the request handlers read.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub posts_per_page: u64,
    pub index_cache_ttl: Duration,
    pub session_cookie_secure: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            posts_per_page: POSTS_PER_PAGE,
            index_cache_ttl: Duration::from_secs(20),
            session_cookie_secure: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let site = SiteConfig {
            posts_per_page: parse_var("POSTS_PER_PAGE", POSTS_PER_PAGE),
            index_cache_ttl: Duration::from_secs(parse_var("INDEX_CACHE_TTL_SECS", 20)),
            session_cookie_secure: flag_var("SESSION_COOKIE_SECURE", false),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080),
            database: DatabaseConfig::from_env(),
            run_migrations: flag_var("RUN_MIGRATIONS", true),
            jwt: JwtConfig::from_env(),
            password: PasswordConfig::from_env(),
            site,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn flag_var(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| parse_flag(&v))
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(" OFF "));
        assert!(!parse_flag("0"));
    }

    #[test]
    fn test_site_defaults() {
        let site = SiteConfig::default();
        assert_eq!(site.posts_per_page, 10);
        assert_eq!(site.index_cache_ttl, Duration::from_secs(20));
        assert!(!site.session_cookie_secure);
    }
}
