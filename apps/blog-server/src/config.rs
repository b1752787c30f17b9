//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use blog_core::domain::{DEFAULT_PER_PAGE, SearchMode};
use blog_infra::DatabaseConfig;

#[cfg(feature = "smtp")]
use blog_infra::SmtpConfig;

#[cfg(feature = "rate-limit")]
use blog_infra::RateLimitConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub site: SiteConfig,
    pub email_backend: EmailBackend,
    #[cfg(feature = "smtp")]
    pub smtp: Option<SmtpConfig>,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
}

/// Settings the views and templates read on every request.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub posts_per_page: u64,
    pub search_mode: SearchMode,
    /// Sender address for outgoing mail.
    pub from_email: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My blog".to_string(),
            description: "New posts of my blog.".to_string(),
            posts_per_page: DEFAULT_PER_PAGE,
            search_mode: SearchMode::default(),
            from_email: "webmaster@localhost".to_string(),
        }
    }
}

/// Where outgoing mail goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailBackend {
    Smtp,
    /// Log messages instead of sending them.
    #[default]
    Console,
    /// Keep messages in memory.
    Memory,
}

impl FromStr for EmailBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smtp" => Ok(Self::Smtp),
            "console" => Ok(Self::Console),
            "memory" | "locmem" => Ok(Self::Memory),
            other => Err(format!("unknown email backend '{other}'")),
        }
    }
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parsed("DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            database,
            site: SiteConfig::from_env(),
            email_backend: Self::email_backend(),
            #[cfg(feature = "smtp")]
            smtp: SmtpConfig::from_env(),
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::from_env(),
        }
    }

    fn email_backend() -> EmailBackend {
        match env::var("EMAIL_BACKEND") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("{e}, falling back to console");
                EmailBackend::Console
            }),
            Err(_) => EmailBackend::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let search_mode = match env::var("SEARCH_MODE") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("{e}, falling back to full-text search");
                SearchMode::default()
            }),
            Err(_) => defaults.search_mode,
        };

        Self {
            title: env::var("BLOG_TITLE").unwrap_or(defaults.title),
            description: env::var("BLOG_DESCRIPTION").unwrap_or(defaults.description),
            posts_per_page: parsed("POSTS_PER_PAGE")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.posts_per_page),
            search_mode,
            from_email: env::var("DEFAULT_FROM_EMAIL").unwrap_or(defaults.from_email),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_backend_names() {
        assert_eq!("SMTP".parse::<EmailBackend>(), Ok(EmailBackend::Smtp));
        assert_eq!("locmem".parse::<EmailBackend>(), Ok(EmailBackend::Memory));
        assert!("carrier-pigeon".parse::<EmailBackend>().is_err());
    }

    #[test]
    fn site_defaults() {
        let site = SiteConfig::default();
        assert_eq!(site.title, "My blog");
        assert_eq!(site.posts_per_page, 3);
        assert_eq!(site.search_mode, SearchMode::FullText);
    }
}
