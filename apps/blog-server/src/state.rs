//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{CommentRepository, Mailer, PostRepository, TagRepository};
use blog_infra::{ConsoleMailer, InMemoryBlogStore, MemoryMailer};

#[cfg(feature = "postgres")]
use blog_infra::{PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository};

#[cfg(feature = "smtp")]
use blog_infra::SmtpMailer;

use crate::config::{AppConfig, EmailBackend, SiteConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub mailer: Arc<dyn Mailer>,
    pub site: Arc<SiteConfig>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let mailer = build_mailer(config);
        let site = config.site.clone();

        #[cfg(feature = "postgres")]
        if let Some(db_config) = &config.database {
            match blog_infra::connect(db_config).await {
                Ok(db) => {
                    tracing::info!("Application state initialized (postgres)");
                    return Self {
                        posts: Arc::new(PostgresPostRepository::new(db.clone())),
                        comments: Arc::new(PostgresCommentRepository::new(db.clone())),
                        tags: Arc::new(PostgresTagRepository::new(db)),
                        mailer,
                        site: Arc::new(site),
                    };
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        #[cfg(not(feature = "postgres"))]
        if config.database.is_some() {
            tracing::warn!("Built without postgres feature - DATABASE_URL ignored");
        }

        let state = Self::in_memory(Arc::new(InMemoryBlogStore::new()), mailer, site);
        tracing::info!("Application state initialized (in-memory)");
        state
    }

    /// State backed by one in-memory store for every repository.
    pub fn in_memory(
        store: Arc<InMemoryBlogStore>,
        mailer: Arc<dyn Mailer>,
        site: SiteConfig,
    ) -> Self {
        Self {
            posts: store.clone(),
            comments: store.clone(),
            tags: store,
            mailer,
            site: Arc::new(site),
        }
    }
}

fn build_mailer(config: &AppConfig) -> Arc<dyn Mailer> {
    match config.email_backend {
        EmailBackend::Console => Arc::new(ConsoleMailer),
        EmailBackend::Memory => Arc::new(MemoryMailer::new()),
        EmailBackend::Smtp => smtp_mailer(config),
    }
}

#[cfg(feature = "smtp")]
fn smtp_mailer(config: &AppConfig) -> Arc<dyn Mailer> {
    let Some(smtp) = &config.smtp else {
        tracing::warn!("EMAIL_BACKEND=smtp but SMTP_HOST is not set. Using console mailer.");
        return Arc::new(ConsoleMailer);
    };

    match SmtpMailer::new(smtp) {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            tracing::error!("Failed to configure SMTP: {}. Using console mailer.", e);
            Arc::new(ConsoleMailer)
        }
    }
}

#[cfg(not(feature = "smtp"))]
fn smtp_mailer(_config: &AppConfig) -> Arc<dyn Mailer> {
    tracing::warn!("Built without smtp feature - using console mailer");
    Arc::new(ConsoleMailer)
}
