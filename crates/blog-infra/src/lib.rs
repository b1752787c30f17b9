//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`:
//! storage, mail delivery and rate limiting.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL storage via SeaORM
//! - `smtp` - SMTP mail delivery via lettre
//! - `rate-limit` - Rate limiting via governor

pub mod database;
pub mod mail;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryBlogStore};
pub use mail::{ConsoleMailer, MemoryMailer};

#[cfg(feature = "postgres")]
pub use database::{
    PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository, connect,
};

#[cfg(feature = "smtp")]
pub use mail::{SmtpConfig, SmtpMailer};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
