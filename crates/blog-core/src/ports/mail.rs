//! Outgoing mail port.

use async_trait::async_trait;

use crate::domain::EmailMessage;

/// Mail transport - SMTP in production, console or in-memory otherwise.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a message. No retries; failures go back to the caller.
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Mail delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Message could not be built: {0}")]
    Build(String),

    #[error("Transport failed: {0}")]
    Transport(String),
}
