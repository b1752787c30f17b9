//! Mailer that writes messages to the log instead of sending them.

use async_trait::async_trait;

use blog_core::domain::EmailMessage;
use blog_core::ports::{MailError, Mailer};

/// Development mailer: every message is logged at INFO and dropped.
#[derive(Debug, Default, Clone)]
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            from = %message.from,
            to = ?message.to,
            subject = %message.subject,
            "Email (console backend)\n{}",
            message.body
        );
        Ok(())
    }
}
