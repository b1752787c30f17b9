//! Mailer that keeps sent messages in an outbox.

use async_trait::async_trait;
use tokio::sync::Mutex;

use blog_core::domain::EmailMessage;
use blog_core::ports::{MailError, Mailer};

/// Collects messages instead of delivering them. Used by tests.
#[derive(Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<EmailMessage>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first.
    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.outbox.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        if message.to.is_empty() {
            return Err(MailError::InvalidAddress("no recipients".to_string()));
        }
        self.outbox.lock().await.push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_messages_in_order() {
        let mailer = MemoryMailer::new();
        for subject in ["first", "second"] {
            let message = EmailMessage {
                from: "blog@example.com".to_string(),
                to: vec!["reader@example.com".to_string()],
                subject: subject.to_string(),
                body: String::new(),
            };
            mailer.send(&message).await.unwrap();
        }

        let subjects: Vec<String> = mailer.sent().await.into_iter().map(|m| m.subject).collect();
        assert_eq!(subjects, vec!["first", "second"]);
    }
}
