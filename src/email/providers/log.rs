use crate::email::{EmailError, EmailMessage, EmailProvider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Delivers nothing: logs each message and keeps the most recent ones in
/// an in-memory outbox.
#[derive(Clone)]
pub struct LogProvider {
    outbox: Arc<Mutex<VecDeque<EmailMessage>>>,
    capacity: usize,
}

impl LogProvider {
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outbox: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Messages sent so far, oldest first.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.outbox
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

impl Default for LogProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailProvider for LogProvider {
    async fn send_email(&self, message: EmailMessage) -> Result<(), EmailError> {
        if message.to.iter().all(|to| to.trim().is_empty()) {
            return Err(EmailError::InvalidEmail("no recipients".to_string()));
        }

        let body_preview = message.body.chars().take(200).collect::<String>();

        info!(
            to = %message.to.join(", "),
            reply_to = message.reply_to.as_deref().unwrap_or("(none)"),
            subject = %message.subject,
            "Logged email (not delivered)"
        );
        debug!("Email body:\n{}", body_preview);

        if self.capacity > 0 {
            let mut outbox = self
                .outbox
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if outbox.len() == self.capacity {
                outbox.pop_front();
            }
            outbox.push_back(message);
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "Log Email Provider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(subject: &str) -> EmailMessage {
        EmailMessage::new("events@example.com", "noreply@example.com", subject)
            .with_text("Looking for a venue")
            .with_reply_to("guest@example.com")
    }

    #[tokio::test]
    async fn test_log_provider_records_messages() {
        let provider = LogProvider::new();
        provider.send_email(message("Inquiry")).await.unwrap();

        let sent = provider.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Inquiry");
        assert_eq!(sent[0].body, "Looking for a venue");
    }

    #[tokio::test]
    async fn test_outbox_is_bounded() {
        let provider = LogProvider::with_capacity(2);
        for subject in ["one", "two", "three"] {
            provider.send_email(message(subject)).await.unwrap();
        }

        let subjects: Vec<_> = provider.sent().into_iter().map(|m| m.subject).collect();
        assert_eq!(subjects, vec!["two", "three"]);
    }

    #[tokio::test]
    async fn test_rejects_missing_recipient() {
        let provider = LogProvider::new();
        let mut message = message("Nobody");
        message.to = vec![" ".to_string()];
        assert!(matches!(
            provider.send_email(message).await,
            Err(EmailError::InvalidEmail(_))
        ));
        assert!(provider.sent().is_empty());
    }

    #[test]
    fn test_log_provider_name() {
        assert_eq!(LogProvider::new().name(), "Log Email Provider");
    }
}
