pub mod error;
pub mod handlers;
pub mod types;

pub use error::*;
pub use handlers::contact_handler;
pub use types::*;

use crate::email::{DynEmailProvider, EmailMessage};
use tracing::{info, warn};

/// Turns validated enquiries into notification emails.
#[derive(Clone)]
pub struct ContactService {
    provider: DynEmailProvider,
    recipient: String,
    from: String,
}

impl ContactService {
    pub fn new(
        provider: DynEmailProvider,
        recipient: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            recipient: recipient.into(),
            from: from.into(),
        }
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn compose(&self, form: &ContactForm) -> EmailMessage {
        let subject = match form.event_type {
            Some(event_type) => format!(
                "New {} enquiry from {}",
                event_type.label().to_lowercase(),
                form.name.trim()
            ),
            None => format!("New enquiry from {}", form.name.trim()),
        };

        EmailMessage::new(&self.recipient, &self.from, subject)
            .with_text(form.render_text())
            .with_reply_to(form.email.trim())
    }

    pub async fn send(&self, form: &ContactForm) -> Result<(), ContactError> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(ContactError::Validation(errors));
        }

        let message = self.compose(form);
        match self.provider.send_email(message).await {
            Ok(()) => {
                info!(
                    provider = self.provider.name(),
                    "Delivered enquiry from {}",
                    form.email.trim()
                );
                Ok(())
            }
            Err(e) => {
                warn!("Failed to deliver enquiry from {}: {}", form.email.trim(), e);
                Err(e.into())
            }
        }
    }
}
