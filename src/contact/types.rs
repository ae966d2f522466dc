use crate::media::EventType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An enquiry submitted through the contact page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_type: Option<EventType>,
    pub event_date: Option<NaiveDate>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContactFieldError {
    MissingName,
    MissingEmail,
    InvalidEmail,
    MissingMessage,
}

impl ContactFieldError {
    pub fn field(self) -> &'static str {
        match self {
            ContactFieldError::MissingName => "name",
            ContactFieldError::MissingEmail | ContactFieldError::InvalidEmail => "email",
            ContactFieldError::MissingMessage => "message",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ContactFieldError::MissingName => "Please enter your name.",
            ContactFieldError::MissingEmail => "Please enter your email address.",
            ContactFieldError::InvalidEmail => "Please enter a valid email address.",
            ContactFieldError::MissingMessage => "Please enter a message.",
        }
    }
}

impl ContactForm {
    pub fn validate(&self) -> Vec<ContactFieldError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ContactFieldError::MissingName);
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(ContactFieldError::MissingEmail);
        } else if !looks_like_email(email) {
            errors.push(ContactFieldError::InvalidEmail);
        }

        if self.message.trim().is_empty() {
            errors.push(ContactFieldError::MissingMessage);
        }

        errors
    }

    /// Plain-text body of the notification email.
    pub fn render_text(&self) -> String {
        let mut lines = vec![
            format!("Name: {}", self.name.trim()),
            format!("Email: {}", self.email.trim()),
        ];
        if !self.phone.trim().is_empty() {
            lines.push(format!("Phone: {}", self.phone.trim()));
        }
        if let Some(event_type) = self.event_type {
            lines.push(format!("Event type: {}", event_type.label()));
        }
        if let Some(event_date) = self.event_date {
            lines.push(format!("Event date: {}", event_date.format("%B %d, %Y")));
        }
        lines.push(String::new());
        lines.push(self.message.trim().to_string());
        lines.join("\n")
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
