use crate::media::EventType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Metadata entered alongside the selected files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub event_type: Option<EventType>,
    pub event_date: Option<NaiveDate>,
}

impl UploadForm {
    /// Every reason the submission cannot proceed. Empty when valid.
    pub fn validate(&self, selected_files: usize) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if selected_files == 0 {
            errors.push(FieldError::NoFiles);
        }
        if self.title.trim().is_empty() {
            errors.push(FieldError::MissingTitle);
        }
        if self.event_type.is_none() {
            errors.push(FieldError::MissingEventType);
        }

        errors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldError {
    NoFiles,
    MissingTitle,
    MissingEventType,
    InvalidEventType,
    InvalidEventDate,
}

impl FieldError {
    /// The form field the error belongs to.
    pub fn field(self) -> &'static str {
        match self {
            FieldError::NoFiles => "file",
            FieldError::MissingTitle => "title",
            FieldError::MissingEventType | FieldError::InvalidEventType => "eventType",
            FieldError::InvalidEventDate => "eventDate",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            FieldError::NoFiles => "Please select at least one file to upload.",
            FieldError::MissingTitle => "Please enter a title.",
            FieldError::MissingEventType => "Please select an event type.",
            FieldError::InvalidEventType => "Unknown event type.",
            FieldError::InvalidEventDate => "Event date must be YYYY-MM-DD.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadPhase {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl UploadPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, UploadPhase::Succeeded | UploadPhase::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFailure {
    pub file_name: String,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form_reports_each_field() {
        let errors = UploadForm::default().validate(0);
        assert_eq!(
            errors,
            vec![
                FieldError::NoFiles,
                FieldError::MissingTitle,
                FieldError::MissingEventType
            ]
        );
        assert_eq!(errors[2].field(), "eventType");
    }

    #[test]
    fn test_whitespace_title_is_missing() {
        let form = UploadForm {
            title: "   ".to_string(),
            event_type: Some(EventType::Birthday),
            ..Default::default()
        };
        assert_eq!(form.validate(1), vec![FieldError::MissingTitle]);
    }

    #[test]
    fn test_complete_form_is_valid() {
        let form = UploadForm {
            title: "Ring exchange".to_string(),
            event_type: Some(EventType::Engagement),
            ..Default::default()
        };
        assert!(form.validate(2).is_empty());
    }

    #[test]
    fn test_field_error_codes() {
        assert_eq!(
            serde_json::to_value(FieldError::MissingEventType).unwrap(),
            "missing-event-type"
        );
    }
}
