use crate::media::format_file_size;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum RejectionReason {
    FileTooLarge { size: u64, max_size: u64 },
    FileInvalidType { mime_type: String },
}

impl RejectionReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::FileTooLarge { .. } => "file-too-large",
            RejectionReason::FileInvalidType { .. } => "file-invalid-type",
        }
    }

    pub fn message(&self) -> String {
        match self {
            RejectionReason::FileTooLarge { max_size, .. } => format!(
                "File is too large. Maximum size is {}.",
                format_file_size(*max_size)
            ),
            RejectionReason::FileInvalidType { .. } => {
                "Invalid file type. Please upload images or videos only.".to_string()
            }
        }
    }
}

/// A selected file that could not become a preview. Carries every
/// violated rule, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{file_name} rejected: {}", join_messages(.reasons))]
#[serde(rename_all = "camelCase")]
pub struct FileRejection {
    pub file_name: String,
    pub reasons: Vec<RejectionReason>,
}

impl FileRejection {
    pub fn has(&self, code: &str) -> bool {
        self.reasons.iter().any(|reason| reason.code() == code)
    }
}

fn join_messages(reasons: &[RejectionReason]) -> String {
    reasons
        .iter()
        .map(RejectionReason::message)
        .collect::<Vec<_>>()
        .join(" ")
}
