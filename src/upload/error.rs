use super::{FieldError, UploadFailure};
use crate::media::MediaItem;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("Upload service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Validation failed: {}", describe_fields(.0))]
    Validation(Vec<FieldError>),

    /// At least one upload in the batch failed. Items that did upload are
    /// already in the gallery and are listed in `created`.
    #[error("{}", describe_batch(.created, .failures))]
    Failed {
        created: Vec<MediaItem>,
        failures: Vec<UploadFailure>,
    },
}

fn describe_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|field| field.message())
        .collect::<Vec<_>>()
        .join(" ")
}

fn describe_batch(created: &[MediaItem], failures: &[UploadFailure]) -> String {
    format!(
        "{} of {} uploads failed",
        failures.len(),
        failures.len() + created.len()
    )
}
