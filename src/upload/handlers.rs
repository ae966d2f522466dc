use super::{FieldError, UploadError, UploadFailure, UploadForm, UploadOrchestrator};
use crate::AppState;
use crate::media::{EventType, MediaItem};
use crate::preview::{FileRejection, SelectedFile};
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    success: bool,
    message: String,
    items: Vec<MediaItem>,
    failures: Vec<UploadFailure>,
    rejected: Vec<FileRejection>,
    errors: Vec<FieldErrorBody>,
}

#[derive(Serialize)]
pub struct FieldErrorBody {
    field: &'static str,
    code: FieldError,
    message: &'static str,
}

impl From<FieldError> for FieldErrorBody {
    fn from(error: FieldError) -> Self {
        Self {
            field: error.field(),
            code: error,
            message: error.message(),
        }
    }
}

/// Form fields and files pulled out of a multipart body.
#[derive(Default)]
struct UploadSubmission {
    files: Vec<SelectedFile>,
    form: UploadForm,
    field_errors: Vec<FieldError>,
}

async fn read_submission(mut multipart: Multipart) -> Result<UploadSubmission, String> {
    let mut submission = UploadSubmission::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" | "files" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| e.to_string())?;
                submission.files.push(SelectedFile::new(
                    file_name,
                    content_type.as_deref(),
                    data,
                ));
            }
            "title" => submission.form.title = field.text().await.map_err(|e| e.to_string())?,
            "description" => {
                submission.form.description = field.text().await.map_err(|e| e.to_string())?
            }
            "eventType" => {
                let value = field.text().await.map_err(|e| e.to_string())?;
                if !value.trim().is_empty() {
                    match value.parse::<EventType>() {
                        Ok(event_type) => submission.form.event_type = Some(event_type),
                        Err(_) => submission.field_errors.push(FieldError::InvalidEventType),
                    }
                }
            }
            "eventDate" => {
                let value = field.text().await.map_err(|e| e.to_string())?;
                if !value.trim().is_empty() {
                    match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
                        Ok(date) => submission.form.event_date = Some(date),
                        Err(_) => submission.field_errors.push(FieldError::InvalidEventDate),
                    }
                }
            }
            other => debug!("Ignoring unknown upload field '{}'", other),
        }
    }

    Ok(submission)
}

pub async fn upload_handler(State(app_state): State<AppState>, multipart: Multipart) -> Response {
    let submission = match read_submission(multipart).await {
        Ok(submission) => submission,
        Err(e) => {
            warn!("Malformed upload body: {}", e);
            return (StatusCode::BAD_REQUEST, e).into_response();
        }
    };

    let mut orchestrator = UploadOrchestrator::new(
        app_state.previews.clone(),
        app_state.upload_transport.clone(),
        app_state.gallery.clone(),
    );
    let rejected = orchestrator.select(submission.files);
    orchestrator.set_form(submission.form);

    if !submission.field_errors.is_empty() {
        let mut errors = submission.field_errors;
        errors.extend(orchestrator.form().validate(orchestrator.selection().len()));
        return (
            StatusCode::BAD_REQUEST,
            Json(UploadResponse {
                message: "Please fill in all required fields.".to_string(),
                rejected,
                errors: errors.into_iter().map(FieldErrorBody::from).collect(),
                ..Default::default()
            }),
        )
            .into_response();
    }

    // Previews still held by the orchestrator are released when it drops
    match orchestrator.submit().await {
        Ok(items) => (
            StatusCode::CREATED,
            Json(UploadResponse {
                success: true,
                message: "Files uploaded successfully!".to_string(),
                items,
                rejected,
                ..Default::default()
            }),
        )
            .into_response(),
        Err(UploadError::Validation(errors)) => (
            StatusCode::BAD_REQUEST,
            Json(UploadResponse {
                message: errors
                    .first()
                    .map(|e| e.message())
                    .unwrap_or("Please fill in all required fields.")
                    .to_string(),
                rejected,
                errors: errors.into_iter().map(FieldErrorBody::from).collect(),
                ..Default::default()
            }),
        )
            .into_response(),
        Err(UploadError::Failed { created, failures }) => (
            StatusCode::BAD_GATEWAY,
            Json(UploadResponse {
                message: "Upload failed. Please try again.".to_string(),
                items: created,
                failures,
                rejected,
                ..Default::default()
            }),
        )
            .into_response(),
    }
}
