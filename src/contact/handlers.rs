use super::{ContactError, ContactFieldError, ContactForm};
use crate::AppState;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::debug;

#[derive(Serialize, Default)]
pub struct ContactResponse {
    success: bool,
    message: String,
    errors: Vec<ContactFieldBody>,
}

#[derive(Serialize)]
pub struct ContactFieldBody {
    field: &'static str,
    code: ContactFieldError,
    message: &'static str,
}

impl From<ContactFieldError> for ContactFieldBody {
    fn from(error: ContactFieldError) -> Self {
        Self {
            field: error.field(),
            code: error,
            message: error.message(),
        }
    }
}

fn reply(status: StatusCode, response: ContactResponse) -> Response {
    (status, Json(response)).into_response()
}

pub async fn contact_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Response {
    let Some(contact) = app_state.contact.as_ref() else {
        return reply(
            StatusCode::SERVICE_UNAVAILABLE,
            ContactResponse {
                message: "The contact form is not configured.".to_string(),
                ..Default::default()
            },
        );
    };

    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => {
            debug!("Rejected contact payload: {}", rejection);
            return reply(
                StatusCode::BAD_REQUEST,
                ContactResponse {
                    message: rejection.body_text(),
                    ..Default::default()
                },
            );
        }
    };

    match contact.send(&form).await {
        Ok(()) => reply(
            StatusCode::OK,
            ContactResponse {
                success: true,
                message: "Thank you! We will be in touch shortly.".to_string(),
                errors: Vec::new(),
            },
        ),
        Err(ContactError::Validation(errors)) => reply(
            StatusCode::BAD_REQUEST,
            ContactResponse {
                message: "Please correct the highlighted fields.".to_string(),
                errors: errors.into_iter().map(ContactFieldBody::from).collect(),
                ..Default::default()
            },
        ),
        Err(e @ ContactError::DeliveryError(_)) => reply(
            StatusCode::BAD_GATEWAY,
            ContactResponse {
                message: e.to_string(),
                ..Default::default()
            },
        ),
    }
}
