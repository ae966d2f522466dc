use super::ContactFieldError;
use crate::email::EmailError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("Contact form is incomplete: {}", describe_fields(.0))]
    Validation(Vec<ContactFieldError>),

    #[error("Failed to deliver enquiry: {0}")]
    DeliveryError(#[from] EmailError),
}

fn describe_fields(errors: &[ContactFieldError]) -> String {
    errors
        .iter()
        .map(|error| error.message())
        .collect::<Vec<_>>()
        .join(" ")
}
