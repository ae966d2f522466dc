use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email provider error: {0}")]
    ProviderError(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}
