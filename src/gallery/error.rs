use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("Invalid type filter: {0}")]
    InvalidFilter(String),
}
