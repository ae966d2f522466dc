use super::TransportError;
use crate::media::{EventType, MediaKind, NewMediaItem};
use crate::preview::{BlobRegistry, SelectedFile};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Everything sent for one file of a submission.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: SelectedFile,
    pub kind: MediaKind,
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub event_date: Option<NaiveDate>,
}

/// One call per file; returns the created-item shape on success.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<NewMediaItem, TransportError>;
    fn name(&self) -> &str;
}

pub type DynUploadTransport = Arc<dyn UploadTransport>;

/// Stand-in for a media backend: waits a fixed delay, then keeps the file
/// in the blob registry for the rest of the process lifetime.
pub struct SimulatedUploadTransport {
    registry: BlobRegistry,
    delay: Duration,
}

impl SimulatedUploadTransport {
    pub fn new(registry: BlobRegistry, delay: Duration) -> Self {
        Self { registry, delay }
    }
}

#[async_trait]
impl UploadTransport for SimulatedUploadTransport {
    async fn upload(&self, request: UploadRequest) -> Result<NewMediaItem, TransportError> {
        debug!(
            "Simulating upload of {} ({} bytes)",
            request.file.name,
            request.file.size()
        );

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if request.file.data.is_empty() {
            return Err(TransportError::Rejected(format!(
                "{} has no content",
                request.file.name
            )));
        }

        let url = self
            .registry
            .create_url(request.file.mime_type.clone(), request.file.data.clone());

        info!("Stored upload {} at {}", request.file.name, url);

        Ok(NewMediaItem {
            title: request.title,
            description: request.description,
            event_type: request.event_type,
            event_date: request.event_date,
            kind: request.kind,
            file_size: request.file.size(),
            file_name: request.file.name,
            url,
        })
    }

    fn name(&self) -> &str {
        "Simulated Upload Transport"
    }
}
