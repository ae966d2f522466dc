// Upload orchestration: selection, validation, concurrent submission
mod error;
mod handlers;
mod transport;
mod types;

pub use error::{TransportError, UploadError};
pub use handlers::upload_handler;
pub use transport::{DynUploadTransport, SimulatedUploadTransport, UploadRequest, UploadTransport};
pub use types::{FieldError, UploadFailure, UploadForm, UploadPhase};

use crate::gallery::SharedGallery;
use crate::media::MediaItem;
use crate::preview::{FileRejection, PreviewHandle, PreviewManager, SelectedFile};
use futures::future::join_all;
use tracing::{info, warn};

/// Drives one upload form from file selection to persisted gallery items.
///
/// Phases move `Idle -> Validating -> Submitting -> Succeeded | Failed`.
/// A terminal phase is kept until [`UploadOrchestrator::acknowledge`] or the
/// next submission. Dropping the orchestrator releases any remaining
/// previews.
pub struct UploadOrchestrator {
    previews: PreviewManager,
    transport: DynUploadTransport,
    gallery: SharedGallery,
    selection: Vec<PreviewHandle>,
    form: UploadForm,
    phase: UploadPhase,
}

impl UploadOrchestrator {
    pub fn new(
        previews: PreviewManager,
        transport: DynUploadTransport,
        gallery: SharedGallery,
    ) -> Self {
        Self {
            previews,
            transport,
            gallery,
            selection: Vec::new(),
            form: UploadForm::default(),
            phase: UploadPhase::Idle,
        }
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn selection(&self) -> &[PreviewHandle] {
        &self.selection
    }

    pub fn form(&self) -> &UploadForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut UploadForm {
        &mut self.form
    }

    pub fn set_form(&mut self, form: UploadForm) {
        self.form = form;
    }

    /// Adds files to the selection. Rejected files are returned and never
    /// become previews.
    pub fn select(&mut self, files: impl IntoIterator<Item = SelectedFile>) -> Vec<FileRejection> {
        let (handles, rejections) = self.previews.create_all(files);

        for rejection in &rejections {
            warn!("{}", rejection);
        }
        if !handles.is_empty() {
            info!("{} file(s) added to the upload selection", handles.len());
        }

        self.selection.extend(handles);
        rejections
    }

    /// Removes one selected file and releases its preview.
    pub fn remove_file(&mut self, preview_id: &str) -> bool {
        match self.selection.iter().position(|h| h.id() == preview_id) {
            Some(index) => {
                let handle = self.selection.remove(index);
                self.previews.release(handle);
                true
            }
            None => false,
        }
    }

    /// Releases every selected preview.
    pub fn clear_selection(&mut self) {
        for handle in self.selection.drain(..) {
            handle.release();
        }
    }

    /// Returns to `Idle` after a terminal outcome has been observed.
    pub fn acknowledge(&mut self) {
        if self.phase.is_terminal() {
            self.phase = UploadPhase::Idle;
        }
    }

    /// Validates the form and uploads every selected file concurrently.
    ///
    /// Each successful upload is added to the gallery as soon as the batch
    /// settles, even when other files in the batch failed.
    pub async fn submit(&mut self) -> Result<Vec<MediaItem>, UploadError> {
        self.acknowledge();
        self.phase = UploadPhase::Validating;

        let errors = self.form.validate(self.selection.len());
        let event_type = match self.form.event_type {
            Some(event_type) if errors.is_empty() => event_type,
            _ => {
                self.phase = UploadPhase::Idle;
                return Err(UploadError::Validation(errors));
            }
        };

        self.phase = UploadPhase::Submitting;
        info!(
            "Submitting {} file(s) via {}",
            self.selection.len(),
            self.transport.name()
        );

        let uploads = self.selection.iter().map(|handle| {
            let request = UploadRequest {
                file: handle.file().clone(),
                kind: handle.kind(),
                title: self.form.title.trim().to_string(),
                description: self.form.description.clone(),
                event_type,
                event_date: self.form.event_date,
            };
            let file_name = handle.file().name.clone();
            let transport = &self.transport;
            async move { (file_name, transport.upload(request).await) }
        });

        let results = join_all(uploads).await;

        let mut created = Vec::new();
        let mut failures = Vec::new();
        for (file_name, result) in results {
            match result {
                Ok(draft) => created.push(self.gallery.add(draft).await),
                Err(e) => {
                    warn!("Upload of {} failed: {}", file_name, e);
                    failures.push(UploadFailure {
                        file_name,
                        error: e.to_string(),
                    });
                }
            }
        }

        if failures.is_empty() {
            info!("Uploaded {} file(s)", created.len());
            self.clear_selection();
            self.form = UploadForm::default();
            self.phase = UploadPhase::Succeeded;
            Ok(created)
        } else {
            warn!(
                "{} of {} uploads failed, keeping selection for retry",
                failures.len(),
                failures.len() + created.len()
            );
            self.phase = UploadPhase::Failed;
            Err(UploadError::Failed { created, failures })
        }
    }
}
