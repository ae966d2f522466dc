// Preview handles for files selected but not yet uploaded
mod blob;
mod error;

pub use blob::{BLOB_URL_PREFIX, Blob, BlobRegistry};
pub use error::{FileRejection, RejectionReason};

use crate::media::MediaKind;
use axum::body::Bytes;
use rand::Rng;
use tracing::debug;

/// MIME types accepted for upload.
pub const ACCEPTED_TYPES: [&str; 7] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "video/mp4",
    "video/webm",
    "video/ogg",
];

pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// A file picked by the user, as received from the client.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl SelectedFile {
    /// Builds a selected file. When the client did not declare a MIME type
    /// one is guessed from the file name.
    pub fn new(name: impl Into<String>, mime_type: Option<&str>, data: Bytes) -> Self {
        let name = name.into();
        let mime_type = match mime_type.map(str::trim).filter(|m| !m.is_empty()) {
            Some(mime_type) => mime_type.to_lowercase(),
            None => mime_guess::from_path(&name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        };

        Self {
            name,
            mime_type,
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// A selected file paired with a revocable local reference.
///
/// The reference is released exactly once: explicitly through
/// [`PreviewManager::release`] / [`PreviewHandle::release`], or when the
/// handle is dropped.
#[derive(Debug)]
pub struct PreviewHandle {
    id: String,
    file: SelectedFile,
    kind: MediaKind,
    preview_url: String,
    registry: BlobRegistry,
}

impl PreviewHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn file(&self) -> &SelectedFile {
        &self.file
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn preview_url(&self) -> &str {
        &self.preview_url
    }

    /// Consumes the handle; its `Drop` revokes the preview reference.
    pub fn release(self) {}
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if self.registry.revoke(&self.preview_url) {
            debug!("Released preview {} for {}", self.id, self.file.name);
        }
    }
}

/// Validates selected files and turns them into [`PreviewHandle`]s.
#[derive(Debug, Clone)]
pub struct PreviewManager {
    registry: BlobRegistry,
    max_file_size: u64,
}

impl PreviewManager {
    pub fn new(registry: BlobRegistry, max_file_size: u64) -> Self {
        Self {
            registry,
            max_file_size,
        }
    }

    pub fn registry(&self) -> &BlobRegistry {
        &self.registry
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn validate(&self, file: &SelectedFile) -> Result<(), FileRejection> {
        let mut reasons = Vec::new();

        if file.size() > self.max_file_size {
            reasons.push(RejectionReason::FileTooLarge {
                size: file.size(),
                max_size: self.max_file_size,
            });
        }

        if !ACCEPTED_TYPES.contains(&file.mime_type.as_str()) {
            reasons.push(RejectionReason::FileInvalidType {
                mime_type: file.mime_type.clone(),
            });
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(FileRejection {
                file_name: file.name.clone(),
                reasons,
            })
        }
    }

    pub fn create(&self, file: SelectedFile) -> Result<PreviewHandle, FileRejection> {
        self.validate(&file)?;

        let kind = MediaKind::from_mime(&file.mime_type);
        let preview_url = self
            .registry
            .create_url(file.mime_type.clone(), file.data.clone());

        let handle = PreviewHandle {
            id: transient_id(),
            file,
            kind,
            preview_url,
            registry: self.registry.clone(),
        };
        debug!(
            "Created {} preview {} for {}",
            handle.kind, handle.id, handle.file.name
        );

        Ok(handle)
    }

    pub fn create_all(
        &self,
        files: impl IntoIterator<Item = SelectedFile>,
    ) -> (Vec<PreviewHandle>, Vec<FileRejection>) {
        let mut handles = Vec::new();
        let mut rejections = Vec::new();

        for file in files {
            match self.create(file) {
                Ok(handle) => handles.push(handle),
                Err(rejection) => rejections.push(rejection),
            }
        }

        (handles, rejections)
    }

    pub fn release(&self, handle: PreviewHandle) {
        handle.release();
    }
}

/// Nine base-36 characters; only needs to be unique within one selection.
fn transient_id() -> String {
    let mut rng = rand::rng();
    (0..9)
        .filter_map(|_| char::from_digit(rng.random_range(0..36), 36))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime_type: &str, size: usize) -> SelectedFile {
        SelectedFile::new(name, Some(mime_type), Bytes::from(vec![0u8; size]))
    }

    fn manager() -> PreviewManager {
        PreviewManager::new(BlobRegistry::new(), 1024)
    }

    #[test]
    fn test_create_classifies_and_registers() {
        let manager = manager();
        let image = manager.create(file("a.png", "image/png", 10)).unwrap();
        let video = manager.create(file("b.webm", "video/webm", 10)).unwrap();

        assert_eq!(image.kind(), MediaKind::Image);
        assert_eq!(video.kind(), MediaKind::Video);
        assert_eq!(image.id().len(), 9);
        assert_ne!(image.preview_url(), video.preview_url());
        assert!(manager.registry().resolve(image.preview_url()).is_some());
        assert_eq!(manager.registry().len(), 2);
    }

    #[test]
    fn test_rejects_oversized_file() {
        let rejection = manager()
            .create(file("big.mp4", "video/mp4", 2048))
            .unwrap_err();
        assert!(rejection.has("file-too-large"));
        assert!(!rejection.has("file-invalid-type"));
    }

    #[test]
    fn test_rejects_unaccepted_type() {
        let manager = manager();
        let rejection = manager
            .create(file("doc.pdf", "application/pdf", 10))
            .unwrap_err();
        assert_eq!(rejection.reasons.len(), 1);
        assert_eq!(rejection.reasons[0].code(), "file-invalid-type");
        assert!(manager.registry().is_empty());
    }

    #[test]
    fn test_reports_every_violation() {
        let rejection = manager()
            .create(file("huge.bmp", "image/bmp", 4096))
            .unwrap_err();
        assert!(rejection.has("file-too-large"));
        assert!(rejection.has("file-invalid-type"));
        assert!(rejection.to_string().contains("huge.bmp"));
    }

    #[test]
    fn test_release_and_drop_revoke() {
        let manager = manager();
        let first = manager.create(file("a.jpg", "image/jpeg", 1)).unwrap();
        let second = manager.create(file("b.jpg", "image/jpeg", 1)).unwrap();
        let first_url = first.preview_url().to_string();
        let second_url = second.preview_url().to_string();

        manager.release(first);
        assert!(manager.registry().resolve(&first_url).is_none());
        assert!(manager.registry().resolve(&second_url).is_some());

        drop(second);
        assert!(manager.registry().is_empty());
    }

    #[test]
    fn test_handle_release_revokes_reference() {
        let manager = manager();
        let handle = manager.create(file("c.png", "image/png", 1)).unwrap();
        let url = handle.preview_url().to_string();

        handle.release();
        assert!(manager.registry().resolve(&url).is_none());
    }

    #[test]
    fn test_mime_guessed_from_name() {
        let guessed = SelectedFile::new("clip.mp4", None, Bytes::from_static(b"x"));
        assert_eq!(guessed.mime_type, "video/mp4");

        let unknown = SelectedFile::new("notes", Some("  "), Bytes::from_static(b"x"));
        assert_eq!(unknown.mime_type, "application/octet-stream");
    }

    #[test]
    fn test_create_all_splits_results() {
        let manager = manager();
        let (handles, rejections) = manager.create_all(vec![
            file("a.gif", "image/gif", 1),
            file("b.txt", "text/plain", 1),
            file("c.ogg", "video/ogg", 1),
        ]);
        assert_eq!(handles.len(), 2);
        assert_eq!(rejections.len(), 1);
        assert_eq!(rejections[0].file_name, "b.txt");
    }
}
