use axum::body::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;
use uuid::Uuid;

/// Path prefix of every reference handed out by the registry.
pub const BLOB_URL_PREFIX: &str = "/blob/";

#[derive(Debug, Clone)]
pub struct Blob {
    pub mime_type: String,
    pub data: Bytes,
}

/// Process-lifetime registry of locally held media.
///
/// A reference stays resolvable until it is revoked or the process exits.
/// Cloning the registry shares the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct BlobRegistry {
    blobs: Arc<RwLock<HashMap<Uuid, Blob>>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_url(&self, mime_type: impl Into<String>, data: Bytes) -> String {
        let id = Uuid::new_v4();
        let blob = Blob {
            mime_type: mime_type.into(),
            data,
        };
        debug!("Registering blob {} ({} bytes)", id, blob.data.len());

        self.blobs
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id, blob);

        format!("{}{}", BLOB_URL_PREFIX, id)
    }

    /// Accepts either a full `/blob/<id>` reference or the bare id.
    pub fn resolve(&self, reference: &str) -> Option<Blob> {
        let id = parse_reference(reference)?;
        self.blobs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&id)
            .cloned()
    }

    /// Releases a reference. Returns false for references the registry does
    /// not own, such as remote URLs, or ones already revoked.
    pub fn revoke(&self, reference: &str) -> bool {
        if !reference.starts_with(BLOB_URL_PREFIX) {
            return false;
        }
        let Some(id) = parse_reference(reference) else {
            return false;
        };

        let removed = self
            .blobs
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&id)
            .is_some();

        if removed {
            debug!("Revoked blob {}", id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.blobs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_reference(reference: &str) -> Option<Uuid> {
    let id = reference.strip_prefix(BLOB_URL_PREFIX).unwrap_or(reference);
    Uuid::parse_str(id).ok()
}
