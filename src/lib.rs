use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod contact;
pub mod email;
pub mod gallery;
pub mod media;
pub mod preview;
pub mod startup_checks;
pub mod storage;
pub mod upload;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub gallery: GalleryConfig,
    pub uploads: UploadConfig,
    pub contact: Option<ContactConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one JSON document per key.
    pub directory: PathBuf,
    pub items_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub load_delay_ms: u64,
    /// Merge the built-in showcase items after the persisted ones.
    pub include_seed: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_file_size: u64,
    pub simulated_delay_ms: u64,
    /// Body limit for a whole multipart submission.
    pub max_request_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContactConfig {
    pub recipient: String,
    pub email: email::EmailConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Majestic Moments".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data"),
            items_key: storage::DEFAULT_ITEMS_KEY.to_string(),
        }
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            load_delay_ms: 1000,
            include_seed: true,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: preview::DEFAULT_MAX_FILE_SIZE,
            simulated_delay_ms: 2000,
            max_request_bytes: 256 * 1024 * 1024,
        }
    }
}

use axum::{Router, extract::DefaultBodyLimit, routing};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gallery: gallery::SharedGallery,
    pub blobs: preview::BlobRegistry,
    pub previews: preview::PreviewManager,
    pub upload_transport: upload::DynUploadTransport,
    pub contact: Option<contact::ContactService>,
}

impl AppState {
    /// Wires the services described by `config` onto a file-backed store.
    /// The gallery is created but not loaded.
    pub fn from_config(config: Config) -> Result<Self, email::EmailError> {
        let store: storage::DynDurableStore =
            Arc::new(storage::FileStore::new(config.storage.directory.clone()));
        Self::with_store(config, store)
    }

    pub fn with_store(
        config: Config,
        store: storage::DynDurableStore,
    ) -> Result<Self, email::EmailError> {
        let blobs = preview::BlobRegistry::new();
        let transport: upload::DynUploadTransport = Arc::new(upload::SimulatedUploadTransport::new(
            blobs.clone(),
            Duration::from_millis(config.uploads.simulated_delay_ms),
        ));
        Self::with_parts(config, store, blobs, transport)
    }

    pub fn with_parts(
        config: Config,
        store: storage::DynDurableStore,
        blobs: preview::BlobRegistry,
        upload_transport: upload::DynUploadTransport,
    ) -> Result<Self, email::EmailError> {
        let persisted = storage::PersistedItems::new(store, config.storage.items_key.clone());
        let seed = if config.gallery.include_seed {
            gallery::seed_items()
        } else {
            Vec::new()
        };
        let gallery = Arc::new(
            gallery::GalleryStore::new(persisted, seed)
                .with_load_delay(Duration::from_millis(config.gallery.load_delay_ms)),
        );

        let previews = preview::PreviewManager::new(blobs.clone(), config.uploads.max_file_size);

        let contact = match &config.contact {
            Some(contact_config) => {
                let provider = email::create_provider(&contact_config.email.provider)?;
                info!(
                    "Contact enquiries go to {} via {}",
                    contact_config.recipient,
                    provider.name()
                );
                Some(contact::ContactService::new(
                    provider,
                    contact_config.recipient.clone(),
                    contact_config.email.format_from(),
                ))
            }
            None => None,
        };

        Ok(Self {
            config,
            gallery,
            blobs,
            previews,
            upload_transport,
            contact,
        })
    }
}

pub fn build_router(app_state: AppState) -> Router {
    let body_limit = app_state.config.uploads.max_request_bytes;

    Router::new()
        .route(
            "/api/gallery",
            routing::get(gallery::list_items_handler),
        )
        .route(
            "/api/gallery/{id}",
            routing::get(gallery::get_item_handler).delete(gallery::delete_item_handler),
        )
        .route(
            "/api/gallery/{id}/download",
            routing::get(gallery::download_item_handler),
        )
        .route("/api/events", routing::get(gallery::events_handler))
        .route(
            "/api/upload",
            routing::post(upload::upload_handler).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/contact", routing::post(contact::contact_handler))
        .route("/blob/{id}", routing::get(gallery::blob_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let method = request.method();
                    let uri = request.uri();
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched_path| matched_path.as_str());

                    tracing::info_span!(
                        "http_request",
                        method = %method,
                        uri = %uri,
                        matched_path,
                    )
                })
                .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                    let user_agent = request
                        .headers()
                        .get("user-agent")
                        .and_then(|h| h.to_str().ok())
                        .unwrap_or("-");

                    tracing::info!(
                        target: "access_log",
                        method = %request.method(),
                        path = %request.uri().path(),
                        query = ?request.uri().query(),
                        user_agent = %user_agent,
                        "request"
                    );
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: Duration,
                     _span: &tracing::Span| {
                        let size = response
                            .headers()
                            .get("content-length")
                            .and_then(|h| h.to_str().ok())
                            .unwrap_or("-");

                        tracing::info!(
                            target: "access_log",
                            status = %response.status(),
                            size = %size,
                            latency_ms = %latency.as_millis(),
                            "response"
                        );
                    },
                ),
        )
        .with_state(app_state)
}

/// Builds the state and returns the router. The gallery loads in the
/// background; until it finishes, listings report `loading: true`.
pub async fn create_app(config: Config) -> Result<Router, email::EmailError> {
    let app_state = AppState::from_config(config)?;
    gallery::GalleryStore::spawn_load(app_state.gallery.clone());
    Ok(build_router(app_state))
}
