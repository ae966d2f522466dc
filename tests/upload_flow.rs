use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use moments::media::NewMediaItem;
use moments::preview::BlobRegistry;
use moments::storage::{DEFAULT_ITEMS_KEY, DurableStore, MemoryStore};
use moments::upload::{SimulatedUploadTransport, TransportError, UploadRequest, UploadTransport};
use moments::{AppState, Config, build_router};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];

fn test_config() -> Config {
    let mut config = Config::default();
    config.gallery.load_delay_ms = 0;
    config.uploads.simulated_delay_ms = 0;
    config.uploads.max_file_size = 1024;
    config
}

/// Refuses any file whose name contains "broken".
struct PickyTransport {
    inner: SimulatedUploadTransport,
}

#[async_trait]
impl UploadTransport for PickyTransport {
    async fn upload(&self, request: UploadRequest) -> Result<NewMediaItem, TransportError> {
        if request.file.name.contains("broken") {
            return Err(TransportError::Rejected("checksum mismatch".to_string()));
        }
        self.inner.upload(request).await
    }

    fn name(&self) -> &str {
        "Picky Transport"
    }
}

async fn server_with_store(store: Arc<MemoryStore>) -> TestServer {
    let state = AppState::with_store(test_config(), store).unwrap();
    state.gallery.load().await;
    TestServer::new(build_router(state)).unwrap()
}

async fn picky_server(store: Arc<MemoryStore>) -> TestServer {
    let blobs = BlobRegistry::new();
    let transport = Arc::new(PickyTransport {
        inner: SimulatedUploadTransport::new(blobs.clone(), Duration::ZERO),
    });
    let state = AppState::with_parts(test_config(), store, blobs, transport).unwrap();
    state.gallery.load().await;
    TestServer::new(build_router(state)).unwrap()
}

fn jpeg(name: &str) -> Part {
    Part::bytes(JPEG_BYTES.to_vec())
        .file_name(name)
        .mime_type("image/jpeg")
}

fn wedding_form() -> MultipartForm {
    MultipartForm::new()
        .add_text("title", "  First Dance ")
        .add_text("description", "Under the lights")
        .add_text("eventType", "wedding")
        .add_text("eventDate", "2024-06-15")
}

fn persisted_ids(store: &MemoryStore) -> Vec<String> {
    let raw = store.read(DEFAULT_ITEMS_KEY).unwrap().unwrap_or_default();
    let items: Vec<Value> = serde_json::from_str(&raw).unwrap();
    items
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_upload_creates_items_and_serves_blobs() {
    let store = Arc::new(MemoryStore::new());
    let server = server_with_store(store.clone()).await;

    let form = wedding_form()
        .add_part("files", jpeg("dance.jpg"))
        .add_part("files", jpeg("toast.jpg"));
    let response = server.post("/api/upload").multipart(form).await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    for item in items {
        assert_eq!(item["title"], "First Dance");
        assert_eq!(item["eventType"], "wedding");
        assert_eq!(item["eventDate"], "2024-06-15");
        assert_eq!(item["type"], "image");
        assert_eq!(item["fileSize"], JPEG_BYTES.len());
    }

    let gallery: Value = server.get("/api/gallery").await.json();
    assert_eq!(gallery["total"], 7);

    assert_eq!(persisted_ids(&store).len(), 2);

    let url = items[0]["url"].as_str().unwrap();
    let blob = server.get(url).await;
    blob.assert_status_ok();
    assert_eq!(blob.header("content-type"), "image/jpeg");
    assert_eq!(blob.as_bytes().as_ref(), JPEG_BYTES);

    let id = items[0]["id"].as_str().unwrap();
    let download = server.get(&format!("/api/gallery/{}/download", id)).await;
    download.assert_status_ok();
    let disposition = download.header("content-disposition");
    assert!(disposition.to_str().unwrap().contains(".jpg"));
}

#[tokio::test]
async fn test_missing_fields_are_all_reported() {
    let store = Arc::new(MemoryStore::new());
    let server = server_with_store(store.clone()).await;

    let form = MultipartForm::new().add_text("title", "   ");
    let response = server.post("/api/upload").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    let codes: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|error| error["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["no-files", "missing-title", "missing-event-type"]);
    assert!(persisted_ids(&store).is_empty());
}

#[tokio::test]
async fn test_rejected_files_are_skipped() {
    let server = server_with_store(Arc::new(MemoryStore::new())).await;

    let form = wedding_form()
        .add_part("files", jpeg("dance.jpg"))
        .add_part(
            "files",
            Part::text("meeting notes")
                .file_name("notes.txt")
                .mime_type("text/plain"),
        )
        .add_part(
            "files",
            Part::bytes(vec![0u8; 2048])
                .file_name("huge.png")
                .mime_type("image/png"),
        );
    let response = server.post("/api/upload").multipart(form).await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let rejected = body["rejected"].as_array().unwrap();
    assert_eq!(rejected.len(), 2);
    assert_eq!(rejected[0]["fileName"], "notes.txt");
    assert_eq!(rejected[0]["reasons"][0]["code"], "file-invalid-type");
    assert_eq!(rejected[1]["fileName"], "huge.png");
    assert_eq!(rejected[1]["reasons"][0]["code"], "file-too-large");
}

#[tokio::test]
async fn test_invalid_event_type_is_a_field_error() {
    let server = server_with_store(Arc::new(MemoryStore::new())).await;

    let form = MultipartForm::new()
        .add_text("title", "Retreat")
        .add_text("eventType", "graduation")
        .add_part("files", jpeg("retreat.jpg"));
    let response = server.post("/api/upload").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    let codes: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|error| error["code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"invalid-event-type"));
}

#[tokio::test]
async fn test_partial_failure_keeps_successful_items() {
    let store = Arc::new(MemoryStore::new());
    let server = picky_server(store.clone()).await;

    let form = wedding_form()
        .add_part("files", jpeg("dance.jpg"))
        .add_part("files", jpeg("broken.jpg"));
    let response = server.post("/api/upload").multipart(form).await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["fileName"], "dance.jpg");
    assert_eq!(body["failures"][0]["fileName"], "broken.jpg");

    let gallery: Value = server.get("/api/gallery").await.json();
    assert_eq!(gallery["total"], 6);
    assert_eq!(persisted_ids(&store).len(), 1);
}

#[tokio::test]
async fn test_empty_file_fails_without_blocking_others() {
    let store = Arc::new(MemoryStore::new());
    let server = server_with_store(store.clone()).await;

    let form = wedding_form()
        .add_part("files", jpeg("dance.jpg"))
        .add_part(
            "files",
            Part::bytes(Vec::<u8>::new())
                .file_name("empty.jpg")
                .mime_type("image/jpeg"),
        );
    let response = server.post("/api/upload").multipart(form).await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    let body: Value = response.json();
    assert_eq!(body["items"][0]["fileName"], "dance.jpg");
    assert_eq!(body["failures"][0]["fileName"], "empty.jpg");
    assert!(
        body["failures"][0]["error"]
            .as_str()
            .unwrap()
            .starts_with("Upload rejected")
    );
    assert_eq!(persisted_ids(&store).len(), 1);
}
