use super::{SearchFilters, TypeFilter};
use crate::AppState;
use crate::media::{EventType, MediaId, MediaItem};
use axum::{
    Json,
    body::Body,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GalleryQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub event_type: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl GalleryQuery {
    fn filters(&self) -> Result<SearchFilters, String> {
        let kind = match self.kind.as_deref() {
            Some(kind) => kind.parse::<TypeFilter>().map_err(|e| e.to_string())?,
            None => TypeFilter::All,
        };

        let event_type = match self.event_type.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(event_type) => Some(
                event_type
                    .parse::<EventType>()
                    .map_err(|e| e.to_string())?,
            ),
        };

        Ok(SearchFilters {
            kind,
            event_type,
            date_from: self.date_from,
            date_to: self.date_to,
        })
    }
}

#[derive(Serialize)]
pub struct GalleryListResponse {
    items: Vec<MediaItem>,
    total: usize,
    loading: bool,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    success: bool,
    removed: bool,
}

#[derive(Serialize)]
pub struct EventSummary {
    #[serde(rename = "eventType")]
    event_type: EventType,
    label: &'static str,
    count: usize,
}

pub async fn list_items_handler(
    State(app_state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Response {
    let filters = match query.filters() {
        Ok(filters) => filters,
        Err(message) => {
            debug!("Rejected gallery query: {}", message);
            return (StatusCode::BAD_REQUEST, message).into_response();
        }
    };

    let term = query.q.as_deref().unwrap_or("");
    let items = app_state.gallery.search(term, &filters);

    Json(GalleryListResponse {
        total: items.len(),
        loading: app_state.gallery.is_loading(),
        items,
    })
    .into_response()
}

pub async fn get_item_handler(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MediaItem>, StatusCode> {
    app_state
        .gallery
        .get(&MediaId::new(id))
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn delete_item_handler(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Json<DeleteResponse> {
    let id = MediaId::new(id);
    let item = app_state.gallery.get(&id);
    let removed = app_state.gallery.remove(&id).await;

    // Uploaded media is only reachable through the item, release it too
    if removed && let Some(item) = item {
        app_state.blobs.revoke(&item.url);
    }

    Json(DeleteResponse {
        success: true,
        removed,
    })
}

pub async fn download_item_handler(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let Some(item) = app_state.gallery.get(&MediaId::new(id)) else {
        return (StatusCode::NOT_FOUND, "Item not found").into_response();
    };

    if let Some(remote) = item.remote_url() {
        return Redirect::temporary(remote.as_str()).into_response();
    }

    let Some(blob) = app_state.blobs.resolve(&item.url) else {
        return (StatusCode::NOT_FOUND, "Media no longer available").into_response();
    };

    let disposition = format!(
        "attachment; filename*=UTF-8''{}",
        urlencoding::encode(&item.download_name())
    );

    match Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, blob.mime_type.as_str())
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(blob.data))
    {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to build download response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn blob_handler(State(app_state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(blob) = app_state.blobs.resolve(&id) else {
        return (StatusCode::NOT_FOUND, "Blob not found").into_response();
    };

    match Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, blob.mime_type.as_str())
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(blob.data))
    {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to build blob response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn events_handler(State(app_state): State<AppState>) -> Json<Vec<EventSummary>> {
    let events = app_state
        .gallery
        .event_counts()
        .into_iter()
        .map(|(event_type, count)| EventSummary {
            event_type,
            label: event_type.label(),
            count,
        })
        .collect();

    Json(events)
}
