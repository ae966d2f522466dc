// Gallery module - item store, search and HTTP handlers
mod error;
mod handlers;
mod search;
mod seed;
mod state;

pub use error::GalleryError;
pub use handlers::{
    blob_handler, delete_item_handler, download_item_handler, events_handler, get_item_handler,
    list_items_handler,
};
pub use search::{SearchFilters, search_items};
pub use seed::seed_items;
pub use state::{GalleryAction, GalleryState, TypeFilter};

use crate::media::{EventType, MediaId, MediaItem, NewMediaItem};
use crate::storage::{PersistedItems, StorageError};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub type SharedGallery = Arc<GalleryStore>;

/// The authoritative collection of gallery items.
///
/// State lives in a `watch` channel so views can subscribe to changes. All
/// mutations go through [`GalleryStore::dispatch`]; durable storage is kept
/// in step on a best-effort basis and its failures never reach callers.
pub struct GalleryStore {
    state: watch::Sender<GalleryState>,
    persisted: PersistedItems,
    seed: Vec<MediaItem>,
    load_delay: Duration,
}

impl GalleryStore {
    pub fn new(persisted: PersistedItems, seed: Vec<MediaItem>) -> Self {
        let (state, _) = watch::channel(GalleryState::default());
        Self {
            state,
            persisted,
            seed,
            load_delay: Duration::ZERO,
        }
    }

    /// Simulated latency applied by [`GalleryStore::load`].
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// Applies an action. Subscribers are only notified when the state
    /// actually changed.
    pub fn dispatch(&self, action: GalleryAction) -> bool {
        self.state.send_if_modified(|state| state.apply(action))
    }

    pub fn subscribe(&self) -> watch::Receiver<GalleryState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> GalleryState {
        self.state.borrow().clone()
    }

    /// Merges persisted items with the seed collection. Persisted items
    /// come first, so on an id clash the persisted record wins.
    pub async fn load(&self) {
        self.dispatch(GalleryAction::SetLoading(true));

        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }

        let stored = self
            .with_persisted(|persisted| Ok(persisted.load()))
            .await
            .unwrap_or_else(|e| {
                warn!("Failed to read persisted items: {}", e);
                Vec::new()
            });
        let stored_count = stored.len();
        let items = merge_unique(stored.into_iter().chain(self.seed.iter().cloned()));

        info!(
            "Gallery loaded {} items ({} persisted, {} seed)",
            items.len(),
            stored_count,
            self.seed.len()
        );

        self.dispatch(GalleryAction::SetItems(items));
    }

    /// Marks the store as loading and runs [`GalleryStore::load`] in the
    /// background, so requests made meanwhile observe `loading`.
    pub fn spawn_load(gallery: SharedGallery) -> JoinHandle<()> {
        gallery.dispatch(GalleryAction::SetLoading(true));
        tokio::spawn(async move { gallery.load().await })
    }

    /// Persists a new item, assigning its id and upload date.
    pub async fn add(&self, draft: NewMediaItem) -> MediaItem {
        let item = draft.into_item(MediaId::generate(), Utc::now());
        debug!("Adding gallery item {} ({})", item.id, item.title);

        self.dispatch(GalleryAction::AddItem(item.clone()));

        let stored = item.clone();
        if let Err(e) = self
            .with_persisted(move |persisted| persisted.prepend(stored))
            .await
        {
            warn!("Failed to persist gallery item {}: {}", item.id, e);
        }

        item
    }

    /// Removes an item from memory and durable storage. Returns whether
    /// the item was known; unknown ids are not an error.
    pub async fn remove(&self, id: &MediaId) -> bool {
        let removed = self.dispatch(GalleryAction::RemoveItem(id.clone()));

        let target = id.clone();
        let removed_from_storage = match self
            .with_persisted(move |persisted| persisted.remove(&target))
            .await
        {
            Ok(removed) => removed,
            Err(e) => {
                warn!("Failed to remove gallery item {} from storage: {}", id, e);
                false
            }
        };

        if removed || removed_from_storage {
            info!("Removed gallery item {}", id);
        } else {
            debug!("Remove requested for unknown gallery item {}", id);
        }

        removed || removed_from_storage
    }

    /// Runs a storage operation on the blocking pool.
    async fn with_persisted<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&PersistedItems) -> Result<T, StorageError> + Send + 'static,
    {
        let persisted = self.persisted.clone();
        tokio::task::spawn_blocking(move || f(&persisted))
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?
    }

    pub fn set_filter(&self, filter: TypeFilter) {
        self.dispatch(GalleryAction::SetFilter(filter));
    }

    pub fn set_search(&self, term: impl Into<String>) {
        self.dispatch(GalleryAction::SetSearch(term.into()));
    }

    /// Items matching the active filter and search term.
    pub fn filtered_view(&self) -> Vec<MediaItem> {
        self.state.borrow().filtered()
    }

    /// Runs a one-off query without touching the active filter or term.
    pub fn search(&self, term: &str, filters: &SearchFilters) -> Vec<MediaItem> {
        search_items(&self.state.borrow().items, term, filters)
    }

    pub fn get(&self, id: &MediaId) -> Option<MediaItem> {
        self.state.borrow().get(id).cloned()
    }

    pub fn items(&self) -> Vec<MediaItem> {
        self.state.borrow().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn filter(&self) -> TypeFilter {
        self.state.borrow().filter
    }

    pub fn search_term(&self) -> String {
        self.state.borrow().search_term.clone()
    }

    /// Number of items per event type, in [`EventType::ALL`] order.
    pub fn event_counts(&self) -> Vec<(EventType, usize)> {
        let state = self.state.borrow();
        EventType::ALL
            .into_iter()
            .map(|event_type| {
                let count = state
                    .items
                    .iter()
                    .filter(|item| item.event_type == event_type)
                    .count();
                (event_type, count)
            })
            .collect()
    }
}

/// Keeps the first occurrence of every id, preserving order.
fn merge_unique(items: impl IntoIterator<Item = MediaItem>) -> Vec<MediaItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .collect()
}
