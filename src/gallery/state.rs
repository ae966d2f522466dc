use crate::media::{MediaId, MediaItem, MediaKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::GalleryError;

/// Type restriction applied by the gallery view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Image,
    Video,
}

impl TypeFilter {
    pub fn admits(self, kind: MediaKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Image => kind == MediaKind::Image,
            TypeFilter::Video => kind == MediaKind::Video,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeFilter::All => "all",
            TypeFilter::Image => "image",
            TypeFilter::Video => "video",
        })
    }
}

impl FromStr for TypeFilter {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(TypeFilter::All),
            "image" => Ok(TypeFilter::Image),
            "video" => Ok(TypeFilter::Video),
            _ => Err(GalleryError::InvalidFilter(s.to_string())),
        }
    }
}

/// Every mutation of [`GalleryState`] is one of these.
#[derive(Debug, Clone)]
pub enum GalleryAction {
    SetLoading(bool),
    SetItems(Vec<MediaItem>),
    AddItem(MediaItem),
    RemoveItem(MediaId),
    SetFilter(TypeFilter),
    SetSearch(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GalleryState {
    pub items: Vec<MediaItem>,
    pub loading: bool,
    pub filter: TypeFilter,
    pub search_term: String,
}

impl GalleryState {
    /// Applies an action and reports whether the state changed.
    pub fn apply(&mut self, action: GalleryAction) -> bool {
        match action {
            GalleryAction::SetLoading(loading) => {
                let changed = self.loading != loading;
                self.loading = loading;
                changed
            }
            GalleryAction::SetItems(items) => {
                self.items = items;
                self.loading = false;
                true
            }
            GalleryAction::AddItem(item) => {
                self.items.retain(|existing| existing.id != item.id);
                self.items.insert(0, item);
                true
            }
            GalleryAction::RemoveItem(id) => {
                let before = self.items.len();
                self.items.retain(|item| item.id != id);
                self.items.len() != before
            }
            GalleryAction::SetFilter(filter) => {
                let changed = self.filter != filter;
                self.filter = filter;
                changed
            }
            GalleryAction::SetSearch(term) => {
                let changed = self.search_term != term;
                self.search_term = term;
                changed
            }
        }
    }

    /// Items matching the active filter and search term, always derived
    /// from the full collection.
    pub fn filtered(&self) -> Vec<MediaItem> {
        let term = self.search_term.to_lowercase();
        self.items
            .iter()
            .filter(|item| self.filter.admits(item.kind) && item.matches_term(&term))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &MediaId) -> Option<&MediaItem> {
        self.items.iter().find(|item| &item.id == id)
    }
}
