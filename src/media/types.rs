use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a gallery item.
///
/// Generated ids combine the current unix time in milliseconds with a random
/// suffix. They are unique within a session but carry no guarantee across
/// devices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(String);

impl MediaId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix: u32 = rand::random();
        Self(format!("{}-{:08x}", millis, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MediaId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Error)]
#[error("Unknown {kind}: {value}")]
pub struct ParseKindError {
    kind: &'static str,
    value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Wedding,
    Anniversary,
    Birthday,
    Corporate,
    Engagement,
    Other,
}

impl EventType {
    pub const ALL: [EventType; 6] = [
        EventType::Wedding,
        EventType::Anniversary,
        EventType::Birthday,
        EventType::Corporate,
        EventType::Engagement,
        EventType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Wedding => "wedding",
            EventType::Anniversary => "anniversary",
            EventType::Birthday => "birthday",
            EventType::Corporate => "corporate",
            EventType::Engagement => "engagement",
            EventType::Other => "other",
        }
    }

    /// Human readable label used by the event selector.
    pub fn label(self) -> &'static str {
        match self {
            EventType::Wedding => "Wedding",
            EventType::Anniversary => "Anniversary",
            EventType::Birthday => "Birthday",
            EventType::Corporate => "Corporate Event",
            EventType::Engagement => "Engagement",
            EventType::Other => "Other",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        EventType::ALL
            .into_iter()
            .find(|event_type| event_type.as_str() == lower)
            .ok_or_else(|| ParseKindError {
                kind: "event type",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classifies a declared MIME type. Anything that is not `image/*` is
    /// treated as video, mirroring the accepted upload types.
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.to_lowercase().starts_with("image/") {
            MediaKind::Image
        } else {
            MediaKind::Video
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    fn default_extension(self) -> &'static str {
        match self {
            MediaKind::Image => "jpg",
            MediaKind::Video => "mp4",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            _ => Err(ParseKindError {
                kind: "media type",
                value: s.to_string(),
            }),
        }
    }
}

/// A persisted gallery item. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: MediaId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub file_name: String,
    pub file_size: u64,
    pub upload_date: DateTime<Utc>,
    pub url: String,
}

impl MediaItem {
    /// Case-insensitive substring match against title, description and
    /// event type. `term_lower` must already be lowercased.
    pub fn matches_term(&self, term_lower: &str) -> bool {
        term_lower.is_empty()
            || self.title.to_lowercase().contains(term_lower)
            || self.description.to_lowercase().contains(term_lower)
            || self.event_type.as_str().contains(term_lower)
    }

    /// File name offered when the item is downloaded.
    pub fn download_name(&self) -> String {
        if self.file_name.trim().is_empty() {
            format!("{}.{}", self.title, self.kind.default_extension())
        } else {
            self.file_name.clone()
        }
    }

    /// Parses the url as an absolute remote address. Local blob references
    /// are relative paths and yield `None`.
    pub fn remote_url(&self) -> Option<url::Url> {
        url::Url::parse(&self.url)
            .ok()
            .filter(|parsed| matches!(parsed.scheme(), "http" | "https"))
    }
}

/// The created-item shape returned by an upload transport, before the
/// gallery assigns an id and upload date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMediaItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub event_type: EventType,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub file_name: String,
    pub file_size: u64,
    pub url: String,
}

impl NewMediaItem {
    pub fn into_item(self, id: MediaId, upload_date: DateTime<Utc>) -> MediaItem {
        MediaItem {
            id,
            title: self.title,
            description: self.description,
            event_type: self.event_type,
            event_date: self.event_date,
            kind: self.kind,
            file_name: self.file_name,
            file_size: self.file_size,
            upload_date,
            url: self.url,
        }
    }
}
