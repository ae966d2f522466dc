use crate::media::{EventType, MediaId, MediaItem, MediaKind};
use chrono::{DateTime, NaiveDate, Utc};

struct SeedEntry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    event_type: EventType,
    event_date: (i32, u32, u32),
    kind: MediaKind,
    file_name: &'static str,
    file_size: u64,
    uploaded: &'static str,
    url: &'static str,
}

const SEED: [SeedEntry; 5] = [
    SeedEntry {
        id: "1",
        title: "Beautiful Wedding Ceremony",
        description: "A magical moment captured during the wedding ceremony with stunning decorations and happy couple.",
        event_type: EventType::Wedding,
        event_date: (2024, 1, 15),
        kind: MediaKind::Image,
        file_name: "wedding1.jpg",
        file_size: 2_048_576,
        uploaded: "2024-01-20T10:30:00Z",
        url: "https://images.pexels.com/photos/1024993/pexels-photo-1024993.jpeg?auto=compress&cs=tinysrgb&w=800",
    },
    SeedEntry {
        id: "2",
        title: "Anniversary Celebration",
        description: "50th anniversary celebration with family and friends, filled with love and memories.",
        event_type: EventType::Anniversary,
        event_date: (2024, 1, 20),
        kind: MediaKind::Image,
        file_name: "anniversary1.jpg",
        file_size: 1_536_000,
        uploaded: "2024-01-22T14:15:00Z",
        url: "https://images.pexels.com/photos/1729931/pexels-photo-1729931.jpeg?auto=compress&cs=tinysrgb&w=800",
    },
    SeedEntry {
        id: "3",
        title: "Corporate Event Highlights",
        description: "Professional corporate event with networking and presentations.",
        event_type: EventType::Corporate,
        event_date: (2024, 2, 1),
        kind: MediaKind::Video,
        file_name: "corporate_event.mp4",
        file_size: 15_728_640,
        uploaded: "2024-02-03T09:00:00Z",
        url: "https://sample-videos.com/zip/10/mp4/SampleVideo_1280x720_1mb.mp4",
    },
    SeedEntry {
        id: "4",
        title: "Birthday Party Fun",
        description: "Colorful birthday celebration with decorations, cake, and entertainment.",
        event_type: EventType::Birthday,
        event_date: (2024, 2, 10),
        kind: MediaKind::Image,
        file_name: "birthday1.jpg",
        file_size: 1_843_200,
        uploaded: "2024-02-12T16:45:00Z",
        url: "https://images.pexels.com/photos/1729931/pexels-photo-1729931.jpeg?auto=compress&cs=tinysrgb&w=800",
    },
    SeedEntry {
        id: "5",
        title: "Wedding Reception Dance",
        description: "Joyful wedding reception with dancing and celebration.",
        event_type: EventType::Wedding,
        event_date: (2024, 2, 20),
        kind: MediaKind::Video,
        file_name: "wedding_dance.mp4",
        file_size: 25_165_824,
        uploaded: "2024-02-22T18:30:00Z",
        url: "https://sample-videos.com/zip/10/mp4/SampleVideo_1280x720_2mb.mp4",
    },
];

/// The sample items that are always shown, whatever durable storage holds.
pub fn seed_items() -> Vec<MediaItem> {
    SEED.iter()
        .map(|entry| {
            let (year, month, day) = entry.event_date;
            MediaItem {
                id: MediaId::new(entry.id),
                title: entry.title.to_string(),
                description: entry.description.to_string(),
                event_type: entry.event_type,
                event_date: NaiveDate::from_ymd_opt(year, month, day),
                kind: entry.kind,
                file_name: entry.file_name.to_string(),
                file_size: entry.file_size,
                upload_date: DateTime::parse_from_rfc3339(entry.uploaded)
                    .map(|date| date.with_timezone(&Utc))
                    .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
                url: entry.url.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_shape() {
        let items = seed_items();
        assert_eq!(items.len(), 5);
        assert_eq!(
            items.iter().filter(|i| i.kind == MediaKind::Image).count(),
            3
        );
        assert_eq!(
            items.iter().filter(|i| i.kind == MediaKind::Video).count(),
            2
        );
        assert!(items.iter().all(|i| i.event_date.is_some()));
        assert!(items.iter().all(|i| i.remote_url().is_some()));
        assert!(items.iter().all(|i| i.upload_date != DateTime::<Utc>::UNIX_EPOCH));
    }
}
