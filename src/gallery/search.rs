use super::TypeFilter;
use crate::media::{EventType, MediaItem};
use chrono::NaiveDate;
use serde::Deserialize;

/// Criteria for an ad-hoc gallery search. Unset fields do not restrict.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(rename = "type", default)]
    pub kind: TypeFilter,
    pub event_type: Option<EventType>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl SearchFilters {
    /// Date bounds are inclusive. Items without an event date never
    /// satisfy a bound.
    pub fn admits(&self, item: &MediaItem) -> bool {
        if !self.kind.admits(item.kind) {
            return false;
        }

        if let Some(event_type) = self.event_type
            && item.event_type != event_type
        {
            return false;
        }

        if let Some(from) = self.date_from
            && !item.event_date.is_some_and(|date| date >= from)
        {
            return false;
        }

        if let Some(to) = self.date_to
            && !item.event_date.is_some_and(|date| date <= to)
        {
            return false;
        }

        true
    }
}

pub fn search_items<'a>(
    items: impl IntoIterator<Item = &'a MediaItem>,
    term: &str,
    filters: &SearchFilters,
) -> Vec<MediaItem> {
    let term = term.trim().to_lowercase();
    items
        .into_iter()
        .filter(|item| item.matches_term(&term) && filters.admits(item))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::seed::seed_items;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_empty_filters_match_all() {
        let items = seed_items();
        assert_eq!(
            search_items(&items, "", &SearchFilters::default()).len(),
            items.len()
        );
    }

    #[test]
    fn test_event_type_filter() {
        let items = seed_items();
        let filters = SearchFilters {
            event_type: Some(EventType::Wedding),
            ..Default::default()
        };
        let found = search_items(&items, "", &filters);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|i| i.event_type == EventType::Wedding));
    }

    #[test]
    fn test_inclusive_date_range() {
        let items = seed_items();
        let filters = SearchFilters {
            date_from: date(2024, 1, 20),
            date_to: date(2024, 2, 10),
            ..Default::default()
        };
        let ids: Vec<_> = search_items(&items, "", &filters)
            .into_iter()
            .map(|i| i.id.to_string())
            .collect();
        assert_eq!(ids, vec!["2", "3", "4"]);
    }

    #[test]
    fn test_undated_items_excluded_by_bounds() {
        let mut items = seed_items();
        items[0].event_date = None;
        let filters = SearchFilters {
            date_to: date(2030, 1, 1),
            ..Default::default()
        };
        assert_eq!(search_items(&items, "", &filters).len(), 4);
    }

    #[test]
    fn test_term_and_type_combine() {
        let items = seed_items();
        let filters = SearchFilters {
            kind: TypeFilter::Video,
            ..Default::default()
        };
        let found = search_items(&items, "  Celebration ", &filters);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Wedding Reception Dance");
    }
}
