//! Event filters mirrored into URL query syntax

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use crate::models::Event;
use crate::utils::errors::Event360Error;

pub const CATEGORIES: [&str; 10] = [
    "Music", "Conference", "Workshop", "Sports", "Networking",
    "Art", "Food", "Technology", "Business", "Education",
];

pub const CITIES: [&str; 9] = [
    "Nairobi", "Mombasa", "Kisumu", "Nakuru", "Eldoret",
    "Thika", "Malindi", "Kitale", "Naivasha",
];

/// Sentinels meaning "no filter"
pub const ALL_CATEGORIES: &str = "All";
pub const ALL_CITIES: &str = "All Cities";
pub const ALL_STATUSES: &str = "all";

pub const STATUSES: [&str; 4] = ["approved", "pending", "rejected", "cancelled"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Category,
    City,
    Search,
    Status,
}

impl FilterKey {
    /// Fixed choices offered for this filter; search is free text
    pub fn choices(&self) -> &'static [&'static str] {
        match self {
            FilterKey::Category => &CATEGORIES,
            FilterKey::City => &CITIES,
            FilterKey::Status => &STATUSES,
            FilterKey::Search => &[],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Category => "category",
            FilterKey::City => "city",
            FilterKey::Search => "search",
            FilterKey::Status => "status",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = Event360Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" => Ok(FilterKey::Category),
            "city" => Ok(FilterKey::City),
            "search" => Ok(FilterKey::Search),
            "status" => Ok(FilterKey::Status),
            other => Err(Event360Error::InvalidInput(format!("Unknown filter: {}", other))),
        }
    }
}

/// Filters for the events page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilters {
    pub category: Option<String>,
    pub city: Option<String>,
    pub search: String,
    pub status: String,
}

impl Default for EventFilters {
    fn default() -> Self {
        Self {
            category: None,
            city: None,
            search: String::new(),
            status: ALL_STATUSES.to_string(),
        }
    }
}

fn is_sentinel(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == ALL_CATEGORIES || value == ALL_CITIES || value == ALL_STATUSES
}

impl EventFilters {
    /// Parse filters from a query string (leading `?` allowed); unknown keys are ignored
    pub fn from_query(query: &str) -> Self {
        let mut filters = Self::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            if let Ok(key) = key.parse::<FilterKey>() {
                filters.assign(key, &value);
            }
        }
        filters
    }

    /// Query string holding only the non-default filters
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.query_pairs() {
            serializer.append_pair(key.as_str(), &value);
        }
        serializer.finish()
    }

    /// Update one filter; the caller resets the page
    pub fn set(&mut self, key: FilterKey, value: &str) {
        self.assign(key, value);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn get(&self, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::Category => self.category.as_deref(),
            FilterKey::City => self.city.as_deref(),
            FilterKey::Search => Some(self.search.trim()).filter(|s| !s.is_empty()),
            FilterKey::Status => Some(self.status.as_str()).filter(|s| *s != ALL_STATUSES),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of filters differing from the default
    pub fn active_count(&self) -> usize {
        self.query_pairs().len()
    }

    /// Query parameters for `GET /api/events`, with `limit` set to the listing page size
    pub fn api_params(&self, page: usize, limit: usize) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), page.max(1).to_string()),
            ("limit".to_string(), limit.max(1).to_string()),
        ];
        params.extend(self.query_pairs().into_iter().map(|(k, v)| (k.as_str().to_string(), v)));
        params
    }

    /// Apply the filters locally to a fetched list
    pub fn apply(&self, events: Vec<Event>) -> Vec<Event> {
        events
            .into_iter()
            .filter(|event| self.matches(event))
            .collect()
    }

    pub fn matches(&self, event: &Event) -> bool {
        let same = |wanted: Option<&str>, actual: Option<&str>| match wanted {
            Some(w) => actual.map_or(false, |a| a.eq_ignore_ascii_case(w)),
            None => true,
        };

        same(self.category.as_deref(), event.category.as_deref())
            && same(self.city.as_deref(), event.city.as_deref())
            && same(self.get(FilterKey::Status), Some(event.status.as_str()))
            && event.matches_search(&self.search)
    }

    fn assign(&mut self, key: FilterKey, value: &str) {
        let value = value.trim();
        match key {
            FilterKey::Category => self.category = (!is_sentinel(value)).then(|| value.to_string()),
            FilterKey::City => self.city = (!is_sentinel(value)).then(|| value.to_string()),
            FilterKey::Search => self.search = value.to_string(),
            FilterKey::Status => {
                self.status = if is_sentinel(value) {
                    ALL_STATUSES.to_string()
                } else {
                    value.to_lowercase()
                }
            }
        }
    }

    fn query_pairs(&self) -> Vec<(FilterKey, String)> {
        [FilterKey::Category, FilterKey::City, FilterKey::Search, FilterKey::Status]
            .into_iter()
            .filter_map(|key| self.get(key).map(|v| (key, v.to_string())))
            .collect()
    }
}

/// What a chat's events page currently shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingState {
    pub filters: EventFilters,
    pub page: usize,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            filters: EventFilters::default(),
            page: 1,
        }
    }
}

impl ListingState {
    pub fn from_query(query: &str) -> Self {
        Self {
            filters: EventFilters::from_query(query),
            page: 1,
        }
    }

    /// Changing a filter always returns to the first page
    pub fn set_filter(&mut self, key: FilterKey, value: &str) {
        self.filters.set(key, value);
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.page = 1;
    }

    pub fn go_to(&mut self, page: usize, total_pages: usize) {
        self.page = page.clamp(1, total_pages.max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_omitted() {
        let filters = EventFilters::from_query("category=All&city=All+Cities&status=all&search=");
        assert_eq!(filters, EventFilters::default());
        assert_eq!(filters.to_query(), "");
    }

    #[test]
    fn test_query_round_trip() {
        let filters = EventFilters::from_query("?city=Nairobi&category=Music&search=jazz+night&utm=x");
        assert_eq!(filters.category.as_deref(), Some("Music"));
        assert_eq!(filters.city.as_deref(), Some("Nairobi"));
        assert_eq!(filters.search, "jazz night");
        assert_eq!(filters.to_query(), "category=Music&city=Nairobi&search=jazz+night");
        assert_eq!(EventFilters::from_query(&filters.to_query()), filters);
    }

    #[test]
    fn test_set_resets_page_and_clears_sentinel() {
        let mut state = ListingState::from_query("category=Music");
        state.page = 3;

        state.set_filter(FilterKey::City, "Mombasa");
        assert_eq!(state.page, 1);
        assert_eq!(state.filters.to_query(), "category=Music&city=Mombasa");

        state.page = 2;
        state.set_filter(FilterKey::Category, ALL_CATEGORIES);
        assert_eq!(state.page, 1);
        assert_eq!(state.filters.to_query(), "city=Mombasa");

        state.clear_filters();
        assert_eq!(state, ListingState::default());
    }

    #[test]
    fn test_api_params() {
        let mut filters = EventFilters::default();
        filters.set(FilterKey::Search, "  jazz  ");
        filters.set(FilterKey::Status, "Approved");

        let params = filters.api_params(2, 6);
        assert_eq!(params[0], ("page".to_string(), "2".to_string()));
        assert_eq!(params[1], ("limit".to_string(), "6".to_string()));
        assert!(params.contains(&("search".to_string(), "jazz".to_string())));
        assert!(params.contains(&("status".to_string(), "approved".to_string())));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_local_matching() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "id": 1, "title": "Jazz Night", "venue": "Alliance Française", "city": "Nairobi",
            "category": "Music", "status": "approved", "start_time": "2030-01-01T19:00:00"
        }))
        .unwrap();

        assert!(EventFilters::from_query("category=music&city=Nairobi").matches(&event));
        assert!(EventFilters::from_query("search=alliance").matches(&event));
        assert!(!EventFilters::from_query("city=Kisumu").matches(&event));
        assert!(!EventFilters::from_query("status=pending").matches(&event));
    }
}
