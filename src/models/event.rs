//! Event model

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::utils::errors::Event360Error;

/// Moderation status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::Approved => "approved",
            EventStatus::Rejected => "rejected",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = Event360Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(EventStatus::Pending),
            "approved" => Ok(EventStatus::Approved),
            "rejected" => Ok(EventStatus::Rejected),
            "cancelled" => Ok(EventStatus::Cancelled),
            other => Err(Event360Error::InvalidInput(format!("Unknown event status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(deserialize_with = "super::time::deserialize")]
    pub start_time: DateTime<Utc>,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub organizer_id: Option<i64>,
    #[serde(default)]
    pub organizer_name: Option<String>,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Event {
    /// "Venue, City" with whatever parts are known
    pub fn location(&self) -> String {
        let parts: Vec<&str> = [self.venue.as_deref(), self.city.as_deref()]
            .into_iter()
            .flatten()
            .filter(|p| !p.trim().is_empty())
            .collect();
        if parts.is_empty() {
            "TBD".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Case-insensitive match against title, venue and description
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [Some(self.title.as_str()), self.venue.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Event with its ticket types and reviews, as returned by `GET /api/events/<id>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: Event,
    #[serde(default)]
    pub ticket_types: Vec<TicketType>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub review_count: u32,
}

impl EventDetails {
    /// Cheapest ticket on sale, if any
    pub fn lowest_price(&self) -> Option<f64> {
        self.ticket_types
            .iter()
            .map(|tt| tt.price)
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.min(p))))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketType {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub available_quantity: Option<i64>,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub sale_start: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub sale_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_per_user: Option<u32>,
}

impl TicketType {
    pub fn is_sold_out(&self) -> bool {
        matches!(self.available_quantity, Some(q) if q <= 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewAuthor {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub user: ReviewAuthor,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default, deserialize_with = "super::time::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Body of `POST /api/events`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub venue: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub capacity: Option<u32>,
    pub price: f64,
    pub poster_url: Option<String>,
    pub is_public: bool,
}

/// Body of `PUT /api/events/<id>`; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

/// Body returned when an event is created, updated or moderated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMutationResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub event: Event,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": 7, "title": "Nairobi Jazz Night", "description": "Live jazz under the stars",
            "venue": "Carnivore Grounds", "city": "Nairobi", "country": "Kenya",
            "start_time": "2030-05-01T19:00:00", "end_time": "2030-05-01T23:00:00",
            "category": "Music", "status": "approved", "organizer_id": 2,
            "organizer_name": "organizer", "poster_url": null, "banner_url": null,
            "capacity": 300, "created_at": "2025-01-01T08:00:00"
        }"#
    }

    #[test]
    fn test_event_deserialization() {
        let event: Event = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(event.status, EventStatus::Approved);
        assert_eq!(event.location(), "Carnivore Grounds, Nairobi");
        assert!(event.price.is_none());
    }

    #[test]
    fn test_search_matching() {
        let event: Event = serde_json::from_str(sample_json()).unwrap();
        assert!(event.matches_search("JAZZ"));
        assert!(event.matches_search("carnivore"));
        assert!(event.matches_search("stars"));
        assert!(event.matches_search("  "));
        assert!(!event.matches_search("football"));
    }

    #[test]
    fn test_details_flatten() {
        let json = r#"{
            "id": 7, "title": "Nairobi Jazz Night", "start_time": "2030-05-01T19:00:00",
            "status": "approved",
            "ticket_types": [
                {"id": 1, "name": "VIP", "price": 5000.0, "available_quantity": 0, "max_per_user": 4},
                {"id": 2, "name": "Regular", "price": 1500.0, "available_quantity": 120}
            ],
            "reviews": [], "average_rating": 0, "review_count": 0
        }"#;
        let details: EventDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.event.id, 7);
        assert_eq!(details.ticket_types.len(), 2);
        assert!(details.ticket_types[0].is_sold_out());
        assert_eq!(details.lowest_price(), Some(1500.0));
    }
}
