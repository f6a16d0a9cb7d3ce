//! Event creation and review forms

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use crate::models::{CreateEventRequest, ReviewRequest};
use crate::state::ConversationContext;
use crate::utils::errors::Result;
use super::{answer, blocked};

pub const DEFAULT_COUNTRY: &str = "Kenya";

const REQUIRED_FIELDS: &str = "Please fill in all required fields (Title, Venue, and Start Date)";

/// Raw answers of the create-event form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub venue: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub end_date: Option<String>,
    pub end_time: Option<String>,
    pub capacity: Option<String>,
    pub price: Option<String>,
    pub poster_url: Option<String>,
    pub is_public: Option<bool>,
}

impl EventForm {
    pub fn from_context(context: &ConversationContext) -> Self {
        Self {
            title: answer(context, "title"),
            description: answer(context, "description"),
            category: answer(context, "category"),
            venue: answer(context, "venue"),
            address: answer(context, "address"),
            city: answer(context, "city"),
            country: answer(context, "country"),
            start_date: answer(context, "start_date"),
            start_time: answer(context, "start_time"),
            end_date: answer(context, "end_date"),
            end_time: answer(context, "end_time"),
            capacity: answer(context, "capacity"),
            price: answer(context, "price"),
            poster_url: answer(context, "poster_url"),
            is_public: context.get_data::<bool>("is_public").unwrap_or(None),
        }
    }

    pub fn validate(&self) -> Result<CreateEventRequest> {
        let filled = |field: &Option<String>| field.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);

        let (title, venue, start_date) = match (filled(&self.title), filled(&self.venue), filled(&self.start_date)) {
            (Some(title), Some(venue), Some(start_date)) => (title, venue, start_date),
            _ => return Err(blocked(REQUIRED_FIELDS)),
        };

        let start_time = combine(&start_date, filled(&self.start_time).as_deref())?;
        let end_time = match filled(&self.end_date) {
            Some(end_date) => Some(combine(&end_date, filled(&self.end_time).as_deref())?),
            None => None,
        };

        Ok(CreateEventRequest {
            title,
            description: filled(&self.description).unwrap_or_default(),
            category: filled(&self.category).unwrap_or_default(),
            venue,
            address: filled(&self.address).unwrap_or_default(),
            city: filled(&self.city).unwrap_or_default(),
            country: filled(&self.country).unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            start_time,
            end_time,
            capacity: parse_capacity(filled(&self.capacity).as_deref())?,
            price: parse_price(filled(&self.price).as_deref())?,
            poster_url: filled(&self.poster_url),
            is_public: self.is_public.unwrap_or(true),
        })
    }
}

/// `YYYY-MM-DD` plus optional `HH:MM` (midnight when absent), read as UTC
pub fn combine(date: &str, time: Option<&str>) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| blocked("Dates must use the YYYY-MM-DD format"))?;
    let time = match time {
        Some(time) => NaiveTime::parse_from_str(time.trim(), "%H:%M")
            .map_err(|_| blocked("Times must use the HH:MM format"))?,
        None => NaiveTime::MIN,
    };
    Ok(date.and_time(time).and_utc())
}

fn parse_capacity(raw: Option<&str>) -> Result<Option<u32>> {
    match raw {
        None => Ok(None),
        Some(raw) => match raw.parse::<u32>() {
            Ok(0) | Err(_) => Err(blocked("Capacity must be a positive whole number")),
            Ok(capacity) => Ok(Some(capacity)),
        },
    }
}

fn parse_price(raw: Option<&str>) -> Result<f64> {
    match raw {
        None => Ok(0.0),
        Some(raw) => match raw.parse::<f64>() {
            Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
            _ => Err(blocked("Price must be a number of zero or more")),
        },
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewForm {
    pub rating: String,
    pub comment: Option<String>,
}

impl ReviewForm {
    pub fn from_context(context: &ConversationContext) -> Self {
        Self {
            rating: answer(context, "rating").unwrap_or_default(),
            comment: answer(context, "comment"),
        }
    }

    pub fn validate(&self) -> Result<ReviewRequest> {
        match self.rating.trim().parse::<u8>() {
            Ok(rating @ 1..=5) => Ok(ReviewRequest {
                rating,
                comment: self.comment.clone().filter(|c| !c.trim().is_empty()),
            }),
            _ => Err(blocked("Rating must be between 1 and 5")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn form() -> EventForm {
        EventForm {
            title: Some("Jazz Night".into()),
            venue: Some("Alliance Française".into()),
            start_date: Some("2030-03-14".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let request = form().validate().unwrap();
        assert_eq!(request.country, "Kenya");
        assert_eq!(request.price, 0.0);
        assert!(request.capacity.is_none());
        assert!(request.is_public);
        assert_eq!(request.start_time.hour(), 0);
        assert_eq!(request.start_time.day(), 14);
        assert!(request.end_time.is_none());
    }

    #[test]
    fn test_required_fields() {
        let mut missing_title = form();
        missing_title.title = None;
        assert_eq!(missing_title.validate().unwrap_err().user_message(), REQUIRED_FIELDS);

        let mut blank_venue = form();
        blank_venue.venue = Some("   ".into());
        assert_eq!(blank_venue.validate().unwrap_err().user_message(), REQUIRED_FIELDS);
    }

    #[test]
    fn test_parsed_fields() {
        let mut form = form();
        form.start_time = Some("19:30".into());
        form.end_date = Some("2030-03-14".into());
        form.end_time = Some("23:00".into());
        form.capacity = Some("300".into());
        form.price = Some("1500.50".into());

        let request = form.validate().unwrap();
        assert_eq!((request.start_time.hour(), request.start_time.minute()), (19, 30));
        assert_eq!(request.end_time.map(|t| t.hour()), Some(23));
        assert_eq!(request.capacity, Some(300));
        assert_eq!(request.price, 1500.5);
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let mut bad_capacity = form();
        bad_capacity.capacity = Some("0".into());
        assert!(bad_capacity.validate().is_err());

        let mut bad_price = form();
        bad_price.price = Some("-5".into());
        assert!(bad_price.validate().is_err());

        let mut bad_date = form();
        bad_date.start_date = Some("14/03/2030".into());
        assert!(bad_date.validate().is_err());
    }

    #[test]
    fn test_review_rating_bounds() {
        assert!(ReviewForm { rating: "0".into(), comment: None }.validate().is_err());
        assert!(ReviewForm { rating: "6".into(), comment: None }.validate().is_err());
        let review = ReviewForm { rating: " 5 ".into(), comment: Some("Great".into()) }.validate().unwrap();
        assert_eq!(review.rating, 5);
    }
}
