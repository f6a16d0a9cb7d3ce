//! Canned API payloads

#![allow(dead_code)]

use serde_json::{json, Value};

pub const CHAT_ID: i64 = 424242;
pub const TOKEN: &str = "opaque-test-token";

pub fn user_json(id: i64, role: &str) -> Value {
    json!({
        "id": id,
        "username": format!("user{}", id),
        "email": format!("user{}@example.com", id),
        "role": role,
        "phone": "+254700000000",
        "is_active": true,
        "created_at": "2024-01-15T09:30:00Z"
    })
}

pub fn event_json(id: i64, title: &str, category: &str, city: &str, start: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{} description", title),
        "category": category,
        "venue": "KICC",
        "city": city,
        "country": "Kenya",
        "start_time": start,
        "capacity": 200,
        "price": 1500.0,
        "status": "approved",
        "organizer_id": 7
    })
}

pub fn event_catalogue() -> Value {
    json!([
        event_json(1, "Nairobi Jazz Night", "Music", "Nairobi", "2030-03-01T18:00:00Z"),
        event_json(2, "Mombasa Food Fest", "Food", "Mombasa", "2030-02-10T12:00:00"),
        event_json(3, "Rust Meetup", "Technology", "Nairobi", "2030-01-20 17:30:00"),
    ])
}
