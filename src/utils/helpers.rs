//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Utc};

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Format an event start time the way listings show it
pub fn format_event_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y · %H:%M").to_string()
}

/// Format a ticket price, free events included
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p > 0.0 => format!("KES {:.2}", p),
        _ => "Free".to_string(),
    }
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}

/// Create a pagination info string
pub fn create_pagination_info(current_page: usize, total_pages: usize, total_items: usize) -> String {
    if total_pages <= 1 {
        format!("Total: {}", total_items)
    } else {
        format!("Page {} of {} (Total: {})", current_page, total_pages, total_items)
    }
}

/// Calculate pagination offset
pub fn calculate_offset(page: usize, page_size: usize) -> usize {
    page.saturating_sub(1) * page_size
}

/// Capitalize the first letter of a word ("organizer" -> "Organizer")
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split command arguments, keeping the remainder after the first token
pub fn split_first_arg(args: &str) -> (Option<&str>, &str) {
    let args = args.trim();
    if args.is_empty() {
        return (None, "");
    }
    match args.split_once(char::is_whitespace) {
        Some((first, rest)) => (Some(first), rest.trim()),
        None => (Some(args), ""),
    }
}
