//! Event listing module
//!
//! Query-string backed event filters and fixed-size client-side pagination.

pub mod filters;
pub mod pagination;

pub use filters::{EventFilters, FilterKey, ListingState, ALL_CATEGORIES, ALL_CITIES, ALL_STATUSES, CATEGORIES, CITIES, STATUSES};
pub use pagination::{page_window, Page, Paginator, DEFAULT_PAGE_SIZE};
