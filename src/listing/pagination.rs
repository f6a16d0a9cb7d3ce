//! Client-side pagination over an already fetched list

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Most page buttons shown at once
const WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginator {
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// One page of items plus its position
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Zero-based position of the first item in the full list
    pub fn offset(&self) -> usize {
        crate::utils::helpers::calculate_offset(self.page, self.page_size)
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self { page_size: page_size.max(1) }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(total / page_size)`, never less than 1
    pub fn total_pages(&self, total_items: usize) -> usize {
        ((total_items + self.page_size - 1) / self.page_size).max(1)
    }

    pub fn clamp(&self, page: usize, total_items: usize) -> usize {
        page.clamp(1, self.total_pages(total_items))
    }

    /// Slice out the requested page, clamping out-of-range requests
    pub fn paginate<T>(&self, items: Vec<T>, page: usize) -> Page<T> {
        let total_items = items.len();
        let total_pages = self.total_pages(total_items);
        let page = self.clamp(page, total_items);
        let offset = crate::utils::helpers::calculate_offset(page, self.page_size);

        Page {
            items: items.into_iter().skip(offset).take(self.page_size).collect(),
            page,
            page_size: self.page_size,
            total_pages,
            total_items,
        }
    }
}

/// Page numbers to offer around the current page
pub fn page_window(page: usize, total_pages: usize) -> Vec<usize> {
    let total_pages = total_pages.max(1);
    let page = page.clamp(1, total_pages);
    let start = if total_pages <= WINDOW || page <= 3 {
        1
    } else if page + 2 >= total_pages {
        total_pages + 1 - WINDOW
    } else {
        page - 2
    };
    (start..=(start + WINDOW - 1).min(total_pages)).collect()
}
