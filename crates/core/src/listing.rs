//! Paginated listings with pinned items
//!
//! A listing page shows two groups: the pinned entities, taken from the full
//! unpaginated collection so they stay visible on every page, and the current
//! page's entities minus anything already pinned.

use serde::Serialize;
use std::collections::HashSet;

/// Visible page buttons before the page list collapses with ellipses
pub const MAX_VISIBLE_PAGES: usize = 7;

/// Entities per page on listing pages
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// An entity that can be listed, ordered and pinned
pub trait Listable {
    /// Collection the entity belongs to (a season year for races)
    fn scope_key(&self) -> String;

    /// Numeric key the listing is sorted by (a round for races)
    fn ordering_key(&self) -> u32;

    /// Identifier used for pins: `{scope}-{ordering key}`
    fn listing_id(&self) -> String {
        format!("{}-{}", self.scope_key(), self.ordering_key())
    }
}

/// Error type for page window construction
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WindowError {
    #[error("Page numbers start at 1")]
    ZeroPage,

    #[error("Page size must be at least 1")]
    ZeroPageSize,

    #[error("Page {page} with {per_page} items per page is out of range")]
    OutOfRange { page: usize, per_page: usize },
}

/// 1-indexed page of a fixed size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    page: usize,
    per_page: usize,
}

impl PageWindow {
    pub fn new(page: usize, per_page: usize) -> Result<Self, WindowError> {
        if page == 0 {
            return Err(WindowError::ZeroPage);
        }
        if per_page == 0 {
            return Err(WindowError::ZeroPageSize);
        }
        // The end of the window must be addressable, so offsets never overflow
        if page.checked_mul(per_page).is_none() {
            return Err(WindowError::OutOfRange { page, per_page });
        }
        Ok(Self { page, per_page })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn offset(&self) -> usize {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> usize {
        self.per_page
    }

    /// Same page size, different page
    pub fn with_page(self, page: usize) -> Result<Self, WindowError> {
        Self::new(page, self.per_page)
    }
}

/// Pinned and unpinned groups of a listing page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledView<T> {
    pub pinned: Vec<T>,
    pub unpinned: Vec<T>,
}

/// What a listing page should tell the user when a group is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingState {
    /// The current page has unpinned entities to show
    Populated,
    /// Everything this page would show is already in the pinned group
    PageFullyPinned,
    /// Nothing on this page and nothing pinned, but the collection is not empty
    PageEmpty,
    /// The collection has no entities at all
    Empty,
}

/// Split a listing into pinned and unpinned groups
///
/// `pinned` comes from `all_items` regardless of the page being shown,
/// `unpinned` from `current_page` with pinned entities removed. Both are
/// sorted ascending by ordering key with a stable sort. Pin ids that match
/// nothing in `all_items` are ignored.
pub fn reconcile<T: Listable + Clone>(
    current_page: &[T],
    all_items: &[T],
    pinned_ids: &[String],
) -> ReconciledView<T> {
    let pinned_ids: HashSet<&str> = pinned_ids.iter().map(String::as_str).collect();

    let mut pinned: Vec<T> = all_items
        .iter()
        .filter(|item| pinned_ids.contains(item.listing_id().as_str()))
        .cloned()
        .collect();
    pinned.sort_by_key(|item| item.ordering_key());

    let mut unpinned: Vec<T> = current_page
        .iter()
        .filter(|item| !pinned_ids.contains(item.listing_id().as_str()))
        .cloned()
        .collect();
    unpinned.sort_by_key(|item| item.ordering_key());

    ReconciledView { pinned, unpinned }
}

impl<T> ReconciledView<T> {
    /// Classify the page for empty-state rendering
    ///
    /// "No items exist" and "the page is empty because of pins" are distinct.
    pub fn classify(&self, current_page: &[T], all_items: &[T]) -> ListingState {
        if current_page.is_empty() && all_items.is_empty() {
            ListingState::Empty
        } else if !self.unpinned.is_empty() {
            ListingState::Populated
        } else if !self.pinned.is_empty() {
            ListingState::PageFullyPinned
        } else {
            ListingState::PageEmpty
        }
    }
}

/// One slot of the page selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSlot {
    Page(usize),
    Ellipsis,
}

/// Page selector layout
///
/// Shows every page when they fit in `max_pages`, otherwise the first and
/// last pages, the pages around `current`, and an ellipsis for each gap.
pub fn visible_pages(current: usize, total_pages: usize, max_pages: usize) -> Vec<PageSlot> {
    if total_pages <= max_pages {
        return (1..=total_pages).map(PageSlot::Page).collect();
    }

    let spread = max_pages.saturating_sub(3) / 2;
    let start = current.saturating_sub(spread).max(2);
    let end = (current + spread).min(total_pages - 1);

    let mut pages = vec![PageSlot::Page(1)];
    if start > 2 {
        pages.push(PageSlot::Ellipsis);
    }
    pages.extend((start..=end).map(PageSlot::Page));
    if end < total_pages - 1 {
        pages.push(PageSlot::Ellipsis);
    }
    pages.push(PageSlot::Page(total_pages));
    pages
}

/// Pagination metadata for list output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub limit: usize,
    /// 1-indexed position of the first item on this page
    ///
    /// Greater than `last_item` when the page lies past the end of the listing.
    pub first_item: usize,
    /// 1-indexed position of the last item on this page
    pub last_item: usize,
    pub pages: Vec<PageSlot>,
    pub next_page_command: Option<String>,
    pub prev_page_command: Option<String>,
}

impl PaginationInfo {
    /// Listings that fit on one page render no page selector
    pub fn is_needed(&self) -> bool {
        self.total_items > self.limit
    }

    /// Whether the current page holds any of the listing's items
    pub fn has_items_on_page(&self) -> bool {
        self.first_item >= 1 && self.first_item <= self.last_item
    }
}

/// Build pagination metadata
///
/// `command` is the CLI invocation that lists this collection, e.g.
/// `pitwall races 2024`; navigation commands append `--page N` to it.
pub fn build_pagination(window: PageWindow, total_items: usize, command: &str) -> PaginationInfo {
    let total_pages = total_items.div_ceil(window.per_page());
    let page = window.page();

    let next_page = if page < total_pages {
        Some(format!("{} --page {}", command, page + 1))
    } else {
        None
    };

    let prev_page = if page > 1 {
        Some(format!("{} --page {}", command, page - 1))
    } else {
        None
    };

    PaginationInfo {
        current_page: page,
        total_pages,
        total_items,
        limit: window.per_page(),
        first_item: if total_items == 0 {
            0
        } else {
            window.offset() + 1
        },
        last_item: (page * window.per_page()).min(total_items),
        pages: visible_pages(page, total_pages, MAX_VISIBLE_PAGES),
        next_page_command: next_page,
        prev_page_command: prev_page,
    }
}
