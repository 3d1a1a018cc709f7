//! Listing page state
//!
//! All of a listing page's state lives in [`ListingModel`] and only changes
//! through [`ListingModel::reduce`]. Page requests are numbered so a response
//! for a page the user already navigated away from is dropped instead of
//! overwriting the newer page.

use serde::Serialize;

use crate::listing::{
    build_pagination, reconcile, Listable, ListingState, PageWindow, PaginationInfo,
    ReconciledView,
};
use crate::view::ViewMode;

/// Sequence number of a page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RequestId(u64);

/// Everything that can happen to a listing page
#[derive(Debug, Clone, PartialEq)]
pub enum ListingAction<T> {
    /// Navigate to a page; starts a new request
    PageRequested { page: usize },
    /// The paginated fetch for `request` finished
    PageLoaded {
        request: RequestId,
        items: Vec<T>,
        total: usize,
    },
    /// The paginated fetch for `request` failed
    PageFailed { request: RequestId, message: String },
    /// The unpaginated fetch used for the pinned group finished
    AllItemsLoaded(Vec<T>),
    ViewChanged(ViewMode),
    ViewToggled,
    PinsChanged(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingModel<T> {
    window: PageWindow,
    view: ViewMode,
    pins: Vec<String>,
    page_items: Vec<T>,
    all_items: Vec<T>,
    total: usize,
    loading: bool,
    error: Option<String>,
    latest_request: RequestId,
}

impl<T: Listable + Clone> ListingModel<T> {
    pub fn new(window: PageWindow, view: ViewMode, pins: Vec<String>) -> Self {
        Self {
            window,
            view,
            pins,
            page_items: Vec::new(),
            all_items: Vec::new(),
            total: 0,
            loading: false,
            error: None,
            latest_request: RequestId(0),
        }
    }

    /// Apply `action` and return the next state
    pub fn reduce(mut self, action: ListingAction<T>) -> Self {
        match action {
            ListingAction::PageRequested { page } => {
                let Ok(window) = self.window.with_page(page) else {
                    return self;
                };
                self.window = window;
                self.loading = true;
                self.error = None;
                self.latest_request = RequestId(self.latest_request.0 + 1);
            }
            ListingAction::PageLoaded {
                request,
                items,
                total,
            } => {
                if request != self.latest_request {
                    return self;
                }
                self.page_items = items;
                self.total = total;
                self.loading = false;
            }
            ListingAction::PageFailed { request, message } => {
                if request != self.latest_request {
                    return self;
                }
                self.error = Some(message);
                self.loading = false;
            }
            ListingAction::AllItemsLoaded(items) => {
                self.all_items = items;
            }
            ListingAction::ViewChanged(view) => {
                self.view = view;
            }
            ListingAction::ViewToggled => {
                self.view = self.view.toggled();
            }
            ListingAction::PinsChanged(pins) => {
                self.pins = pins;
            }
        }
        self
    }

    /// Request id a response must carry to be accepted
    pub fn latest_request(&self) -> RequestId {
        self.latest_request
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    pub fn page(&self) -> usize {
        self.window.page()
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn pins(&self) -> &[String] {
        &self.pins
    }

    pub fn page_items(&self) -> &[T] {
        &self.page_items
    }

    pub fn all_items(&self) -> &[T] {
        &self.all_items
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.window.per_page())
    }

    pub fn is_pinned(&self, item: &T) -> bool {
        let id = item.listing_id();
        self.pins.iter().any(|pin| *pin == id)
    }

    pub fn reconciled(&self) -> ReconciledView<T> {
        reconcile(&self.page_items, &self.all_items, &self.pins)
    }

    pub fn listing_state(&self) -> ListingState {
        self.reconciled().classify(&self.page_items, &self.all_items)
    }

    pub fn pagination(&self, command: &str) -> PaginationInfo {
        build_pagination(self.window, self.total, command)
    }

    /// Snapshot for rendering and JSON output
    pub fn output(&self, scope: &str, command: &str) -> ListOutput<T> {
        let reconciled = self.reconciled();
        let state = reconciled.classify(&self.page_items, &self.all_items);

        ListOutput {
            scope: scope.to_string(),
            view: self.view,
            state,
            pinned_count: self.pins.len(),
            pinned: reconciled.pinned,
            items: reconciled.unpinned,
            pagination: self.pagination(command),
        }
    }
}

/// Complete listing output with both groups and pagination
#[derive(Debug, Clone, Serialize)]
pub struct ListOutput<T> {
    pub scope: String,
    pub view: ViewMode,
    pub state: ListingState,
    /// Number of stored pins, including ones outside this collection
    pub pinned_count: usize,
    pub pinned: Vec<T>,
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}
