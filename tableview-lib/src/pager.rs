//! Pager window computation.
//!
//! Turns a `(page, total_pages)` pair into the set of links a pager control
//! shows: first/previous/next/last plus a fixed-width window of page numbers
//! that slides toward whichever edge the current page is near.

use serde::Serialize;

/// Default number of page links shown on each side of the current page.
pub const DEFAULT_WINDOW_RADIUS: u32 = 4;

/// A single pager control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    /// The page this link navigates to.
    pub page: u32,
    /// Label to render.
    pub text: String,
    /// `true` for the entry of the current page.
    pub active: bool,
    /// `true` when activating the link would be a no-op.
    pub disabled: bool,
}

impl PageLink {
    fn new(page: u32, text: impl Into<String>) -> Self {
        Self {
            page,
            text: text.into(),
            active: false,
            disabled: false,
        }
    }

    fn disabled_if(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Returns `true` if activating this link should trigger navigation.
    pub fn is_navigable(&self) -> bool {
        !self.active && !self.disabled
    }
}

/// Everything a pager control needs to render.
///
/// Derived from `(page, total_pages)` only; recompute it on every reload
/// rather than patching a previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagerViewModel {
    /// The current page.
    pub page: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Jump to page 1. Disabled on the first page.
    pub first: Option<PageLink>,
    /// Previous page, absent on the first page.
    pub previous: Option<PageLink>,
    /// The window of numbered page links.
    pub pages: Vec<PageLink>,
    /// Next page, absent on the last page.
    pub next: Option<PageLink>,
    /// Jump to the last page. Disabled on the last page.
    pub last: Option<PageLink>,
}

impl PagerViewModel {
    /// Returns `true` if there is more than one page to navigate between.
    pub fn is_paginated(&self) -> bool {
        !self.pages.is_empty()
    }

    /// Returns the active page entry, if the pager is shown at all.
    pub fn active(&self) -> Option<&PageLink> {
        self.pages.iter().find(|link| link.active)
    }

    /// Iterates over every control in display order.
    pub fn controls(&self) -> impl Iterator<Item = &PageLink> {
        self.first
            .iter()
            .chain(self.previous.iter())
            .chain(self.pages.iter())
            .chain(self.next.iter())
            .chain(self.last.iter())
    }
}

/// Computes the pager for `page` out of `total_pages`.
///
/// With a single page only `page` and `total_pages` are populated. Otherwise
/// the numbered window holds `min(2 * window_radius + 1, total_pages)` entries
/// and is shifted to stay inside `1..=total_pages`. A `page` outside that range
/// is clamped into it first.
///
/// # Example
///
/// ```
/// use tableview_lib::compute_pager_window;
///
/// let pager = compute_pager_window(1, 20, 4);
/// let numbers: Vec<u32> = pager.pages.iter().map(|link| link.page).collect();
/// assert_eq!(numbers, (1..=9).collect::<Vec<_>>());
/// assert!(pager.previous.is_none());
/// assert_eq!(pager.next.map(|link| link.page), Some(2));
/// ```
pub fn compute_pager_window(page: u32, total_pages: u32, window_radius: u32) -> PagerViewModel {
    let total_pages = total_pages.max(1);
    let page = page.clamp(1, total_pages);

    if total_pages == 1 {
        return PagerViewModel {
            page,
            total_pages,
            first: None,
            previous: None,
            pages: Vec::new(),
            next: None,
            last: None,
        };
    }

    let (start, stop) = window_bounds(page, total_pages, window_radius);

    let pages = (start..=stop)
        .map(|p| {
            let mut link = PageLink::new(p, p.to_string());
            if p == page {
                // The current page is shown but never navigates.
                link.active = true;
                link.disabled = true;
            }
            link
        })
        .collect();

    PagerViewModel {
        page,
        total_pages,
        first: Some(PageLink::new(1, "«").disabled_if(page == 1)),
        previous: (page > 1).then(|| PageLink::new(page - 1, "‹")),
        pages,
        next: (page < total_pages).then(|| PageLink::new(page + 1, "›")),
        last: Some(PageLink::new(total_pages, "»").disabled_if(page == total_pages)),
    }
}

fn window_bounds(page: u32, total_pages: u32, radius: u32) -> (u32, u32) {
    let page = i64::from(page);
    let total = i64::from(total_pages);
    let radius = i64::from(radius);

    let deficit_low = (radius - page + 1).max(0);
    let deficit_high = (page - (total - radius)).max(0);

    let start = (page - radius - deficit_high).max(1);
    let stop = (page + radius + deficit_low).min(total);

    // Both bounds lie in 1..=total_pages, so they fit back into u32.
    (start as u32, stop as u32)
}
