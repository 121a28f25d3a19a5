//! Per-grid paging state.

use serde::Serialize;

/// Paging state owned by a single grid.
///
/// All three fields are at least 1. After [`reconcile`](Self::reconcile),
/// `current_page` is also at most `total_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    current_page: u32,
    page_size: u32,
    total_pages: u32,
}

/// What [`PageState::reconcile`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The current page was already within range.
    InRange,
    /// The current page was beyond the reported total and was reset to 1.
    ResetToFirst {
        /// The page that was out of range.
        stale_page: u32,
    },
}

impl PageState {
    /// Creates a state positioned on page 1 of 1.
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_pages: 1,
        }
    }

    /// Returns the page that the next reload requests.
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Returns the number of rows requested per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the total page count last reported by the server.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Moves to `page`. Zero is treated as 1.
    ///
    /// The upper bound is not checked here; the server is the authority on
    /// how many pages exist and the next reconciliation corrects it.
    pub fn set_current_page(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    /// Changes the page size. Zero is treated as 1.
    pub fn set_page_size(&mut self, size: u32) {
        self.page_size = size.max(1);
    }

    /// Applies the total page count from a list response.
    ///
    /// A reported total of zero (empty table) counts as one page. If the
    /// current page no longer exists it is reset to 1; no re-fetch is implied.
    pub fn reconcile(&mut self, reported_total_pages: u32) -> Reconciliation {
        self.total_pages = reported_total_pages.max(1);

        if self.current_page > self.total_pages {
            let stale_page = self.current_page;
            self.current_page = 1;
            Reconciliation::ResetToFirst { stale_page }
        } else {
            Reconciliation::InRange
        }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(crate::GridConfig::default().default_page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = PageState::new(25);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.page_size(), 25);
        assert_eq!(state.total_pages(), 1);
    }

    #[test]
    fn test_zero_inputs_are_raised_to_one() {
        let mut state = PageState::new(0);
        assert_eq!(state.page_size(), 1);

        state.set_current_page(0);
        assert_eq!(state.current_page(), 1);

        state.set_page_size(0);
        assert_eq!(state.page_size(), 1);
    }

    #[test]
    fn test_reconcile_in_range() {
        let mut state = PageState::new(10);
        state.set_current_page(3);
        assert_eq!(state.reconcile(5), Reconciliation::InRange);
        assert_eq!(state.current_page(), 3);
        assert_eq!(state.total_pages(), 5);
    }

    #[test]
    fn test_reconcile_resets_stale_page() {
        let mut state = PageState::new(10);
        state.set_current_page(5);
        assert_eq!(
            state.reconcile(3),
            Reconciliation::ResetToFirst { stale_page: 5 }
        );
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.total_pages(), 3);
    }

    #[test]
    fn test_reconcile_empty_table() {
        let mut state = PageState::new(10);
        state.set_current_page(2);
        assert_eq!(
            state.reconcile(0),
            Reconciliation::ResetToFirst { stale_page: 2 }
        );
        assert_eq!(state.total_pages(), 1);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_last_page_is_in_range() {
        let mut state = PageState::new(10);
        state.set_current_page(4);
        assert_eq!(state.reconcile(4), Reconciliation::InRange);
    }
}
