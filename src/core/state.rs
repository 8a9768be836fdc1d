//! # Navigation State
//!
//! The controller's own record of where it is, replacing ad-hoc globals.
//!
//! ```text
//! NavState
//! ├── current: Option<PageId>   // last page committed by a successful load
//! └── issued: u64               // latest request sequence token handed out
//! ```
//!
//! Every load takes a fresh token before it fetches. When the response
//! arrives, only the holder of the latest token may touch the content region
//! or history, so a slow earlier navigation can never overwrite a faster
//! later one.

use crate::core::page::PageId;

#[derive(Debug, Default)]
pub struct NavState {
    current: Option<PageId>,
    issued: u64,
}

impl NavState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next sequence token.
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub fn is_latest(&self, token: u64) -> bool {
        token == self.issued
    }

    /// Records a successful load. Only call with the latest token.
    pub fn commit(&mut self, token: u64, page: PageId) {
        debug_assert!(self.is_latest(token));
        self.current = Some(page);
    }

    pub fn current(&self) -> Option<&PageId> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_token_wins() {
        let mut nav = NavState::new();
        let first = nav.begin();
        let second = nav.begin();
        assert!(!nav.is_latest(first));
        assert!(nav.is_latest(second));

        nav.commit(second, PageId::from("wishlist"));
        assert_eq!(nav.current().map(PageId::as_str), Some("wishlist"));
    }

    #[test]
    fn test_uncommitted_load_keeps_current_page() {
        let mut nav = NavState::new();
        let first = nav.begin();
        nav.commit(first, PageId::from("index"));

        // A load that fails never commits.
        let failed = nav.begin();
        assert!(nav.is_latest(failed));
        assert_eq!(nav.current().map(PageId::as_str), Some("index"));
    }
}
