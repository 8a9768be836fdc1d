//! # Locator Strategies
//!
//! One navigator, two ways of mirroring the current page in the address bar:
//!
//! ```text
//!   PathLocator   /{page}      state {page}   reacts to popstate
//!   HashLocator   /#/{page}    state {page}   reacts to hashchange
//! ```
//!
//! The hash variant is for hosts that cannot route arbitrary paths to the
//! app shell on the server. Either way, a history event ends in the same
//! `load_page` call a programmatic navigation would make.

use std::sync::Arc;

use crate::LocatorKind;
use crate::core::page::PageId;
use crate::host::HistoryEvent;
use crate::host::history::in_app;

pub trait Locator: Send + Sync {
    fn name(&self) -> &str;

    /// Address-bar URL for `page`.
    fn url_for(&self, page: &PageId) -> String;

    /// Page named by `url`, if the URL names one.
    fn page_from_url(&self, url: &str) -> Option<PageId>;

    /// Page to load in response to a history event, or `None` if this
    /// locator does not listen to that event.
    fn page_from_event(&self, event: &HistoryEvent) -> Option<PageId>;
}

pub struct PathLocator;

impl Locator for PathLocator {
    fn name(&self) -> &str {
        "path"
    }

    fn url_for(&self, page: &PageId) -> String {
        format!("/{page}")
    }

    fn page_from_url(&self, url: &str) -> Option<PageId> {
        let path = in_app(url).split(['?', '#']).next().unwrap_or("");
        let path = path.trim_start_matches('/');
        (!path.is_empty()).then(|| PageId::new(path))
    }

    fn page_from_event(&self, event: &HistoryEvent) -> Option<PageId> {
        match event {
            // Entries the engine did not create carry no state; ignore them.
            HistoryEvent::PopState(Some(state)) => Some(state.page.clone()),
            _ => None,
        }
    }
}

pub struct HashLocator;

impl Locator for HashLocator {
    fn name(&self) -> &str {
        "hash"
    }

    fn url_for(&self, page: &PageId) -> String {
        format!("/#/{page}")
    }

    fn page_from_url(&self, url: &str) -> Option<PageId> {
        let (_, hash) = url.split_once('#')?;
        let hash = hash.trim_start_matches('/');
        (!hash.is_empty()).then(|| PageId::new(hash))
    }

    fn page_from_event(&self, event: &HistoryEvent) -> Option<PageId> {
        match event {
            // An emptied fragment means the default page.
            HistoryEvent::HashChange { new_url, .. } => {
                Some(self.page_from_url(new_url).unwrap_or_default())
            }
            HistoryEvent::PopState(_) => None,
        }
    }
}

pub fn locator_for(kind: LocatorKind) -> Arc<dyn Locator> {
    match kind {
        LocatorKind::Path => Arc::new(PathLocator),
        LocatorKind::Hash => Arc::new(HashLocator),
    }
}
