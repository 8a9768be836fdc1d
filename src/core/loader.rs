//! # Page Loader
//!
//! ```text
//! load_page(id)
//!   ├─ token = nav.begin(); content = skeleton
//!   ├─ GET /api/page/{id}                     (lock released)
//!   ├─ token stale?  -> Superseded, touch nothing
//!   ├─ 2xx           -> content = body, history write, commit, rebind
//!   └─ otherwise     -> content = error fragment, history untouched
//! ```
//!
//! A failed load is final for that attempt. Nothing is retried and nothing
//! propagates to the caller beyond the returned [`LoadOutcome`].

use log::{debug, info, warn};

use crate::api::TransportRequest;
use crate::core::navigator::Navigator;
use crate::core::page::PageId;
use crate::host::HistoryState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fragment injected, history and bindings updated.
    Rendered(PageId),
    /// Error fragment shown; history left as it was.
    Failed(PageId),
    /// A later navigation was issued first; this response was dropped.
    Superseded(PageId),
}

impl LoadOutcome {
    pub fn page(&self) -> &PageId {
        match self {
            LoadOutcome::Rendered(p) | LoadOutcome::Failed(p) | LoadOutcome::Superseded(p) => p,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, LoadOutcome::Rendered(_))
    }
}

/// How a successful load records itself in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryWrite {
    /// New entry (programmatic navigation).
    Push,
    /// Overwrite the current entry (start-up, back/forward, hash edits).
    Replace,
}

impl Navigator {
    /// Loads `page` (default `index`) into the content region.
    pub async fn load_page(&self, page: Option<&str>) -> LoadOutcome {
        self.navigate(PageId::or_default(page), HistoryWrite::Push)
            .await
    }

    /// Reloads the page recorded in the current history entry.
    pub async fn reload(&self) -> LoadOutcome {
        let page = self
            .history_state()
            .map(|state| state.page)
            .unwrap_or_default();
        self.navigate(page, HistoryWrite::Push).await
    }

    pub(crate) async fn navigate(&self, page: PageId, write: HistoryWrite) -> LoadOutcome {
        info!("Loading page: {}", page);
        let token = {
            let mut shared = self.lock();
            let token = shared.nav.begin();
            shared.document.set_content(&self.settings.markup.skeleton);
            token
        };

        let result = self
            .transport
            .send(TransportRequest::get(page.fragment_path()))
            .await;

        let mut shared = self.lock();
        if !shared.nav.is_latest(token) {
            debug!("Dropping stale response for {} (token {})", page, token);
            return LoadOutcome::Superseded(page);
        }

        let response = match result {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                warn!("Failed to load page {}: HTTP {}", page, response.status);
                shared.document.set_content(&self.settings.markup.error_fragment);
                return LoadOutcome::Failed(page);
            }
            Err(e) => {
                warn!("Failed to load page {}: {}", page, e);
                shared.document.set_content(&self.settings.markup.error_fragment);
                return LoadOutcome::Failed(page);
            }
        };

        shared.document.set_content(&response.text());

        let url = self.locator.url_for(&page);
        let state = HistoryState::new(page.clone());
        // Reloading the page already on screen must not stack a duplicate entry.
        let same_entry = shared.history.state() == Some(&state);
        match write {
            HistoryWrite::Push if !same_entry => shared.history.push_state(state, url),
            _ => shared.history.replace_state(state, url),
        }
        shared.nav.commit(token, page.clone());

        let report = shared.rebind(&self.settings.tabs);
        debug!("Rendered {} ({:?})", page, report);
        LoadOutcome::Rendered(page)
    }
}
