//! # Browser History
//!
//! A session history stack with an address bar, modelled on the browser's:
//! `pushState` / `replaceState` never fire events, traversal (back/forward)
//! fires `popstate` and, when the fragment changed, `hashchange`; a manual
//! fragment edit creates a state-less entry and fires both.
//!
//! ```text
//! entries: [ {state, url}, {state, url}, ... ]
//!                           ^ index (current entry)
//! ```

use serde::{Deserialize, Serialize};

use crate::core::page::PageId;

/// The state object stored with each engine-created entry: `{ "page": id }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryState {
    pub page: PageId,
}

impl HistoryState {
    pub fn new(page: PageId) -> Self {
        Self { page }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub state: Option<HistoryState>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    PopState(Option<HistoryState>),
    HashChange { old_url: String, new_url: String },
}

#[derive(Debug)]
pub struct BrowserHistory {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl BrowserHistory {
    /// A fresh tab showing `initial_url`, with no state attached.
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry {
                state: None,
                url: initial_url.into(),
            }],
            index: 0,
        }
    }

    /// The URL in the address bar.
    pub fn location(&self) -> &str {
        &self.entries[self.index].url
    }

    pub fn state(&self) -> Option<&HistoryState> {
        self.entries[self.index].state.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Adds an entry after the current one, discarding any forward entries.
    pub fn push_state(&mut self, state: HistoryState, url: impl Into<String>) {
        self.push(Some(state), url.into());
    }

    pub fn replace_state(&mut self, state: HistoryState, url: impl Into<String>) {
        let entry = &mut self.entries[self.index];
        entry.state = Some(state);
        entry.url = url.into();
    }

    /// Full navigation (`location.href = url`). The new document starts with no state.
    pub fn assign(&mut self, url: impl Into<String>) {
        self.push(None, url.into());
    }

    /// The user edits only the fragment part of the address bar.
    pub fn edit_hash(&mut self, url: impl Into<String>) -> Vec<HistoryEvent> {
        let old_url = self.location().to_string();
        let new_url = url.into();
        self.push(None, new_url.clone());

        let mut events = vec![HistoryEvent::PopState(None)];
        if hash_of(&old_url) != hash_of(&new_url) {
            events.push(HistoryEvent::HashChange { old_url, new_url });
        }
        events
    }

    /// Back button. No events when already at the first entry.
    pub fn back(&mut self) -> Vec<HistoryEvent> {
        match self.index.checked_sub(1) {
            Some(target) => self.traverse(target),
            None => Vec::new(),
        }
    }

    /// Forward button. No events when already at the last entry.
    pub fn forward(&mut self) -> Vec<HistoryEvent> {
        if self.index + 1 < self.entries.len() {
            self.traverse(self.index + 1)
        } else {
            Vec::new()
        }
    }

    fn push(&mut self, state: Option<HistoryState>, url: String) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry { state, url });
        self.index = self.entries.len() - 1;
    }

    fn traverse(&mut self, target: usize) -> Vec<HistoryEvent> {
        let old_url = self.location().to_string();
        self.index = target;
        let new_url = self.location().to_string();

        let mut events = vec![HistoryEvent::PopState(self.state().cloned())];
        if hash_of(&old_url) != hash_of(&new_url) {
            events.push(HistoryEvent::HashChange { old_url, new_url });
        }
        events
    }
}

/// The fragment part of a URL including `#`, or `""`.
pub fn hash_of(url: &str) -> &str {
    url.find('#').map_or("", |i| &url[i..])
}

/// `url` without scheme and host: path, query and fragment only. Rooted
/// and relative URLs come back unchanged; a bare origin becomes `/`.
pub fn in_app(url: &str) -> &str {
    let Some(rest) = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
    else {
        return url;
    };
    match rest.find(['/', '?', '#']) {
        Some(i) if rest[i..].starts_with('/') => &rest[i..],
        _ => "/",
    }
}
