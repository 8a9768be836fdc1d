//! # Host Surfaces
//!
//! Everything the engine touches that a browser would own: the document,
//! the history stack with its address bar, and alert boxes. The navigator
//! only sees these through traits and plain data, so a test or the
//! command-line browser can stand in for a real page.

pub mod document;
pub mod history;
pub mod memory;
pub mod notice;

pub use document::{Document, ElementClass, EventKind, NodeId};
pub use history::{BrowserHistory, HistoryEntry, HistoryEvent, HistoryState};
pub use memory::MemoryDocument;
pub use notice::{ConsoleNotifier, Notice, Notifier};
