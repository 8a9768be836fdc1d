//! # Core Navigation Engine
//!
//! Everything that decides what the page shows. It talks to the outside
//! world only through the [`Transport`](crate::api::Transport),
//! [`Document`](crate::host::Document) and [`Notifier`](crate::host::Notifier)
//! traits.
//!
//! ```text
//!        click / submit / back / hash edit
//!                      │
//!                      ▼
//!              ┌───────────────┐
//!              │   Navigator   │──── locator (path | hash)
//!              └───────┬───────┘
//!        ┌─────────────┼──────────────┐
//!        ▼             ▼              ▼
//!    loader          form           action
//!  (fragments)   (JSON/multipart)  (optimistic)
//!        │             │              │
//!        └──── binder (rebind after every replacement)
//! ```
//!
//! ## Modules
//!
//! - [`navigator`]: the controller, its shared state and event dispatch
//! - [`loader`]: page loads and history writes
//! - [`form`]: asynchronous form submission
//! - [`action`]: optimistic toggle actions
//! - [`binder`]: idempotent listener wiring
//! - [`locator`]: page id ↔ URL strategies
//! - [`config`]: layered settings

pub mod action;
pub mod binder;
pub(crate) mod busy;
pub mod config;
pub mod envelope;
pub mod form;
pub mod loader;
pub mod locator;
pub mod navigator;
pub mod page;
pub mod state;
pub mod tabs;

pub use navigator::{EngineSettings, Navigator};
