//! # Navigator
//!
//! The single controller that owns navigation. Page loading, rebinding,
//! form submission and optimistic actions are all methods on [`Navigator`]
//! (spread over `loader`, `form` and `action`), sharing one state object.
//!
//! ```text
//! Navigator (Clone: every field is shared)
//! ├── shared: Arc<Mutex<Shared>>
//! │   ├── document: Box<dyn Document>   // content region + interactive nodes
//! │   ├── history: BrowserHistory       // entries + address bar
//! │   ├── nav: NavState                 // current page + sequence token
//! │   ├── registry: BindingRegistry     // wired (node, listener) pairs
//! │   └── full_navigation: Option<String>
//! ├── transport: Arc<dyn Transport>
//! ├── locator: Arc<dyn Locator>         // path or hash strategy
//! ├── notifier: Arc<dyn Notifier>       // alert boxes
//! └── settings: Arc<EngineSettings>
//! ```
//!
//! The mutex is only ever held for synchronous document/history edits and
//! never across an `.await`, so two handlers can be in flight at once. Each
//! waits on its own request while the page stays interactive.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info};

use crate::api::Transport;
use crate::core::action::ToggleVisual;
use crate::core::binder::{BindReport, BindingRegistry, Listener};
use crate::core::loader::{HistoryWrite, LoadOutcome};
use crate::core::locator::Locator;
use crate::core::page::PageId;
use crate::core::state::NavState;
use crate::core::tabs::TabPair;
use crate::host::history::in_app;
use crate::host::{
    BrowserHistory, Document, EventKind, HistoryEvent, HistoryState, NodeId, Notifier,
};

pub const DEFAULT_SKELETON: &str = r#"<div class="space-y-4">
    <div class="h-24 bg-slate-200 rounded animate-pulse"></div>
    <div class="space-y-2">
        <div class="h-6 bg-slate-200 rounded w-3/4 animate-pulse"></div>
        <div class="h-6 bg-slate-200 rounded w-1/2 animate-pulse"></div>
    </div>
    <div class="h-40 bg-slate-200 rounded animate-pulse"></div>
</div>"#;

pub const DEFAULT_ERROR_FRAGMENT: &str = r#"<div class="text-center p-8"><h2 class="text-2xl font-bold text-red-500">Oops!</h2><p>Something went wrong. Please try again.</p></div>"#;

pub const DEFAULT_BUSY_LABEL: &str = r#"<i class="fas fa-spinner fa-spin"></i>"#;

pub const DEFAULT_LOGIN_PAGE: &str = "login";

/// Static markup the engine injects on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    /// Shown in the content region while a fragment is in flight.
    pub skeleton: String,
    /// Shown in the content region when a fragment cannot be loaded.
    pub error_fragment: String,
    /// Replaces a control's label while its request is in flight.
    pub busy_label: String,
}

impl Default for Markup {
    fn default() -> Self {
        Self {
            skeleton: DEFAULT_SKELETON.to_string(),
            error_fragment: DEFAULT_ERROR_FRAGMENT.to_string(),
            busy_label: DEFAULT_BUSY_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Loaded when an action reports that the session is gone.
    pub login_page: PageId,
    pub markup: Markup,
    pub toggle: ToggleVisual,
    pub tabs: TabPair,
    /// Start-up page for server shells reached by full navigation (`/admin`).
    pub shell_pages: BTreeMap<String, PageId>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            login_page: PageId::from(DEFAULT_LOGIN_PAGE),
            markup: Markup::default(),
            toggle: ToggleVisual::default(),
            tabs: TabPair::default(),
            shell_pages: BTreeMap::from([(
                "/admin".to_string(),
                PageId::from("admin/dashboard"),
            )]),
        }
    }
}

pub(crate) struct Shared {
    pub(crate) document: Box<dyn Document>,
    pub(crate) history: BrowserHistory,
    pub(crate) nav: NavState,
    pub(crate) registry: BindingRegistry,
    pub(crate) full_navigation: Option<String>,
}

impl Shared {
    pub(crate) fn rebind(&mut self, tabs: &TabPair) -> BindReport {
        let Shared {
            document, registry, ..
        } = self;
        registry.bind(document.as_mut(), tabs)
    }
}

/// A panic inside a handler must not wedge every later one.
pub(crate) fn lock_shared(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone)]
pub struct Navigator {
    pub(crate) shared: Arc<Mutex<Shared>>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) locator: Arc<dyn Locator>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) settings: Arc<EngineSettings>,
}

impl Navigator {
    pub fn new(
        document: Box<dyn Document>,
        history: BrowserHistory,
        transport: Arc<dyn Transport>,
        locator: Arc<dyn Locator>,
        notifier: Arc<dyn Notifier>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                document,
                history,
                nav: NavState::new(),
                registry: BindingRegistry::new(),
                full_navigation: None,
            })),
            transport,
            locator,
            notifier,
            settings: Arc::new(settings),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Shared> {
        lock_shared(&self.shared)
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn locator_name(&self) -> &str {
        self.locator.name()
    }

    // ========================================================================
    // Start-up
    // ========================================================================

    /// First load after the shell is up. The page comes from the address
    /// bar if it names one, else from the shell path, else `host_default`.
    pub async fn start(&self, host_default: Option<&str>) -> LoadOutcome {
        {
            let mut shared = self.lock();
            let report = shared.rebind(&self.settings.tabs);
            debug!("Shell bound: {:?}", report);
        }
        let page = self.initial_page(host_default);
        info!(
            "Starting at {} ({} locator, {} transport, location {})",
            page,
            self.locator.name(),
            self.transport.name(),
            self.location()
        );
        self.navigate(page, HistoryWrite::Replace).await
    }

    fn initial_page(&self, host_default: Option<&str>) -> PageId {
        let location = self.location();
        // A redirect may name the app by its absolute URL.
        let location = in_app(&location);
        let path = location.split(['?', '#']).next().unwrap_or("");
        let shell = self.settings.shell_pages.get(path);
        match (shell, self.locator.page_from_url(location)) {
            // The path locator reads `/admin` as page "admin"; the shell wins.
            (Some(shell), Some(page)) if page.as_str() == path.trim_start_matches('/') => {
                shell.clone()
            }
            (_, Some(page)) => page,
            (Some(shell), None) => shell.clone(),
            (None, None) => PageId::or_default(host_default),
        }
    }

    /// A redirect asked for a full page load, not yet followed.
    pub fn full_navigation(&self) -> Option<String> {
        self.lock().full_navigation.clone()
    }

    /// Completes a pending full navigation the way a fresh page load would:
    /// the content region is emptied, its subscriptions are dropped, and the
    /// start-up load runs against the new address.
    pub async fn follow_full_navigation(&self, host_default: Option<&str>) -> Option<LoadOutcome> {
        let target = self.lock().full_navigation.take()?;
        info!("Following full navigation to {}", target);
        {
            let mut shared = self.lock();
            shared.document.set_content("");
            shared.rebind(&self.settings.tabs);
        }
        Some(self.start(host_default).await)
    }

    // ========================================================================
    // Binding & event dispatch
    // ========================================================================

    pub fn bind_event_listeners(&self) -> BindReport {
        let report = self.lock().rebind(&self.settings.tabs);
        debug!("Rebind: {:?}", report);
        report
    }

    fn attached(&self, node: NodeId, event: EventKind) -> Vec<Listener> {
        self.lock()
            .document
            .listeners(node)
            .into_iter()
            .filter(|l| l.event() == event)
            .collect()
    }

    /// Clicks `node`: every click listener attached to it runs, in order.
    /// Returns how many ran (zero for unbound or detached nodes).
    pub async fn click(&self, node: NodeId) -> usize {
        let listeners = self.attached(node, EventKind::Click);
        for listener in &listeners {
            match listener {
                Listener::Navigate => {
                    let page = self.lock().document.attr(node, "data-page");
                    self.load_page(page.as_deref()).await;
                }
                Listener::Action => {
                    self.trigger_action(node).await;
                }
                Listener::Tab(side) => {
                    let mut shared = self.lock();
                    self.settings.tabs.activate(shared.document.as_mut(), *side);
                }
                Listener::Submit => {}
            }
        }
        listeners.len()
    }

    /// Fires the submit event on `form`. Native navigation never happens;
    /// each attached submit listener runs the async submission.
    pub async fn submit(&self, form: NodeId) -> usize {
        let listeners = self.attached(form, EventKind::Submit);
        for _ in &listeners {
            self.submit_form(form).await;
        }
        listeners.len()
    }

    // ========================================================================
    // Browser history events
    // ========================================================================

    pub async fn back(&self) -> Vec<LoadOutcome> {
        let events = self.lock().history.back();
        self.on_history_events(events).await
    }

    pub async fn forward(&self) -> Vec<LoadOutcome> {
        let events = self.lock().history.forward();
        self.on_history_events(events).await
    }

    /// The user edits the fragment in the address bar.
    pub async fn edit_hash(&self, url: &str) -> Vec<LoadOutcome> {
        let events = self.lock().history.edit_hash(url);
        self.on_history_events(events).await
    }

    async fn on_history_events(&self, events: Vec<HistoryEvent>) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::new();
        for event in events {
            if let Some(page) = self.locator.page_from_event(&event) {
                debug!("{} locator handles {:?}", self.locator.name(), event);
                outcomes.push(self.navigate(page, HistoryWrite::Replace).await);
            }
        }
        outcomes
    }

    // ========================================================================
    // Read access
    // ========================================================================

    /// Page committed by the last successful load.
    pub fn current_page(&self) -> Option<PageId> {
        self.lock().nav.current().cloned()
    }

    pub fn history_state(&self) -> Option<HistoryState> {
        self.lock().history.state().cloned()
    }

    pub fn location(&self) -> String {
        self.lock().history.location().to_string()
    }

    pub fn history_len(&self) -> usize {
        self.lock().history.len()
    }

    pub fn content(&self) -> String {
        self.lock().document.content().to_string()
    }

    pub fn text_content(&self) -> String {
        self.lock().document.text_content()
    }

    /// Runs `f` against the document with the engine state locked.
    pub fn with_document<R>(&self, f: impl FnOnce(&mut dyn Document) -> R) -> R {
        let mut shared = self.lock();
        f(shared.document.as_mut())
    }
}
