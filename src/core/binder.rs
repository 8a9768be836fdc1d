//! # Rebinder
//!
//! After every content replacement the binder scans the document for
//! interactive elements and wires them up. It is safe to run any number of
//! times: a [`BindingRegistry`] remembers which `(node, listener)`
//! subscriptions already exist, so a node never gets a second listener of
//! the same kind.
//!
//! ```text
//! bind()
//!   1. prune    drop subscriptions whose node left the document
//!   2. scan     links, forms, action buttons, tab pair
//!   3. attach   only subscriptions not yet in the registry
//! ```
//!
//! Node ids are never reused, so markup injected by a later load is always
//! bound afresh even when it is identical to what it replaced.

use std::collections::HashSet;

use crate::core::tabs::{TabPair, TabSide};
use crate::host::{Document, ElementClass, EventKind, NodeId};

/// What a node does when its event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    /// Navigation link: load the page named by `data-page`.
    Navigate,
    /// Form: submit asynchronously.
    Submit,
    /// One-shot optimistic action.
    Action,
    /// Tab button of the panel pair.
    Tab(TabSide),
}

impl Listener {
    pub fn event(&self) -> EventKind {
        match self {
            Listener::Submit => EventKind::Submit,
            Listener::Navigate | Listener::Action | Listener::Tab(_) => EventKind::Click,
        }
    }

    pub fn for_class(class: ElementClass) -> Self {
        match class {
            ElementClass::NavLink => Listener::Navigate,
            ElementClass::AjaxForm => Listener::Submit,
            ElementClass::ActionButton => Listener::Action,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BindReport {
    pub attached: usize,
    pub skipped: usize,
    pub pruned: usize,
}

#[derive(Debug, Default)]
pub struct BindingRegistry {
    subscriptions: HashSet<(NodeId, Listener)>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self, node: NodeId, listener: Listener) -> bool {
        self.subscriptions.contains(&(node, listener))
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn bind(&mut self, doc: &mut dyn Document, tabs: &TabPair) -> BindReport {
        let mut report = BindReport {
            pruned: self.prune(doc),
            ..Default::default()
        };

        for class in ElementClass::ALL {
            let listener = Listener::for_class(class);
            for node in doc.query(class) {
                self.subscribe(doc, node, listener, &mut report);
            }
        }

        if let Some((primary, secondary)) = tabs.locate(doc) {
            self.subscribe(doc, primary, Listener::Tab(TabSide::Primary), &mut report);
            self.subscribe(doc, secondary, Listener::Tab(TabSide::Secondary), &mut report);
        }

        report
    }

    fn subscribe(
        &mut self,
        doc: &mut dyn Document,
        node: NodeId,
        listener: Listener,
        report: &mut BindReport,
    ) {
        if self.subscriptions.insert((node, listener)) {
            doc.add_listener(node, listener);
            report.attached += 1;
        } else {
            report.skipped += 1;
        }
    }

    fn prune(&mut self, doc: &dyn Document) -> usize {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|(node, _)| doc.contains(*node));
        before - self.subscriptions.len()
    }
}
