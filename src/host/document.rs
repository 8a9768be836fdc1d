//! # Document
//!
//! The slice of a browser document the engine drives. Everything the
//! navigator reads or mutates on the page goes through this trait, so the
//! engine runs the same against [`MemoryDocument`](super::MemoryDocument) or
//! any other host.
//!
//! Node identity: a [`NodeId`] names one element for its lifetime in the
//! document. Replacing the content region creates new elements with new ids,
//! even when the markup is byte-identical.

use std::fmt;

use crate::api::FieldValue;
use crate::core::binder::Listener;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Interactive element classes the binder scans for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementClass {
    /// `<a class="ajax-link" data-page="...">`
    NavLink,
    /// `<form class="ajax-form" action="..." method="..." enctype="...">`
    AjaxForm,
    /// Any element carrying `data-action="..."`.
    ActionButton,
}

impl ElementClass {
    pub const ALL: [ElementClass; 3] = [
        ElementClass::NavLink,
        ElementClass::AjaxForm,
        ElementClass::ActionButton,
    ];

    /// CSS selector a DOM-backed host can use to find this class.
    pub fn selector(self) -> &'static str {
        match self {
            ElementClass::NavLink => "a.ajax-link",
            ElementClass::AjaxForm => "form.ajax-form",
            ElementClass::ActionButton => "[data-action]",
        }
    }
}

/// DOM event a listener is attached for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
}

/// Mutations on a node that is not (or no longer) in the document are no-ops.
pub trait Document: Send {
    /// Replaces the content region with `markup`. Every element previously in
    /// the region leaves the document.
    fn set_content(&mut self, markup: &str);

    /// Current markup of the content region.
    fn content(&self) -> &str;

    /// Human-readable text of the content region.
    fn text_content(&self) -> String;

    /// True while `node` is attached to the document.
    fn contains(&self, node: NodeId) -> bool;

    /// Attached nodes of `class`, in document order.
    fn query(&self, class: ElementClass) -> Vec<NodeId>;

    /// Looks up an attached element by its `id` attribute.
    fn find_by_id(&self, dom_id: &str) -> Option<NodeId>;

    fn attr(&self, node: NodeId, name: &str) -> Option<String>;

    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);

    fn inner_html(&self, node: NodeId) -> Option<String>;
    fn set_inner_html(&mut self, node: NodeId, html: &str);

    fn is_disabled(&self, node: NodeId) -> bool;
    fn set_disabled(&mut self, node: NodeId, disabled: bool);

    /// The form's submit control (`button[type=submit]` or `input[type=submit]`).
    fn submit_control(&self, form: NodeId) -> Option<NodeId>;

    /// Named, successful controls of `form` in document order.
    fn form_fields(&self, form: NodeId) -> Vec<(String, FieldValue)>;

    /// Sets a named control's value. Returns false if the form has no such control.
    fn set_field(&mut self, form: NodeId, name: &str, value: FieldValue) -> bool;

    /// Restores every control of `form` to its markup default.
    fn reset_form(&mut self, form: NodeId);

    fn add_listener(&mut self, node: NodeId, listener: Listener);

    /// Listeners attached to `node`, in attachment order.
    fn listeners(&self, node: NodeId) -> Vec<Listener>;
}
