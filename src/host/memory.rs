//! # In-Memory Document
//!
//! A headless [`Document`] built from markup with `scraper`. Used by the
//! command-line browser and by tests.
//!
//! ```text
//! MemoryDocument
//! ├── shell        // static chrome (header nav), parsed once, never replaced
//! ├── content      // markup of the content region, replaced per load
//! ├── attached     // NodeId -> Element for shell + current content
//! └── retired      // elements of the last few content generations
//! ```
//!
//! Elements that leave the document through a content replacement stay
//! inspectable (and mutable) for a few more replacements, the way a detached
//! DOM node stays reachable from a handler that still holds it.
//!
//! Per-node edits (classes, inner HTML, disabled) live on the element model;
//! the `content` string keeps the markup exactly as it was injected.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::document::{Document, ElementClass, NodeId};
use crate::api::FieldValue;
use crate::core::binder::Listener;

static FORM: LazyLock<Selector> = LazyLock::new(|| selector("form"));
static SUBMIT: LazyLock<Selector> =
    LazyLock::new(|| selector("button[type=submit], input[type=submit]"));
static CONTROLS: LazyLock<Selector> =
    LazyLock::new(|| selector("input[name], textarea[name], select[name]"));
static OPTION: LazyLock<Selector> = LazyLock::new(|| selector("option"));
static OPTION_SELECTED: LazyLock<Selector> = LazyLock::new(|| selector("option[selected]"));

/// Content generations kept reachable after being replaced. A load replaces
/// twice (skeleton, then fragment).
const RETIRED_GENERATIONS: usize = 4;

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Shell,
    Content,
}

/// A named form control. `value == None` means the control is not submitted
/// (unchecked box, empty file input).
#[derive(Debug, Clone)]
struct Control {
    name: String,
    default: Option<FieldValue>,
    value: Option<FieldValue>,
}

impl Control {
    fn new(name: String, default: Option<FieldValue>) -> Self {
        Self {
            name,
            value: default.clone(),
            default,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct FormModel {
    submit: Option<NodeId>,
    controls: Vec<Control>,
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    region: Region,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    inner_html: String,
    disabled: bool,
    listeners: Vec<Listener>,
    form: Option<FormModel>,
}

impl Element {
    fn is(&self, class: ElementClass) -> bool {
        match class {
            ElementClass::NavLink => self.tag == "a" && self.has_class("ajax-link"),
            ElementClass::AjaxForm => self.tag == "form" && self.has_class("ajax-form"),
            ElementClass::ActionButton => self.attrs.contains_key("data-action"),
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Default)]
pub struct MemoryDocument {
    shell: String,
    content: String,
    attached: BTreeMap<NodeId, Element>,
    retired: VecDeque<BTreeMap<NodeId, Element>>,
    next_id: u64,
}

impl MemoryDocument {
    /// A document with an empty shell and empty content region.
    pub fn new() -> Self {
        Self::default()
    }

    /// A document whose shell (the chrome around the content region) is `markup`.
    pub fn with_shell(markup: &str) -> Self {
        let mut doc = Self::new();
        doc.shell = markup.to_string();
        doc.ingest(markup, Region::Shell);
        doc
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// Number of attached elements (shell and content).
    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    fn allocate(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        self.attached
            .get(&node)
            .or_else(|| self.retired.iter().find_map(|g| g.get(&node)))
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match self.attached.get_mut(&node) {
            Some(el) => Some(el),
            None => self.retired.iter_mut().find_map(|g| g.get_mut(&node)),
        }
    }

    fn form_mut(&mut self, form: NodeId) -> Option<&mut FormModel> {
        self.element_mut(form).and_then(|el| el.form.as_mut())
    }

    /// Parses `markup` and attaches every element in it to `region`.
    fn ingest(&mut self, markup: &str, region: Region) {
        let fragment = Html::parse_fragment(markup);
        let root = fragment.root_element();
        let mut ids = HashMap::new();

        for element in root.descendants().filter_map(ElementRef::wrap) {
            if element.id() == root.id() {
                continue;
            }
            let value = element.value();
            let node = self.allocate();
            ids.insert(element.id(), node);

            let attrs: BTreeMap<String, String> = value
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            self.attached.insert(
                node,
                Element {
                    tag: value.name().to_string(),
                    region,
                    disabled: attrs.contains_key("disabled"),
                    attrs,
                    classes: value.classes().map(str::to_string).collect(),
                    inner_html: element.inner_html(),
                    listeners: Vec::new(),
                    form: None,
                },
            );
        }

        for form in root.select(&FORM) {
            let Some(node) = ids.get(&form.id()).copied() else {
                continue;
            };
            let submit = form
                .select(&SUBMIT)
                .next()
                .and_then(|control| ids.get(&control.id()).copied());
            let controls = form.select(&CONTROLS).filter_map(control_from).collect();
            if let Some(el) = self.attached.get_mut(&node) {
                el.form = Some(FormModel { submit, controls });
            }
        }
    }
}

/// Reads a control's name and markup default, or `None` if it never submits.
fn control_from(el: ElementRef<'_>) -> Option<Control> {
    let value = el.value();
    let name = value.attr("name")?.to_string();
    if value.attr("disabled").is_some() {
        return None;
    }

    match value.name() {
        "input" => {
            let kind = value.attr("type").unwrap_or("text").to_ascii_lowercase();
            match kind.as_str() {
                "submit" | "button" | "reset" | "image" => None,
                "file" => Some(Control::new(name, None)),
                "checkbox" | "radio" => {
                    let default = value
                        .attr("checked")
                        .map(|_| FieldValue::text(value.attr("value").unwrap_or("on")));
                    Some(Control::new(name, default))
                }
                _ => Some(Control::new(
                    name,
                    Some(FieldValue::text(value.attr("value").unwrap_or(""))),
                )),
            }
        }
        "textarea" => Some(Control::new(
            name,
            Some(FieldValue::text(el.text().collect::<String>())),
        )),
        "select" => {
            let option = el
                .select(&OPTION_SELECTED)
                .next()
                .or_else(|| el.select(&OPTION).next());
            let default = option.map(|o| match o.value().attr("value") {
                Some(v) => FieldValue::text(v),
                None => FieldValue::text(o.text().collect::<String>().trim()),
            });
            Some(Control::new(name, default))
        }
        _ => None,
    }
}

impl Document for MemoryDocument {
    fn set_content(&mut self, markup: &str) {
        let (retired, kept): (BTreeMap<_, _>, BTreeMap<_, _>) = std::mem::take(&mut self.attached)
            .into_iter()
            .partition(|(_, el)| el.region == Region::Content);
        self.attached = kept;
        self.retired.push_front(retired);
        self.retired.truncate(RETIRED_GENERATIONS);
        self.content = markup.to_string();
        self.ingest(markup, Region::Content);
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn text_content(&self) -> String {
        let fragment = Html::parse_fragment(&self.content);
        let text: Vec<&str> = fragment.root_element().text().collect();
        text.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn contains(&self, node: NodeId) -> bool {
        self.attached.contains_key(&node)
    }

    fn query(&self, class: ElementClass) -> Vec<NodeId> {
        self.attached
            .iter()
            .filter(|(_, el)| el.is(class))
            .map(|(id, _)| *id)
            .collect()
    }

    fn find_by_id(&self, dom_id: &str) -> Option<NodeId> {
        self.attached
            .iter()
            .find(|(_, el)| el.attrs.get("id").map(String::as_str) == Some(dom_id))
            .map(|(id, _)| *id)
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        let el = self.element(node)?;
        if name == "class" {
            return Some(el.classes.join(" "));
        }
        el.attrs.get(name).cloned()
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|el| el.has_class(class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node)
            && !el.has_class(class)
        {
            el.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            el.classes.retain(|c| c != class);
        }
    }

    fn inner_html(&self, node: NodeId) -> Option<String> {
        self.element(node).map(|el| el.inner_html.clone())
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) {
        if let Some(el) = self.element_mut(node) {
            el.inner_html = html.to_string();
        }
    }

    fn is_disabled(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|el| el.disabled)
    }

    fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if let Some(el) = self.element_mut(node) {
            el.disabled = disabled;
        }
    }

    fn submit_control(&self, form: NodeId) -> Option<NodeId> {
        self.element(form)?.form.as_ref()?.submit
    }

    fn form_fields(&self, form: NodeId) -> Vec<(String, FieldValue)> {
        let Some(model) = self.element(form).and_then(|el| el.form.as_ref()) else {
            return Vec::new();
        };
        model
            .controls
            .iter()
            .filter_map(|c| c.value.clone().map(|v| (c.name.clone(), v)))
            .collect()
    }

    fn set_field(&mut self, form: NodeId, name: &str, value: FieldValue) -> bool {
        let Some(model) = self.form_mut(form) else {
            return false;
        };
        match model.controls.iter_mut().find(|c| c.name == name) {
            Some(control) => {
                control.value = Some(value);
                true
            }
            None => false,
        }
    }

    fn reset_form(&mut self, form: NodeId) {
        if let Some(model) = self.form_mut(form) {
            for control in &mut model.controls {
                control.value = control.default.clone();
            }
        }
    }

    fn add_listener(&mut self, node: NodeId, listener: Listener) {
        if let Some(el) = self.element_mut(node) {
            el.listeners.push(listener);
        }
    }

    fn listeners(&self, node: NodeId) -> Vec<Listener> {
        // Detached nodes receive no events.
        self.attached
            .get(&node)
            .map(|el| el.listeners.clone())
            .unwrap_or_default()
    }
}
