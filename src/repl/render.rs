//! Plain-text rendering of the document for the terminal.

use scraper::Html;

use crate::core::binder::Listener;
use crate::core::tabs::TabPair;
use crate::host::{Document, ElementClass, NodeId};

pub const DEFAULT_WIDTH: usize = 80;

/// Wraps `text` to `width` columns.
pub fn wrap(text: &str, width: usize) -> String {
    textwrap::fill(text, textwrap::Options::new(width.max(20)))
}

/// Visible text of an element's inner markup.
fn label(doc: &dyn Document, node: NodeId) -> String {
    let inner = doc.inner_html(node).unwrap_or_default();
    let fragment = Html::parse_fragment(&inner);
    let text: Vec<&str> = fragment.root_element().text().collect();
    text.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn describe(doc: &dyn Document, node: NodeId, class: ElementClass) -> String {
    let detail = match class {
        ElementClass::NavLink => format!("link -> {}", doc.attr(node, "data-page").unwrap_or_default()),
        ElementClass::AjaxForm => {
            let method = doc.attr(node, "method").unwrap_or_else(|| "POST".to_string());
            let action = doc.attr(node, "action").unwrap_or_default();
            let fields: Vec<String> = doc.form_fields(node).into_iter().map(|(n, _)| n).collect();
            format!(
                "form {} {} [{}]",
                method.to_ascii_uppercase(),
                action,
                fields.join(", ")
            )
        }
        ElementClass::ActionButton => {
            format!("action -> {}", doc.attr(node, "data-action").unwrap_or_default())
        }
    };

    let mut line = format!("{:>5}  {}", node.to_string(), detail);
    let text = label(doc, node);
    if !text.is_empty() && class != ElementClass::AjaxForm {
        line.push_str(&format!("  \"{text}\""));
    }
    if doc.is_disabled(node) {
        line.push_str("  (disabled)");
    }
    if doc.has_class(node, "hidden") {
        line.push_str("  (hidden)");
    }
    line
}

/// One line per interactive element that currently has a listener.
pub fn list_interactive(doc: &dyn Document, tabs: &TabPair) -> Vec<String> {
    let mut lines = Vec::new();
    for class in ElementClass::ALL {
        for node in doc.query(class) {
            if !doc.listeners(node).is_empty() {
                lines.push(describe(doc, node, class));
            }
        }
    }
    if let Some((primary, secondary)) = tabs.locate(doc) {
        for node in [primary, secondary] {
            if doc.listeners(node).iter().any(|l| matches!(l, Listener::Tab(_))) {
                lines.push(format!("{:>5}  tab  \"{}\"", node.to_string(), label(doc, node)));
            }
        }
    }
    lines
}
