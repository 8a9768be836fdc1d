//! # Tab Panels
//!
//! Two mutually exclusive panels (e.g. login and signup forms) switched by
//! two tab buttons. Switching is local and synchronous: no request, nothing
//! persisted, and switching back restores the first arrangement exactly.

use serde::{Deserialize, Serialize};

use crate::host::{Document, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabSide {
    Primary,
    Secondary,
}

/// DOM ids of one tab button and the panel it reveals.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TabSpec {
    pub tab: String,
    pub panel: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TabPair {
    pub primary: TabSpec,
    pub secondary: TabSpec,
    /// Classes marking the active tab.
    pub active_classes: Vec<String>,
    /// Class hiding the inactive panel.
    pub hidden_class: String,
}

impl Default for TabPair {
    fn default() -> Self {
        Self {
            primary: TabSpec {
                tab: "login-tab".to_string(),
                panel: "login-form".to_string(),
            },
            secondary: TabSpec {
                tab: "signup-tab".to_string(),
                panel: "signup-form".to_string(),
            },
            active_classes: vec!["border-sky-500".to_string(), "text-sky-600".to_string()],
            hidden_class: "hidden".to_string(),
        }
    }
}

impl TabPair {
    fn spec(&self, side: TabSide) -> (&TabSpec, &TabSpec) {
        match side {
            TabSide::Primary => (&self.primary, &self.secondary),
            TabSide::Secondary => (&self.secondary, &self.primary),
        }
    }

    /// Both tab buttons, if both are in the document.
    pub fn locate(&self, doc: &dyn Document) -> Option<(NodeId, NodeId)> {
        let primary = doc.find_by_id(&self.primary.tab)?;
        let secondary = doc.find_by_id(&self.secondary.tab)?;
        Some((primary, secondary))
    }

    /// Shows `side`'s panel, hides the other, and moves the active styling.
    /// Missing panels are skipped; returns false if either tab is gone.
    pub fn activate(&self, doc: &mut dyn Document, side: TabSide) -> bool {
        let (this, other) = self.spec(side);
        let (Some(this_tab), Some(other_tab)) = (doc.find_by_id(&this.tab), doc.find_by_id(&other.tab))
        else {
            return false;
        };

        if let Some(panel) = doc.find_by_id(&other.panel) {
            doc.add_class(panel, &self.hidden_class);
        }
        if let Some(panel) = doc.find_by_id(&this.panel) {
            doc.remove_class(panel, &self.hidden_class);
        }
        for class in &self.active_classes {
            doc.remove_class(other_tab, class);
            doc.add_class(this_tab, class);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryDocument;

    const TABS: &str = r#"
        <button id="login-tab" class="border-sky-500 text-sky-600">Login</button>
        <button id="signup-tab">Sign up</button>
        <form id="login-form" class="ajax-form"></form>
        <form id="signup-form" class="ajax-form hidden"></form>"#;

    fn doc() -> MemoryDocument {
        let mut doc = MemoryDocument::new();
        doc.set_content(TABS);
        doc
    }

    fn id(doc: &MemoryDocument, dom_id: &str) -> NodeId {
        doc.find_by_id(dom_id).unwrap()
    }

    #[test]
    fn test_activate_secondary_swaps_panels_and_styles() {
        let mut doc = doc();
        let tabs = TabPair::default();
        assert!(tabs.activate(&mut doc, TabSide::Secondary));

        assert!(doc.has_class(id(&doc, "login-form"), "hidden"));
        assert!(!doc.has_class(id(&doc, "signup-form"), "hidden"));
        assert!(doc.has_class(id(&doc, "signup-tab"), "text-sky-600"));
        assert!(!doc.has_class(id(&doc, "login-tab"), "border-sky-500"));
    }

    #[test]
    fn test_switching_back_restores_original_arrangement() {
        let mut doc = doc();
        let before = (
            doc.attr(id(&doc, "login-tab"), "class"),
            doc.attr(id(&doc, "signup-form"), "class"),
        );
        let tabs = TabPair::default();
        tabs.activate(&mut doc, TabSide::Secondary);
        tabs.activate(&mut doc, TabSide::Primary);
        let after = (
            doc.attr(id(&doc, "login-tab"), "class"),
            doc.attr(id(&doc, "signup-form"), "class"),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn test_locate_requires_both_tabs() {
        let mut doc = MemoryDocument::new();
        doc.set_content(r#"<button id="login-tab">Login</button>"#);
        assert!(TabPair::default().locate(&doc).is_none());
        assert!(!TabPair::default().activate(&mut doc, TabSide::Primary));
    }
}
