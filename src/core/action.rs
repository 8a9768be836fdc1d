//! # Optimistic Actions
//!
//! Buttons carrying `data-action` fire a one-shot `POST` and flip their own
//! look to match the server's answer. The wishlist toggle is the one user:
//!
//! ```text
//! click
//!   ├─ busy label, disabled
//!   ├─ POST {data-action}  {"course_id": <data-course-id>}
//!   ├─ busy cleared                      (always, before anything below)
//!   ├─ 401                -> load login page, nothing else
//!   ├─ success + added    -> swap classes and icon+label together
//!   └─ anything else      -> error notice, look unchanged
//! ```

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{TransportError, TransportRequest, TransportResponse};
use crate::core::busy::BusyGuard;
use crate::core::envelope::ResponseEnvelope;
use crate::core::navigator::Navigator;
use crate::host::notice::UNEXPECTED_ERROR;
use crate::host::{Document, NodeId, Notice};

pub const UNAUTHORIZED: u16 = 401;

/// One look of a toggle button. Classes and icon+label always travel
/// together so the button never shows half of each state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VisualState {
    pub classes: Vec<String>,
    pub icon: String,
    pub label: String,
}

impl VisualState {
    fn markup(&self) -> String {
        format!(r#"<i class="{}"></i> {}"#, self.icon, self.label)
    }
}

/// "In collection" and "not in collection" looks of a toggle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ToggleVisual {
    pub on: VisualState,
    pub off: VisualState,
}

impl Default for ToggleVisual {
    fn default() -> Self {
        Self {
            on: VisualState {
                classes: vec!["bg-rose-500".to_string(), "text-white".to_string()],
                icon: "fas fa-heart".to_string(),
                label: "In Wishlist".to_string(),
            },
            off: VisualState {
                classes: vec!["bg-slate-100".to_string(), "text-slate-700".to_string()],
                icon: "far fa-heart".to_string(),
                label: "Add to Wishlist".to_string(),
            },
        }
    }
}

impl ToggleVisual {
    pub fn state(&self, added: bool) -> &VisualState {
        if added { &self.on } else { &self.off }
    }

    /// Puts `node` into the `added` look.
    pub fn apply(&self, doc: &mut dyn Document, node: NodeId, added: bool) {
        for class in self.on.classes.iter().chain(&self.off.classes) {
            doc.remove_class(node, class);
        }
        let target = self.state(added);
        for class in &target.classes {
            doc.add_class(node, class);
        }
        doc.set_inner_html(node, &target.markup());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Success; the control now shows the `added` look.
    Toggled(bool),
    /// Success without an `added` flag; look unchanged.
    Acknowledged,
    /// 401: the login page was loaded instead.
    SessionExpired,
    /// Non-success envelope, notice shown.
    Rejected,
    /// Transport failure or unreadable reply, notice shown.
    Failed,
    /// Control busy, detached, or without a target; nothing sent.
    Ignored,
}

/// `data-course-id` as sent on the wire: integers as numbers, anything
/// else as a string, missing as `null`.
pub fn course_id_value(raw: Option<&str>) -> Value {
    match raw.map(str::trim) {
        None | Some("") => Value::Null,
        Some(id) => match id.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(id.to_string()),
        },
    }
}

impl Navigator {
    /// Runs the optimistic action bound to `node`.
    pub async fn trigger_action(&self, node: NodeId) -> ActionOutcome {
        let (request, busy) = {
            let mut shared = self.lock();
            let doc = &shared.document;
            if !doc.contains(node) || doc.is_disabled(node) {
                debug!("Action control {} unavailable", node);
                return ActionOutcome::Ignored;
            }
            let Some(target) = doc.attr(node, "data-action").filter(|a| !a.is_empty()) else {
                warn!("Action control {} has no target", node);
                return ActionOutcome::Ignored;
            };
            let course_id = course_id_value(doc.attr(node, "data-course-id").as_deref());
            let request =
                TransportRequest::post_json(target, serde_json::json!({ "course_id": course_id }));
            let busy = BusyGuard::engage(
                &self.shared,
                &mut shared,
                node,
                &self.settings.markup.busy_label,
            );
            (request, busy)
        };
        info!("Action {} -> {}", node, request.url);

        let result = self.transport.send(request).await;
        drop(busy);

        self.settle_action(node, result).await
    }

    async fn settle_action(
        &self,
        node: NodeId,
        result: Result<TransportResponse, TransportError>,
    ) -> ActionOutcome {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("Action request error: {}", e);
                self.notifier.alert(Notice::Error(UNEXPECTED_ERROR.to_string()));
                return ActionOutcome::Failed;
            }
        };

        if response.status == UNAUTHORIZED {
            info!("Session expired, loading {}", self.settings.login_page);
            self.load_page(Some(self.settings.login_page.as_str())).await;
            return ActionOutcome::SessionExpired;
        }

        let envelope = match ResponseEnvelope::from_slice(&response.body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(
                    "Action reply is not an envelope (HTTP {}): {}",
                    response.status, e
                );
                self.notifier.alert(Notice::Error(UNEXPECTED_ERROR.to_string()));
                return ActionOutcome::Failed;
            }
        };

        if !envelope.is_success() {
            self.notifier.alert(Notice::Error(envelope.error_text()));
            return ActionOutcome::Rejected;
        }

        match envelope.added {
            Some(added) => {
                let mut shared = self.lock();
                self.settings
                    .toggle
                    .apply(shared.document.as_mut(), node, added);
                info!(
                    "Action {} toggled to {}: {}",
                    node,
                    added,
                    envelope.message().unwrap_or("-")
                );
                ActionOutcome::Toggled(added)
            }
            None => {
                debug!("Action {} acknowledged without state", node);
                ActionOutcome::Acknowledged
            }
        }
    }
}
