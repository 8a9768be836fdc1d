//! # Form Submitter
//!
//! Forms never navigate natively. The submit listener posts the fields to
//! the form's `action` with its `method`, in one of two encodings picked
//! from `enctype`:
//!
//! ```text
//! multipart/form-data  -> multipart parts, file bytes untouched
//! anything else        -> one JSON object { name: value, ... }
//! ```
//!
//! The reply is a [`ResponseEnvelope`](crate::core::envelope::ResponseEnvelope):
//!
//! ```text
//! success + redirect  -> full page navigation, no soft reload
//! success             -> notice(message), reset form, reload current page
//! anything else       -> notice("Error: " + message), form untouched
//! unreadable / I/O    -> notice("An unexpected error occurred.")
//! ```

use log::{debug, info, warn};
use serde_json::{Map, Value};

use crate::api::{
    FieldValue, HttpMethod, RequestBody, TransportError, TransportRequest, TransportResponse,
};
use crate::core::busy::BusyGuard;
use crate::core::envelope::ResponseEnvelope;
use crate::core::navigator::Navigator;
use crate::host::notice::UNEXPECTED_ERROR;
use crate::host::{NodeId, Notice};

pub const MULTIPART_ENCTYPE: &str = "multipart/form-data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEncoding {
    Json,
    Multipart,
}

impl FormEncoding {
    pub fn detect(enctype: Option<&str>) -> Self {
        match enctype {
            Some(e) if e.trim().eq_ignore_ascii_case(MULTIPART_ENCTYPE) => FormEncoding::Multipart,
            _ => FormEncoding::Json,
        }
    }

    /// Builds the request body. JSON cannot carry file data, so file
    /// controls are left out of a JSON body rather than coerced.
    pub fn encode(self, fields: Vec<(String, FieldValue)>) -> RequestBody {
        match self {
            FormEncoding::Multipart => RequestBody::Multipart(fields),
            FormEncoding::Json => {
                let mut object = Map::new();
                for (name, value) in fields {
                    match value {
                        // Later controls with the same name win.
                        FieldValue::Text(text) => {
                            object.insert(name, Value::String(text));
                        }
                        FieldValue::File(file) => {
                            warn!(
                                "Skipping file '{}' in field '{}': form is not multipart",
                                file.file_name, name
                            );
                        }
                    }
                }
                RequestBody::Json(Value::Object(object))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Full navigation to the given target was requested.
    Redirected(String),
    /// Success without redirect: form reset, page reloaded.
    Completed,
    /// Non-success envelope; the form keeps what the user typed.
    Rejected,
    /// Transport failure or unreadable reply.
    Failed,
    /// The submit control was still busy; nothing was sent.
    Ignored,
}

struct PreparedSubmission {
    request: TransportRequest,
    busy: Option<BusyGuard>,
}

impl Navigator {
    /// Submits `form` asynchronously and handles the envelope.
    pub async fn submit_form(&self, form: NodeId) -> SubmitOutcome {
        let Some(prepared) = self.prepare_submission(form) else {
            return SubmitOutcome::Ignored;
        };
        info!(
            "Submitting form {} to {} {}",
            form, prepared.request.method, prepared.request.url
        );

        let PreparedSubmission { request, busy } = prepared;
        let result = self.transport.send(request).await;
        let outcome = self.settle_submission(form, result);
        drop(busy);

        if outcome == SubmitOutcome::Completed {
            self.reload().await;
        }
        outcome
    }

    fn prepare_submission(&self, form: NodeId) -> Option<PreparedSubmission> {
        let mut shared = self.lock();
        let doc = &shared.document;
        if !doc.contains(form) {
            debug!("Form {} is no longer in the document", form);
            return None;
        }

        let control = doc.submit_control(form);
        if control.is_some_and(|c| doc.is_disabled(c)) {
            debug!("Form {} already in flight", form);
            return None;
        }

        // A form without an action posts back to the current address.
        let url = doc
            .attr(form, "action")
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| shared.history.location().to_string());
        let method = doc
            .attr(form, "method")
            .and_then(|m| HttpMethod::parse(&m))
            .unwrap_or_default();
        let encoding = FormEncoding::detect(doc.attr(form, "enctype").as_deref());
        let body = encoding.encode(doc.form_fields(form));

        let busy = control.map(|control| {
            BusyGuard::engage(
                &self.shared,
                &mut shared,
                control,
                &self.settings.markup.busy_label,
            )
        });
        Some(PreparedSubmission {
            request: TransportRequest { method, url, body },
            busy,
        })
    }

    fn settle_submission(
        &self,
        form: NodeId,
        result: Result<TransportResponse, TransportError>,
    ) -> SubmitOutcome {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("Form submission error: {}", e);
                self.notifier.alert(Notice::Error(UNEXPECTED_ERROR.to_string()));
                return SubmitOutcome::Failed;
            }
        };

        // The envelope is read whatever the status: a 401 on login still
        // carries the message to show.
        let envelope = match ResponseEnvelope::from_slice(&response.body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(
                    "Form reply is not an envelope (HTTP {}): {}",
                    response.status, e
                );
                self.notifier.alert(Notice::Error(UNEXPECTED_ERROR.to_string()));
                return SubmitOutcome::Failed;
            }
        };

        if !envelope.is_success() {
            self.notifier.alert(Notice::Error(envelope.error_text()));
            return SubmitOutcome::Rejected;
        }

        if let Some(target) = envelope.redirect_target() {
            info!("Form {} redirects to {}", form, target);
            let mut shared = self.lock();
            shared.history.assign(target);
            shared.full_navigation = Some(target.to_string());
            return SubmitOutcome::Redirected(target.to_string());
        }

        if let Some(message) = envelope.message() {
            self.notifier.alert(Notice::Info(message.to_string()));
        }
        self.lock().document.reset_form(form);
        SubmitOutcome::Completed
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::LocatorKind;
    use crate::api::FilePart;
    use crate::core::loader::LoadOutcome;
    use crate::core::navigator::DEFAULT_BUSY_LABEL;
    use crate::core::page::PageId;
    use crate::host::ElementClass;
    use crate::test_support::{
        INDEX_FRAGMENT, LOGIN_FRAGMENT, StubTransport, UPLOAD_FRAGMENT, test_navigator,
    };

    fn form_by_id(nav: &Navigator, id: &str) -> NodeId {
        nav.with_document(|doc| doc.find_by_id(id).unwrap())
    }

    #[test]
    fn test_detect_encoding() {
        assert_eq!(FormEncoding::detect(None), FormEncoding::Json);
        assert_eq!(
            FormEncoding::detect(Some("application/x-www-form-urlencoded")),
            FormEncoding::Json
        );
        assert_eq!(
            FormEncoding::detect(Some("Multipart/Form-Data")),
            FormEncoding::Multipart
        );
    }

    #[test]
    fn test_json_encoding_never_carries_files() {
        let fields = vec![
            ("title".to_string(), FieldValue::text("Rust")),
            (
                "image".to_string(),
                FieldValue::File(FilePart {
                    file_name: "a.png".to_string(),
                    content_type: None,
                    bytes: vec![1, 2],
                }),
            ),
        ];
        let body = FormEncoding::Json.encode(fields);
        assert_eq!(body, RequestBody::Json(serde_json::json!({ "title": "Rust" })));
    }

    #[tokio::test]
    async fn test_success_resets_reloads_and_restores_control() {
        let transport = StubTransport::new()
            .page("login", LOGIN_FRAGMENT)
            .json(HttpMethod::Post, "/api/signup", 200, r#"{"status":"success","message":"ok"}"#);
        let (nav, notices) = test_navigator(transport.clone(), LocatorKind::Path);
        nav.load_page(Some("login")).await;

        let form = form_by_id(&nav, "signup-form");
        let (control, label_before) = nav.with_document(|doc| {
            doc.set_field(form, "name", FieldValue::text("Ada"));
            doc.set_field(form, "email", FieldValue::text("ada@example.com"));
            doc.set_field(form, "password", FieldValue::text("pw"));
            let control = doc.submit_control(form).unwrap();
            (control, doc.inner_html(control))
        });

        assert_eq!(nav.submit(form).await, 1);

        let sent = transport.last_request(HttpMethod::Post, "/api/signup").unwrap();
        assert_eq!(
            sent.body,
            RequestBody::Json(serde_json::json!({
                "name": "Ada", "email": "ada@example.com", "password": "pw"
            }))
        );
        nav.with_document(|doc| {
            assert!(doc
                .form_fields(form)
                .iter()
                .all(|(_, v)| v.as_text() == Some("")));
            assert_eq!(doc.inner_html(control), label_before);
            assert!(!doc.is_disabled(control));
        });
        assert_eq!(transport.count(HttpMethod::Get, "/api/page/login"), 2);
        assert_eq!(notices.notices(), vec![Notice::Info("ok".to_string())]);
    }

    #[tokio::test]
    async fn test_redirect_navigates_fully_without_soft_reload() {
        let transport = StubTransport::new().page("login", LOGIN_FRAGMENT).json(
            HttpMethod::Post,
            "/api/login",
            200,
            r#"{"status":"success","redirect":"/login"}"#,
        );
        let (nav, notices) = test_navigator(transport.clone(), LocatorKind::Path);
        nav.load_page(Some("login")).await;

        let outcome = nav.submit_form(form_by_id(&nav, "login-form")).await;
        assert_eq!(outcome, SubmitOutcome::Redirected("/login".to_string()));
        assert_eq!(nav.location(), "/login");
        assert_eq!(nav.full_navigation().as_deref(), Some("/login"));
        assert_eq!(transport.count(HttpMethod::Get, "/api/page/login"), 1);
        assert!(notices.notices().is_empty());
    }

    #[tokio::test]
    async fn test_following_redirect_starts_over_at_target() {
        let transport = StubTransport::new()
            .page("login", LOGIN_FRAGMENT)
            .page("admin/dashboard", "<h1>Dashboard</h1>")
            .json(
                HttpMethod::Post,
                "/api/login",
                200,
                r#"{"status":"success","redirect":"/admin"}"#,
            );
        let (nav, _) = test_navigator(transport.clone(), LocatorKind::Path);
        nav.load_page(Some("login")).await;
        let form = form_by_id(&nav, "login-form");

        let outcome = nav.submit_form(form).await;
        assert_eq!(outcome, SubmitOutcome::Redirected("/admin".to_string()));

        let loaded = nav.follow_full_navigation(None).await;
        assert_eq!(
            loaded,
            Some(LoadOutcome::Rendered(PageId::from("admin/dashboard")))
        );
        assert_eq!(nav.current_page().unwrap().as_str(), "admin/dashboard");
        assert_eq!(nav.location(), "/admin/dashboard");
        assert!(nav.content().contains("Dashboard"));
        nav.with_document(|doc| {
            assert!(!doc.contains(form));
            assert!(doc.listeners(form).is_empty());
        });
        assert_eq!(nav.submit(form).await, 0);
        assert_eq!(nav.full_navigation(), None);
        assert_eq!(nav.follow_full_navigation(None).await, None);
    }

    #[tokio::test]
    async fn test_absolute_redirect_lands_on_index() {
        let transport = StubTransport::new()
            .page("index", INDEX_FRAGMENT)
            .page("login", LOGIN_FRAGMENT)
            .json(
                HttpMethod::Post,
                "/api/login",
                200,
                r#"{"status":"success","redirect":"http://localhost:5000/"}"#,
            );
        let (nav, _) = test_navigator(transport.clone(), LocatorKind::Path);
        nav.load_page(Some("login")).await;

        nav.submit_form(form_by_id(&nav, "login-form")).await;
        let loaded = nav.follow_full_navigation(None).await;
        assert_eq!(loaded, Some(LoadOutcome::Rendered(PageId::from("index"))));
        assert_eq!(nav.current_page().unwrap().as_str(), "index");
        assert_eq!(transport.count(HttpMethod::Get, "/api/page/index"), 1);
        assert!(nav.content().contains("Courses"));
    }

    #[tokio::test]
    async fn test_simultaneous_submits_send_once() {
        let transport = StubTransport::new().page("login", LOGIN_FRAGMENT).respond_after(
            HttpMethod::Post,
            "/api/login",
            200,
            r#"{"status":"success","redirect":"/"}"#,
            Duration::from_millis(10),
        );
        let (nav, _) = test_navigator(transport.clone(), LocatorKind::Path);
        nav.load_page(Some("login")).await;
        let form = form_by_id(&nav, "login-form");

        let (first, second) = tokio::join!(nav.submit_form(form), nav.submit_form(form));
        let redirected = SubmitOutcome::Redirected("/".to_string());
        assert!(
            (first == redirected && second == SubmitOutcome::Ignored)
                || (first == SubmitOutcome::Ignored && second == redirected)
        );
        assert_eq!(transport.count(HttpMethod::Post, "/api/login"), 1);
    }

    #[tokio::test]
    async fn test_rejection_keeps_form_and_skips_reload() {
        let transport = StubTransport::new().page("login", LOGIN_FRAGMENT).json(
            HttpMethod::Post,
            "/api/login",
            401,
            r#"{"status":"error","message":"Invalid credentials"}"#,
        );
        let (nav, notices) = test_navigator(transport.clone(), LocatorKind::Path);
        nav.load_page(Some("login")).await;
        let form = form_by_id(&nav, "login-form");
        nav.with_document(|doc| doc.set_field(form, "identifier", FieldValue::text("ada")));

        let outcome = nav.submit_form(form).await;
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert_eq!(
            notices.notices(),
            vec![Notice::Error("Error: Invalid credentials".to_string())]
        );
        let fields = nav.with_document(|doc| doc.form_fields(form));
        assert_eq!(fields[0].1, FieldValue::text("ada"));
        assert_eq!(transport.count(HttpMethod::Get, "/api/page/login"), 1);
        // A form 401 is an ordinary rejection, not session loss.
        assert_eq!(nav.current_page().unwrap().as_str(), "login");
    }

    #[tokio::test]
    async fn test_unreadable_reply_clears_busy_state() {
        let transport = StubTransport::new()
            .page("login", LOGIN_FRAGMENT)
            .respond(HttpMethod::Post, "/api/login", 500, "<h1>Internal Server Error</h1>");
        let (nav, notices) = test_navigator(transport, LocatorKind::Path);
        nav.load_page(Some("login")).await;
        let form = form_by_id(&nav, "login-form");
        let control = nav.with_document(|doc| doc.submit_control(form).unwrap());

        assert_eq!(nav.submit_form(form).await, SubmitOutcome::Failed);
        assert_eq!(
            notices.notices(),
            vec![Notice::Error(UNEXPECTED_ERROR.to_string())]
        );
        nav.with_document(|doc| {
            assert!(!doc.is_disabled(control));
            assert_ne!(doc.inner_html(control).as_deref(), Some(DEFAULT_BUSY_LABEL));
        });
    }

    #[tokio::test]
    async fn test_transport_failure_clears_busy_state() {
        let transport = StubTransport::new()
            .page("login", LOGIN_FRAGMENT)
            .fail(HttpMethod::Post, "/api/login");
        let (nav, notices) = test_navigator(transport, LocatorKind::Path);
        nav.load_page(Some("login")).await;
        let form = form_by_id(&nav, "login-form");
        let control = nav.with_document(|doc| doc.submit_control(form).unwrap());

        assert_eq!(nav.submit_form(form).await, SubmitOutcome::Failed);
        assert!(notices.notices()[0].is_error());
        assert!(!nav.with_document(|doc| doc.is_disabled(control)));
    }

    #[tokio::test]
    async fn test_busy_control_blocks_second_submission() {
        let transport = StubTransport::new().page("login", LOGIN_FRAGMENT).json(
            HttpMethod::Post,
            "/api/login",
            200,
            r#"{"status":"success","redirect":"/"}"#,
        );
        let (nav, _) = test_navigator(transport.clone(), LocatorKind::Path);
        nav.load_page(Some("login")).await;
        let form = form_by_id(&nav, "login-form");
        nav.with_document(|doc| {
            let control = doc.submit_control(form).unwrap();
            doc.set_disabled(control, true);
        });

        assert_eq!(nav.submit_form(form).await, SubmitOutcome::Ignored);
        assert_eq!(transport.count(HttpMethod::Post, "/api/login"), 0);
    }

    #[tokio::test]
    async fn test_multipart_form_sends_file_bytes() {
        let transport = StubTransport::new()
            .page("admin/courses", UPLOAD_FRAGMENT)
            .json(
                HttpMethod::Post,
                "/api/admin/courses",
                200,
                r#"{"status":"success","message":"Course added successfully"}"#,
            );
        let (nav, _) = test_navigator(transport.clone(), LocatorKind::Path);
        nav.load_page(Some("admin/courses")).await;
        let form = nav.with_document(|doc| doc.query(ElementClass::AjaxForm)[0]);
        let image = FilePart {
            file_name: "cover.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, b'P', b'N', b'G', 0x00, 0xff],
        };
        nav.with_document(|doc| {
            doc.set_field(form, "title", FieldValue::text("Rust 101"));
            doc.set_field(form, "image", FieldValue::File(image.clone()));
        });

        assert_eq!(nav.submit_form(form).await, SubmitOutcome::Completed);
        let sent = transport
            .last_request(HttpMethod::Post, "/api/admin/courses")
            .unwrap();
        match sent.body {
            RequestBody::Multipart(parts) => {
                assert!(parts.contains(&("image".to_string(), FieldValue::File(image))));
                assert!(parts.contains(&("title".to_string(), FieldValue::text("Rust 101"))));
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_without_message_still_resets_and_reloads() {
        let transport = StubTransport::new()
            .page("index", INDEX_FRAGMENT)
            .page("login", LOGIN_FRAGMENT)
            .json(HttpMethod::Post, "/api/signup", 200, r#"{"status":"success"}"#);
        let (nav, notices) = test_navigator(transport.clone(), LocatorKind::Path);
        nav.load_page(Some("login")).await;

        let outcome = nav.submit_form(form_by_id(&nav, "signup-form")).await;
        assert_eq!(outcome, SubmitOutcome::Completed);
        assert!(notices.notices().is_empty());
        assert_eq!(transport.count(HttpMethod::Get, "/api/page/login"), 2);
    }
}
