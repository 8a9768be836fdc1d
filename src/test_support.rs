//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::LocatorKind;
use crate::api::{HttpMethod, Transport, TransportError, TransportRequest, TransportResponse};
use crate::core::locator::locator_for;
use crate::core::navigator::{EngineSettings, Navigator};
use crate::core::page::PageId;
use crate::host::{BrowserHistory, MemoryDocument, Notice, Notifier};

pub const INDEX_FRAGMENT: &str = r#"<section>
  <h1>Courses</h1>
  <a class="ajax-link" data-page="course/3" href="/course/3">Rust Basics</a>
  <a class="ajax-link" data-page="wishlist" href="/wishlist">Wishlist</a>
</section>"#;

pub const LOGIN_FRAGMENT: &str = r#"<section>
  <button id="login-tab" class="border-sky-500 text-sky-600">Login</button>
  <button id="signup-tab">Sign up</button>
  <form id="login-form" class="ajax-form" action="/api/login" method="POST">
    <input name="identifier">
    <input type="password" name="password">
    <button type="submit">Log in</button>
  </form>
  <form id="signup-form" class="ajax-form hidden" action="/api/signup" method="POST">
    <input name="name">
    <input type="email" name="email">
    <input type="password" name="password">
    <button type="submit">Create account</button>
  </form>
</section>"#;

pub const COURSE_FRAGMENT: &str = r#"<article>
  <h1>Rust Basics</h1>
  <button class="bg-slate-100 text-slate-700" data-action="/api/wishlist/toggle" data-course-id="3"><i class="far fa-heart"></i> Add to Wishlist</button>
  <a class="ajax-link" data-page="index">Back</a>
</article>"#;

pub const UPLOAD_FRAGMENT: &str = r#"<form class="ajax-form" action="/api/admin/courses" method="post" enctype="multipart/form-data">
  <input name="title">
  <textarea name="description"></textarea>
  <input type="file" name="image">
  <button type="submit">Add course</button>
</form>"#;

// ============================================================================
// StubTransport
// ============================================================================

#[derive(Debug, Clone)]
enum Reply {
    Respond { status: u16, body: String, delay: Option<Duration> },
    Fail,
}

#[derive(Default)]
struct StubInner {
    routes: HashMap<(HttpMethod, String), Reply>,
    log: Mutex<Vec<TransportRequest>>,
}

/// A canned-response transport. Unrouted requests get a 404.
#[derive(Clone, Default)]
pub struct StubTransport {
    inner: Arc<StubInner>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn route(mut self, method: HttpMethod, path: &str, reply: Reply) -> Self {
        // Builder runs before the stub is shared.
        let inner = Arc::get_mut(&mut self.inner).expect("routes are added before cloning");
        inner.routes.insert((method, path.to_string()), reply);
        self
    }

    /// Serves `body` for `GET /api/page/{id}`.
    pub fn page(self, id: &str, body: &str) -> Self {
        self.page_delayed_opt(id, body, None)
    }

    pub fn page_delayed(self, id: &str, body: &str, delay: Duration) -> Self {
        self.page_delayed_opt(id, body, Some(delay))
    }

    fn page_delayed_opt(self, id: &str, body: &str, delay: Option<Duration>) -> Self {
        let path = PageId::from(id).fragment_path();
        self.route(
            HttpMethod::Get,
            &path,
            Reply::Respond {
                status: 200,
                body: body.to_string(),
                delay,
            },
        )
    }

    pub fn respond(self, method: HttpMethod, path: &str, status: u16, body: &str) -> Self {
        self.route(
            method,
            path,
            Reply::Respond {
                status,
                body: body.to_string(),
                delay: None,
            },
        )
    }

    pub fn respond_after(
        self,
        method: HttpMethod,
        path: &str,
        status: u16,
        body: &str,
        delay: Duration,
    ) -> Self {
        self.route(
            method,
            path,
            Reply::Respond {
                status,
                body: body.to_string(),
                delay: Some(delay),
            },
        )
    }

    /// Same as [`respond`](Self::respond); reads better for envelope replies.
    pub fn json(self, method: HttpMethod, path: &str, status: u16, body: &str) -> Self {
        self.respond(method, path, status, body)
    }

    /// Requests to this route fail at the network level.
    pub fn fail(self, method: HttpMethod, path: &str) -> Self {
        self.route(method, path, Reply::Fail)
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.inner.log.lock().unwrap().clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.url == path)
            .count()
    }

    pub fn last_request(&self, method: HttpMethod, path: &str) -> Option<TransportRequest> {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.method == method && r.url == path)
    }
}

#[async_trait]
impl Transport for StubTransport {
    fn name(&self) -> &str {
        "stub"
    }

    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.inner.log.lock().unwrap().push(request.clone());
        let reply = self
            .inner
            .routes
            .get(&(request.method, request.url.clone()))
            .cloned();

        match reply {
            Some(Reply::Respond { status, body, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(TransportResponse::new(status, body))
            }
            Some(Reply::Fail) => Err(TransportError::Network("connection refused".to_string())),
            None => Ok(TransportResponse::new(404, "Page not found")),
        }
    }
}

// ============================================================================
// RecordingNotifier
// ============================================================================

/// Collects notices instead of showing them.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

// ============================================================================
// Navigator fixtures
// ============================================================================

/// A navigator over an empty document with the address bar at `/`.
pub fn test_navigator(transport: StubTransport, kind: LocatorKind) -> (Navigator, RecordingNotifier) {
    test_navigator_at(transport, kind, "/")
}

pub fn test_navigator_at(
    transport: StubTransport,
    kind: LocatorKind,
    url: &str,
) -> (Navigator, RecordingNotifier) {
    let notifier = RecordingNotifier::default();
    let nav = Navigator::new(
        Box::new(MemoryDocument::new()),
        BrowserHistory::new(url),
        Arc::new(transport),
        locator_for(kind),
        Arc::new(notifier.clone()),
        EngineSettings::default(),
    );
    (nav, notifier)
}
