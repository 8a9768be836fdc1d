//! # Response Envelope
//!
//! Every mutating endpoint answers with the same JSON shape:
//!
//! ```text
//! { "status": "success" | ..., "message"?: str, "redirect"?: str, "added"?: bool }
//! ```
//!
//! The engine reads nothing beyond these fields. Page data lives in fragment
//! markup; only toggle actions carry the extra `added` flag.

use serde::{Deserialize, Serialize};

pub const SUCCESS_STATUS: &str = "success";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseEnvelope {
    /// Missing status is treated as a failure.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub added: Option<bool>,
}

impl ResponseEnvelope {
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }

    /// The redirect target, ignoring empty strings.
    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect.as_deref().filter(|r| !r.is_empty())
    }

    /// The message, ignoring empty strings.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }

    /// Text for an error notice built from this envelope.
    pub fn error_text(&self) -> String {
        format!("Error: {}", self.message().unwrap_or("request failed"))
    }
}
