//! # Page Identifiers
//!
//! A page id names both a fragment endpoint (`/api/page/{id}`) and the
//! browser-visible location the locator derives from it. There is no
//! client-side registry: any non-empty string is a candidate, and unknown
//! ids surface as fetch failures.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: &str = "index";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    /// Wraps `raw` as-is, falling back to `index` when it is empty.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.is_empty() {
            Self::default()
        } else {
            Self(raw)
        }
    }

    /// The loader's defaulting rule: missing or empty ids mean `index`.
    pub fn or_default(raw: Option<&str>) -> Self {
        raw.map(PageId::new).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rooted path of the fragment endpoint for this page.
    pub fn fragment_path(&self) -> String {
        format!("/api/page/{}", self.0)
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self(DEFAULT_PAGE.to_string())
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(raw: &str) -> Self {
        PageId::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_empty_default_to_index() {
        assert_eq!(PageId::or_default(None).as_str(), "index");
        assert_eq!(PageId::or_default(Some("")).as_str(), "index");
        assert_eq!(PageId::or_default(Some("wishlist")).as_str(), "wishlist");
    }

    #[test]
    fn test_fragment_path_keeps_nested_ids() {
        assert_eq!(PageId::from("course/3").fragment_path(), "/api/page/course/3");
        assert_eq!(PageId::from("admin/users").fragment_path(), "/api/page/admin/users");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&PageId::from("mycourses")).unwrap();
        assert_eq!(json, "\"mycourses\"");
    }
}
