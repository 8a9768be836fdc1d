//! Blocking, alert-style notices shown to the user.

use std::fmt;

use log::{info, warn};

pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

pub trait Notifier: Send + Sync {
    fn alert(&self, notice: Notice);
}

/// Prints notices to stdout and mirrors them to the log.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, notice: Notice) {
        match &notice {
            Notice::Info(text) => info!("Notice: {}", text),
            Notice::Error(text) => warn!("Error notice: {}", text),
        }
        println!("[!] {notice}");
    }
}
