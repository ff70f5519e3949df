//! Transient one-line messages shown in the bottom chrome row.
//!
//! A message persists until it is replaced or cleared; when none is set the
//! status row falls back to the key-hint text of the active input loop.

/// Holder for the current transient message.
#[derive(Debug, Default)]
pub struct StatusLine {
    message: Option<String>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current message.
    pub fn set(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    /// The message to display, or `hint` when none is set.
    pub fn display<'a>(&'a self, hint: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(hint)
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
