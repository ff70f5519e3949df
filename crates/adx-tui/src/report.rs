//! The growable line buffer screens render into.
//!
//! A [`Report`] is an append-only sequence of owned lines. Screens fill one
//! report per visit, hand it to the pager, and drop it on the way out; the
//! pager only ever reads. Appends go through `try_reserve` so an allocation
//! failure surfaces as an error instead of an abort, and propagates to the
//! top level where the terminal is restored before exiting.

use anyhow::{Context, Result};
use tracing::trace;

/// Character used by [`Report::push_separator`].
const SEPARATOR_CHAR: char = '-';

/// An append-only, dynamically growing ordered sequence of text lines.
#[derive(Debug, Default)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one fully materialized line.
    ///
    /// The text must not contain embedded newlines; callers append one line
    /// per call. Every appended line is mirrored to the trace log.
    pub fn push_line(&mut self, text: impl Into<String>) -> Result<()> {
        let line = text.into();
        self.lines
            .try_reserve(1)
            .context("Display buffer cannot grow")?;
        trace!(target: "adx::report", "{line}");
        self.lines.push(line);
        Ok(())
    }

    /// Appends a horizontal rule of `width` dashes.
    pub fn push_separator(&mut self, width: usize) -> Result<()> {
        let mut rule = String::new();
        rule.try_reserve_exact(width)
            .context("Display buffer cannot grow")?;
        for _ in 0..width {
            rule.push(SEPARATOR_CHAR);
        }
        self.push_line(rule)
    }

    /// Drops every line and releases the backing storage.
    ///
    /// Idempotent: clearing an empty report is a no-op.
    pub fn clear(&mut self) {
        self.lines = Vec::new();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.lines.iter()
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order_and_count() {
        let mut report = Report::new();
        for i in 0..5 {
            report.push_line(format!("row {i}")).expect("push");
        }
        assert_eq!(report.len(), 5);
        let collected: Vec<&str> = report.iter().map(String::as_str).collect();
        assert_eq!(collected, ["row 0", "row 1", "row 2", "row 3", "row 4"]);
    }

    #[test]
    fn clear_empties_and_buffer_is_reusable() {
        let mut report = Report::new();
        report.push_line("before").expect("push");
        report.clear();
        assert_eq!(report.len(), 0);
        assert!(report.is_empty());

        report.push_line("after").expect("push");
        assert_eq!(report.lines(), ["after"]);
    }

    #[test]
    fn clear_on_empty_is_a_noop() {
        let mut report = Report::new();
        report.clear();
        report.clear();
        assert!(report.is_empty());
    }

    #[test]
    fn separator_has_exact_width() {
        let mut report = Report::new();
        report.push_separator(40).expect("push");
        assert_eq!(report.lines()[0].len(), 40);
        assert!(report.lines()[0].chars().all(|c| c == '-'));
    }

    #[test]
    fn zero_width_separator_is_an_empty_line() {
        let mut report = Report::new();
        report.push_separator(0).expect("push");
        assert_eq!(report.len(), 1);
        assert!(report.lines()[0].is_empty());
    }
}
