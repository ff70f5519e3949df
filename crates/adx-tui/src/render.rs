//! Shared frame chrome: title row, bordered content area, status row.
//!
//! Every input loop draws the same surrounding chrome and differs only in
//! what it puts inside the content area, so the layout lives here.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthChar;

/// Inputs for one chrome draw.
pub struct Chrome<'a> {
    /// Left side of the title row, drawn bold.
    pub title: &'a str,
    /// Right side of the title row, drawn dim (catalog summary).
    pub context: &'a str,
    /// Bottom status row content (message or key hints).
    pub status: &'a str,
}

/// Draws the chrome and returns the inner content area.
pub fn draw_chrome(frame: &mut Frame, chrome: &Chrome) -> Rect {
    let [title_row, body, status_row] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let title = Line::from(vec![
        Span::styled("adx", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" | "),
        Span::styled(chrome.title, Style::default().add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(title), title_row);

    if !chrome.context.is_empty() {
        let context = Line::from(Span::styled(
            chrome.context,
            Style::default().fg(Color::DarkGray),
        ))
        .right_aligned();
        frame.render_widget(Paragraph::new(context), title_row);
    }

    let block = Block::bordered();
    let inner = block.inner(body);
    frame.render_widget(block, body);

    let status = Line::from(Span::styled(
        truncate_to_width(chrome.status, status_row.width as usize),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(status), status_row);

    inner
}

/// Cuts `text` at the last char boundary whose accumulated display width
/// still fits in `width` terminal cells.
pub fn truncate_to_width(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (offset, ch) in text.char_indices() {
        used += ch.width().unwrap_or(0);
        if used > width {
            return &text[..offset];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate_to_width("abcdef", 4), "abcd");
        assert_eq!(truncate_to_width("abc", 4), "abc");
        assert_eq!(truncate_to_width("", 4), "");
    }

    #[test]
    fn truncate_counts_wide_chars_as_two_cells() {
        // Each CJK char occupies two cells.
        assert_eq!(truncate_to_width("日本語", 4), "日本");
        assert_eq!(truncate_to_width("a日本", 2), "a");
    }

    #[test]
    fn truncate_to_zero_is_empty() {
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
