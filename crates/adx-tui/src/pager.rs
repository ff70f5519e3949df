//! Scrollable pagination over a [`Report`](crate::report::Report).
//!
//! [`ScrollState`] is the pure state machine: it owns the offset arithmetic
//! and the clamp invariant. The blocking input loop that drives it lives in
//! [`Session::page`](crate::session::Session::page); rendering only ever
//! touches the visible slice, so a redraw is O(viewport rows).

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

/// A scroll navigation command, as mapped from a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollCommand {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    Home,
    End,
}

/// Maps a key event to a scroll command, if it is one.
pub fn scroll_command(key: KeyEvent) -> Option<ScrollCommand> {
    match key.code {
        KeyCode::Up => Some(ScrollCommand::LineUp),
        KeyCode::Down => Some(ScrollCommand::LineDown),
        KeyCode::PageUp => Some(ScrollCommand::PageUp),
        KeyCode::PageDown => Some(ScrollCommand::PageDown),
        KeyCode::Home => Some(ScrollCommand::Home),
        KeyCode::End => Some(ScrollCommand::End),
        _ => None,
    }
}

/// Scroll position of one pager session.
///
/// Invariant: `top_line <= max_top()` after every mutation. Over-scroll in
/// either direction snaps to the nearest valid edge; it never wraps and
/// never errors. All arithmetic saturates, so a viewport taller than the
/// content clamps to zero rather than going negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    top_line: usize,
    viewport_rows: usize,
    total_lines: usize,
}

impl ScrollState {
    pub fn new(total_lines: usize, viewport_rows: usize) -> Self {
        Self {
            top_line: 0,
            viewport_rows,
            total_lines,
        }
    }

    pub fn top_line(&self) -> usize {
        self.top_line
    }

    pub fn viewport_rows(&self) -> usize {
        self.viewport_rows
    }

    /// Largest valid `top_line`.
    pub fn max_top(&self) -> usize {
        self.total_lines.saturating_sub(self.viewport_rows)
    }

    /// True when the content overflows the viewport.
    pub fn can_scroll(&self) -> bool {
        self.total_lines > self.viewport_rows
    }

    /// Re-clamps after a terminal resize.
    pub fn set_viewport_rows(&mut self, viewport_rows: usize) {
        self.viewport_rows = viewport_rows;
        self.clamp();
    }

    /// Applies one navigation command and restores the clamp invariant.
    pub fn apply(&mut self, command: ScrollCommand) {
        match command {
            ScrollCommand::LineUp => self.top_line = self.top_line.saturating_sub(1),
            ScrollCommand::LineDown => self.top_line = self.top_line.saturating_add(1),
            ScrollCommand::PageUp => {
                self.top_line = self.top_line.saturating_sub(self.viewport_rows);
            }
            ScrollCommand::PageDown => {
                self.top_line = self.top_line.saturating_add(self.viewport_rows);
            }
            ScrollCommand::Home => self.top_line = 0,
            ScrollCommand::End => self.top_line = self.max_top(),
        }
        self.clamp();
    }

    /// The visible slice bounds: `[top_line, top_line + viewport_rows)`,
    /// capped at the content length.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let end = self
            .top_line
            .saturating_add(self.viewport_rows)
            .min(self.total_lines);
        self.top_line..end
    }

    fn clamp(&mut self) {
        self.top_line = self.top_line.min(self.max_top());
    }
}

/// A vertical scrollbar with a fixed-size thumb.
///
/// Drawn on the right edge of its area; hidden entirely when the content
/// fits the viewport. The thumb length is computed once from the ratio of
/// viewport to content and the position interpolates linearly, so the thumb
/// touches the bottom exactly at max scroll.
#[derive(Debug, Clone, Copy)]
pub struct Scrollbar {
    state: ScrollState,
}

impl Scrollbar {
    pub fn new(state: ScrollState) -> Self {
        Self { state }
    }
}

impl Widget for Scrollbar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.state.can_scroll() || area.height == 0 {
            return;
        }

        let track = area.height as usize;
        let total = self.state.total_lines.max(1);
        let thumb = (track * self.state.viewport_rows / total).clamp(1, track);

        let max_top = self.state.max_top().max(1);
        let slots = track - thumb;
        let thumb_start = self.state.top_line() * slots / max_top;

        let x = area.x + area.width.saturating_sub(1);
        for (row, y) in (area.y..area.y + area.height).enumerate() {
            let glyph = if (thumb_start..thumb_start + thumb).contains(&row) {
                "█"
            } else {
                "│"
            };
            buf.set_string(x, y, glyph, Style::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invariant_holds(state: &ScrollState) -> bool {
        state.top_line() <= state.max_top()
    }

    #[test]
    fn starts_at_top() {
        let state = ScrollState::new(100, 20);
        assert_eq!(state.top_line(), 0);
        assert!(state.can_scroll());
    }

    #[test]
    fn page_down_stabilizes_at_max_top() {
        let mut state = ScrollState::new(100, 20);
        for _ in 0..20 {
            state.apply(ScrollCommand::PageDown);
        }
        assert_eq!(state.top_line(), 80);

        // Further page-downs are no-ops.
        state.apply(ScrollCommand::PageDown);
        assert_eq!(state.top_line(), 80);
    }

    #[test]
    fn line_up_at_top_is_a_noop() {
        let mut state = ScrollState::new(100, 20);
        state.apply(ScrollCommand::LineUp);
        assert_eq!(state.top_line(), 0);
    }

    #[test]
    fn home_and_end_hit_the_edges() {
        let mut state = ScrollState::new(100, 20);
        state.apply(ScrollCommand::End);
        assert_eq!(state.top_line(), 80);
        state.apply(ScrollCommand::Home);
        assert_eq!(state.top_line(), 0);
    }

    #[test]
    fn end_on_short_content_clamps_to_zero() {
        // Fewer lines than rows: max_top saturates to 0 instead of going
        // negative.
        let mut state = ScrollState::new(5, 20);
        state.apply(ScrollCommand::End);
        assert_eq!(state.top_line(), 0);
        assert!(!state.can_scroll());
    }

    #[test]
    fn clamp_invariant_survives_arbitrary_sequences() {
        let commands = [
            ScrollCommand::PageDown,
            ScrollCommand::End,
            ScrollCommand::LineDown,
            ScrollCommand::PageUp,
            ScrollCommand::LineUp,
            ScrollCommand::Home,
            ScrollCommand::PageDown,
            ScrollCommand::LineDown,
            ScrollCommand::End,
            ScrollCommand::PageUp,
        ];
        for total in [0usize, 1, 19, 20, 21, 100, 1000] {
            let mut state = ScrollState::new(total, 20);
            for command in commands {
                state.apply(command);
                assert!(invariant_holds(&state), "total={total} cmd={command:?}");
            }
        }
    }

    #[test]
    fn resize_reclamps() {
        let mut state = ScrollState::new(100, 20);
        state.apply(ScrollCommand::End);
        assert_eq!(state.top_line(), 80);

        state.set_viewport_rows(50);
        assert_eq!(state.top_line(), 50);
        assert!(invariant_holds(&state));
    }

    #[test]
    fn visible_range_is_viewport_sized() {
        let mut state = ScrollState::new(100, 20);
        assert_eq!(state.visible_range(), 0..20);
        state.apply(ScrollCommand::PageDown);
        assert_eq!(state.visible_range(), 20..40);
        state.apply(ScrollCommand::End);
        assert_eq!(state.visible_range(), 80..100);

        let short = ScrollState::new(5, 20);
        assert_eq!(short.visible_range(), 0..5);
    }

    #[test]
    fn key_mapping_covers_navigation_keys() {
        use crossterm::event::KeyModifiers;
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(scroll_command(key(KeyCode::Up)), Some(ScrollCommand::LineUp));
        assert_eq!(scroll_command(key(KeyCode::End)), Some(ScrollCommand::End));
        assert_eq!(scroll_command(key(KeyCode::Char('x'))), None);
    }
}
