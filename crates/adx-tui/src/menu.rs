//! Indexed menu with a selection cursor and wraparound navigation.
//!
//! Unlike the pager, menu navigation is cyclic: moving past either end
//! wraps to the other. Activation yields the choice index; Esc (or `q`)
//! yields the quit sentinel, which never collides with a real index.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// One selectable row.
#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub description: String,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }
}

/// Result of one menu session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// The highlighted choice was activated.
    Choice(usize),
    /// The quit sentinel: no choice activated.
    Quit,
}

/// An ordered list of choices plus the current selection.
#[derive(Debug)]
pub struct Menu {
    title: String,
    items: Vec<MenuItem>,
    selected: usize,
}

impl Menu {
    /// `selected` supports "remember last selection": it is clamped into
    /// range rather than trusted.
    pub fn new(title: impl Into<String>, items: Vec<MenuItem>, selected: usize) -> Self {
        let selected = selected.min(items.len().saturating_sub(1));
        Self {
            title: title.into(),
            items,
            selected,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + self.items.len() - 1) % self.items.len();
    }

    /// Feeds one key event. `None` means the menu session continues.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<MenuOutcome> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(MenuOutcome::Quit),
            KeyCode::Enter => {
                if self.items.is_empty() {
                    Some(MenuOutcome::Quit)
                } else {
                    Some(MenuOutcome::Choice(self.selected))
                }
            }
            KeyCode::Down => {
                self.select_next();
                None
            }
            KeyCode::Up => {
                self.select_prev();
                None
            }
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(Span::styled(
            self.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(title, Rect::new(area.x, area.y, area.width, 1));

        let label_width = self
            .items
            .iter()
            .map(|i| i.label.chars().count())
            .max()
            .unwrap_or(0);

        for (index, item) in self.items.iter().enumerate() {
            let y = area.y + 2 + index as u16;
            if y >= area.bottom() {
                break;
            }
            let highlighted = index == self.selected;
            let marker = if highlighted { "> " } else { "  " };
            let row_style = if highlighted {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            let line = Line::from(vec![
                Span::styled(format!("{marker}{:<label_width$}", item.label), row_style),
                Span::styled(
                    format!("  {}", item.description),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            frame.render_widget(
                Paragraph::new(line),
                Rect::new(area.x, y, area.width, 1),
            );
        }
    }
}
