//! Modal form input: labeled fields, focus navigation, submit/cancel.
//!
//! [`FormController`] is a key-event state machine. It starts in an editing
//! state with focus on the first editable field and ends in exactly one of
//! two terminal outcomes: [`FormOutcome::Submitted`] (Enter on the exit
//! field) or [`FormOutcome::Cancelled`] (Esc). Field values only become
//! visible to callers on submission, trimmed of surrounding whitespace; a
//! cancelled form leaks nothing. The controller and all field storage are
//! dropped on every exit path.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

/// Upper bound on typed characters per field. Keystrokes beyond this are
/// silently ignored, never reported.
pub const FIELD_CAPACITY: usize = 64;

/// Rendered width of the value cell of editable fields.
const VALUE_CELL_WIDTH: usize = 32;

/// One slot in a form: either an editable input or a static note.
#[derive(Debug, Clone)]
pub struct FormField {
    label: String,
    value: String,
    editable: bool,
    /// Char index of the insertion point; only meaningful when editable.
    cursor: usize,
}

impl FormField {
    /// An editable field, pre-filled with a default value.
    ///
    /// Defaults longer than the capacity are truncated up front so the
    /// capacity invariant holds from the first keystroke.
    pub fn input(label: impl Into<String>, default: &str) -> Self {
        let value: String = default.chars().take(FIELD_CAPACITY).collect();
        let cursor = value.chars().count();
        Self {
            label: label.into(),
            value,
            editable: true,
            cursor,
        }
    }

    /// A static, non-editable line of text. Never receives focus.
    pub fn note(text: impl Into<String>) -> Self {
        Self {
            label: text.into(),
            value: String::new(),
            editable: false,
            cursor: 0,
        }
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn byte_cursor(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn insert(&mut self, ch: char) {
        if self.value.chars().count() >= FIELD_CAPACITY {
            return;
        }
        let at = self.byte_cursor();
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_cursor();
        self.value.remove(at);
    }

    fn delete(&mut self) {
        if self.cursor >= self.value.chars().count() {
            return;
        }
        let at = self.byte_cursor();
        self.value.remove(at);
    }

    fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn cursor_right(&mut self) {
        let len = self.value.chars().count();
        self.cursor = (self.cursor + 1).min(len);
    }
}

/// Terminal result of a form run.
///
/// `Submitted` carries the trimmed values of the editable fields, in field
/// order. A run yields exactly one outcome; never both, never neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Submitted(Vec<String>),
    Cancelled,
}

/// An ordered set of fields driven to completion by key events.
#[derive(Debug)]
pub struct FormController {
    title: String,
    fields: Vec<FormField>,
    /// Always the index of an editable field.
    focus: usize,
    /// Enter on this field submits; on any other it advances focus.
    exit_index: usize,
}

impl FormController {
    /// Builds a controller. `fields` must contain at least one editable
    /// field; focus starts on the first and the last is the exit field.
    pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        let focus = fields.iter().position(FormField::is_editable).unwrap_or(0);
        let exit_index = fields
            .iter()
            .rposition(FormField::is_editable)
            .unwrap_or(focus);
        Self {
            title: title.into(),
            fields,
            focus,
            exit_index,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Feeds one key event. Returns `None` while editing continues, or the
    /// terminal outcome once one is reached.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormOutcome> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Some(FormOutcome::Cancelled),
            KeyCode::Char('c') if ctrl => return Some(FormOutcome::Cancelled),
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Left => self.focused_mut().cursor_left(),
            KeyCode::Right => self.focused_mut().cursor_right(),
            KeyCode::Backspace => self.focused_mut().backspace(),
            KeyCode::Delete => self.focused_mut().delete(),
            KeyCode::Enter => {
                if self.focus == self.exit_index {
                    return Some(self.submit());
                }
                self.focus_next();
            }
            KeyCode::Char(c) if !ctrl => self.focused_mut().insert(c),
            _ => {}
        }
        None
    }

    fn submit(&self) -> FormOutcome {
        let values = self
            .fields
            .iter()
            .filter(|f| f.editable)
            .map(|f| f.value.trim().to_string())
            .collect();
        FormOutcome::Submitted(values)
    }

    fn focused_mut(&mut self) -> &mut FormField {
        &mut self.fields[self.focus]
    }

    fn focus_next(&mut self) {
        let n = self.fields.len();
        for step in 1..=n {
            let candidate = (self.focus + step) % n;
            if self.fields[candidate].editable {
                self.focus = candidate;
                return;
            }
        }
    }

    fn focus_prev(&mut self) {
        let n = self.fields.len();
        for step in 1..=n {
            let candidate = (self.focus + n - step) % n;
            if self.fields[candidate].editable {
                self.focus = candidate;
                return;
            }
        }
    }

    /// Draws the form into `area` and places the hardware cursor inside the
    /// focused value cell.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(Span::styled(
            self.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(title, row(area, 0));

        let label_width = self
            .fields
            .iter()
            .filter(|f| f.editable)
            .map(|f| f.label.width())
            .max()
            .unwrap_or(0);

        for (index, field) in self.fields.iter().enumerate() {
            let y = 2 + index as u16 * 2;
            if y >= area.height {
                break;
            }
            let line_area = row(area, y);

            if !field.editable {
                let note = Paragraph::new(Line::from(Span::styled(
                    field.label.as_str(),
                    Style::default().fg(Color::DarkGray),
                )));
                frame.render_widget(note, line_area);
                continue;
            }

            let focused = index == self.focus;
            let value_style = if focused {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Gray)
            };
            let padded = format!("{:<width$}", field.value, width = VALUE_CELL_WIDTH);
            let line = Line::from(vec![
                Span::raw(format!("{:<label_width$} : ", field.label)),
                Span::styled(padded, value_style),
            ]);
            frame.render_widget(Paragraph::new(line), line_area);

            if focused {
                let prefix: String = field.value.chars().take(field.cursor).collect();
                let x = line_area.x + (label_width + 3 + prefix.width()) as u16;
                frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(1)), line_area.y));
            }
        }
    }
}

fn row(area: Rect, y: u16) -> Rect {
    Rect::new(area.x, area.y + y, area.width, 1)
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(form: &mut FormController, text: &str) {
        for c in text.chars() {
            assert!(form.handle_key(key(KeyCode::Char(c))).is_none());
        }
    }

    fn two_field_form() -> FormController {
        FormController::new(
            "Input the wavelength range",
            vec![
                FormField::input("Minimum wavelength", ""),
                FormField::input("Maximum wavelength", ""),
            ],
        )
    }

    #[test]
    fn focus_starts_on_first_editable() {
        let form = FormController::new(
            "t",
            vec![FormField::note("hint"), FormField::input("Value", "")],
        );
        assert_eq!(form.focus(), 1);
    }

    #[test]
    fn enter_on_non_exit_field_advances() {
        let mut form = two_field_form();
        type_str(&mut form, "100");
        assert!(form.handle_key(key(KeyCode::Enter)).is_none());
        assert_eq!(form.focus(), 1);
    }

    #[test]
    fn enter_on_exit_field_submits_trimmed_values() {
        let mut form = two_field_form();
        type_str(&mut form, "  100 ");
        form.handle_key(key(KeyCode::Tab));
        type_str(&mut form, " 200  ");
        let outcome = form.handle_key(key(KeyCode::Enter)).expect("terminal");
        assert_eq!(
            outcome,
            FormOutcome::Submitted(vec!["100".to_string(), "200".to_string()])
        );
    }

    #[test]
    fn escape_cancels_without_values() {
        let mut form = two_field_form();
        type_str(&mut form, "half-typed");
        let outcome = form.handle_key(key(KeyCode::Esc)).expect("terminal");
        assert_eq!(outcome, FormOutcome::Cancelled);
    }

    #[test]
    fn focus_wraps_both_directions_and_skips_notes() {
        let mut form = FormController::new(
            "t",
            vec![
                FormField::input("a", ""),
                FormField::note("static"),
                FormField::input("b", ""),
            ],
        );
        assert_eq!(form.focus(), 0);
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focus(), 2);
        form.handle_key(key(KeyCode::Down));
        assert_eq!(form.focus(), 0, "wraps forward past the end");
        form.handle_key(key(KeyCode::Up));
        assert_eq!(form.focus(), 2, "wraps backward past the start");
    }

    #[test]
    fn editing_is_cursor_addressed() {
        let mut form = FormController::new("t", vec![FormField::input("v", "ac")]);
        form.handle_key(key(KeyCode::Left));
        type_str(&mut form, "b");
        match form.handle_key(key(KeyCode::Enter)).expect("terminal") {
            FormOutcome::Submitted(values) => assert_eq!(values, ["abc"]),
            FormOutcome::Cancelled => panic!("expected submission"),
        }
    }

    #[test]
    fn backspace_and_delete_edit_around_cursor() {
        let mut form = FormController::new("t", vec![FormField::input("v", "abc")]);
        form.handle_key(key(KeyCode::Backspace)); // "ab"
        form.handle_key(key(KeyCode::Left));
        form.handle_key(key(KeyCode::Delete)); // "a"
        match form.handle_key(key(KeyCode::Enter)).expect("terminal") {
            FormOutcome::Submitted(values) => assert_eq!(values, ["a"]),
            FormOutcome::Cancelled => panic!("expected submission"),
        }
    }

    #[test]
    fn overflow_keystrokes_are_silently_ignored() {
        let mut form = FormController::new("t", vec![FormField::input("v", "")]);
        for _ in 0..(FIELD_CAPACITY + 10) {
            form.handle_key(key(KeyCode::Char('x')));
        }
        match form.handle_key(key(KeyCode::Enter)).expect("terminal") {
            FormOutcome::Submitted(values) => {
                assert_eq!(values[0].chars().count(), FIELD_CAPACITY);
            }
            FormOutcome::Cancelled => panic!("expected submission"),
        }
    }

    #[test]
    fn oversized_default_is_truncated_to_capacity() {
        let long = "y".repeat(FIELD_CAPACITY + 20);
        let field = FormField::input("v", &long);
        assert_eq!(field.value().chars().count(), FIELD_CAPACITY);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut form = two_field_form();
        assert!(form.handle_key(key(KeyCode::F(5))).is_none());
        assert_eq!(form.focus(), 0);
    }

    #[test]
    fn outcome_is_exclusive() {
        // A run ends in exactly one terminal outcome.
        let mut submitted = two_field_form();
        type_str(&mut submitted, "1");
        submitted.handle_key(key(KeyCode::Enter));
        let end = submitted.handle_key(key(KeyCode::Enter)).expect("terminal");
        assert!(matches!(end, FormOutcome::Submitted(_)));

        let mut cancelled = two_field_form();
        let end = cancelled.handle_key(key(KeyCode::Esc)).expect("terminal");
        assert_eq!(end, FormOutcome::Cancelled);
    }
}
