//! The browser session: terminal ownership and the blocking input loops.
//!
//! Exactly one loop (pager, form, or menu) runs at a time; each blocks on
//! `crossterm::event::read()` until it reaches its terminal condition, and
//! nesting is purely call-stack based. The session also carries the state
//! that outlives individual screens: the loaded catalog, the per-query
//! default strings, menu selection memory, and the status line.

use std::io::Stdout;
use std::path::PathBuf;

use adx_core::Dataset;
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tracing::debug;

use crate::form::{FormController, FormOutcome};
use crate::menu::{Menu, MenuItem, MenuOutcome};
use crate::pager::{ScrollState, Scrollbar, scroll_command};
use crate::render::{Chrome, draw_chrome, truncate_to_width};
use crate::report::Report;
use crate::screens;
use crate::statusline::StatusLine;

const MENU_HINT: &str = "UP/DOWN select | ENTER activate | q back";
const FORM_HINT: &str = "TAB/UP/DOWN move | ENTER submit | ESC cancel";
const PAGER_SCROLL_HINT: &str = "UP/DOWN PGUP/PGDN HOME/END scroll | q back";
const PAGER_HINT: &str = "q back";

/// Raw strings last submitted for each query, reused as pre-fill on the
/// next prompt. Session-lifetime only; never persisted.
#[derive(Debug, Default)]
pub struct QueryDefaults {
    pub atomic_number: String,
    pub wavelength_min: String,
    pub wavelength_max: String,
    pub ion_index: String,
    pub ion_element: String,
    pub ion_stage: String,
    pub catalog_path: String,
}

/// Last menu selection per screen, so re-entering a menu restores the
/// cursor.
#[derive(Debug, Default)]
pub struct MenuMemory {
    pub main: usize,
    pub elements: usize,
    pub ions: usize,
    pub lines: usize,
    pub catalog: usize,
}

/// One run of the browser, from terminal setup to teardown.
pub struct Session {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub dataset: Option<Dataset>,
    pub data_dir: PathBuf,
    pub defaults: QueryDefaults,
    pub memory: MenuMemory,
    pub status: StatusLine,
}

impl Session {
    pub fn new(
        terminal: Terminal<CrosstermBackend<Stdout>>,
        data_dir: PathBuf,
        dataset: Option<Dataset>,
    ) -> Self {
        Self {
            terminal,
            dataset,
            data_dir,
            defaults: QueryDefaults::default(),
            memory: MenuMemory::default(),
            status: StatusLine::default(),
        }
    }

    /// Top-level control flow: ensure a catalog, then loop over the main
    /// menu until the user quits.
    pub fn run(&mut self) -> Result<()> {
        if self.dataset.is_none() {
            screens::catalog::switch_catalog(self)?;
            if self.dataset.is_none() {
                self.dataset = Some(Dataset::builtin()?);
                self.status
                    .set("No catalog selected; using the builtin sample");
            }
        }

        loop {
            let items = vec![
                MenuItem::new("Elements", "Browse the elements in the catalog"),
                MenuItem::new("Ions", "Browse ionisation stages"),
                MenuItem::new("Spectral lines", "Browse bound-bound transitions"),
                MenuItem::new("Switch catalog", "Load a different atomic data catalog"),
                MenuItem::new("Quit", "Leave adx"),
            ];
            let mut menu = Menu::new("Main menu", items, self.memory.main);
            match self.run_menu(&mut menu)? {
                MenuOutcome::Quit => return Ok(()),
                MenuOutcome::Choice(choice) => {
                    self.memory.main = choice;
                    debug!(choice, "main menu selection");
                    match choice {
                        0 => screens::elements::elements_menu(self)?,
                        1 => screens::ions::ions_menu(self)?,
                        2 => screens::lines::lines_menu(self)?,
                        3 => screens::catalog::switch_catalog(self)?,
                        _ => return Ok(()),
                    }
                }
            }
        }
    }

    /// Paginates a report in the content viewport.
    ///
    /// With `interactive` set, blocks in the scroll loop until the user
    /// leaves; otherwise draws the first page once and returns. Scroll
    /// state never survives the call: every invocation starts at the top.
    pub fn page(&mut self, title: &str, report: &Report, interactive: bool) -> Result<()> {
        let context = format_context(self.dataset.as_ref());
        let mut scroll = ScrollState::new(report.len(), 0);

        loop {
            let Self {
                terminal, status, ..
            } = self;
            terminal
                .draw(|frame| {
                    // Title row, status row, and the two content borders.
                    let chrome_rows = 4;
                    scroll.set_viewport_rows(
                        (frame.area().height.saturating_sub(chrome_rows)) as usize,
                    );
                    let hint = if scroll.can_scroll() {
                        PAGER_SCROLL_HINT
                    } else {
                        PAGER_HINT
                    };
                    let inner = draw_chrome(
                        frame,
                        &Chrome {
                            title,
                            context: &context,
                            status: status.display(hint),
                        },
                    );
                    render_page(frame, inner, report, scroll);
                })
                .context("Failed to draw report")?;

            if !interactive {
                return Ok(());
            }

            let Some(key) = next_key()? else { continue };
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                _ => {
                    if let Some(command) = scroll_command(key) {
                        scroll.apply(command);
                    }
                }
            }
        }
    }

    /// Runs a menu to its outcome.
    pub fn run_menu(&mut self, menu: &mut Menu) -> Result<MenuOutcome> {
        let context = format_context(self.dataset.as_ref());
        loop {
            let Self {
                terminal, status, ..
            } = self;
            terminal
                .draw(|frame| {
                    let inner = draw_chrome(
                        frame,
                        &Chrome {
                            title: menu.title(),
                            context: &context,
                            status: status.display(MENU_HINT),
                        },
                    );
                    menu.render(frame, inner);
                })
                .context("Failed to draw menu")?;

            let Some(key) = next_key()? else { continue };
            if let Some(outcome) = menu.handle_key(key) {
                return Ok(outcome);
            }
        }
    }

    /// Runs a form to its terminal outcome. The controller is consumed by
    /// the caller going out of scope afterwards; nothing is retained here.
    pub fn run_form(&mut self, form: &mut FormController) -> Result<FormOutcome> {
        let context = format_context(self.dataset.as_ref());
        loop {
            let Self {
                terminal, status, ..
            } = self;
            terminal
                .draw(|frame| {
                    let inner = draw_chrome(
                        frame,
                        &Chrome {
                            title: form.title(),
                            context: &context,
                            status: status.display(FORM_HINT),
                        },
                    );
                    form.render(frame, inner);
                })
                .context("Failed to draw form")?;

            let Some(key) = next_key()? else { continue };
            if let Some(outcome) = form.handle_key(key) {
                return Ok(outcome);
            }
        }
    }
}

/// Draws the visible slice of a report, or the empty-buffer notice.
///
/// Only the `viewport_rows` lines under the scroll offset are touched, so
/// the per-keystroke redraw cost is independent of the report length.
fn render_page(frame: &mut ratatui::Frame, area: Rect, report: &Report, scroll: ScrollState) {
    if report.is_empty() {
        let notice = Paragraph::new(Line::from(Span::styled(
            "Nothing to display.",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(notice, area);
        return;
    }

    let text_width = area.width.saturating_sub(1) as usize;
    let visible = &report.lines()[scroll.visible_range()];
    let lines: Vec<Line> = visible
        .iter()
        .map(|l| Line::raw(truncate_to_width(l, text_width)))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
    frame.render_widget(Scrollbar::new(scroll), area);
}

/// Blocks for the next key press. `Ok(None)` means a non-key event arrived
/// (resize, focus) and the caller should redraw.
fn next_key() -> Result<Option<KeyEvent>> {
    match event::read().context("Failed to read terminal event")? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

/// Right-hand title-row summary of the loaded catalog.
fn format_context(dataset: Option<&Dataset>) -> String {
    dataset.map_or_else(
        || "no catalog loaded".to_string(),
        |ds| {
            format!(
                "{}: {} elements, {} ions, {} lines",
                ds.name(),
                ds.elements().len(),
                ds.ion_count(),
                ds.lines().len()
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_without_catalog() {
        assert_eq!(format_context(None), "no catalog loaded");
    }

    #[test]
    fn context_summarizes_catalog() {
        let ds = Dataset::builtin().expect("builtin");
        let context = format_context(Some(&ds));
        assert!(context.contains("elements"));
        assert!(context.contains("lines"));
        assert!(context.starts_with(ds.name()));
    }
}
