//! Full-screen TUI for browsing atomic data catalogs.
//!
//! The engine pieces are deliberately small and separable:
//! - [`report`]: the append-only line buffer screens render into
//! - [`pager`]: scroll state and the scrollbar widget
//! - [`form`]: the modal field-input state machine
//! - [`query`]: retry-until-valid workflows on top of forms
//! - [`menu`]: indexed selection with wraparound
//! - [`session`]: terminal ownership and the blocking input loops
//! - [`screens`]: the element / ion / line / catalog browsers

pub mod form;
pub mod menu;
pub mod pager;
pub mod query;
pub mod render;
pub mod report;
pub mod screens;
pub mod session;
pub mod statusline;
pub mod terminal;

use std::io::{IsTerminal, stdout};

use adx_core::{Config, Dataset};
use anyhow::Result;
pub use session::Session;

/// Runs the interactive browser until the user quits.
///
/// `dataset` short-circuits the startup catalog prompt (the `--catalog`
/// flag); without it the switch-catalog screen runs first. The terminal is
/// restored on every exit path, including an error propagating out of the
/// session.
pub fn run_browser(config: &Config, dataset: Option<Dataset>) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!("adx is an interactive browser and requires a terminal");
    }

    terminal::install_panic_hook();
    let terminal = terminal::setup_terminal()?;
    let mut session = Session::new(terminal, config.data_dir(), dataset);

    let result = session.run();
    let restored = terminal::restore_terminal();
    // A session error outranks a restore error; report it first.
    result?;
    restored
}
