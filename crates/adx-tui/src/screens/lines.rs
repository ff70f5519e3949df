//! Spectral line browsing: all transitions, a wavelength window, or the
//! lines of one element or ion.

use adx_core::{Dataset, SpectralLine};
use anyhow::Result;

use super::{RULE_WIDTH, ion_label};
use crate::menu::{Menu, MenuItem, MenuOutcome};
use crate::query::{
    QueryOutcome, query_atomic_number, query_ion_stage, query_wavelength_range,
};
use crate::report::Report;
use crate::session::Session;

pub fn lines_menu(session: &mut Session) -> Result<()> {
    loop {
        let items = vec![
            MenuItem::new("All lines", "Every transition in the catalog"),
            MenuItem::new("Wavelength range", "Transitions inside a wavelength window"),
            MenuItem::new("Lines of an element", "Transitions of any ion of one element"),
            MenuItem::new("Lines of an ion", "Transitions of a single ion"),
        ];
        let mut menu = Menu::new("Spectral lines", items, session.memory.lines);
        match session.run_menu(&mut menu)? {
            MenuOutcome::Quit => return Ok(()),
            MenuOutcome::Choice(choice) => {
                session.memory.lines = choice;
                match choice {
                    0 => all_lines(session)?,
                    1 => lines_in_range(session)?,
                    2 => lines_of_element(session)?,
                    _ => lines_of_ion(session)?,
                }
            }
        }
    }
}

fn all_lines(session: &mut Session) -> Result<()> {
    let report = {
        let Some(ds) = session.dataset.as_ref() else {
            session.status.set("No catalog loaded");
            return Ok(());
        };
        let lines: Vec<&SpectralLine> = ds.lines().iter().collect();
        line_table(ds, &lines)?
    };
    session.page("All lines", &report, true)
}

fn lines_in_range(session: &mut Session) -> Result<()> {
    let (wmin, wmax) = match query_wavelength_range(session)? {
        QueryOutcome::Cancelled => return Ok(()),
        QueryOutcome::Accepted(range) => range,
    };

    let report = {
        let Some(ds) = session.dataset.as_ref() else {
            session.status.set("No catalog loaded");
            return Ok(());
        };
        let lines: Vec<&SpectralLine> = ds.lines_in_range(wmin, wmax).iter().collect();
        line_table(ds, &lines)?
    };
    session.page("Lines in wavelength range", &report, true)
}

fn lines_of_element(session: &mut Session) -> Result<()> {
    let z = match query_atomic_number(session)? {
        QueryOutcome::Cancelled => return Ok(()),
        QueryOutcome::Accepted(z) => z,
    };

    let report = {
        let Some(ds) = session.dataset.as_ref() else {
            session.status.set("No catalog loaded");
            return Ok(());
        };
        if ds.element(z).is_none() {
            session
                .status
                .set(format!("Element Z = {z} is not in the catalog"));
            return Ok(());
        }
        let lines = ds.lines_for_element(z);
        line_table(ds, &lines)?
    };
    session.page("Lines of an element", &report, true)
}

fn lines_of_ion(session: &mut Session) -> Result<()> {
    let (z, istate) = match query_ion_stage(session)? {
        QueryOutcome::Cancelled => return Ok(()),
        QueryOutcome::Accepted(pair) => pair,
    };

    let report = {
        let Some(ds) = session.dataset.as_ref() else {
            session.status.set("No catalog loaded");
            return Ok(());
        };
        if ds.ion(z, istate).is_none() {
            session.status.set(format!(
                "Ion {} is not in the catalog",
                ion_label(ds.symbol(z), istate)
            ));
            return Ok(());
        }
        let lines = ds.lines_for_ion(z, istate);
        line_table(ds, &lines)?
    };
    session.page("Lines of an ion", &report, true)
}

/// Formats a line table, one row per transition.
///
/// An empty selection yields an empty report on purpose: the pager then
/// shows its "nothing to display" notice.
fn line_table(ds: &Dataset, lines: &[&SpectralLine]) -> Result<Report> {
    let mut report = Report::new();
    if lines.is_empty() {
        return Ok(report);
    }

    report.push_separator(RULE_WIDTH)?;
    report.push_line(" Wavelength (A)  Ion            gf   Levels")?;
    report.push_separator(RULE_WIDTH)?;
    for line in lines {
        report.push_line(format!(
            " {:>13.2}  {:<8} {:>8.4}   {:>2} -> {:<2}",
            line.wavelength,
            ion_label(ds.symbol(line.z), line.istate),
            line.oscillator_strength,
            line.lower_level,
            line.upper_level
        ))?;
    }
    report.push_separator(RULE_WIDTH)?;
    report.push_line(format!(" {} lines", lines.len()))?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_header_rows_and_count() {
        let ds = Dataset::builtin().expect("builtin");
        let lines: Vec<&SpectralLine> = ds.lines().iter().collect();
        let report = line_table(&ds, &lines).expect("table");
        // 3 header rows + one row per line + rule + count row.
        assert_eq!(report.len(), lines.len() + 5);
        let text = report.lines().join("\n");
        assert!(text.contains("Wavelength (A)"));
        assert!(text.contains(&format!("{} lines", lines.len())));
    }

    #[test]
    fn empty_selection_yields_empty_report() {
        let ds = Dataset::builtin().expect("builtin");
        let report = line_table(&ds, &[]).expect("table");
        assert!(report.is_empty());
    }
}
