//! Element browsing: the full table or a single element by atomic number.

use adx_core::{Dataset, Element};
use anyhow::Result;

use super::RULE_WIDTH;
use crate::menu::{Menu, MenuItem, MenuOutcome};
use crate::query::{QueryOutcome, query_atomic_number};
use crate::report::Report;
use crate::session::Session;

pub fn elements_menu(session: &mut Session) -> Result<()> {
    loop {
        let items = vec![
            MenuItem::new("All elements", "Every element in the catalog"),
            MenuItem::new("Single element", "Look up one element by atomic number"),
        ];
        let mut menu = Menu::new("Elements", items, session.memory.elements);
        match session.run_menu(&mut menu)? {
            MenuOutcome::Quit => return Ok(()),
            MenuOutcome::Choice(choice) => {
                session.memory.elements = choice;
                match choice {
                    0 => all_elements(session)?,
                    _ => single_element(session)?,
                }
            }
        }
    }
}

fn all_elements(session: &mut Session) -> Result<()> {
    let report = {
        let Some(ds) = session.dataset.as_ref() else {
            session.status.set("No catalog loaded");
            return Ok(());
        };
        let mut report = Report::new();
        report.push_separator(RULE_WIDTH)?;
        for element in ds.elements() {
            element_block(&mut report, ds, element)?;
        }
        report
    };
    session.page("All elements", &report, true)
}

fn single_element(session: &mut Session) -> Result<()> {
    let z = match query_atomic_number(session)? {
        QueryOutcome::Cancelled => return Ok(()),
        QueryOutcome::Accepted(z) => z,
    };

    let report = {
        let Some(ds) = session.dataset.as_ref() else {
            session.status.set("No catalog loaded");
            return Ok(());
        };
        let Some(element) = ds.element(z) else {
            session
                .status
                .set(format!("Element Z = {z} is not in the catalog"));
            return Ok(());
        };
        let mut report = Report::new();
        report.push_separator(RULE_WIDTH)?;
        element_block(&mut report, ds, element)?;
        report
    };
    session.page("Single element", &report, true)
}

/// One formatted element summary, closed by a separator rule.
fn element_block(report: &mut Report, ds: &Dataset, element: &Element) -> Result<()> {
    report.push_line(format!(
        " Element                 : {} ({})",
        element.name, element.symbol
    ))?;
    report.push_line(format!(" Atomic number           : {}", element.z))?;
    report.push_line(format!(
        " Abundance (log, H = 12) : {:.2}",
        element.abundance
    ))?;
    report.push_line(format!(
        " Ionisation stages       : {}",
        ds.ions_of(element.z).len()
    ))?;
    report.push_line(format!(" Highest stage           : {}", element.istate_max))?;
    report.push_line(format!(
        " Lines in catalog        : {}",
        ds.lines_for_element(element.z).len()
    ))?;
    report.push_separator(RULE_WIDTH)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_block_is_self_contained() {
        let ds = Dataset::builtin().expect("builtin");
        let hydrogen = ds.element(1).expect("H").clone();
        let mut report = Report::new();
        element_block(&mut report, &ds, &hydrogen).expect("block");

        let text = report.lines().join("\n");
        assert!(text.contains("Hydrogen"));
        assert!(text.contains("Atomic number           : 1"));
        // Block ends with a rule.
        assert!(report.lines().last().expect("non-empty").starts_with('-'));
    }
}
