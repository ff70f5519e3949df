//! Ion browsing: the full list, the stages of one element, or one ion
//! looked up by index or by element and stage.

use adx_core::{Dataset, Ion};
use anyhow::Result;

use super::{RULE_WIDTH, ion_label};
use crate::menu::{Menu, MenuItem, MenuOutcome};
use crate::query::{QueryOutcome, query_atomic_number, query_ion_index, query_ion_stage};
use crate::report::Report;
use crate::session::Session;

pub fn ions_menu(session: &mut Session) -> Result<()> {
    loop {
        let items = vec![
            MenuItem::new("All ions", "Every ionisation stage in the catalog"),
            MenuItem::new("Ions of an element", "All stages of one element"),
            MenuItem::new("Ion by index", "Look up one ion by catalog index"),
            MenuItem::new("Ion by element and stage", "Look up one ion by Z and stage"),
        ];
        let mut menu = Menu::new("Ions", items, session.memory.ions);
        match session.run_menu(&mut menu)? {
            MenuOutcome::Quit => return Ok(()),
            MenuOutcome::Choice(choice) => {
                session.memory.ions = choice;
                match choice {
                    0 => all_ions(session)?,
                    1 => ions_of_element(session)?,
                    2 => ion_by_index(session)?,
                    _ => ion_by_stage(session)?,
                }
            }
        }
    }
}

fn all_ions(session: &mut Session) -> Result<()> {
    let report = {
        let Some(ds) = session.dataset.as_ref() else {
            session.status.set("No catalog loaded");
            return Ok(());
        };
        let mut report = Report::new();
        ion_table_header(&mut report)?;
        for (index, ion) in ds.ions().iter().enumerate() {
            ion_table_row(&mut report, ds, index, ion)?;
        }
        report.push_separator(RULE_WIDTH)?;
        report
    };
    session.page("All ions", &report, true)
}

fn ions_of_element(session: &mut Session) -> Result<()> {
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
        let ions = ds.ions_of(z);
        if ions.is_empty() {
            session.status.set(format!("No ions for element Z = {z}"));
            return Ok(());
        }
        let mut report = Report::new();
        ion_table_header(&mut report)?;
        for ion in ions {
            let index = ds
                .ions()
                .iter()
                .position(|i| (i.z, i.istate) == (ion.z, ion.istate))
                .unwrap_or_default();
            ion_table_row(&mut report, ds, index, ion)?;
        }
        report.push_separator(RULE_WIDTH)?;
        report
    };
    session.page("Ions of an element", &report, true)
}

fn ion_by_index(session: &mut Session) -> Result<()> {
    let Some(ion_count) = session.dataset.as_ref().map(Dataset::ion_count) else {
        session.status.set("No catalog loaded");
        return Ok(());
    };
    let index = match query_ion_index(session, ion_count)? {
        QueryOutcome::Cancelled => return Ok(()),
        QueryOutcome::Accepted(index) => index,
    };

    let report = {
        let Some(ds) = session.dataset.as_ref() else {
            session.status.set("No catalog loaded");
            return Ok(());
        };
        let Some(ion) = ds.ion_by_index(index) else {
            session.status.set(format!("No ion with index {index}"));
            return Ok(());
        };
        ion_detail_report(ds, ion)?
    };
    session.page("Single ion", &report, true)
}

fn ion_by_stage(session: &mut Session) -> Result<()> {
    let (z, istate) = match query_ion_stage(session)? {
        QueryOutcome::Cancelled => return Ok(()),
        QueryOutcome::Accepted(pair) => pair,
    };

    let report = {
        let Some(ds) = session.dataset.as_ref() else {
            session.status.set("No catalog loaded");
            return Ok(());
        };
        let Some(ion) = ds.ion(z, istate) else {
            session.status.set(format!(
                "Ion {} is not in the catalog",
                ion_label(ds.symbol(z), istate)
            ));
            return Ok(());
        };
        ion_detail_report(ds, ion)?
    };
    session.page("Single ion", &report, true)
}

fn ion_table_header(report: &mut Report) -> Result<()> {
    report.push_separator(RULE_WIDTH)?;
    report.push_line(" Index  Ion       IP (eV)   Levels   Lines")?;
    report.push_separator(RULE_WIDTH)?;
    Ok(())
}

fn ion_table_row(report: &mut Report, ds: &Dataset, index: usize, ion: &Ion) -> Result<()> {
    report.push_line(format!(
        " {index:>5}  {:<8} {:>8.3}  {:>6}  {:>6}",
        ion_label(ds.symbol(ion.z), ion.istate),
        ion.ionisation_potential_ev,
        ion.n_levels,
        ds.lines_for_ion(ion.z, ion.istate).len()
    ))
}

/// Detail block for one ion.
fn ion_detail_report(ds: &Dataset, ion: &Ion) -> Result<Report> {
    let mut report = Report::new();
    let lines = ds.lines_for_ion(ion.z, ion.istate);

    report.push_separator(RULE_WIDTH)?;
    report.push_line(format!(
        " Ion                   : {}",
        ion_label(ds.symbol(ion.z), ion.istate)
    ))?;
    report.push_line(format!(" Atomic number         : {}", ion.z))?;
    report.push_line(format!(" Ionisation stage      : {}", ion.istate))?;
    report.push_line(format!(
        " Ionisation potential  : {:.3} eV",
        ion.ionisation_potential_ev
    ))?;
    report.push_line(format!(" Bound levels          : {}", ion.n_levels))?;
    report.push_line(format!(" Lines in catalog      : {}", lines.len()))?;
    if let (Some(first), Some(last)) = (lines.first(), lines.last()) {
        report.push_line(format!(
            " Wavelength coverage   : {:.2} - {:.2} A",
            first.wavelength, last.wavelength
        ))?;
    }
    report.push_separator(RULE_WIDTH)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_report_covers_the_ion() {
        let ds = Dataset::builtin().expect("builtin");
        let ion = ds.ion(1, 1).expect("H I").clone();
        let report = ion_detail_report(&ds, &ion).expect("report");
        let text = report.lines().join("\n");
        assert!(text.contains("H I"));
        assert!(text.contains("Ionisation potential"));
        assert!(text.contains("Wavelength coverage"));
    }

    #[test]
    fn detail_report_omits_coverage_without_lines() {
        let ds = Dataset::builtin().expect("builtin");
        // H II is a bare proton; the sample catalog carries no lines for it.
        let ion = ds.ion(1, 2).expect("H II").clone();
        let report = ion_detail_report(&ds, &ion).expect("report");
        let text = report.lines().join("\n");
        assert!(text.contains("Lines in catalog      : 0"));
        assert!(!text.contains("Wavelength coverage"));
    }
}
