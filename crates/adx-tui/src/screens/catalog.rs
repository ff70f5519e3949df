//! Catalog switching: pick a discovered catalog, the builtin sample, or a
//! path typed by hand, and keep asking until one loads or the user quits.

use adx_core::{Dataset, catalog};
use anyhow::Result;
use tracing::{info, warn};

use super::RULE_WIDTH;
use crate::menu::{Menu, MenuItem, MenuOutcome};
use crate::query::{QueryOutcome, query_catalog_path};
use crate::report::Report;
use crate::session::Session;

pub fn switch_catalog(session: &mut Session) -> Result<()> {
    loop {
        let data_dir = session.data_dir.clone();
        let discovered = match catalog::discover(&data_dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("catalog discovery failed: {err:#}");
                session.status.set(format!("Cannot list catalogs: {err:#}"));
                Vec::new()
            }
        };

        let mut items: Vec<MenuItem> = discovered
            .iter()
            .map(|entry| MenuItem::new(entry.name.clone(), entry.path.display().to_string()))
            .collect();
        let builtin_index = items.len();
        items.push(MenuItem::new(
            "Builtin sample",
            "Small catalog bundled with adx",
        ));
        let other_index = items.len();
        items.push(MenuItem::new("Other...", "Enter a catalog file path"));

        let mut menu = Menu::new("Select the catalog to load", items, session.memory.catalog);
        let choice = match session.run_menu(&mut menu)? {
            MenuOutcome::Quit => return Ok(()),
            MenuOutcome::Choice(choice) => choice,
        };
        session.memory.catalog = choice;

        let loaded = if choice == builtin_index {
            Dataset::builtin()
        } else if choice == other_index {
            match query_catalog_path(session, &data_dir)? {
                QueryOutcome::Cancelled => continue,
                QueryOutcome::Accepted(path) => Dataset::load(&path),
            }
        } else {
            Dataset::load(&discovered[choice].path)
        };

        match loaded {
            Ok(dataset) => {
                info!(catalog = %dataset.name(), "catalog loaded");
                let summary = summary_report(&dataset)?;
                session.status.set(format!("Loaded catalog '{}'", dataset.name()));
                session.dataset = Some(dataset);
                session.page("Catalog summary", &summary, true)?;
                return Ok(());
            }
            Err(err) => {
                warn!("catalog load failed: {err:#}");
                session.status.set(format!("{err:#}"));
            }
        }
    }
}

/// Counts and coverage of a freshly loaded catalog.
fn summary_report(ds: &Dataset) -> Result<Report> {
    let mut report = Report::new();
    report.push_separator(RULE_WIDTH)?;
    report.push_line(format!(" Catalog     : {}", ds.name()))?;
    report.push_line(format!(" Elements    : {}", ds.elements().len()))?;
    report.push_line(format!(" Ions        : {}", ds.ion_count()))?;
    report.push_line(format!(" Lines       : {}", ds.lines().len()))?;
    if let (Some(first), Some(last)) = (ds.lines().first(), ds.lines().last()) {
        report.push_line(format!(
            " Wavelengths : {:.2} - {:.2} A",
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
    fn summary_report_counts_the_catalog() {
        let ds = Dataset::builtin().expect("builtin");
        let report = summary_report(&ds).expect("summary");
        let text = report.lines().join("\n");
        assert!(text.contains(&format!("Elements    : {}", ds.elements().len())));
        assert!(text.contains("Wavelengths"));
    }
}
