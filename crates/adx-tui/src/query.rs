//! Retry-until-valid query workflows.
//!
//! Each workflow builds a form from the session's current default strings,
//! runs it to a terminal state, and either returns the user's cancellation,
//! or parses and validates the submission. An invalid submission reports
//! the violation on the status line and re-prompts with the raw strings the
//! user just typed, so they edit instead of retyping. There is no retry
//! cap; only cancellation ends an invalid streak.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::form::{FormController, FormField, FormOutcome};
use crate::session::Session;

/// Result of a query workflow. Cancellation is an ordinary outcome, not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome<T> {
    Accepted(T),
    Cancelled,
}

/// What the loop does next after one form run.
#[derive(Debug, PartialEq, Eq)]
enum QueryStep<T> {
    Accepted(T),
    Cancelled,
    Retry { message: String },
}

/// Applies one form outcome: store raw strings, then parse.
///
/// The raw strings are stored back into `defaults` on every submission,
/// valid or not; a cancelled form leaves the defaults untouched.
fn evaluate_outcome<T>(
    outcome: FormOutcome,
    defaults: &mut [String],
    parse: impl FnOnce(&[String]) -> Result<T, String>,
) -> QueryStep<T> {
    match outcome {
        FormOutcome::Cancelled => QueryStep::Cancelled,
        FormOutcome::Submitted(values) => {
            for (slot, value) in defaults.iter_mut().zip(&values) {
                slot.clone_from(value);
            }
            match parse(&values) {
                Ok(parsed) => QueryStep::Accepted(parsed),
                Err(message) => QueryStep::Retry { message },
            }
        }
    }
}

fn build_form(
    title: &str,
    labels: &[&str],
    defaults: &[String],
    note: Option<&str>,
) -> FormController {
    let mut fields: Vec<FormField> = labels
        .iter()
        .zip(defaults)
        .map(|(label, default)| FormField::input(*label, default))
        .collect();
    if let Some(note) = note {
        fields.push(FormField::note(note));
    }
    FormController::new(title, fields)
}

/// The generic retry loop over a form run.
fn run_query<T>(
    session: &mut Session,
    title: &str,
    labels: &[&str],
    defaults: &mut [String],
    note: Option<&str>,
    parse: impl Fn(&[String]) -> Result<T, String>,
) -> Result<QueryOutcome<T>> {
    loop {
        let mut form = build_form(title, labels, defaults, note);
        let outcome = session.run_form(&mut form)?;
        match evaluate_outcome(outcome, defaults, &parse) {
            QueryStep::Accepted(value) => {
                session.status.clear();
                return Ok(QueryOutcome::Accepted(value));
            }
            QueryStep::Cancelled => return Ok(QueryOutcome::Cancelled),
            QueryStep::Retry { message } => session.status.set(message),
        }
    }
}

/// Asks for an atomic number, `0 < z < 118`.
pub fn query_atomic_number(session: &mut Session) -> Result<QueryOutcome<u32>> {
    let mut defaults = [session.defaults.atomic_number.clone()];
    let outcome = run_query(
        session,
        "Input the atomic number of the element",
        &["Atomic number"],
        &mut defaults,
        None,
        |values| parse_atomic_number(&values[0]),
    )?;
    let [atomic_number] = defaults;
    session.defaults.atomic_number = atomic_number;
    Ok(outcome)
}

/// Asks for a wavelength range in Angstroms, `0 < min < max`.
pub fn query_wavelength_range(session: &mut Session) -> Result<QueryOutcome<(f64, f64)>> {
    let mut defaults = [
        session.defaults.wavelength_min.clone(),
        session.defaults.wavelength_max.clone(),
    ];
    let outcome = run_query(
        session,
        "Input the wavelength range",
        &["Minimum wavelength (A)", "Maximum wavelength (A)"],
        &mut defaults,
        None,
        |values| parse_wavelength_range(values),
    )?;
    let [wavelength_min, wavelength_max] = defaults;
    session.defaults.wavelength_min = wavelength_min;
    session.defaults.wavelength_max = wavelength_max;
    Ok(outcome)
}

/// Asks for an ion by its index in the catalog's spectroscopic order.
pub fn query_ion_index(session: &mut Session, ion_count: usize) -> Result<QueryOutcome<usize>> {
    let mut defaults = [session.defaults.ion_index.clone()];
    let outcome = run_query(
        session,
        "Input the ion index",
        &["Ion index"],
        &mut defaults,
        None,
        |values| parse_ion_index(&values[0], ion_count),
    )?;
    let [ion_index] = defaults;
    session.defaults.ion_index = ion_index;
    Ok(outcome)
}

/// Asks for an ion by element and ionisation stage, both positive.
pub fn query_ion_stage(session: &mut Session) -> Result<QueryOutcome<(u32, u32)>> {
    let mut defaults = [
        session.defaults.ion_element.clone(),
        session.defaults.ion_stage.clone(),
    ];
    let outcome = run_query(
        session,
        "Select an ion",
        &["Atomic number", "Ionisation stage"],
        &mut defaults,
        None,
        |values| parse_ion_stage(values),
    )?;
    let [ion_element, ion_stage] = defaults;
    session.defaults.ion_element = ion_element;
    session.defaults.ion_stage = ion_stage;
    Ok(outcome)
}

/// Asks for a catalog file path. Relative paths resolve against the data
/// directory.
pub fn query_catalog_path(
    session: &mut Session,
    data_dir: &Path,
) -> Result<QueryOutcome<PathBuf>> {
    let mut defaults = [session.defaults.catalog_path.clone()];
    let note = format!("Relative paths are resolved against {}", data_dir.display());
    let outcome = run_query(
        session,
        "Input the catalog file to load",
        &["Catalog file"],
        &mut defaults,
        Some(note.as_str()),
        |values| parse_catalog_path(&values[0], data_dir),
    )?;
    let [catalog_path] = defaults;
    session.defaults.catalog_path = catalog_path;
    Ok(outcome)
}

fn parse_atomic_number(raw: &str) -> Result<u32, String> {
    let z: u32 = raw
        .parse()
        .map_err(|_| format!("Invalid atomic number '{raw}'"))?;
    if z > 0 && z < 118 {
        Ok(z)
    } else {
        Err(format!("Invalid atomic number {z}"))
    }
}

fn parse_wavelength(raw: &str, which: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("Invalid {which} wavelength '{raw}'"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("Invalid {which} wavelength {value}"))
    }
}

fn parse_wavelength_range(values: &[String]) -> Result<(f64, f64), String> {
    let wmin = parse_wavelength(&values[0], "minimum")?;
    let wmax = parse_wavelength(&values[1], "maximum")?;
    if wmax > wmin {
        Ok((wmin, wmax))
    } else {
        Err(format!(
            "Invalid wavelength range {wmin} - {wmax} (minimum - maximum)"
        ))
    }
}

fn parse_ion_index(raw: &str, ion_count: usize) -> Result<usize, String> {
    let index: usize = raw
        .parse()
        .map_err(|_| format!("Invalid ion index '{raw}'"))?;
    if index < ion_count {
        Ok(index)
    } else {
        Err(format!(
            "Invalid ion index {index} when there are {ion_count} ions"
        ))
    }
}

fn parse_ion_stage(values: &[String]) -> Result<(u32, u32), String> {
    let z: u32 = values[0]
        .parse()
        .map_err(|_| format!("Invalid atomic number '{}'", values[0]))?;
    let istate: u32 = values[1]
        .parse()
        .map_err(|_| format!("Invalid ionisation stage '{}'", values[1]))?;
    if z > 0 && istate > 0 {
        Ok((z, istate))
    } else {
        Err(format!(
            "Invalid atomic number {z} or ionisation stage {istate}, both must be positive"
        ))
    }
}

fn parse_catalog_path(raw: &str, data_dir: &Path) -> Result<PathBuf, String> {
    if raw.is_empty() {
        return Err("Catalog file must not be empty".to_string());
    }
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(data_dir.join(path))
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;

    fn key(form: &mut FormController, code: KeyCode) -> Option<FormOutcome> {
        form.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn submit(form: &mut FormController, entries: &[&str]) -> FormOutcome {
        let mut outcome = None;
        for (index, entry) in entries.iter().enumerate() {
            for c in entry.chars() {
                key(form, KeyCode::Char(c));
            }
            outcome = key(form, KeyCode::Enter);
            if index + 1 < entries.len() {
                assert!(outcome.is_none(), "form ended early");
            }
        }
        outcome.expect("form reached a terminal state")
    }

    #[test]
    fn atomic_number_validation() {
        assert_eq!(parse_atomic_number("42"), Ok(42));
        assert!(parse_atomic_number("abc").is_err());
        assert!(parse_atomic_number("0").is_err());
        assert!(parse_atomic_number("118").is_err());
        assert!(parse_atomic_number("-3").is_err());
    }

    #[test]
    fn wavelength_range_validation() {
        assert_eq!(
            parse_wavelength_range(&["100".into(), "200.5".into()]),
            Ok((100.0, 200.5))
        );
        let reversed = parse_wavelength_range(&["200".into(), "100".into()]);
        assert!(reversed.is_err());
        assert!(
            reversed
                .expect_err("reversed range")
                .contains("minimum - maximum")
        );
        assert!(parse_wavelength_range(&["x".into(), "100".into()]).is_err());
        assert!(parse_wavelength_range(&["-1".into(), "100".into()]).is_err());
        assert!(parse_wavelength_range(&["nan".into(), "100".into()]).is_err());
    }

    #[test]
    fn ion_validation() {
        assert_eq!(parse_ion_index("3", 10), Ok(3));
        assert!(parse_ion_index("10", 10).is_err());
        assert!(parse_ion_index("many", 10).is_err());

        assert_eq!(parse_ion_stage(&["26".into(), "2".into()]), Ok((26, 2)));
        assert!(parse_ion_stage(&["0".into(), "2".into()]).is_err());
        assert!(parse_ion_stage(&["26".into(), "0".into()]).is_err());
    }

    #[test]
    fn catalog_path_resolution() {
        let data_dir = Path::new("/data/catalogs");
        assert_eq!(
            parse_catalog_path("extra.adx", data_dir),
            Ok(PathBuf::from("/data/catalogs/extra.adx"))
        );
        assert_eq!(
            parse_catalog_path("/abs/path.adx", data_dir),
            Ok(PathBuf::from("/abs/path.adx"))
        );
        assert!(parse_catalog_path("", data_dir).is_err());
    }

    #[test]
    fn submission_updates_defaults_even_when_invalid() {
        let mut defaults = [String::new()];
        let step = evaluate_outcome(
            FormOutcome::Submitted(vec!["abc".to_string()]),
            &mut defaults,
            |values| parse_atomic_number(&values[0]),
        );
        match step {
            QueryStep::Retry { message } => {
                assert!(message.contains("Invalid atomic number"), "got: {message}");
            }
            other => panic!("expected retry, got {other:?}"),
        }
        assert_eq!(defaults[0], "abc");
    }

    #[test]
    fn cancellation_leaves_defaults_untouched() {
        let mut defaults = ["previous".to_string()];
        let step = evaluate_outcome(FormOutcome::Cancelled, &mut defaults, |values| {
            parse_atomic_number(&values[0])
        });
        assert_eq!(step, QueryStep::<u32>::Cancelled);
        assert_eq!(defaults[0], "previous");
    }

    #[test]
    fn retry_prefills_the_last_submitted_string() {
        // First attempt: "abc" is submitted and rejected.
        let mut defaults = [String::new()];
        let mut form = build_form("z?", &["Atomic number"], &defaults, None);
        let outcome = submit(&mut form, &["abc"]);
        let step = evaluate_outcome(outcome, &mut defaults, |values| {
            parse_atomic_number(&values[0])
        });
        assert!(matches!(step, QueryStep::Retry { .. }));

        // The re-prompt pre-fills the raw rejected string, not the original
        // empty default.
        let mut form = build_form("z?", &["Atomic number"], &defaults, None);
        assert_eq!(form.fields()[0].value(), "abc");

        // Second attempt: clear it and type a valid value.
        for _ in 0..3 {
            key(&mut form, KeyCode::Backspace);
        }
        let outcome = submit(&mut form, &["42"]);
        let step = evaluate_outcome(outcome, &mut defaults, |values| {
            parse_atomic_number(&values[0])
        });
        assert_eq!(step, QueryStep::Accepted(42));
        assert_eq!(defaults[0], "42");
    }

    #[test]
    fn note_rows_never_take_focus() {
        let defaults = [String::new()];
        let form = build_form("t", &["Catalog file"], &defaults, Some("searched: /data"));
        assert_eq!(form.focus(), 0);
        assert_eq!(form.fields().len(), 2);
        assert!(!form.fields()[1].is_editable());
    }
}
