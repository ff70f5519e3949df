//! Plain-text catalog parser.
//!
//! The format is line-oriented. Blank lines and `#` comments are skipped;
//! every other line starts with a record keyword:
//!
//! ```text
//! catalog  Kurucz subset
//! element  1 H  Hydrogen  12.00  2
//! ion      1 1  13.598  10
//! line     1 1  1215.67  0.4164  1 2
//! ```
//!
//! Records may appear in any order, but an `ion` must reference a known
//! element and a `line` a known ion. Errors carry the offending line number.

use std::str::FromStr;

use anyhow::{Result, anyhow, bail};
use tracing::debug;

use super::{Dataset, Element, Ion, SpectralLine};

pub(super) fn parse_catalog(contents: &str, fallback_name: &str) -> Result<Dataset> {
    let mut name = fallback_name.to_string();
    let mut elements: Vec<Element> = Vec::new();
    let mut ions: Vec<Ion> = Vec::new();
    let mut lines: Vec<SpectralLine> = Vec::new();
    // (z, istate) pairs seen so far, so line records can be checked cheaply.
    let mut known_ions: Vec<(u32, u32)> = Vec::new();

    for (index, raw) in contents.lines().enumerate() {
        let lineno = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (keyword, rest) = trimmed.split_once(char::is_whitespace).unwrap_or((trimmed, ""));
        match keyword {
            "catalog" => {
                if rest.trim().is_empty() {
                    bail!("line {lineno}: catalog record has no name");
                }
                name = rest.trim().to_string();
            }
            "element" => {
                let element = parse_element(rest, lineno)?;
                if elements.iter().any(|e| e.z == element.z) {
                    bail!("line {lineno}: duplicate element Z = {}", element.z);
                }
                elements.push(element);
            }
            "ion" => {
                let ion = parse_ion(rest, lineno)?;
                if !elements.iter().any(|e| e.z == ion.z) {
                    bail!("line {lineno}: ion references unknown element Z = {}", ion.z);
                }
                if known_ions.contains(&(ion.z, ion.istate)) {
                    bail!("line {lineno}: duplicate ion {} {}", ion.z, ion.istate);
                }
                known_ions.push((ion.z, ion.istate));
                ions.push(ion);
            }
            "line" => {
                let line = parse_line(rest, lineno)?;
                if !known_ions.contains(&(line.z, line.istate)) {
                    bail!(
                        "line {lineno}: transition references unknown ion {} {}",
                        line.z,
                        line.istate
                    );
                }
                lines.push(line);
            }
            other => bail!("line {lineno}: unknown record type '{other}'"),
        }
    }

    if elements.is_empty() {
        bail!("catalog contains no elements");
    }

    elements.sort_by_key(|e| e.z);
    ions.sort_by_key(|i| (i.z, i.istate));
    lines.sort_by(|a, b| a.wavelength.total_cmp(&b.wavelength));

    debug!(
        catalog = %name,
        elements = elements.len(),
        ions = ions.len(),
        lines = lines.len(),
        "parsed catalog"
    );

    Ok(Dataset {
        name,
        elements,
        ions,
        lines,
    })
}

fn parse_element(rest: &str, lineno: usize) -> Result<Element> {
    let fields: Vec<&str> = rest.split_whitespace().collect();
    let [z, symbol, name, abundance, istate_max] = fields.as_slice() else {
        bail!("line {lineno}: element record needs 5 fields, got {}", fields.len());
    };
    Ok(Element {
        z: field(z, "atomic number", lineno)?,
        symbol: (*symbol).to_string(),
        name: (*name).to_string(),
        abundance: field(abundance, "abundance", lineno)?,
        istate_max: field(istate_max, "istate_max", lineno)?,
    })
}

fn parse_ion(rest: &str, lineno: usize) -> Result<Ion> {
    let fields: Vec<&str> = rest.split_whitespace().collect();
    let [z, istate, potential, n_levels] = fields.as_slice() else {
        bail!("line {lineno}: ion record needs 4 fields, got {}", fields.len());
    };
    Ok(Ion {
        z: field(z, "atomic number", lineno)?,
        istate: field(istate, "ionisation stage", lineno)?,
        ionisation_potential_ev: field(potential, "ionisation potential", lineno)?,
        n_levels: field(n_levels, "level count", lineno)?,
    })
}

fn parse_line(rest: &str, lineno: usize) -> Result<SpectralLine> {
    let fields: Vec<&str> = rest.split_whitespace().collect();
    let [z, istate, wavelength, gf, lower, upper] = fields.as_slice() else {
        bail!("line {lineno}: line record needs 6 fields, got {}", fields.len());
    };
    let wavelength: f64 = field(wavelength, "wavelength", lineno)?;
    if !wavelength.is_finite() || wavelength <= 0.0 {
        bail!("line {lineno}: wavelength must be finite and positive");
    }
    Ok(SpectralLine {
        z: field(z, "atomic number", lineno)?,
        istate: field(istate, "ionisation stage", lineno)?,
        wavelength,
        oscillator_strength: field(gf, "oscillator strength", lineno)?,
        lower_level: field(lower, "lower level", lineno)?,
        upper_level: field(upper, "upper level", lineno)?,
    })
}

fn field<T: FromStr>(raw: &str, what: &str, lineno: usize) -> Result<T> {
    raw.parse()
        .map_err(|_| anyhow!("line {lineno}: invalid {what} '{raw}'"))
}
