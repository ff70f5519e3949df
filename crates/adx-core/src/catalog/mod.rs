//! Catalog data model: elements, ions, and spectral lines.
//!
//! A catalog is loaded once from a plain-text file (see [`parse`]) and then
//! queried read-only by the browser screens. Spectral lines are kept sorted
//! by wavelength so range queries are binary searches.

mod parse;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// A chemical element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Atomic number.
    pub z: u32,
    /// Element symbol, e.g. "Fe".
    pub symbol: String,
    /// Full element name, e.g. "Iron".
    pub name: String,
    /// Abundance on the log scale where hydrogen is 12.
    pub abundance: f64,
    /// Highest ionisation stage present in the catalog.
    pub istate_max: u32,
}

/// One ionisation stage of an element.
///
/// `istate` uses spectroscopic numbering: 1 is the neutral atom, 2 is
/// singly ionised, and so on.
#[derive(Debug, Clone, PartialEq)]
pub struct Ion {
    pub z: u32,
    pub istate: u32,
    /// Energy required to remove the next electron, in eV.
    pub ionisation_potential_ev: f64,
    /// Number of bound levels carried for this ion.
    pub n_levels: u32,
}

/// A bound-bound transition.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralLine {
    pub z: u32,
    pub istate: u32,
    /// Vacuum wavelength in Angstroms.
    pub wavelength: f64,
    /// Oscillator strength (gf value).
    pub oscillator_strength: f64,
    /// Lower level index of the transition.
    pub lower_level: u32,
    /// Upper level index of the transition.
    pub upper_level: u32,
}

/// An immutable, fully indexed atomic data catalog.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    elements: Vec<Element>,
    ions: Vec<Ion>,
    /// Sorted by wavelength ascending.
    lines: Vec<SpectralLine>,
}

impl Dataset {
    /// Loads a catalog from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog from {}", path.display()))?;
        let name = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
        parse::parse_catalog(&contents, &name)
            .with_context(|| format!("Failed to parse catalog {}", path.display()))
    }

    /// Returns the small catalog bundled with the binary.
    ///
    /// Used as a fallback when no catalog file is available, and as a fixture
    /// in tests.
    pub fn builtin() -> Result<Self> {
        parse::parse_catalog(BUILTIN_CATALOG, "builtin sample")
            .context("Bundled sample catalog is malformed")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn ions(&self) -> &[Ion] {
        &self.ions
    }

    pub fn lines(&self) -> &[SpectralLine] {
        &self.lines
    }

    pub fn ion_count(&self) -> usize {
        self.ions.len()
    }

    /// Looks up an element by atomic number.
    pub fn element(&self, z: u32) -> Option<&Element> {
        self.elements.iter().find(|e| e.z == z)
    }

    /// Returns the element symbol for `z`, or `"?"` when absent.
    pub fn symbol(&self, z: u32) -> &str {
        self.element(z).map_or("?", |e| e.symbol.as_str())
    }

    /// Looks up an ion by element and ionisation stage.
    pub fn ion(&self, z: u32, istate: u32) -> Option<&Ion> {
        self.ions.iter().find(|i| i.z == z && i.istate == istate)
    }

    /// Looks up an ion by its index in spectroscopic order.
    pub fn ion_by_index(&self, index: usize) -> Option<&Ion> {
        self.ions.get(index)
    }

    /// All ionisation stages of one element, in stage order.
    pub fn ions_of(&self, z: u32) -> Vec<&Ion> {
        self.ions.iter().filter(|i| i.z == z).collect()
    }

    /// All lines with wavelength in the half-open window `[wmin, wmax)`.
    pub fn lines_in_range(&self, wmin: f64, wmax: f64) -> &[SpectralLine] {
        let start = self.lines.partition_point(|l| l.wavelength < wmin);
        let end = self.lines.partition_point(|l| l.wavelength < wmax);
        &self.lines[start..end]
    }

    /// All lines belonging to any ion of one element, in wavelength order.
    pub fn lines_for_element(&self, z: u32) -> Vec<&SpectralLine> {
        self.lines.iter().filter(|l| l.z == z).collect()
    }

    /// All lines of one ion, in wavelength order.
    pub fn lines_for_ion(&self, z: u32, istate: u32) -> Vec<&SpectralLine> {
        self.lines
            .iter()
            .filter(|l| l.z == z && l.istate == istate)
            .collect()
    }
}

/// A catalog file discovered on disk, offered in the switch-catalog menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Display name (the file stem).
    pub name: String,
    pub path: PathBuf,
}

/// Lists the `.adx` catalog files under `data_dir`, sorted by name.
///
/// A missing directory is not an error; it just means no catalogs.
pub fn discover(data_dir: &Path) -> Result<Vec<CatalogEntry>> {
    let mut entries = Vec::new();
    if !data_dir.is_dir() {
        return Ok(entries);
    }

    let dir = fs::read_dir(data_dir)
        .with_context(|| format!("Failed to list catalogs in {}", data_dir.display()))?;
    for entry in dir {
        let entry = entry.with_context(|| format!("Failed to read {}", data_dir.display()))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("adx") {
            continue;
        }
        let Some(stem) = path.file_stem() else {
            continue;
        };
        entries.push(CatalogEntry {
            name: stem.to_string_lossy().into_owned(),
            path,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

const BUILTIN_CATALOG: &str = include_str!("../../data/sample.adx");

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::builtin().expect("builtin catalog parses")
    }

    #[test]
    fn builtin_catalog_is_indexed() {
        let ds = sample();
        assert!(!ds.elements().is_empty());
        assert!(!ds.ions().is_empty());
        assert!(ds.lines().windows(2).all(|w| w[0].wavelength <= w[1].wavelength));
    }

    #[test]
    fn element_lookup_by_z() {
        let ds = sample();
        let hydrogen = ds.element(1).expect("H present");
        assert_eq!(hydrogen.symbol, "H");
        assert!(ds.element(99).is_none());
        assert_eq!(ds.symbol(99), "?");
    }

    #[test]
    fn ion_lookup_by_stage_and_index() {
        let ds = sample();
        let neutral_h = ds.ion(1, 1).expect("H I present");
        assert_eq!(neutral_h.z, 1);
        assert_eq!(neutral_h.istate, 1);

        let first = ds.ion_by_index(0).expect("index 0");
        assert_eq!((first.z, first.istate), (1, 1));
        assert!(ds.ion_by_index(ds.ion_count()).is_none());
    }

    #[test]
    fn ions_of_element_are_in_stage_order() {
        let ds = sample();
        let helium = ds.ions_of(2);
        let stages: Vec<u32> = helium.iter().map(|i| i.istate).collect();
        let mut sorted = stages.clone();
        sorted.sort_unstable();
        assert_eq!(stages, sorted);
        assert!(!helium.is_empty());
    }

    #[test]
    fn lines_in_range_is_half_open() {
        let ds = sample();
        // Lyman alpha sits at 1215.67 in the sample catalog.
        let hit = ds.lines_in_range(1215.0, 1216.0);
        assert!(hit.iter().any(|l| (l.wavelength - 1215.67).abs() < 1e-6));

        let miss = ds.lines_in_range(1215.67 + 1e-9, 1216.0);
        assert!(miss.iter().all(|l| l.wavelength > 1215.67));

        let empty = ds.lines_in_range(5.0, 6.0);
        assert!(empty.is_empty());
    }

    #[test]
    fn lines_for_ion_filters_both_keys() {
        let ds = sample();
        for line in ds.lines_for_ion(1, 1) {
            assert_eq!((line.z, line.istate), (1, 1));
        }
        assert!(!ds.lines_for_ion(1, 1).is_empty());
    }

    #[test]
    fn discover_lists_adx_files_sorted() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("b.adx"), "").expect("write");
        fs::write(dir.path().join("a.adx"), "").expect("write");
        fs::write(dir.path().join("notes.txt"), "").expect("write");

        let found = discover(dir.path()).expect("discover");
        let names: Vec<&str> = found.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn discover_missing_dir_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let found = discover(&dir.path().join("nope")).expect("discover");
        assert!(found.is_empty());
    }
}
