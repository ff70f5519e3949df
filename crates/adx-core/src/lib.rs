//! Domain model and configuration for the adx atomic data browser.
//!
//! This crate knows nothing about terminals. It owns:
//! - the catalog data model (elements, ions, spectral lines) and its
//!   plain-text loader,
//! - configuration loading from `${ADX_HOME}/config.toml`.

pub mod catalog;
pub mod config;

pub use catalog::{CatalogEntry, Dataset, Element, Ion, SpectralLine};
pub use config::Config;
