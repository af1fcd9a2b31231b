use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::CatalogError;
use crate::models::College;

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<College>),
    Wrapped { colleges: Vec<College> },
}

/// Parses a catalog export: either a bare JSON array of colleges or an
/// object with a `colleges` array.
pub fn parse_colleges(raw: &str) -> Result<Vec<College>, CatalogError> {
    let parsed: CatalogFile = serde_json::from_str(raw)?;
    Ok(match parsed {
        CatalogFile::List(colleges) => colleges,
        CatalogFile::Wrapped { colleges } => colleges,
    })
}

pub fn load_colleges(path: &Path) -> Result<Vec<College>, CatalogError> {
    let raw = fs::read_to_string(path)?;
    parse_colleges(&raw)
}
