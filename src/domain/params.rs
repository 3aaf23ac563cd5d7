//! Run parameters for an export.

use super::instrument::{InstrumentRecord, UniverseScope};
use super::merge::Filters;
use std::collections::HashSet;
use std::path::PathBuf;

pub const DEFAULT_OUTFILE: &str = "bonds_today.xlsx";

#[derive(Debug, Clone, PartialEq)]
pub struct ExportParams {
    pub outfile: PathBuf,
    pub scope: UniverseScope,
    pub filters: Filters,
    /// Upper-cased ISINs; empty means every instrument in scope.
    pub only_isins: Vec<String>,
}

impl Default for ExportParams {
    fn default() -> Self {
        Self {
            outfile: PathBuf::from(DEFAULT_OUTFILE),
            scope: UniverseScope::Base,
            filters: Filters::default(),
            only_isins: Vec::new(),
        }
    }
}

impl ExportParams {
    /// Keep only the allow-listed instruments, preserving catalog order.
    pub fn restrict(&self, catalog: Vec<InstrumentRecord>) -> Vec<InstrumentRecord> {
        if self.only_isins.is_empty() {
            return catalog;
        }
        let allowed: HashSet<&str> = self.only_isins.iter().map(String::as_str).collect();
        catalog
            .into_iter()
            .filter(|r| allowed.contains(r.isin.as_str()))
            .collect()
    }
}

/// Split a comma-separated ISIN list. Blank entries are dropped, the rest
/// are trimmed, upper-cased and de-duplicated in first-seen order.
pub fn parse_isin_list(input: &str) -> Vec<String> {
    normalize_isins(input.split(','))
}

pub fn normalize_isins<'a, I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut isins = Vec::new();
    let mut seen = HashSet::new();

    for item in items {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            continue;
        }
        let isin = trimmed.to_uppercase();
        if seen.insert(isin.clone()) {
            isins.push(isin);
        }
    }
    isins
}
