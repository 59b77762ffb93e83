use std::path::Path;

use log::info;

use crate::error::Result;
use crate::filter::{self, DimensionValues, FilterSelection};
use crate::importer::{self, ImportResult};
use crate::models::{Dimension, TaxCreditRecord};
use crate::reports::{self, Dashboard, SummaryMetrics};

/// The loaded record set plus the current filter selection.
///
/// Every change re-filters from the full set, so removing a filter value
/// always brings back the records it excluded. A failed load leaves the
/// previous state untouched.
#[derive(Debug, Default)]
pub struct Session {
    records: Vec<TaxCreditRecord>,
    selection: FilterSelection,
    active: Vec<TaxCreditRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record set with the rows parsed from `text`.
    /// Filters are reset.
    pub fn load_text(&mut self, text: &str) -> Result<usize> {
        let parsed = importer::parse_records(text)?;
        Ok(self.replace(parsed))
    }

    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let parsed = importer::load_file(path)?;
        info!("loaded {}", path.display());
        Ok(self.replace(parsed))
    }

    fn replace(&mut self, parsed: ImportResult) -> usize {
        self.active = parsed.records.clone();
        self.records = parsed.records;
        self.selection = FilterSelection::new();
        parsed.skipped
    }

    pub fn add_filter(&mut self, dimension: Dimension, value: &str) -> Result<()> {
        let mut next = self.selection.clone();
        next.add(dimension, value)?;
        self.set_selection(next);
        Ok(())
    }

    pub fn remove_filter(&mut self, dimension: Dimension, value: &str) -> Result<()> {
        let mut next = self.selection.clone();
        next.remove(dimension, value)?;
        self.set_selection(next);
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.set_selection(FilterSelection::new());
    }

    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.active = filter::apply(&self.records, &selection);
        self.selection = selection;
    }

    pub fn records(&self) -> &[TaxCreditRecord] {
        &self.records
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn active(&self) -> &[TaxCreditRecord] {
        &self.active
    }

    /// Selection-control values, drawn from the full set.
    pub fn values(&self) -> DimensionValues {
        filter::distinct_values(&self.records)
    }

    pub fn summary(&self) -> SummaryMetrics {
        reports::summarize(&self.active)
    }

    pub fn dashboard(&self) -> Dashboard {
        reports::dashboard(&self.active)
    }
}
