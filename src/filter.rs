use std::collections::BTreeSet;

use log::debug;

use crate::error::{CreditError, Result};
use crate::models::{Dimension, TaxCreditRecord};

// ---------------------------------------------------------------------------
// FilterSelection
// ---------------------------------------------------------------------------

/// Selected values per dimension. An empty set places no restriction on its
/// dimension; a record must match every non-empty set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub years: BTreeSet<i32>,
    pub states: BTreeSet<String>,
    pub credit_types: BTreeSet<String>,
    pub sectors: BTreeSet<String>,
    pub income_brackets: BTreeSet<String>,
}

fn parse_year(value: &str) -> Result<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| CreditError::InvalidFilterValue {
            dimension: Dimension::Year.label().to_string(),
            value: value.to_string(),
        })
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    fn text_set(&mut self, dimension: Dimension) -> Option<&mut BTreeSet<String>> {
        match dimension {
            Dimension::Year => None,
            Dimension::State => Some(&mut self.states),
            Dimension::CreditType => Some(&mut self.credit_types),
            Dimension::Sector => Some(&mut self.sectors),
            Dimension::IncomeBracket => Some(&mut self.income_brackets),
        }
    }

    /// Select a value. Adding a value already present is a no-op.
    /// Year values must parse as integers.
    pub fn add(&mut self, dimension: Dimension, value: &str) -> Result<()> {
        if dimension == Dimension::Year {
            self.years.insert(parse_year(value)?);
        } else if let Some(set) = self.text_set(dimension) {
            set.insert(value.to_string());
        }
        Ok(())
    }

    /// Deselect a value. Removing an absent value is a no-op.
    pub fn remove(&mut self, dimension: Dimension, value: &str) -> Result<()> {
        if dimension == Dimension::Year {
            self.years.remove(&parse_year(value)?);
        } else if let Some(set) = self.text_set(dimension) {
            set.remove(value);
        }
        Ok(())
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    pub fn contains(&self, dimension: Dimension, value: &str) -> bool {
        match dimension {
            Dimension::Year => parse_year(value).is_ok_and(|y| self.years.contains(&y)),
            Dimension::State => self.states.contains(value),
            Dimension::CreditType => self.credit_types.contains(value),
            Dimension::Sector => self.sectors.contains(value),
            Dimension::IncomeBracket => self.income_brackets.contains(value),
        }
    }

    /// Number of selected values across all dimensions.
    pub fn active_count(&self) -> usize {
        self.years.len()
            + self.states.len()
            + self.credit_types.len()
            + self.sectors.len()
            + self.income_brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Whether a single record passes every non-empty dimension.
    pub fn matches(&self, record: &TaxCreditRecord) -> bool {
        fn admits(set: &BTreeSet<String>, value: &str) -> bool {
            set.is_empty() || set.contains(value)
        }
        (self.years.is_empty() || self.years.contains(&record.year))
            && admits(&self.states, &record.state)
            && admits(&self.credit_types, &record.credit_type)
            && admits(&self.sectors, &record.sector)
            && admits(&self.income_brackets, &record.income_bracket)
    }
}

// ---------------------------------------------------------------------------
// apply
// ---------------------------------------------------------------------------

/// Records passing `selection`, in their original order.
pub fn apply(records: &[TaxCreditRecord], selection: &FilterSelection) -> Vec<TaxCreditRecord> {
    let active: Vec<TaxCreditRecord> = records
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect();
    debug!(
        "filter: {} of {} records pass ({} values selected)",
        active.len(),
        records.len(),
        selection.active_count()
    );
    active
}

// ---------------------------------------------------------------------------
// Distinct values for selection controls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionValues {
    /// Newest first.
    pub years: Vec<i32>,
    pub states: Vec<String>,
    pub credit_types: Vec<String>,
    pub sectors: Vec<String>,
    pub income_brackets: Vec<String>,
}

impl DimensionValues {
    /// Values of one dimension rendered as text, in display order.
    pub fn get(&self, dimension: Dimension) -> Vec<String> {
        match dimension {
            Dimension::Year => self.years.iter().map(|y| y.to_string()).collect(),
            Dimension::State => self.states.clone(),
            Dimension::CreditType => self.credit_types.clone(),
            Dimension::Sector => self.sectors.clone(),
            Dimension::IncomeBracket => self.income_brackets.clone(),
        }
    }
}

/// Distinct values per dimension: years descending, text ascending.
pub fn distinct_values(records: &[TaxCreditRecord]) -> DimensionValues {
    let mut years = BTreeSet::new();
    let mut states = BTreeSet::new();
    let mut credit_types = BTreeSet::new();
    let mut sectors = BTreeSet::new();
    let mut income_brackets = BTreeSet::new();

    for r in records {
        years.insert(r.year);
        states.insert(r.state.clone());
        credit_types.insert(r.credit_type.clone());
        sectors.insert(r.sector.clone());
        income_brackets.insert(r.income_bracket.clone());
    }

    DimensionValues {
        years: years.into_iter().rev().collect(),
        states: states.into_iter().collect(),
        credit_types: credit_types.into_iter().collect(),
        sectors: sectors.into_iter().collect(),
        income_brackets: income_brackets.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record;

    fn sample() -> Vec<TaxCreditRecord> {
        vec![
            record(2020, "CA", "R&D", "Tech", 100.0, 1),
            record(2021, "NY", "WOTC", "Retail", 200.0, 2),
            record(2021, "CA", "WOTC", "Tech", 300.0, 3),
            record(2022, "TX", "R&D", "Energy", 400.0, 4),
        ]
    }

    #[test]
    fn test_empty_selection_passes_everything() {
        let data = sample();
        let active = apply(&data, &FilterSelection::new());
        assert_eq!(active, data);
    }

    #[test]
    fn test_or_within_dimension() {
        let data = sample();
        let mut sel = FilterSelection::new();
        sel.add(Dimension::State, "CA").unwrap();
        sel.add(Dimension::State, "TX").unwrap();
        let states: Vec<_> = apply(&data, &sel).into_iter().map(|r| r.state).collect();
        assert_eq!(states, vec!["CA", "CA", "TX"]);
    }

    #[test]
    fn test_and_across_dimensions() {
        let data = sample();
        let mut sel = FilterSelection::new();
        sel.add(Dimension::State, "CA").unwrap();
        sel.add(Dimension::Year, "2021").unwrap();
        let active = apply(&data, &sel);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].claimed_amount, 300.0);
    }

    #[test]
    fn test_value_absent_from_data_excludes_all() {
        let data = sample();
        let mut sel = FilterSelection::new();
        sel.add(Dimension::Sector, "Mining").unwrap();
        assert!(apply(&data, &sel).is_empty());
    }

    #[test]
    fn test_remove_restores_records() {
        let data = sample();
        let mut sel = FilterSelection::new();
        sel.add(Dimension::CreditType, "R&D").unwrap();
        assert_eq!(apply(&data, &sel).len(), 2);
        sel.remove(Dimension::CreditType, "R&D").unwrap();
        assert_eq!(apply(&data, &sel).len(), 4);
    }

    #[test]
    fn test_add_and_remove_are_idempotent() {
        let mut sel = FilterSelection::new();
        sel.add(Dimension::IncomeBracket, "High").unwrap();
        sel.add(Dimension::IncomeBracket, "High").unwrap();
        assert_eq!(sel.active_count(), 1);
        sel.remove(Dimension::IncomeBracket, "Low").unwrap();
        assert_eq!(sel.active_count(), 1);
        sel.remove(Dimension::IncomeBracket, "High").unwrap();
        sel.remove(Dimension::IncomeBracket, "High").unwrap();
        assert!(sel.is_empty());
    }

    #[test]
    fn test_clear_all() {
        let mut sel = FilterSelection::new();
        sel.add(Dimension::Year, "2020").unwrap();
        sel.add(Dimension::State, "CA").unwrap();
        sel.add(Dimension::Sector, "Tech").unwrap();
        assert_eq!(sel.active_count(), 3);
        sel.clear_all();
        assert!(sel.is_empty());
    }

    #[test]
    fn test_invalid_year_value() {
        let mut sel = FilterSelection::new();
        let err = sel.add(Dimension::Year, "twenty").err().unwrap();
        assert!(err.to_string().contains("twenty"), "got: {err}");
        assert!(sel.is_empty());
    }

    #[test]
    fn test_contains() {
        let mut sel = FilterSelection::new();
        sel.add(Dimension::Year, " 2020 ").unwrap();
        assert!(sel.contains(Dimension::Year, "2020"));
        assert!(!sel.contains(Dimension::State, "2020"));
    }

    #[test]
    fn test_distinct_values_ordering() {
        let values = distinct_values(&sample());
        assert_eq!(values.years, vec![2022, 2021, 2020]);
        assert_eq!(values.states, vec!["CA", "NY", "TX"]);
        assert_eq!(values.credit_types, vec!["R&D", "WOTC"]);
        assert_eq!(values.sectors, vec!["Energy", "Retail", "Tech"]);
        assert_eq!(values.income_brackets, vec!["High"]);
        assert_eq!(values.get(Dimension::Year), vec!["2022", "2021", "2020"]);
    }
}
