use std::path::Path;

use log::{debug, info};

use crate::error::{CreditError, Result};
use crate::models::{TaxCreditRecord, DELIMITER, FIELD_NAMES};

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

/// Parse a whole-number field. Decimal input is truncated; anything else is 0.
pub fn parse_int(raw: &str) -> i64 {
    let s = raw.trim();
    if let Ok(v) = s.parse::<i64>() {
        return v;
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => v.trunc() as i64,
        _ => 0,
    }
}

/// A year outside the `i32` range is 0 like any other unusable token.
pub fn parse_year(raw: &str) -> i32 {
    i32::try_from(parse_int(raw)).unwrap_or(0)
}

/// Parse a monetary field. Non-numeric or non-finite input is 0.
pub fn parse_amount(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

fn text(raw: Option<&str>) -> String {
    raw.map(|s| s.trim().to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// parse_records
// ---------------------------------------------------------------------------

pub struct ImportResult {
    pub records: Vec<TaxCreditRecord>,
    pub skipped: usize,
}

/// Turn raw delimited text into records.
///
/// The first line is a header and is otherwise ignored; columns are taken by
/// position. Rows with fewer than eight fields are dropped and counted in
/// `skipped`. Quotes carry no special meaning.
pub fn parse_records(input: &str) -> Result<ImportResult> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(input.as_bytes());

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in rdr.records().enumerate() {
        let row = result?;
        if row.len() < FIELD_NAMES.len() {
            debug!("skipping row {}: {} of {} fields", i + 1, row.len(), FIELD_NAMES.len());
            skipped += 1;
            continue;
        }
        records.push(TaxCreditRecord {
            year: parse_year(&row[0]),
            state: text(row.get(1)),
            credit_type: text(row.get(2)),
            sector: text(row.get(3)),
            claimed_amount: parse_amount(&row[4]),
            claims_count: parse_int(&row[5]),
            income_bracket: text(row.get(6)),
            source: text(row.get(7)),
        });
    }

    if records.is_empty() {
        return Err(CreditError::EmptyDataset);
    }

    info!("parsed {} records ({} rows skipped)", records.len(), skipped);
    Ok(ImportResult { records, skipped })
}

/// Read a UTF-8 CSV file and parse it.
pub fn load_file(file_path: &Path) -> Result<ImportResult> {
    let content = std::fs::read_to_string(file_path)?;
    parse_records(&content)
}
