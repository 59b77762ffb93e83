use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::info;

use crate::error::{CreditError, Result};
use crate::fmt::{money, number};
use crate::models::{TaxCreditRecord, DELIMITER, FIELD_NAMES};
use crate::reports;

const REPORT_TOP_N: usize = 5;

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// Header row plus one line per record, in the column order the parser reads.
pub fn to_delimited_text(records: &[TaxCreditRecord]) -> Result<String> {
    if records.is_empty() {
        return Err(CreditError::EmptyExport);
    }

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());
    wtr.write_record(FIELD_NAMES)?;
    for r in records {
        wtr.write_record(r.to_fields())?;
    }
    let bytes = wtr.into_inner().map_err(|e| CreditError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ---------------------------------------------------------------------------
// Summary report
// ---------------------------------------------------------------------------

fn section(out: &mut String, title: &str) {
    out.push_str(&format!("\n{title}\n{}\n", "=".repeat(title.len())));
}

/// Plain-text report over `records`. All figures come from the aggregation
/// functions in `reports`, so they match the on-screen summary.
pub fn to_summary_report(records: &[TaxCreditRecord], generated: NaiveDate) -> Result<String> {
    if records.is_empty() {
        return Err(CreditError::EmptyExport);
    }

    let summary = reports::summarize(records);
    let states = reports::top_n(reports::by_state(records), REPORT_TOP_N);
    let credit_types = reports::top_n(reports::by_credit_type(records), REPORT_TOP_N);
    let yearly = reports::by_year(records);

    let mut out = format!(
        "TAX CREDIT UTILIZATION SUMMARY REPORT\nGenerated: {}\n",
        generated.format("%Y-%m-%d")
    );

    section(&mut out, "OVERVIEW");
    if let Some((min, max)) = summary.year_range {
        out.push_str(&format!("Data Period: {min} - {max}\n"));
    }
    out.push_str(&format!(
        "Total Claims Amount: {}\n\
         Total Claims Count: {}\n\
         Average Claim Amount: {}\n\
         States Covered: {}\n\
         Credit Types: {}\n",
        money(summary.total_amount),
        number(summary.total_claims),
        money(summary.avg_claim_size),
        summary.state_count,
        summary.credit_type_count
    ));

    section(&mut out, &format!("TOP {REPORT_TOP_N} STATES BY AMOUNT"));
    for (i, s) in states.iter().enumerate() {
        out.push_str(&format!("{}. {}: {}\n", i + 1, s.key, money(s.total_amount)));
    }

    section(&mut out, &format!("TOP {REPORT_TOP_N} CREDIT TYPES BY AMOUNT"));
    for (i, c) in credit_types.iter().enumerate() {
        out.push_str(&format!("{}. {}: {}\n", i + 1, c.key, money(c.total_amount)));
    }

    section(&mut out, "YEAR-BY-YEAR BREAKDOWN");
    for y in &yearly {
        out.push_str(&format!(
            "{}: {} ({} claims)\n",
            y.key,
            money(y.total_amount),
            number(y.total_claims)
        ));
    }

    Ok(out)
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// `<prefix>_<YYYY-MM-DD>.<ext>`
pub fn export_filename(prefix: &str, date: NaiveDate, ext: &str) -> String {
    format!("{prefix}_{}.{ext}", date.format("%Y-%m-%d"))
}

pub fn write_export(path: &Path, contents: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)?;
    info!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(path.to_path_buf())
}
