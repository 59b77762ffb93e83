use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{load_session, status_line, FilterArgs};
use crate::error::Result;
use crate::filter::DimensionValues;
use crate::fmt::{money, number, signed_pct};
use crate::models::Dimension;
use crate::reports::{self, AggregateRow, Dashboard, SummaryMetrics};

const NO_MATCHES: &str = "No records match the current filters.";

// ---------------------------------------------------------------------------
// Command wrappers
// ---------------------------------------------------------------------------

pub fn summary(file: &Path, filters: &FilterArgs) -> Result<()> {
    let session = load_session(file, filters)?;
    println!("{}", status_line(&session));
    if session.active().is_empty() {
        println!("{NO_MATCHES}");
        return Ok(());
    }
    println!("{}", format_summary(&session.summary()));
    Ok(())
}

pub fn breakdown(
    file: &Path,
    dimension: Dimension,
    top: Option<usize>,
    filters: &FilterArgs,
) -> Result<()> {
    let session = load_session(file, filters)?;
    println!("{}", status_line(&session));
    if session.active().is_empty() {
        println!("{NO_MATCHES}");
        return Ok(());
    }
    let mut rows = reports::breakdown(session.active(), dimension);
    if let Some(n) = top {
        rows.truncate(n);
    }
    println!("{}", format_breakdown(dimension, &rows));
    Ok(())
}

pub fn trends(file: &Path, filters: &FilterArgs) -> Result<()> {
    let session = load_session(file, filters)?;
    println!("{}", status_line(&session));
    if session.active().is_empty() {
        println!("{NO_MATCHES}");
        return Ok(());
    }
    println!("{}", format_trends(&session.dashboard()));
    Ok(())
}

pub fn values(file: &Path) -> Result<()> {
    let session = load_session(file, &FilterArgs::default())?;
    println!("{}", format_values(&session.values()));
    Ok(())
}

// ---------------------------------------------------------------------------
// Pure formatting functions (aggregates → String)
// ---------------------------------------------------------------------------

pub fn format_summary(s: &SummaryMetrics) -> String {
    let period = s
        .year_range
        .map(|(min, max)| format!("From {min} to {max}"))
        .unwrap_or_default();

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value", "Detail"]);
    table.add_row(vec![
        Cell::new("Total Claims Amount".bold()),
        Cell::new(money(s.total_amount)),
        Cell::new(&period),
    ]);
    table.add_row(vec![
        Cell::new("Total Claims Count".bold()),
        Cell::new(number(s.total_claims)),
        Cell::new(format!("Average: {} per claim", money(s.avg_claim_size))),
    ]);
    table.add_row(vec![
        Cell::new("States Covered".bold()),
        Cell::new(s.state_count),
        Cell::new(format!("Top state: {}", s.top_state.as_deref().unwrap_or("-"))),
    ]);
    table.add_row(vec![
        Cell::new("Credit Types".bold()),
        Cell::new(s.credit_type_count),
        Cell::new("Different tax credit programs"),
    ]);
    table.add_row(vec![
        Cell::new("Sectors".bold()),
        Cell::new(s.sector_count),
        Cell::new(""),
    ]);

    let growth = signed_pct(s.growth_rate);
    let growth = if s.growth_rate < 0.0 {
        growth.red()
    } else {
        growth.green()
    };
    table.add_row(vec![
        Cell::new("Growth Rate".bold()),
        Cell::new(growth),
        Cell::new("Earliest to latest year"),
    ]);
    table.add_row(vec![
        Cell::new("Market Concentration".bold()),
        Cell::new(format!("{:.1}%", s.market_concentration)),
        Cell::new("Top 3 states' share of amount"),
    ]);

    format!("Tax Credit Summary\n{table}")
}

pub fn format_breakdown(dimension: Dimension, rows: &[AggregateRow<String>]) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        dimension.label(),
        "Amount",
        "%",
        "Claims",
        "Avg Claim",
        "Claims / $1M",
    ]);
    for r in rows {
        table.add_row(vec![
            Cell::new(&r.key),
            Cell::new(money(r.total_amount)),
            Cell::new(format!("{:.1}%", r.pct)),
            Cell::new(number(r.total_claims)),
            Cell::new(money(r.avg_claim_size)),
            Cell::new(format!("{:.2}", r.efficiency)),
        ]);
    }
    let total: f64 = rows.iter().map(|r| r.total_amount).sum();
    let claims = rows
        .iter()
        .map(|r| r.total_claims)
        .fold(0i64, i64::saturating_add);
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(total)),
        Cell::new(""),
        Cell::new(number(claims)),
        Cell::new(""),
        Cell::new(""),
    ]);
    format!("By {}\n{table}", dimension.label())
}

fn amount_table<K: ToString>(header: &str, rows: &[AggregateRow<K>], share: bool) -> Table {
    let mut table = Table::new();
    if share {
        table.set_header(vec![header, "Amount", "Share"]);
    } else {
        table.set_header(vec![header, "Amount", "Claims"]);
    }
    for r in rows {
        let last = if share {
            format!("{:.1}%", r.pct)
        } else {
            number(r.total_claims)
        };
        table.add_row(vec![
            Cell::new(r.key.to_string()),
            Cell::new(money(r.total_amount)),
            Cell::new(last),
        ]);
    }
    table
}

pub fn format_trends(d: &Dashboard) -> String {
    let mut out = format!(
        "Yearly Trend\n{}",
        amount_table("Year", &d.yearly, false)
    );

    out.push_str(&format!(
        "\n\nTop Credit Types\n{}",
        amount_table("Credit Type", &d.credit_types, false)
    ));

    out.push_str(&format!(
        "\n\nTop {} States\n{}",
        reports::TOP_STATES,
        amount_table("State", &d.states, true)
    ));

    let shares: Vec<String> = d
        .states_compact
        .iter()
        .map(|s| format!("{} {:.0}%", s.key, s.pct))
        .collect();
    out.push_str(&format!("\n\nState Share\n{}", shares.join("  ")));

    let mut sectors = Table::new();
    sectors.set_header(vec!["Sector", "Amount", "Claims", "Claims / $1M"]);
    for s in &d.sectors {
        sectors.add_row(vec![
            Cell::new(&s.key),
            Cell::new(money(s.total_amount)),
            Cell::new(number(s.total_claims)),
            Cell::new(format!("{:.2}", s.efficiency)),
        ]);
    }
    out.push_str(&format!("\n\nSectors\n{sectors}"));

    let mut brackets = Table::new();
    brackets.set_header(vec!["Income Bracket", "Amount", "Claims", "Avg Claim"]);
    for b in &d.income_brackets {
        brackets.add_row(vec![
            Cell::new(&b.key),
            Cell::new(money(b.total_amount)),
            Cell::new(number(b.total_claims)),
            Cell::new(money(b.avg_claim_size)),
        ]);
    }
    out.push_str(&format!("\n\nIncome Brackets\n{brackets}"));
    out
}

pub fn format_values(values: &DimensionValues) -> String {
    Dimension::ALL
        .iter()
        .map(|d| format!("{}: {}", d.label().bold(), values.get(*d).join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}
