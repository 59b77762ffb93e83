use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::models::{Dimension, TaxCreditRecord};

pub const TOP_CREDIT_TYPES: usize = 7;
pub const TOP_STATES: usize = 10;
pub const TOP_STATES_COMPACT: usize = 8;
const CONCENTRATION_STATES: usize = 3;

/// `num / den`, or 0 when the denominator is zero or the result is not finite.
pub fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        return 0.0;
    }
    let v = num / den;
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow<K> {
    pub key: K,
    pub total_amount: f64,
    pub total_claims: i64,
    pub record_count: usize,
    /// Dollars per claim.
    pub avg_claim_size: f64,
    /// Claims per million dollars claimed.
    pub efficiency: f64,
    /// Share of the subset's total amount, in percent.
    pub pct: f64,
}

struct Accum<K> {
    key: K,
    amount: f64,
    claims: i64,
    count: usize,
}

/// Single-pass reduction keyed by `key_fn`. Rows come back in the order
/// their key was first seen.
pub fn group_by<K, F>(records: &[TaxCreditRecord], key_fn: F) -> Vec<AggregateRow<K>>
where
    K: Eq + Hash + Clone,
    F: Fn(&TaxCreditRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Accum<K>> = Vec::new();
    let mut total = 0.0f64;

    for r in records {
        let key = key_fn(r);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(Accum {
                key,
                amount: 0.0,
                claims: 0,
                count: 0,
            });
            groups.len() - 1
        });
        let g = &mut groups[slot];
        g.amount += r.claimed_amount;
        g.claims = g.claims.saturating_add(r.claims_count);
        g.count += 1;
        total += r.claimed_amount;
    }

    groups
        .into_iter()
        .map(|g| AggregateRow {
            avg_claim_size: ratio(g.amount, g.claims as f64),
            efficiency: ratio(g.claims as f64, g.amount) * 1_000_000.0,
            pct: ratio(g.amount, total) * 100.0,
            key: g.key,
            total_amount: g.amount,
            total_claims: g.claims,
            record_count: g.count,
        })
        .collect()
}

/// Sort by amount descending. The sort is stable, so equal amounts keep
/// first-encountered order.
pub fn rank_by_amount<K>(mut rows: Vec<AggregateRow<K>>) -> Vec<AggregateRow<K>> {
    rows.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
    rows
}

pub fn top_n<K>(rows: Vec<AggregateRow<K>>, n: usize) -> Vec<AggregateRow<K>> {
    let mut rows = rank_by_amount(rows);
    rows.truncate(n);
    rows
}

/// Time series, ascending by year.
pub fn by_year(records: &[TaxCreditRecord]) -> Vec<AggregateRow<i32>> {
    let mut rows = group_by(records, |r| r.year);
    rows.sort_by_key(|r| r.key);
    rows
}

pub fn by_state(records: &[TaxCreditRecord]) -> Vec<AggregateRow<String>> {
    rank_by_amount(group_by(records, |r| r.state.clone()))
}

pub fn by_credit_type(records: &[TaxCreditRecord]) -> Vec<AggregateRow<String>> {
    rank_by_amount(group_by(records, |r| r.credit_type.clone()))
}

pub fn by_sector(records: &[TaxCreditRecord]) -> Vec<AggregateRow<String>> {
    rank_by_amount(group_by(records, |r| r.sector.clone()))
}

/// Ascending by bracket label.
pub fn by_income_bracket(records: &[TaxCreditRecord]) -> Vec<AggregateRow<String>> {
    let mut rows = group_by(records, |r| r.income_bracket.clone());
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    rows
}

/// Grouping table for any dimension with text keys: years ascending,
/// income brackets ascending, everything else by amount descending.
pub fn breakdown(records: &[TaxCreditRecord], dimension: Dimension) -> Vec<AggregateRow<String>> {
    match dimension {
        Dimension::Year => by_year(records)
            .into_iter()
            .map(|r| AggregateRow {
                key: r.key.to_string(),
                total_amount: r.total_amount,
                total_claims: r.total_claims,
                record_count: r.record_count,
                avg_claim_size: r.avg_claim_size,
                efficiency: r.efficiency,
                pct: r.pct,
            })
            .collect(),
        Dimension::State => by_state(records),
        Dimension::CreditType => by_credit_type(records),
        Dimension::Sector => by_sector(records),
        Dimension::IncomeBracket => by_income_bracket(records),
    }
}

// ---------------------------------------------------------------------------
// Derived metrics
// ---------------------------------------------------------------------------

/// Percent change from the earliest year's amount to the latest's. Needs at
/// least two years in `yearly` (ascending); otherwise 0.
pub fn growth_rate(yearly: &[AggregateRow<i32>]) -> f64 {
    match (yearly.first(), yearly.last()) {
        (Some(first), Some(last)) if yearly.len() >= 2 => {
            ratio(last.total_amount - first.total_amount, first.total_amount) * 100.0
        }
        _ => 0.0,
    }
}

/// Share of `total` held by the top three entries of `ranked_states`.
pub fn market_concentration(ranked_states: &[AggregateRow<String>], total: f64) -> f64 {
    let top: f64 = ranked_states
        .iter()
        .take(CONCENTRATION_STATES)
        .map(|s| s.total_amount)
        .sum();
    ratio(top, total) * 100.0
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    pub record_count: usize,
    pub total_amount: f64,
    pub total_claims: i64,
    pub state_count: usize,
    pub credit_type_count: usize,
    pub sector_count: usize,
    /// (earliest, latest); `None` for an empty subset.
    pub year_range: Option<(i32, i32)>,
    pub avg_claim_size: f64,
    pub growth_rate: f64,
    pub market_concentration: f64,
    pub top_state: Option<String>,
}

pub fn summarize(records: &[TaxCreditRecord]) -> SummaryMetrics {
    let yearly = by_year(records);
    let states = by_state(records);
    summary_from(records, &yearly, &states)
}

fn summary_from(
    records: &[TaxCreditRecord],
    yearly: &[AggregateRow<i32>],
    states: &[AggregateRow<String>],
) -> SummaryMetrics {
    let total_amount: f64 = records.iter().map(|r| r.claimed_amount).sum();
    let total_claims = records
        .iter()
        .map(|r| r.claims_count)
        .fold(0i64, i64::saturating_add);

    SummaryMetrics {
        record_count: records.len(),
        total_amount,
        total_claims,
        state_count: states.len(),
        credit_type_count: records
            .iter()
            .map(|r| r.credit_type.as_str())
            .collect::<HashSet<_>>()
            .len(),
        sector_count: records
            .iter()
            .map(|r| r.sector.as_str())
            .collect::<HashSet<_>>()
            .len(),
        year_range: yearly
            .first()
            .zip(yearly.last())
            .map(|(a, b)| (a.key, b.key)),
        avg_claim_size: ratio(total_amount, total_claims as f64),
        growth_rate: growth_rate(yearly),
        market_concentration: market_concentration(states, total_amount),
        top_state: states.first().map(|s| s.key.clone()),
    }
}

// ---------------------------------------------------------------------------
// Dashboard projection
// ---------------------------------------------------------------------------

/// Every chart-ready table for one subset, computed in one call.
pub struct Dashboard {
    pub summary: SummaryMetrics,
    pub yearly: Vec<AggregateRow<i32>>,
    pub credit_types: Vec<AggregateRow<String>>,
    pub states: Vec<AggregateRow<String>>,
    pub states_compact: Vec<AggregateRow<String>>,
    pub sectors: Vec<AggregateRow<String>>,
    pub income_brackets: Vec<AggregateRow<String>>,
}

pub fn dashboard(records: &[TaxCreditRecord]) -> Dashboard {
    let yearly = by_year(records);
    let all_states = by_state(records);
    let summary = summary_from(records, &yearly, &all_states);

    let mut states = all_states;
    states.truncate(TOP_STATES);
    let states_compact = states.iter().take(TOP_STATES_COMPACT).cloned().collect();

    Dashboard {
        summary,
        yearly,
        credit_types: top_n(group_by(records, |r| r.credit_type.clone()), TOP_CREDIT_TYPES),
        states,
        states_compact,
        sectors: by_sector(records),
        income_brackets: by_income_bracket(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn sample() -> Vec<TaxCreditRecord> {
        vec![
            record(2020, "CA", "R&D", "Tech", 1000.0, 2),
            record(2020, "CA", "R&D", "Tech", 500.0, 1),
            record(2021, "NY", "WOTC", "Retail", 250.0, 5),
            record(2022, "TX", "EITC", "Energy", 750.0, 0),
        ]
    }

    #[test]
    fn test_by_year_single_year() {
        let data = sample()[..2].to_vec();
        let rows = by_year(&data);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, 2020);
        assert_eq!(rows[0].total_amount, 1500.0);
        assert_eq!(rows[0].total_claims, 3);
        assert_eq!(rows[0].avg_claim_size, 500.0);
        assert_eq!(rows[0].record_count, 2);
    }

    #[test]
    fn test_by_year_ascending() {
        let mut data = sample();
        data.reverse();
        let years: Vec<i32> = by_year(&data).iter().map(|r| r.key).collect();
        assert_eq!(years, vec![2020, 2021, 2022]);
    }

    #[test]
    fn test_group_sums_match_subset_total() {
        let data = sample();
        let total: f64 = data.iter().map(|r| r.claimed_amount).sum();
        for dim in Dimension::ALL {
            let sum: f64 = breakdown(&data, dim).iter().map(|r| r.total_amount).sum();
            assert!(close(sum, total), "{dim}: {sum} != {total}");
            let pct: f64 = breakdown(&data, dim).iter().map(|r| r.pct).sum();
            assert!(close(pct, 100.0), "{dim}: pct {pct}");
        }
    }

    #[test]
    fn test_zero_denominators_yield_zero() {
        let data = vec![
            record(2020, "CA", "R&D", "Tech", 0.0, 0),
            record(2020, "NY", "R&D", "Tech", 100.0, 0),
        ];
        let rows = group_by(&data, |r| r.state.clone());
        assert_eq!(rows[0].avg_claim_size, 0.0);
        assert_eq!(rows[0].efficiency, 0.0);
        assert_eq!(rows[1].avg_claim_size, 0.0);
        assert_eq!(rows[1].efficiency, 0.0);
        let s = summarize(&[record(2020, "CA", "R&D", "Tech", 0.0, 0)]);
        assert_eq!(s.avg_claim_size, 0.0);
        assert_eq!(s.market_concentration, 0.0);
        assert_eq!(s.growth_rate, 0.0);
    }

    #[test]
    fn test_claim_totals_saturate() {
        let data = vec![
            record(2020, "CA", "R&D", "Tech", 1.0, i64::MAX),
            record(2020, "CA", "R&D", "Tech", 1.0, 1),
        ];
        let rows = by_year(&data);
        assert_eq!(rows[0].total_claims, i64::MAX);
        let s = summarize(&data);
        assert_eq!(s.total_claims, i64::MAX);
        assert!(s.avg_claim_size.is_finite());
        assert_eq!(dashboard(&data).states[0].total_claims, i64::MAX);
    }

    #[test]
    fn test_efficiency_is_claims_per_million() {
        let data = vec![record(2020, "CA", "R&D", "Tech", 500_000.0, 10)];
        let rows = by_sector(&data);
        assert!(close(rows[0].efficiency, 20.0));
    }

    #[test]
    fn test_growth_rate_two_years() {
        let data = vec![
            record(2020, "CA", "R&D", "Tech", 100.0, 1),
            record(2021, "CA", "R&D", "Tech", 150.0, 1),
        ];
        assert!(close(summarize(&data).growth_rate, 50.0));
    }

    #[test]
    fn test_growth_rate_uses_earliest_and_latest() {
        let data = vec![
            record(2022, "CA", "R&D", "Tech", 50.0, 1),
            record(2020, "CA", "R&D", "Tech", 200.0, 1),
            record(2021, "CA", "R&D", "Tech", 999.0, 1),
        ];
        assert!(close(summarize(&data).growth_rate, -75.0));
    }

    #[test]
    fn test_growth_rate_single_year_is_zero() {
        let data = sample()[..2].to_vec();
        assert_eq!(summarize(&data).growth_rate, 0.0);
    }

    #[test]
    fn test_growth_rate_zero_base_is_zero() {
        let data = vec![
            record(2020, "CA", "R&D", "Tech", 0.0, 1),
            record(2021, "CA", "R&D", "Tech", 150.0, 1),
        ];
        assert_eq!(summarize(&data).growth_rate, 0.0);
    }

    #[test]
    fn test_market_concentration_three_states() {
        let data = vec![
            record(2020, "CA", "R&D", "Tech", 60.0, 1),
            record(2020, "NY", "R&D", "Tech", 30.0, 1),
            record(2020, "TX", "R&D", "Tech", 10.0, 1),
        ];
        assert!(close(summarize(&data).market_concentration, 100.0));
    }

    #[test]
    fn test_market_concentration_top_three_of_four() {
        let data = vec![
            record(2020, "CA", "R&D", "Tech", 40.0, 1),
            record(2020, "NY", "R&D", "Tech", 30.0, 1),
            record(2020, "TX", "R&D", "Tech", 20.0, 1),
            record(2020, "WA", "R&D", "Tech", 10.0, 1),
        ];
        assert!(close(summarize(&data).market_concentration, 90.0));
    }

    #[test]
    fn test_ties_keep_first_encountered_order() {
        let data = vec![
            record(2020, "NV", "B", "Tech", 10.0, 1),
            record(2020, "AK", "A", "Tech", 10.0, 1),
            record(2020, "ZZ", "C", "Tech", 50.0, 1),
        ];
        let states: Vec<String> = by_state(&data).into_iter().map(|r| r.key).collect();
        assert_eq!(states, vec!["ZZ", "NV", "AK"]);
        let top = top_n(group_by(&data, |r| r.credit_type.clone()), 2);
        assert_eq!(top[0].key, "C");
        assert_eq!(top[1].key, "B");
    }

    #[test]
    fn test_summary_metrics() {
        let s = summarize(&sample());
        assert_eq!(s.record_count, 4);
        assert_eq!(s.total_amount, 2500.0);
        assert_eq!(s.total_claims, 8);
        assert_eq!(s.state_count, 3);
        assert_eq!(s.credit_type_count, 3);
        assert_eq!(s.sector_count, 3);
        assert_eq!(s.year_range, Some((2020, 2022)));
        assert_eq!(s.avg_claim_size, 312.5);
        assert_eq!(s.top_state.as_deref(), Some("CA"));
        assert!(close(s.growth_rate, -50.0));
    }

    #[test]
    fn test_summary_of_empty_subset() {
        let s = summarize(&[]);
        assert_eq!(s.record_count, 0);
        assert_eq!(s.total_amount, 0.0);
        assert_eq!(s.year_range, None);
        assert_eq!(s.top_state, None);
        assert_eq!(s.avg_claim_size, 0.0);
    }

    #[test]
    fn test_income_brackets_ascending() {
        let mut data = sample();
        data[0].income_bracket = "Low".to_string();
        data[2].income_bracket = "Middle".to_string();
        let keys: Vec<String> = by_income_bracket(&data).into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["High", "Low", "Middle"]);
    }

    #[test]
    fn test_dashboard_truncations() {
        let states = [
            "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID",
        ];
        let data: Vec<TaxCreditRecord> = states
            .iter()
            .enumerate()
            .map(|(i, s)| record(2020, s, &format!("C{i}"), "Tech", (i + 1) as f64, 1))
            .collect();
        let d = dashboard(&data);
        assert_eq!(d.states.len(), TOP_STATES);
        assert_eq!(d.states_compact.len(), TOP_STATES_COMPACT);
        assert_eq!(d.credit_types.len(), TOP_CREDIT_TYPES);
        assert_eq!(d.states[0].key, "ID");
        assert_eq!(d.credit_types[0].key, "C11");
        assert_eq!(d.summary.state_count, 12);
        assert_eq!(d.yearly.len(), 1);
    }
}
