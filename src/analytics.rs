//! Analytics aggregation
//!
//! Dashboard KPIs over the member/policy collections: premium totals,
//! renewal histogram, lead-source distribution, state table, and a
//! simulated growth curve. The growth series evenly distributes the
//! current member count over the trailing six months — a stand-in until
//! real creation history is wired through, so only its shape is worth
//! asserting on.

use crate::model::RenewalStatus;
use crate::pipeline::policy::classify;
use crate::source::SourceIndex;
use crate::store::CrmStore;
use chrono::{Datelike, NaiveDate};
use rustc_hash::FxHashMap;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One bucket of the 12-month forward renewal histogram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBucket {
    pub label: String,
    pub count: usize,
}

/// One point of the customer-growth series
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthPoint {
    pub label: String,
    pub count: f64,
    /// True for points contributed by the AI forecast
    pub forecast: bool,
}

/// Derived dashboard aggregates
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub total_premium: f64,
    pub avg_policies_per_customer: f64,
    pub overdue_count: usize,
    /// Renewals bucketed by calendar-month offset from today, wrapping
    pub renewals_by_month: Vec<MonthBucket>,
    /// Lead-source category → member count, descending
    pub lead_sources: Vec<(String, usize)>,
    /// Simulated cumulative growth over the trailing six months
    pub growth: Vec<GrowthPoint>,
    /// State → member count, descending
    pub states: Vec<(String, usize)>,
}

/// Build the dashboard from the loaded collections. Family-holder
/// policies on non-SPOC members stay out of every premium and renewal
/// figure, same as in the policy pipeline.
pub fn dashboard(store: &CrmStore, today: NaiveDate) -> Dashboard {
    let source_index = SourceIndex::new(store.source_nodes());

    let mut total_premium = 0.0;
    let mut policy_count = 0usize;
    let mut overdue_count = 0usize;
    let mut renewal_buckets = vec![0usize; 12];
    let mut source_counts: FxHashMap<String, usize> = FxHashMap::default();
    let mut state_counts: FxHashMap<String, usize> = FxHashMap::default();

    for member in store.members() {
        for policy in member.visible_policies() {
            total_premium += policy.premium;
            policy_count += 1;

            if classify(policy.days_left(today)) == RenewalStatus::Overdue {
                overdue_count += 1;
            }

            let months_out = (policy.renewal_date.year() - today.year()) * 12
                + (policy.renewal_date.month() as i32 - today.month() as i32);
            let bucket = months_out.rem_euclid(12) as usize;
            renewal_buckets[bucket] += 1;
        }

        let category = source_index.resolve_root(member.lead_source.source_id.as_ref());
        *source_counts.entry(category).or_default() += 1;

        let state = member
            .state
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        *state_counts.entry(state).or_default() += 1;
    }

    let member_count = store.member_count();
    let avg_policies_per_customer = if member_count == 0 {
        0.0
    } else {
        policy_count as f64 / member_count as f64
    };

    let renewals_by_month = renewal_buckets
        .into_iter()
        .enumerate()
        .map(|(offset, count)| MonthBucket {
            label: month_label(today, offset as i32),
            count,
        })
        .collect();

    Dashboard {
        total_premium,
        avg_policies_per_customer,
        overdue_count,
        renewals_by_month,
        lead_sources: sorted_desc(source_counts),
        growth: simulated_growth(member_count, today),
        states: sorted_desc(state_counts),
    }
}

fn month_label(today: NaiveDate, offset: i32) -> String {
    let index = ((today.month0() as i32 + offset).rem_euclid(12)) as usize;
    MONTH_NAMES[index].to_string()
}

fn sorted_desc(counts: FxHashMap<String, usize>) -> Vec<(String, usize)> {
    let mut rows: Vec<(String, usize)> = counts.into_iter().collect();
    // Secondary name ordering keeps equal counts deterministic
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}

/// Even cumulative distribution of the current member count over the
/// trailing six months, ending at the count itself. Placeholder until
/// real creation timestamps feed this series.
fn simulated_growth(member_count: usize, today: NaiveDate) -> Vec<GrowthPoint> {
    (0..6)
        .map(|i| GrowthPoint {
            label: month_label(today, i as i32 - 5),
            count: (member_count as f64 * (i + 1) as f64 / 6.0).round(),
            forecast: false,
        })
        .collect()
}

/// Splice an AI forecast onto the historical series. The last historical
/// point is repeated as the first forecast point so a charted line stays
/// continuous across the seam. An empty forecast returns the history
/// unchanged.
pub fn splice_forecast(history: &[GrowthPoint], forecast: &[GrowthPoint]) -> Vec<GrowthPoint> {
    let mut series = history.to_vec();
    if forecast.is_empty() {
        return series;
    }
    if let Some(last) = history.last() {
        series.push(GrowthPoint {
            forecast: true,
            ..last.clone()
        });
    }
    series.extend(forecast.iter().map(|p| GrowthPoint {
        forecast: true,
        ..p.clone()
    }));
    series
}
