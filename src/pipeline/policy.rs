//! Policy-renewal pipeline
//!
//! Flattens members' policies into one row per (member, policy) pair,
//! classifies each against today's date, attaches advisor and branch,
//! then filters, sorts and paginates. The same classified rows feed the
//! renewal summary counters, so the list and the counters can never
//! disagree.

use super::{cmp_ci, cmp_f64, paginate, Page, SortDirection};
use crate::model::{
    BranchId, CommissionStatus, MemberId, PolicyId, RenewalStatus, UserId,
};
use crate::scope::Viewer;
use crate::store::CrmStore;
use chrono::NaiveDate;
use rustc_hash::FxHashSet;

/// One derived (member, policy) row
#[derive(Debug, Clone)]
pub struct PolicyRow {
    /// First-seen sequence, also the default sort key
    pub seq: usize,
    pub member_id: MemberId,
    pub member_name: String,
    pub policy_id: PolicyId,
    pub policy_type: String,
    pub premium: f64,
    pub coverage: f64,
    pub renewal_date: NaiveDate,
    pub days_left: i64,
    pub status: RenewalStatus,
    pub advisor_id: Option<UserId>,
    pub advisor_name: String,
    pub branch_id: Option<BranchId>,
    pub branch_name: String,
    pub commission_status: Option<CommissionStatus>,
}

/// Caller-controlled filters. Empty sets and `None` bounds mean
/// "no restriction"; premium bounds left empty behave as the observed
/// min/max across all policies.
#[derive(Debug, Clone, Default)]
pub struct PolicyFilters {
    pub advisors: FxHashSet<UserId>,
    pub branches: FxHashSet<BranchId>,
    pub premium_min: Option<f64>,
    pub premium_max: Option<f64>,
    pub renewal_from: Option<NaiveDate>,
    /// Inclusive through the end of this day
    pub renewal_to: Option<NaiveDate>,
    /// `None` is the "All" setting
    pub commission: Option<CommissionStatus>,
}

/// Sort keys for the policy list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicySortKey {
    #[default]
    Sequence,
    MemberName,
    PolicyType,
    Premium,
    RenewalDate,
    DaysLeft,
    Status,
    Advisor,
    Branch,
}

/// Renewal summary counters over the classified rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolicySummary {
    pub total: usize,
    pub due_in_7: usize,
    pub due_in_30: usize,
    pub overdue: usize,
}

/// Classify a policy by whole days until renewal. Day zero and day 30
/// are both Pending; Overdue starts strictly below zero.
pub fn classify(days_left: i64) -> RenewalStatus {
    if days_left < 0 {
        RenewalStatus::Overdue
    } else if days_left <= 30 {
        RenewalStatus::Pending
    } else {
        RenewalStatus::Active
    }
}

/// Flatten every member visible to `viewer` into classified policy rows,
/// in first-seen order. Family-holder policies on non-SPOC members never
/// produce a row.
pub fn derive_rows(store: &CrmStore, viewer: &Viewer, today: NaiveDate) -> Vec<PolicyRow> {
    let mut rows = Vec::new();
    for member in store.members().filter(|m| viewer.can_see_member(m)) {
        let advisor_id = member.primary_advisor().cloned();
        let advisor_name = store.advisor_name(advisor_id.as_ref());
        let branch_id = advisor_id
            .as_ref()
            .and_then(|id| store.user_branch_id(id))
            .cloned();
        let branch_name = store.user_branch_name(advisor_id.as_ref());

        for policy in member.visible_policies() {
            let days_left = policy.days_left(today);
            rows.push(PolicyRow {
                seq: rows.len(),
                member_id: member.id.clone(),
                member_name: member.name.clone(),
                policy_id: policy.id.clone(),
                policy_type: policy.policy_type.clone(),
                premium: policy.premium,
                coverage: policy.coverage,
                renewal_date: policy.renewal_date,
                days_left,
                status: classify(days_left),
                advisor_id: advisor_id.clone(),
                advisor_name: advisor_name.clone(),
                branch_id: branch_id.clone(),
                branch_name: branch_name.clone(),
                commission_status: policy.commission.as_ref().map(|c| c.status),
            });
        }
    }
    rows
}

/// Observed premium bounds across a row set, used to seed the filter UI
/// when the caller has not narrowed the range
pub fn premium_bounds(rows: &[PolicyRow]) -> Option<(f64, f64)> {
    let mut bounds: Option<(f64, f64)> = None;
    for row in rows {
        bounds = Some(match bounds {
            None => (row.premium, row.premium),
            Some((lo, hi)) => (lo.min(row.premium), hi.max(row.premium)),
        });
    }
    bounds
}

fn matches(row: &PolicyRow, filters: &PolicyFilters) -> bool {
    if !filters.advisors.is_empty() {
        match &row.advisor_id {
            Some(id) if filters.advisors.contains(id) => {}
            _ => return false,
        }
    }
    if !filters.branches.is_empty() {
        match &row.branch_id {
            Some(id) if filters.branches.contains(id) => {}
            _ => return false,
        }
    }
    if let Some(min) = filters.premium_min {
        if row.premium < min {
            return false;
        }
    }
    if let Some(max) = filters.premium_max {
        if row.premium > max {
            return false;
        }
    }
    if let Some(from) = filters.renewal_from {
        if row.renewal_date < from {
            return false;
        }
    }
    if let Some(to) = filters.renewal_to {
        // Dates are day-truncated, so <= is inclusive of the whole end day
        if row.renewal_date > to {
            return false;
        }
    }
    if let Some(wanted) = filters.commission {
        if row.commission_status != Some(wanted) {
            return false;
        }
    }
    true
}

fn sort_rows(rows: &mut [PolicyRow], key: PolicySortKey, direction: SortDirection) {
    // sort_by is stable: equal keys keep first-seen order
    rows.sort_by(|a, b| {
        let ord = match key {
            PolicySortKey::Sequence => a.seq.cmp(&b.seq),
            PolicySortKey::MemberName => cmp_ci(&a.member_name, &b.member_name),
            PolicySortKey::PolicyType => cmp_ci(&a.policy_type, &b.policy_type),
            PolicySortKey::Premium => cmp_f64(a.premium, b.premium),
            PolicySortKey::RenewalDate => a.renewal_date.cmp(&b.renewal_date),
            PolicySortKey::DaysLeft => a.days_left.cmp(&b.days_left),
            PolicySortKey::Status => a.status.cmp(&b.status),
            PolicySortKey::Advisor => cmp_ci(&a.advisor_name, &b.advisor_name),
            PolicySortKey::Branch => cmp_ci(&a.branch_name, &b.branch_name),
        };
        direction.apply(ord)
    });
}

/// Run the full pipeline: derive, filter, sort, paginate
pub fn run(
    store: &CrmStore,
    viewer: &Viewer,
    today: NaiveDate,
    filters: &PolicyFilters,
    sort: PolicySortKey,
    direction: SortDirection,
    page: usize,
) -> Page<PolicyRow> {
    let mut rows = derive_rows(store, viewer, today);
    rows.retain(|r| matches(r, filters));
    sort_rows(&mut rows, sort, direction);
    paginate(rows, page)
}

/// Summary counters over already-derived rows (pre-pagination)
pub fn summarize(rows: &[PolicyRow]) -> PolicySummary {
    let mut summary = PolicySummary {
        total: rows.len(),
        ..Default::default()
    };
    for row in rows {
        match row.status {
            RenewalStatus::Overdue => summary.overdue += 1,
            RenewalStatus::Pending => {
                summary.due_in_30 += 1;
                if row.days_left <= 7 {
                    summary.due_in_7 += 1;
                }
            }
            RenewalStatus::Active => {}
        }
    }
    summary
}
