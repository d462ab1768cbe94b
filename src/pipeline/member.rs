//! Member-list pipeline
//!
//! Scope by role, intersect with an AI search result when one exists,
//! filter, sort, paginate. The AI contributes member ids only — the
//! locally-scoped set keeps authority over what the viewer may see, so
//! the displayed set is exactly scope ∩ match-set.

use super::{cmp_ci, cmp_missing_last, contains_ci, paginate, Page, SortDirection};
use crate::model::{Member, MemberId, MemberTier};
use crate::scope::Viewer;
use crate::store::CrmStore;
use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;

/// Active/inactive toggle on the member list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

/// Advanced (multi-field) filters; only applied when the caller is in
/// advanced search mode
#[derive(Debug, Clone, Default)]
pub struct MemberFilters {
    pub name: Option<String>,
    pub city: Option<String>,
    /// `None` is the "All tiers" setting
    pub tier: Option<MemberTier>,
}

/// Sort keys for the member list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemberSortKey {
    #[default]
    Name,
    Advisors,
    Branch,
    Tier,
    FamilyGroup,
    City,
    Status,
    CreatedAt,
}

/// One derived member row
#[derive(Debug, Clone)]
pub struct MemberRow {
    pub member_id: MemberId,
    pub member_code: String,
    pub name: String,
    pub city: Option<String>,
    pub tier: MemberTier,
    pub active: bool,
    /// Display names of all assigned advisors, joined with ", "
    pub advisor_names: String,
    pub branch_name: String,
    pub family_group: &'static str,
    pub created_at: DateTime<Utc>,
}

fn to_row(member: &Member, store: &CrmStore) -> MemberRow {
    let advisor_names = member
        .assigned_to
        .iter()
        .map(|id| store.advisor_name(Some(id)))
        .collect::<Vec<_>>()
        .join(", ");
    MemberRow {
        member_id: member.id.clone(),
        member_code: member.member_code.clone(),
        name: member.name.clone(),
        city: member.city.clone(),
        tier: member.tier,
        active: member.active,
        advisor_names,
        branch_name: store.user_branch_name(member.primary_advisor()),
        family_group: member.family_grouping(),
        created_at: member.created_at,
    }
}

fn matches_advanced(member: &Member, filters: &MemberFilters) -> bool {
    if let Some(name) = filters.name.as_deref().filter(|s| !s.is_empty()) {
        if !contains_ci(&member.name, name) {
            return false;
        }
    }
    if let Some(city) = filters.city.as_deref().filter(|s| !s.is_empty()) {
        let Some(member_city) = member.city.as_deref() else {
            return false;
        };
        if !contains_ci(member_city, city) {
            return false;
        }
    }
    if let Some(tier) = filters.tier {
        if member.tier != tier {
            return false;
        }
    }
    true
}

fn sort_rows(rows: &mut [MemberRow], key: MemberSortKey, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ord = match key {
            MemberSortKey::Name => cmp_ci(&a.name, &b.name),
            MemberSortKey::Advisors => cmp_ci(&a.advisor_names, &b.advisor_names),
            MemberSortKey::Branch => cmp_ci(&a.branch_name, &b.branch_name),
            MemberSortKey::Tier => a.tier.cmp(&b.tier),
            MemberSortKey::FamilyGroup => a.family_group.cmp(b.family_group),
            MemberSortKey::City => {
                cmp_missing_last(a.city.as_deref(), b.city.as_deref(), |x, y| cmp_ci(x, y))
            }
            // Active rows ahead of inactive when ascending
            MemberSortKey::Status => b.active.cmp(&a.active),
            MemberSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        direction.apply(ord)
    });
}

/// Run the member-list pipeline.
///
/// `ai_match` distinguishes "no search performed" (`None`, the full
/// scoped set flows through) from "search returned these ids" (`Some`,
/// even when empty — a failed or zero-hit search shows nothing).
#[allow(clippy::too_many_arguments)]
pub fn run(
    store: &CrmStore,
    viewer: &Viewer,
    created_by_me_only: bool,
    ai_match: Option<&[MemberId]>,
    status: StatusFilter,
    advanced: Option<&MemberFilters>,
    sort: MemberSortKey,
    direction: SortDirection,
    page: usize,
) -> Page<MemberRow> {
    let match_set: Option<FxHashSet<&MemberId>> =
        ai_match.map(|ids| ids.iter().collect());

    let mut rows: Vec<MemberRow> = store
        .members()
        .filter(|m| viewer.can_see_member(m))
        .filter(|m| !created_by_me_only || m.created_by == viewer.user_id)
        .filter(|m| match &match_set {
            Some(set) => set.contains(&m.id),
            None => true,
        })
        .filter(|m| match status {
            StatusFilter::All => true,
            StatusFilter::Active => m.active,
            StatusFilter::Inactive => !m.active,
        })
        .filter(|m| advanced.map_or(true, |f| matches_advanced(m, f)))
        .map(|m| to_row(m, store))
        .collect();

    sort_rows(&mut rows, sort, direction);
    paginate(rows, page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LeadSourceRef, UserId};

    fn member(id: &str, name: &str, city: Option<&str>, tier: MemberTier) -> Member {
        Member {
            id: MemberId::new(id),
            member_code: format!("FR-{id}"),
            name: name.to_string(),
            mobile: String::new(),
            dob: None,
            address: None,
            city: city.map(|c| c.to_string()),
            state: None,
            tier,
            active: true,
            assigned_to: vec![UserId::new("adv1")],
            created_by: UserId::new("adv1"),
            created_at: Utc::now(),
            location: None,
            digipin: None,
            lead_source: LeadSourceRef::default(),
            policies: Vec::new(),
            voice_notes: Vec::new(),
            is_spoc: false,
            spoc_id: None,
        }
    }

    #[test]
    fn test_advanced_filters() {
        let m = member("m1", "Asha Rao", Some("Pune"), MemberTier::Gold);

        let by_name = MemberFilters {
            name: Some("asha".to_string()),
            ..Default::default()
        };
        assert!(matches_advanced(&m, &by_name));

        let by_city = MemberFilters {
            city: Some("PUNE".to_string()),
            ..Default::default()
        };
        assert!(matches_advanced(&m, &by_city));

        let wrong_tier = MemberFilters {
            tier: Some(MemberTier::Silver),
            ..Default::default()
        };
        assert!(!matches_advanced(&m, &wrong_tier));

        // Missing city never matches a city filter
        let no_city = member("m2", "Ravi", None, MemberTier::Gold);
        assert!(!matches_advanced(&no_city, &by_city));
    }

    #[test]
    fn test_city_sort_puts_missing_last() {
        let mut store = CrmStore::new();
        store.insert_member(member("m1", "A", None, MemberTier::Gold));
        store.insert_member(member("m2", "B", Some("Delhi"), MemberTier::Gold));

        let viewer = Viewer::new(UserId::new("adv1"), crate::model::Role::Advisor);
        let page = run(
            &store,
            &viewer,
            false,
            None,
            StatusFilter::All,
            None,
            MemberSortKey::City,
            SortDirection::Ascending,
            1,
        );
        assert_eq!(page.rows[0].name, "B");
        assert_eq!(page.rows[1].name, "A");
    }
}
