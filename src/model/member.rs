//! Member (customer) entity
//!
//! A member carries its policies and voice notes inline; the derivation
//! pipelines flatten those collections on demand. Family linkage runs
//! through the SPOC fields: the SPOC member is the one surface through
//! which shared family policies are visible.

use super::note::VoiceNote;
use super::policy::Policy;
use super::types::{GeoPoint, MemberId, MemberTier, SourceId, UserId};
use crate::geo;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Reference into the lead-source hierarchy, plus free-text detail
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadSourceRef {
    pub source_id: Option<SourceId>,
    pub detail: Option<String>,
}

/// A customer of the advisory practice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    /// Human-facing member code (e.g. "FR-0042")
    pub member_code: String,
    pub name: String,
    pub mobile: String,
    pub dob: Option<NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub tier: MemberTier,
    pub active: bool,
    /// Advisors this member is assigned to (duplicate-free; first entry is
    /// the one shown on policy rows)
    pub assigned_to: Vec<UserId>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    /// Geocoordinates, when captured directly
    pub location: Option<GeoPoint>,
    /// DIGIPIN code, resolvable to coordinates when `location` is absent
    pub digipin: Option<String>,
    pub lead_source: LeadSourceRef,
    pub policies: Vec<Policy>,
    pub voice_notes: Vec<VoiceNote>,
    /// Single point of contact for a family group
    pub is_spoc: bool,
    /// The SPOC this member hangs off, when part of a family group
    pub spoc_id: Option<MemberId>,
}

impl Member {
    /// Resolved coordinates: the captured location, else the decoded DIGIPIN
    pub fn coordinates(&self) -> Option<GeoPoint> {
        self.location
            .or_else(|| self.digipin.as_deref().and_then(geo::decode_digipin))
    }

    /// "Family" when this member anchors or belongs to a family group,
    /// "Individual" otherwise
    pub fn family_grouping(&self) -> &'static str {
        if self.is_spoc || self.spoc_id.is_some() {
            "Family"
        } else {
            "Individual"
        }
    }

    /// The advisor shown on this member's policy rows
    pub fn primary_advisor(&self) -> Option<&UserId> {
        self.assigned_to.first()
    }

    /// Policies visible through this member. Family-holder policies are
    /// visible only when the member is the family SPOC.
    pub fn visible_policies(&self) -> impl Iterator<Item = &Policy> {
        let is_spoc = self.is_spoc;
        self.policies
            .iter()
            .filter(move |p| is_spoc || !p.is_family_holder())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PolicyHolderType, PolicyId};

    fn member(is_spoc: bool) -> Member {
        Member {
            id: MemberId::new("m1"),
            member_code: "FR-0001".to_string(),
            name: "Asha Rao".to_string(),
            mobile: "9000000001".to_string(),
            dob: None,
            address: None,
            city: Some("Pune".to_string()),
            state: Some("Maharashtra".to_string()),
            tier: MemberTier::Gold,
            active: true,
            assigned_to: vec![UserId::new("adv1")],
            created_by: UserId::new("adv1"),
            created_at: Utc::now(),
            location: None,
            digipin: None,
            lead_source: LeadSourceRef::default(),
            policies: vec![
                Policy::new(PolicyId::new("p1"), "Term Life", 1000.0, 100_000.0, NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()),
                {
                    let mut p = Policy::new(PolicyId::new("p2"), "Health", 2000.0, 50_000.0, NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
                    p.holder_type = PolicyHolderType::Family;
                    p
                },
            ],
            voice_notes: Vec::new(),
            is_spoc,
            spoc_id: None,
        }
    }

    #[test]
    fn test_family_policy_hidden_on_non_spoc() {
        let m = member(false);
        let visible: Vec<_> = m.visible_policies().collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id.as_str(), "p1");
    }

    #[test]
    fn test_family_policy_visible_on_spoc() {
        let m = member(true);
        assert_eq!(m.visible_policies().count(), 2);
    }

    #[test]
    fn test_family_grouping() {
        let mut m = member(false);
        assert_eq!(m.family_grouping(), "Individual");
        m.spoc_id = Some(MemberId::new("m9"));
        assert_eq!(m.family_grouping(), "Family");
        let spoc = member(true);
        assert_eq!(spoc.family_grouping(), "Family");
    }

    #[test]
    fn test_coordinates_fall_back_to_digipin() {
        let mut m = member(false);
        assert!(m.coordinates().is_none());
        m.digipin = Some("39J-49L-L8T4".to_string());
        let point = m.coordinates().expect("digipin should decode");
        assert!(point.lat > 2.5 && point.lat < 38.5);
        assert!(point.lng > 63.5 && point.lng < 99.5);
        // Directly captured location wins over the digipin
        m.location = Some(GeoPoint::new(18.52, 73.85));
        assert_eq!(m.coordinates().unwrap().lat, 18.52);
    }
}
