//! Role-based visibility
//!
//! Every pipeline scopes its input through one `Viewer` value instead of
//! repeating role checks inline, so the Admin/Advisor rules cannot drift
//! between pipelines.

use crate::model::{Lead, Member, Role, Task, User, UserId};

/// The identity a derivation runs as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: UserId,
    pub role: Role,
}

impl Viewer {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Viewer { user_id, role }
    }

    pub fn from_user(user: &User) -> Self {
        Viewer {
            user_id: user.id.clone(),
            role: user.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Advisors see members they are assigned to or created; admins see all
    pub fn can_see_member(&self, member: &Member) -> bool {
        self.is_admin()
            || member.assigned_to.contains(&self.user_id)
            || member.created_by == self.user_id
    }

    /// Advisors see only tasks they own; admins see all
    pub fn can_see_task(&self, task: &Task) -> bool {
        self.is_admin() || task.primary_contact == self.user_id
    }

    /// Advisors see leads assigned to them; admins see all
    pub fn can_see_lead(&self, lead: &Lead) -> bool {
        self.is_admin() || lead.assigned_to == self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LeadId, LeadSourceRef, MemberId, MemberTier, TaskId, TaskLink};
    use chrono::Utc;

    fn member_for(advisor: &str, creator: &str) -> Member {
        Member {
            id: MemberId::new("m1"),
            member_code: "FR-0001".to_string(),
            name: "Asha".to_string(),
            mobile: String::new(),
            dob: None,
            address: None,
            city: None,
            state: None,
            tier: MemberTier::Silver,
            active: true,
            assigned_to: vec![UserId::new(advisor)],
            created_by: UserId::new(creator),
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
    fn test_admin_sees_everything() {
        let admin = Viewer::new(UserId::new("root"), Role::Admin);
        let m = member_for("someone", "someone-else");
        assert!(admin.can_see_member(&m));

        let t = Task::new(
            TaskId::new("t1"),
            "call",
            UserId::new("other"),
            TaskLink::Personal,
            Utc::now(),
        );
        assert!(admin.can_see_task(&t));
    }

    #[test]
    fn test_advisor_member_scope() {
        let viewer = Viewer::new(UserId::new("adv1"), Role::Advisor);
        assert!(viewer.can_see_member(&member_for("adv1", "other")));
        assert!(viewer.can_see_member(&member_for("other", "adv1")));
        assert!(!viewer.can_see_member(&member_for("other", "other")));
    }

    #[test]
    fn test_advisor_task_scope() {
        let viewer = Viewer::new(UserId::new("adv1"), Role::Advisor);
        let mine = Task::new(
            TaskId::new("t1"),
            "call",
            UserId::new("adv1"),
            TaskLink::Personal,
            Utc::now(),
        );
        let theirs = Task::new(
            TaskId::new("t2"),
            "call",
            UserId::new("adv2"),
            TaskLink::Personal,
            Utc::now(),
        );
        assert!(viewer.can_see_task(&mine));
        assert!(!viewer.can_see_task(&theirs));
    }

    #[test]
    fn test_advisor_lead_scope() {
        let viewer = Viewer::new(UserId::new("adv1"), Role::Advisor);
        let mine = Lead::new(LeadId::new("l1"), "Prospect", UserId::new("adv1"), Utc::now());
        let theirs = Lead::new(LeadId::new("l2"), "Prospect", UserId::new("adv2"), Utc::now());
        assert!(viewer.can_see_lead(&mine));
        assert!(!viewer.can_see_lead(&theirs));
    }
}
