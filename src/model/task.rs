//! Task entity
//!
//! A task is linked to at most one client — a member or a lead — or to
//! neither, in which case it is a personal task for the assignee. The
//! linkage is an enum so the exclusivity holds by construction.

use super::types::{LeadId, MemberId, TaskId, TaskKind, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client linkage for a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskLink {
    Member(MemberId),
    Lead(LeadId),
    Personal,
}

impl TaskLink {
    /// True when the task is tied to a member or lead
    pub fn is_customer(&self) -> bool {
        !matches!(self, TaskLink::Personal)
    }

    /// Display label used by the task-list kind column
    pub fn kind_label(&self) -> &'static str {
        if self.is_customer() {
            "Customer"
        } else {
            "Personal"
        }
    }
}

/// One audited ownership change on a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reassignment {
    pub from: UserId,
    pub to: UserId,
    /// Who performed the reassignment
    pub by: UserId,
    pub at: DateTime<Utc>,
}

/// A unit of advisor work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub status: TaskStatus,
    /// The advisor who owns this task
    pub primary_contact: UserId,
    pub alternate_contacts: Vec<UserId>,
    pub link: TaskLink,
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub kind: TaskKind,
    pub is_shared: bool,
    /// Ownership changes, most recent last
    pub reassignments: Vec<Reassignment>,
}

impl Task {
    pub fn new(
        id: TaskId,
        description: impl Into<String>,
        primary_contact: UserId,
        link: TaskLink,
        created_at: DateTime<Utc>,
    ) -> Self {
        Task {
            id,
            description: description.into(),
            status: TaskStatus::Assigned,
            primary_contact,
            alternate_contacts: Vec::new(),
            link,
            due_at: None,
            created_at,
            kind: TaskKind::Manual,
            is_shared: false,
            reassignments: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_label() {
        assert_eq!(TaskLink::Personal.kind_label(), "Personal");
        assert_eq!(TaskLink::Member(MemberId::new("m1")).kind_label(), "Customer");
        assert_eq!(TaskLink::Lead(LeadId::new("l1")).kind_label(), "Customer");
    }
}
