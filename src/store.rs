//! In-memory CRM collections
//!
//! All entities are supplied as already-loaded collections. `CrmStore`
//! keeps them in insertion order (the pipelines' stable sorts break ties
//! by first-seen order) with id-keyed lookup, and exposes the mutable
//! entry points the services operate through. This is not a persistence
//! layer; an external store owns durability.

use crate::model::{
    Branch, BranchId, Lead, LeadId, LeadSourceNode, Member, MemberId, Role, SourceId, Task, TaskId,
    User, UserId, VoiceNote,
};
use indexmap::IndexMap;
use thiserror::Error;

/// Errors from store lookups that callers require to succeed
#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("Member {0} not found")]
    MemberNotFound(MemberId),

    #[error("Lead {0} not found")]
    LeadNotFound(LeadId),

    #[error("Task {0} not found")]
    TaskNotFound(TaskId),

    #[error("User {0} not found")]
    UserNotFound(UserId),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Insertion-ordered entity collections with id lookup
#[derive(Debug, Default)]
pub struct CrmStore {
    members: IndexMap<MemberId, Member>,
    leads: IndexMap<LeadId, Lead>,
    tasks: IndexMap<TaskId, Task>,
    users: IndexMap<UserId, User>,
    branches: IndexMap<BranchId, Branch>,
    sources: IndexMap<SourceId, LeadSourceNode>,
}

impl CrmStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================================
    // Loading
    // ============================================================

    pub fn insert_member(&mut self, member: Member) {
        self.members.insert(member.id.clone(), member);
    }

    pub fn insert_lead(&mut self, lead: Lead) {
        self.leads.insert(lead.id.clone(), lead);
    }

    pub fn insert_task(&mut self, task: Task) {
        self.tasks.insert(task.id.clone(), task);
    }

    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn insert_branch(&mut self, branch: Branch) {
        self.branches.insert(branch.id.clone(), branch);
    }

    pub fn insert_source(&mut self, node: LeadSourceNode) {
        self.sources.insert(node.id.clone(), node);
    }

    // ============================================================
    // Lookup
    // ============================================================

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.get(id)
    }

    pub fn member_mut(&mut self, id: &MemberId) -> Option<&mut Member> {
        self.members.get_mut(id)
    }

    pub fn lead(&self, id: &LeadId) -> Option<&Lead> {
        self.leads.get(id)
    }

    pub fn lead_mut(&mut self, id: &LeadId) -> Option<&mut Lead> {
        self.leads.get_mut(id)
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    pub fn branch(&self, id: &BranchId) -> Option<&Branch> {
        self.branches.get(id)
    }

    pub fn source(&self, id: &SourceId) -> Option<&LeadSourceNode> {
        self.sources.get(id)
    }

    // ============================================================
    // Iteration (insertion order)
    // ============================================================

    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub fn leads(&self) -> impl Iterator<Item = &Lead> {
        self.leads.values()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values()
    }

    pub fn source_nodes(&self) -> impl Iterator<Item = &LeadSourceNode> {
        self.sources.values()
    }

    /// All users carrying the Advisor role, in insertion order
    pub fn advisors(&self) -> impl Iterator<Item = &User> {
        self.users.values().filter(|u| u.role == Role::Advisor)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    // ============================================================
    // Display helpers used by the pipelines ("N/A" on gaps)
    // ============================================================

    /// Advisor display name, "N/A" when the id does not resolve
    pub fn advisor_name(&self, id: Option<&UserId>) -> String {
        id.and_then(|id| self.users.get(id))
            .map(|u| u.name.clone())
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Branch name via a user's profile, "N/A" on any gap in the chain
    pub fn user_branch_name(&self, id: Option<&UserId>) -> String {
        id.and_then(|id| self.users.get(id))
            .and_then(|u| u.branch_id.as_ref())
            .and_then(|b| self.branches.get(b))
            .map(|b| b.name.clone())
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Branch id via a user's profile
    pub fn user_branch_id(&self, id: &UserId) -> Option<&BranchId> {
        self.users.get(id).and_then(|u| u.branch_id.as_ref())
    }

    /// A voice note on a member, for the notes service
    pub fn member_note_mut(
        &mut self,
        member_id: &MemberId,
        note_id: &crate::model::NoteId,
    ) -> Option<&mut VoiceNote> {
        self.members
            .get_mut(member_id)
            .and_then(|m| m.voice_notes.iter_mut().find(|n| &n.id == note_id))
    }

    /// A voice note on a lead, for the notes service
    pub fn lead_note_mut(
        &mut self,
        lead_id: &LeadId,
        note_id: &crate::model::NoteId,
    ) -> Option<&mut VoiceNote> {
        self.leads
            .get_mut(lead_id)
            .and_then(|l| l.voice_notes.iter_mut().find(|n| &n.id == note_id))
    }
}
