//! Task mutations: bulk fan-out creation, audited reassignment, status
//! updates
//!
//! Bulk assignment is a fan-out: one template, N independent tasks, each
//! with its own id and `primary_contact`, so per-assignee status tracks
//! independently. Reassignment is its own audited operation, not a field
//! edit — it changes who can see the task.

use super::{ServiceError, ServiceResult};
use crate::model::{
    BranchId, Reassignment, Task, TaskId, TaskKind, TaskLink, TaskStatus, UserId,
};
use crate::scope::Viewer;
use crate::store::{CrmStore, StoreError};
use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;
use tracing::info;
use uuid::Uuid;

/// A task as drafted in the editor, before assignment
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub description: String,
    pub link: TaskLink,
    pub due_at: Option<DateTime<Utc>>,
    pub kind: TaskKind,
    pub is_shared: bool,
}

impl TaskDraft {
    pub fn new(description: impl Into<String>, link: TaskLink) -> Self {
        TaskDraft {
            description: description.into(),
            link,
            due_at: None,
            kind: TaskKind::Manual,
            is_shared: false,
        }
    }
}

/// Who a bulk save targets
#[derive(Debug, Clone)]
pub enum AssignTarget {
    /// Explicitly chosen advisors
    Advisors(Vec<UserId>),
    /// Every advisor in the book
    AllAdvisors,
    /// Every advisor sitting in one of the selected branches
    Branches(Vec<BranchId>),
}

/// Task mutation entry points over the store
pub struct TaskService;

impl TaskService {
    /// Validate a draft against the actor's role and the chosen target.
    /// Runs before any mutation; a failure means nothing was written.
    pub fn validate(actor: &Viewer, draft: &TaskDraft, target: &AssignTarget) -> ServiceResult<()> {
        if draft.description.trim().is_empty() {
            return Err(ServiceError::EmptyDescription);
        }
        if let AssignTarget::Advisors(ids) = target {
            if ids.is_empty() {
                return Err(ServiceError::NoAssignee);
            }
        }
        if !actor.is_admin() && !draft.link.is_customer() {
            return Err(ServiceError::MissingClientLink);
        }
        Ok(())
    }

    /// Create one independent task per target advisor. Returns the new
    /// ids in target order.
    pub fn create_bulk(
        store: &mut CrmStore,
        actor: &Viewer,
        draft: &TaskDraft,
        target: &AssignTarget,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<TaskId>> {
        Self::validate(actor, draft, target)?;

        let assignees: Vec<UserId> = match target {
            AssignTarget::Advisors(ids) => ids.clone(),
            AssignTarget::AllAdvisors => store.advisors().map(|u| u.id.clone()).collect(),
            AssignTarget::Branches(branches) => {
                let wanted: FxHashSet<&BranchId> = branches.iter().collect();
                store
                    .advisors()
                    .filter(|u| u.branch_id.as_ref().is_some_and(|b| wanted.contains(b)))
                    .map(|u| u.id.clone())
                    .collect()
            }
        };

        let mut created = Vec::with_capacity(assignees.len());
        for assignee in assignees {
            let id = TaskId::new(Uuid::new_v4().to_string());
            let mut task = Task::new(
                id.clone(),
                draft.description.clone(),
                assignee,
                draft.link.clone(),
                now,
            );
            task.due_at = draft.due_at;
            task.kind = draft.kind;
            task.is_shared = draft.is_shared;
            store.insert_task(task);
            created.push(id);
        }

        info!(
            actor = %actor.user_id,
            count = created.len(),
            "bulk task creation fanned out"
        );
        Ok(created)
    }

    /// Move a task to a new owner, recording who did it and when. This
    /// changes the task's visibility, so it is audited separately from
    /// ordinary field edits.
    pub fn reassign(
        store: &mut CrmStore,
        task_id: &TaskId,
        new_advisor: &UserId,
        actor: &Viewer,
        now: DateTime<Utc>,
    ) -> ServiceResult<()> {
        if store.user(new_advisor).is_none() {
            return Err(StoreError::UserNotFound(new_advisor.clone()).into());
        }
        let task = store
            .task_mut(task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.clone()))?;

        let previous = task.primary_contact.clone();
        task.reassignments.push(Reassignment {
            from: previous.clone(),
            to: new_advisor.clone(),
            by: actor.user_id.clone(),
            at: now,
        });
        task.primary_contact = new_advisor.clone();

        info!(
            task = %task_id,
            from = %previous,
            to = %new_advisor,
            by = %actor.user_id,
            "task reassigned"
        );
        Ok(())
    }

    /// Status transition on one task
    pub fn update_status(
        store: &mut CrmStore,
        task_id: &TaskId,
        status: TaskStatus,
    ) -> ServiceResult<()> {
        let task = store
            .task_mut(task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.clone()))?;
        task.status = status;
        Ok(())
    }
}
