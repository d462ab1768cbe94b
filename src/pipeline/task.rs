//! Task pipeline
//!
//! Scope by role (advisors see only tasks they own), filter by view,
//! text, status, branch and advisor, then sort and paginate. Several
//! sort keys are over derived display fields — assignee name, status
//! display name, branch name, Customer/Personal kind — not raw ids.

use super::{cmp_ci, paginate, Page, SortDirection};
use crate::model::{BranchId, Task, TaskId, TaskStatus, UserId};
use crate::scope::Viewer;
use crate::store::CrmStore;
use chrono::{DateTime, Utc};

/// Which slice of the task list is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskView {
    #[default]
    All,
    /// Tasks linked to a member or lead
    Customer,
    /// Tasks with no client linkage
    Personal,
}

/// Caller-controlled filters
#[derive(Debug, Clone, Default)]
pub struct TaskFilters {
    pub view: TaskView,
    /// Substring match over the description
    pub search: Option<String>,
    pub status: Option<TaskStatus>,
    /// Via the assignee's branch
    pub branch: Option<BranchId>,
    pub advisor: Option<UserId>,
}

/// Sort keys for the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSortKey {
    /// Assignee display name
    AssignedTo,
    /// Status display name
    Status,
    /// Assignee's branch name
    Branch,
    /// Customer vs Personal
    Kind,
    #[default]
    CreatedAt,
    DueAt,
}

/// One derived task row
#[derive(Debug, Clone)]
pub struct TaskRow {
    pub task_id: TaskId,
    pub description: String,
    pub status: TaskStatus,
    pub assignee_id: UserId,
    pub assignee_name: String,
    pub branch_name: String,
    pub kind_label: &'static str,
    pub created_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
}

fn to_row(task: &Task, store: &CrmStore) -> TaskRow {
    TaskRow {
        task_id: task.id.clone(),
        description: task.description.clone(),
        status: task.status,
        assignee_id: task.primary_contact.clone(),
        assignee_name: store.advisor_name(Some(&task.primary_contact)),
        branch_name: store.user_branch_name(Some(&task.primary_contact)),
        kind_label: task.link.kind_label(),
        created_at: task.created_at,
        due_at: task.due_at,
    }
}

fn matches(task: &Task, store: &CrmStore, filters: &TaskFilters) -> bool {
    match filters.view {
        TaskView::All => {}
        TaskView::Customer => {
            if !task.link.is_customer() {
                return false;
            }
        }
        TaskView::Personal => {
            if task.link.is_customer() {
                return false;
            }
        }
    }
    if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
        if !super::contains_ci(&task.description, search) {
            return false;
        }
    }
    if let Some(status) = filters.status {
        if task.status != status {
            return false;
        }
    }
    if let Some(branch) = &filters.branch {
        if store.user_branch_id(&task.primary_contact) != Some(branch) {
            return false;
        }
    }
    if let Some(advisor) = &filters.advisor {
        if &task.primary_contact != advisor {
            return false;
        }
    }
    true
}

fn sort_rows(rows: &mut [TaskRow], key: TaskSortKey, direction: SortDirection) {
    // Missing dates compare as the epoch, matching the list's behavior of
    // floating undated tasks to the oldest end
    let ts = |d: Option<DateTime<Utc>>| d.map(|d| d.timestamp_millis()).unwrap_or(0);
    rows.sort_by(|a, b| {
        let ord = match key {
            TaskSortKey::AssignedTo => cmp_ci(&a.assignee_name, &b.assignee_name),
            TaskSortKey::Status => cmp_ci(a.status.display_name(), b.status.display_name()),
            TaskSortKey::Branch => cmp_ci(&a.branch_name, &b.branch_name),
            TaskSortKey::Kind => a.kind_label.cmp(b.kind_label),
            TaskSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            TaskSortKey::DueAt => ts(a.due_at).cmp(&ts(b.due_at)),
        };
        direction.apply(ord)
    });
}

/// Run the task pipeline
pub fn run(
    store: &CrmStore,
    viewer: &Viewer,
    filters: &TaskFilters,
    sort: TaskSortKey,
    direction: SortDirection,
    page: usize,
) -> Page<TaskRow> {
    let mut rows: Vec<TaskRow> = store
        .tasks()
        .filter(|t| viewer.can_see_task(t))
        .filter(|t| matches(t, store, filters))
        .map(|t| to_row(t, store))
        .collect();

    sort_rows(&mut rows, sort, direction);
    paginate(rows, page)
}
