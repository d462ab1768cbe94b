//! Mutation services
//!
//! The pipelines never mutate; everything that changes an entity goes
//! through here. Each operation validates first and touches the store
//! only once validation has fully passed — a rejected save leaves no
//! partial mutation behind.

pub mod notes;
pub mod task;

pub use notes::{convert_action_item, dismiss_action_item};
pub use task::{AssignTarget, TaskDraft, TaskService};

use crate::model::NoteId;
use crate::store::StoreError;
use thiserror::Error;

/// Validation and lookup failures surfaced to the caller (shown as a
/// toast in the UI layer)
#[derive(Error, Debug, PartialEq)]
pub enum ServiceError {
    #[error("Task description must not be blank")]
    EmptyDescription,

    #[error("Select at least one advisor to assign")]
    NoAssignee,

    #[error("A related member or lead is required")]
    MissingClientLink,

    #[error("Voice note {0} not found")]
    NoteNotFound(NoteId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
