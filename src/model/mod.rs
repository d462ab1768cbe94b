//! CRM entity model
//!
//! Entities arrive as already-loaded collections; the pipelines in
//! [`crate::pipeline`] derive views over them and never mutate. All
//! mutation goes through [`crate::service`].

pub mod lead;
pub mod lead_source;
pub mod member;
pub mod note;
pub mod policy;
pub mod task;
pub mod types;
pub mod user;

// Re-export main types
pub use lead::Lead;
pub use lead_source::LeadSourceNode;
pub use member::{LeadSourceRef, Member};
pub use note::VoiceNote;
pub use policy::{Commission, PaymentDetails, Policy};
pub use task::{Reassignment, Task, TaskLink};
pub use types::{
    BranchId, CommissionStatus, GeoPoint, LeadId, MemberId, MemberTier, NoteId, PolicyHolderType,
    PolicyId, RenewalStatus, Role, SourceId, TaskId, TaskKind, TaskStatus, UserId,
};
pub use user::{Branch, User};
