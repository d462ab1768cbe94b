//! FinRoots CRM data core
//!
//! The in-memory heart of a CRM for insurance advisors: the entity
//! model (members, policies, tasks, leads, voice notes), pure derivation
//! pipelines that filter/sort/paginate those collections, analytics
//! aggregation, and a fallback-tolerant gateway to an external LLM for
//! everything "intelligent" (search, summarization, forecasting, chat).
//!
//! # Architecture
//!
//! - Collections arrive already loaded into [`CrmStore`]; persistence is
//!   someone else's job.
//! - Pipelines are pure functions of the store, a [`scope::Viewer`], and
//!   an explicit clock value — deterministic and re-run from scratch on
//!   every input change.
//! - All mutation goes through [`service`], which validates before it
//!   writes.
//! - The AI gateway never throws past its boundary: every capability
//!   resolves to a tagged [`ai::AiOutcome`], falling back on missing
//!   credentials, transport failures, or unparseable replies.
//!
//! # Example
//!
//! ```rust
//! use finroots::model::{Member, MemberId, MemberTier, Role, UserId, LeadSourceRef};
//! use finroots::pipeline::{self, member::StatusFilter, SortDirection};
//! use finroots::scope::Viewer;
//! use finroots::store::CrmStore;
//! use chrono::Utc;
//!
//! let mut store = CrmStore::new();
//! store.insert_member(Member {
//!     id: MemberId::new("m1"),
//!     member_code: "FR-0001".to_string(),
//!     name: "Asha Rao".to_string(),
//!     mobile: "9000000001".to_string(),
//!     dob: None,
//!     address: None,
//!     city: Some("Pune".to_string()),
//!     state: Some("Maharashtra".to_string()),
//!     tier: MemberTier::Gold,
//!     active: true,
//!     assigned_to: vec![UserId::new("adv1")],
//!     created_by: UserId::new("adv1"),
//!     created_at: Utc::now(),
//!     location: None,
//!     digipin: None,
//!     lead_source: LeadSourceRef::default(),
//!     policies: Vec::new(),
//!     voice_notes: Vec::new(),
//!     is_spoc: false,
//!     spoc_id: None,
//! });
//!
//! let viewer = Viewer::new(UserId::new("adv1"), Role::Advisor);
//! let page = pipeline::member::run(
//!     &store,
//!     &viewer,
//!     false,
//!     None,
//!     StatusFilter::All,
//!     None,
//!     Default::default(),
//!     SortDirection::Ascending,
//!     1,
//! );
//! assert_eq!(page.total, 1);
//! ```

#![warn(clippy::all)]

pub mod ai;
pub mod analytics;
pub mod config;
pub mod geo;
pub mod model;
pub mod pipeline;
pub mod scope;
pub mod service;
pub mod source;
pub mod store;

// Re-export main types for convenience
pub use ai::{AiGateway, AiOutcome, AiTaskState, LlmBackend, RequestGate};
pub use analytics::{dashboard, splice_forecast, Dashboard, GrowthPoint, MonthBucket};
pub use config::AiConfig;
pub use geo::{decode_digipin, haversine_km};
pub use model::{
    Branch, BranchId, Lead, LeadId, LeadSourceNode, Member, MemberId, MemberTier, Policy,
    PolicyHolderType, PolicyId, RenewalStatus, Role, SourceId, Task, TaskId, TaskLink, TaskStatus,
    User, UserId, VoiceNote,
};
pub use pipeline::{Page, SortDirection, PAGE_SIZE};
pub use scope::Viewer;
pub use service::{ServiceError, ServiceResult, TaskService};
pub use source::{resolve_root_source, SourceIndex, UNKNOWN_SOURCE};
pub use store::{CrmStore, StoreError, StoreResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
