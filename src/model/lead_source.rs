//! Lead-source master hierarchy
//!
//! Lead sources form a forest: each node optionally points at a parent,
//! and the root ancestor's name is the category used for grouping.
//! Resolution lives in [`crate::source`].

use super::types::SourceId;
use serde::{Deserialize, Serialize};

/// One node in the lead-source hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadSourceNode {
    pub id: SourceId,
    pub name: String,
    pub parent_id: Option<SourceId>,
}

impl LeadSourceNode {
    pub fn root(id: SourceId, name: impl Into<String>) -> Self {
        LeadSourceNode {
            id,
            name: name.into(),
            parent_id: None,
        }
    }

    pub fn child(id: SourceId, name: impl Into<String>, parent: SourceId) -> Self {
        LeadSourceNode {
            id,
            name: name.into(),
            parent_id: Some(parent),
        }
    }
}
