//! Lead (prospect) entity

use super::note::VoiceNote;
use super::types::{LeadId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A prospect being worked toward conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub mobile: Option<String>,
    /// Pipeline stage, e.g. "New", "Contacted", "Won", "Lost"
    pub status: String,
    pub assigned_to: UserId,
    pub policy_interest: Option<String>,
    pub voice_notes: Vec<VoiceNote>,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    pub fn new(
        id: LeadId,
        name: impl Into<String>,
        assigned_to: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Lead {
            id,
            name: name.into(),
            mobile: None,
            status: "New".to_string(),
            assigned_to,
            policy_interest: None,
            voice_notes: Vec::new(),
            created_at,
        }
    }
}
