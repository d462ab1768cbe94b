//! User (advisor/admin) and branch entities

use super::types::{BranchId, Role, UserId};
use serde::{Deserialize, Serialize};

/// An advisor or administrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    /// Branch the employee sits in, from the HR profile
    pub branch_id: Option<BranchId>,
}

impl User {
    pub fn advisor(id: UserId, name: impl Into<String>, branch_id: Option<BranchId>) -> Self {
        User {
            id,
            name: name.into(),
            role: Role::Advisor,
            branch_id,
        }
    }

    pub fn admin(id: UserId, name: impl Into<String>) -> Self {
        User {
            id,
            name: name.into(),
            role: Role::Admin,
            branch_id: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A branch office
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
}

impl Branch {
    pub fn new(id: BranchId, name: impl Into<String>) -> Self {
        Branch {
            id,
            name: name.into(),
        }
    }
}
