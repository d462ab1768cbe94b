//! Policy entity

use super::types::{CommissionStatus, PolicyHolderType, PolicyId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Commission owed to the practice for a policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commission {
    pub amount: f64,
    pub status: CommissionStatus,
}

/// Last recorded premium payment for a policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub transaction_id: String,
    pub amount: f64,
    pub paid_at: DateTime<Utc>,
    pub status: String,
}

/// An insurance policy, owned by exactly one member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub policy_type: String,
    pub premium: f64,
    pub coverage: f64,
    pub renewal_date: NaiveDate,
    pub holder_type: PolicyHolderType,
    pub commission: Option<Commission>,
    pub payment: Option<PaymentDetails>,
}

impl Policy {
    pub fn new(
        id: PolicyId,
        policy_type: impl Into<String>,
        premium: f64,
        coverage: f64,
        renewal_date: NaiveDate,
    ) -> Self {
        Policy {
            id,
            policy_type: policy_type.into(),
            premium,
            coverage,
            renewal_date,
            holder_type: PolicyHolderType::Individual,
            commission: None,
            payment: None,
        }
    }

    /// Whole days until renewal, negative once the date has passed.
    /// Both sides are day-truncated so the boundary does not drift with
    /// the time of day the derivation runs.
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.renewal_date - today).num_days()
    }

    pub fn is_family_holder(&self) -> bool {
        self.holder_type == PolicyHolderType::Family
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_left() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let p = Policy::new(PolicyId::new("p1"), "Motor", 500.0, 20_000.0, NaiveDate::from_ymd_opt(2026, 8, 16).unwrap());
        assert_eq!(p.days_left(today), 10);

        let overdue = Policy::new(PolicyId::new("p2"), "Motor", 500.0, 20_000.0, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
        assert_eq!(overdue.days_left(today), -5);

        let due_today = Policy::new(PolicyId::new("p3"), "Motor", 500.0, 20_000.0, today);
        assert_eq!(due_today.days_left(today), 0);
    }
}
