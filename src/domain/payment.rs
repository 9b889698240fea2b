use crate::error::LifecycleError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Represents a positive monetary amount for a ride payment.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, LifecycleError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(LifecycleError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LifecycleError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl FromStr for Amount {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| LifecycleError::ValidationError(format!("Invalid amount: {}", e)))?;
        Self::new(value)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 5] = [
        PaymentStatus::Pending,
        PaymentStatus::Processing,
        PaymentStatus::Completed,
        PaymentStatus::Failed,
        PaymentStatus::Refunded,
    ];

    /// Outgoing edges of the payment state graph.
    ///
    /// `Pending -> Completed` covers cash and wallet payments that settle
    /// without a processing step; `Failed -> Pending` is a retry.
    pub fn allowed_transitions(self) -> &'static [PaymentStatus] {
        match self {
            PaymentStatus::Pending => &[
                PaymentStatus::Processing,
                PaymentStatus::Failed,
                PaymentStatus::Completed,
            ],
            PaymentStatus::Processing => &[PaymentStatus::Completed, PaymentStatus::Failed],
            PaymentStatus::Completed => &[PaymentStatus::Refunded],
            PaymentStatus::Failed => &[PaymentStatus::Pending],
            PaymentStatus::Refunded => &[],
        }
    }

    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Only `Refunded` has no way out.
    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Money has moved for these; the record must be kept.
    pub fn is_protected(self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::Refunded)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        };
        f.write_str(name)
    }
}

impl FromStr for PaymentStatus {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "processing" => Ok(PaymentStatus::Processing),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(LifecycleError::ValidationError(format!(
                "Unknown payment status: {}",
                other
            ))),
        }
    }
}

/// The parts of a ride payment this crate cares about.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub amount: Amount,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// New payments always start out pending.
    pub fn new(id: Uuid, amount: Amount, now: DateTime<Utc>) -> Self {
        Self {
            id,
            amount,
            status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
