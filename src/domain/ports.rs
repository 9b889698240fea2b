use super::payment::PaymentRecord;
use super::user::User;
use super::verification::{CodePurpose, VerificationCode, VerificationRecord};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Keyed storage for verification records, one per subject.
///
/// Every method is atomic with respect to the subject it touches.
/// Implementations must not block on I/O.
pub trait CodeStore: Send + Sync {
    fn get(&self, subject: &str) -> Option<VerificationRecord>;
    /// Inserts or overwrites the record for `record.subject`.
    fn put(&self, record: VerificationRecord);
    fn remove(&self, subject: &str) -> Option<VerificationRecord>;
    /// Removes the record only if `predicate` holds for it, checked and
    /// removed under the same lock. Returns whether a record was removed.
    fn remove_if(&self, subject: &str, predicate: &dyn Fn(&VerificationRecord) -> bool) -> bool;
    /// Removes the record only if it is expired at `now`.
    fn remove_if_expired(&self, subject: &str, now: DateTime<Utc>) -> bool {
        self.remove_if(subject, &|record| record.is_expired(now))
    }
    /// Removes every record expired at `now` and returns how many went.
    fn sweep_expired(&self, now: DateTime<Utc>) -> usize;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn store(&self, user: User) -> Result<()>;
    async fn get(&self, email: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn store(&self, payment: PaymentRecord) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<PaymentRecord>>;
    async fn remove(&self, id: Uuid) -> Result<Option<PaymentRecord>>;
}

/// Hands an issued code to whatever channel reaches the subject.
#[async_trait]
pub trait CodeNotifier: Send + Sync {
    async fn deliver(
        &self,
        subject: &str,
        purpose: CodePurpose,
        code: &VerificationCode,
    ) -> Result<()>;
}

pub type CodeStoreBox = Box<dyn CodeStore>;
pub type UserStoreBox = Box<dyn UserStore>;
pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type CodeNotifierBox = Box<dyn CodeNotifier>;
