use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{PaymentStore, UserStore};
use crate::domain::user::User;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory store for users, keyed by email.
///
/// Uses `Arc<RwLock<HashMap<String, User>>>` to allow shared concurrent access.
#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserStore {
    /// Creates a new, empty in-memory user store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn store(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.email.clone(), user);
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(email).cloned())
    }
}

/// A thread-safe in-memory store for payment records.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<Uuid, PaymentRecord>>>,
}

impl InMemoryPaymentStore {
    /// Creates a new, empty in-memory payment store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn store(&self, payment: PaymentRecord) -> Result<()> {
        let mut payments = self.payments.write().await;
        payments.insert(payment.id, payment);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<PaymentRecord>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&id).cloned())
    }

    async fn remove(&self, id: Uuid) -> Result<Option<PaymentRecord>> {
        let mut payments = self.payments.write().await;
        Ok(payments.remove(&id))
    }
}
