use crate::domain::clock::Clock;
use crate::domain::payment::{Amount, PaymentRecord, PaymentStatus};
use crate::domain::payment_lifecycle::{PaymentLifecycle, StatusChange};
use crate::domain::ports::PaymentStoreBox;
use crate::error::{LifecycleError, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// Applies payment status changes and deletions through [`PaymentLifecycle`].
///
/// Read, check and write happen under one lock so two concurrent requests
/// can't both pass the check from the same observed status. Nothing is
/// written unless the check passes.
pub struct PaymentService {
    store: PaymentStoreBox,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl PaymentService {
    pub fn new(store: PaymentStoreBox, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn create_payment(&self, id: Uuid, amount: Amount) -> Result<PaymentRecord> {
        let _guard = self.write_lock.lock().await;
        if self.store.get(id).await?.is_some() {
            return Err(LifecycleError::PaymentAlreadyExists(id));
        }
        let payment = PaymentRecord::new(id, amount, self.clock.now());
        self.store.store(payment.clone()).await?;
        Ok(payment)
    }

    pub async fn get_payment(&self, id: Uuid) -> Result<PaymentRecord> {
        self.store
            .get(id)
            .await?
            .ok_or(LifecycleError::PaymentNotFound(id))
    }

    /// Moves a payment to `status`.
    ///
    /// Requesting the current status is a no-op reported as
    /// [`StatusChange::Unchanged`]; the record is not rewritten.
    pub async fn update_status(&self, id: Uuid, status: PaymentStatus) -> Result<StatusChange> {
        let _guard = self.write_lock.lock().await;
        let mut payment = self.get_payment(id).await?;

        let change = PaymentLifecycle::plan_update(payment.status, status).inspect_err(|e| {
            warn!(payment = %id, "{}", e);
        })?;

        if let StatusChange::Transition { from, to } = change {
            payment.status = to;
            payment.updated_at = self.clock.now();
            self.store.store(payment).await?;
            info!(payment = %id, %from, %to, "payment status changed");
        }
        Ok(change)
    }

    /// Removes a payment unless it is completed or refunded.
    pub async fn delete_payment(&self, id: Uuid) -> Result<PaymentRecord> {
        let _guard = self.write_lock.lock().await;
        let payment = self.get_payment(id).await?;

        PaymentLifecycle::assert_deletable(payment.status).inspect_err(|e| {
            warn!(payment = %id, "{}", e);
        })?;

        self.store.remove(id).await?;
        info!(payment = %id, status = %payment.status, "payment deleted");
        Ok(payment)
    }
}
