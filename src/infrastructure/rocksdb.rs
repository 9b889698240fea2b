use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{PaymentStore, UserStore};
use crate::domain::user::User;
use crate::error::{LifecycleError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Column Family for user records, keyed by normalised email.
pub const CF_USERS: &str = "users";
/// Column Family for payment records, keyed by the UUID bytes.
pub const CF_PAYMENTS: &str = "payments";

/// A persistent store for users and payments backed by RocksDB.
///
/// Each entity lives in its own Column Family and is stored as JSON.
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at `path`, creating the
    /// "users" and "payments" column families when missing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_users = ColumnFamilyDescriptor::new(CF_USERS, Options::default());
        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_users, cf_payments])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            LifecycleError::InternalError(Box::new(std::io::Error::other(format!(
                "{} column family not found",
                name
            ))))
        })
    }

    fn put_json<T: Serialize>(&self, cf: &str, key: &[u8], value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value).map_err(|e| {
            LifecycleError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {}", e),
            )))
        })?;
        self.db.put_cf(self.cf(cf)?, key, bytes)?;
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, cf: &str, key: &[u8]) -> Result<Option<T>> {
        let Some(bytes) = self.db.get_pinned_cf(self.cf(cf)?, key)? else {
            return Ok(None);
        };
        let value = serde_json::from_slice(&bytes).map_err(|e| {
            LifecycleError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Deserialization error: {}", e),
            )))
        })?;
        Ok(Some(value))
    }
}

#[async_trait]
impl UserStore for RocksDbStore {
    async fn store(&self, user: User) -> Result<()> {
        self.put_json(CF_USERS, user.email.as_bytes(), &user)
    }

    async fn get(&self, email: &str) -> Result<Option<User>> {
        self.get_json(CF_USERS, email.as_bytes())
    }
}

#[async_trait]
impl PaymentStore for RocksDbStore {
    async fn store(&self, payment: PaymentRecord) -> Result<()> {
        self.put_json(CF_PAYMENTS, payment.id.as_bytes(), &payment)
    }

    async fn get(&self, id: Uuid) -> Result<Option<PaymentRecord>> {
        self.get_json(CF_PAYMENTS, id.as_bytes())
    }

    async fn remove(&self, id: Uuid) -> Result<Option<PaymentRecord>> {
        let existing: Option<PaymentRecord> = self.get_json(CF_PAYMENTS, id.as_bytes())?;
        if existing.is_some() {
            self.db.delete_cf(self.cf(CF_PAYMENTS)?, id.as_bytes())?;
        }
        Ok(existing)
    }
}
