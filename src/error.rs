use crate::domain::payment::PaymentStatus;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Deliberately uninformative: wrong code, wrong purpose, expiry and a
    /// missing record all collapse into this one variant.
    #[error("invalid or expired code")]
    InvalidOrExpiredCode,
    #[error("invalid payment status transition from {current} to {proposed}")]
    InvalidTransition {
        current: PaymentStatus,
        proposed: PaymentStatus,
    },
    #[error("cannot delete a completed or refunded payment (status: {status})")]
    ProtectedStateDeletion { status: PaymentStatus },
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("payment already exists: {0}")]
    PaymentAlreadyExists(Uuid),
    #[error("payment not found: {0}")]
    PaymentNotFound(Uuid),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
