use crate::error::{LifecycleError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Trims and lowercases an email so one mailbox maps to one subject.
pub fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_ascii_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(LifecycleError::ValidationError(format!(
            "Invalid email address: {}",
            raw.trim()
        ))),
    }
}

/// Hex-encoded SHA-256 of a password.
pub fn password_digest(password: &str) -> Result<String> {
    if password.is_empty() {
        return Err(LifecycleError::ValidationError(
            "Password must not be empty".to_string(),
        ));
    }
    Ok(hex::encode(Sha256::digest(password.as_bytes())))
}

/// The user fields the account flows touch.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct User {
    pub email: String,
    pub verified: bool,
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, password_digest: String, now: DateTime<Utc>) -> Self {
        Self {
            email,
            verified: false,
            password_digest,
            created_at: now,
        }
    }

    pub fn has_password(&self, password: &str) -> bool {
        password_digest(password).is_ok_and(|digest| digest == self.password_digest)
    }
}
