use crate::error::{LifecycleError, Result};
use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// How long an issued code stays valid unless configured otherwise.
pub const DEFAULT_CODE_TTL_MINUTES: i64 = 10;

/// The workflow a code was issued for.
///
/// A code issued for one purpose can never be redeemed for another.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CodePurpose {
    Verification,
    PasswordReset,
}

impl fmt::Display for CodePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodePurpose::Verification => f.write_str("verification"),
            CodePurpose::PasswordReset => f.write_str("password-reset"),
        }
    }
}

/// A fixed-width numeric secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VerificationCode(String);

impl VerificationCode {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.len() == CODE_LENGTH && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value))
        } else {
            Err(LifecycleError::ValidationError(format!(
                "Verification code must be {} digits",
                CODE_LENGTH
            )))
        }
    }

    pub(crate) fn from_number(n: u32) -> Self {
        Self(format!("{:06}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares without short-circuiting on the first differing byte.
    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), candidate.as_bytes())
    }
}

// Keep codes out of debug output and logs.
impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationCode(******)")
    }
}

impl fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VerificationCode {
    type Error = LifecycleError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<VerificationCode> for String {
    fn from(code: VerificationCode) -> Self {
        code.0
    }
}

/// A live code bound to a subject and a purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// The identifier the code is bound to (an email address).
    pub subject: String,
    pub code: VerificationCode,
    pub purpose: CodePurpose,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl VerificationRecord {
    pub fn new(
        subject: impl Into<String>,
        code: VerificationCode,
        purpose: CodePurpose,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            subject: subject.into(),
            code,
            purpose,
            issued_at,
            // Clamped to the last representable instant rather than overflowing.
            expires_at: issued_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// A record is still valid at exactly `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// True only for a live record with the same purpose and code.
    pub fn accepts(&self, code: &str, purpose: CodePurpose, now: DateTime<Utc>) -> bool {
        // Evaluate every condition so rejection takes the same path whatever the reason.
        let live = !self.is_expired(now);
        let same_purpose = self.purpose == purpose;
        let same_code = self.code.matches(code);
        live & same_purpose & same_code
    }
}

/// Produces fresh codes for [`crate::domain::code_vault::CodeVault`].
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> VerificationCode;
}

/// Draws codes uniformly from `000000..=999999`.
pub struct RandomCodeGenerator {
    rng: Mutex<StdRng>,
}

impl RandomCodeGenerator {
    /// Seeds from the operating system.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic sequence, for replays and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> VerificationCode {
        let n = self.rng.lock().gen_range(0..1_000_000);
        VerificationCode::from_number(n)
    }
}
