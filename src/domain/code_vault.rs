use super::clock::Clock;
use super::ports::CodeStoreBox;
use super::verification::{
    CodeGenerator, CodePurpose, DEFAULT_CODE_TTL_MINUTES, RandomCodeGenerator, VerificationCode,
    VerificationRecord,
};
use chrono::Duration;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Issues, stores and checks short-lived, single-use, purpose-scoped codes.
///
/// At most one record exists per subject: issuing again replaces the
/// previous code. A successful [`verify`](Self::verify) leaves the record in
/// place; callers [`invalidate`](Self::invalidate) it once the code's
/// purpose has been carried out.
pub struct CodeVault {
    store: CodeStoreBox,
    clock: Arc<dyn Clock>,
    generator: Box<dyn CodeGenerator>,
    ttl: Duration,
}

impl CodeVault {
    /// Creates a vault with the default ten minute ttl and an OS-seeded generator.
    pub fn new(store: CodeStoreBox, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            generator: Box::new(RandomCodeGenerator::new()),
            ttl: Duration::minutes(DEFAULT_CODE_TTL_MINUTES),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_generator(mut self, generator: Box<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Generates a code for `subject`, replacing any earlier one.
    pub fn issue(&self, subject: &str, purpose: CodePurpose) -> VerificationCode {
        let code = self.generator.generate();
        let record = VerificationRecord::new(subject, code.clone(), purpose, self.clock.now(), self.ttl);
        debug!(subject = %mask_subject(subject), %purpose, expires_at = %record.expires_at, "issued code");
        self.store.put(record);
        code
    }

    /// True only for the exact live code issued to `subject` for `purpose`.
    pub fn verify(&self, subject: &str, code: &str, purpose: CodePurpose) -> bool {
        let now = self.clock.now();
        let Some(record) = self.store.get(subject) else {
            // Same comparison work as a wrong code, so a miss is not faster.
            let _ = std::hint::black_box(missing_code().matches(code));
            debug!(subject = %mask_subject(subject), "no code on record");
            return false;
        };

        if record.is_expired(now) {
            self.store.remove_if_expired(subject, now);
            debug!(subject = %mask_subject(subject), "code expired");
            return false;
        }

        let accepted = record.accepts(code, purpose, now);
        if !accepted {
            debug!(subject = %mask_subject(subject), %purpose, "code rejected");
        }
        accepted
    }

    /// Redeems a code: removes the record only if it still accepts `code`
    /// for `purpose`, so among concurrent callers with the same code exactly
    /// one gets `true`. A newer record issued in the meantime is left alone.
    pub fn consume(&self, subject: &str, code: &str, purpose: CodePurpose) -> bool {
        if !self.verify(subject, code, purpose) {
            return false;
        }
        let now = self.clock.now();
        let consumed = self
            .store
            .remove_if(subject, &|record| record.accepts(code, purpose, now));
        if consumed {
            debug!(subject = %mask_subject(subject), %purpose, "code consumed");
        } else {
            debug!(subject = %mask_subject(subject), %purpose, "code already consumed or replaced");
        }
        consumed
    }

    /// Drops the record for `subject`, if any.
    pub fn invalidate(&self, subject: &str) {
        if self.store.remove(subject).is_some() {
            debug!(subject = %mask_subject(subject), "code invalidated");
        }
    }

    pub fn sweep_expired(&self) -> usize {
        let removed = self.store.sweep_expired(self.clock.now());
        if removed > 0 {
            info!(removed, remaining = self.store.len(), "swept expired codes");
        }
        removed
    }

    /// Records held right now, including expired ones not yet swept.
    pub fn live_records(&self) -> usize {
        self.store.len()
    }
}

/// Stand-in compared against when a subject has no record.
fn missing_code() -> &'static VerificationCode {
    static MISSING: OnceLock<VerificationCode> = OnceLock::new();
    MISSING.get_or_init(|| VerificationCode::from_number(0))
}

/// `alice@example.com` -> `a***@example.com`
pub(crate) fn mask_subject(subject: &str) -> String {
    match subject.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}
