use crate::domain::clock::Clock;
use crate::domain::code_vault::{CodeVault, mask_subject};
use crate::domain::ports::{CodeNotifierBox, UserStoreBox};
use crate::domain::user::{User, normalize_email, password_digest};
use crate::domain::verification::CodePurpose;
use crate::error::{LifecycleError, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Registration, account verification and password reset flows.
///
/// Each flow checks the code with the [`CodeVault`] first and only touches
/// the user store once the check has passed.
pub struct AccountService {
    vault: Arc<CodeVault>,
    users: UserStoreBox,
    notifier: CodeNotifierBox,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    pub fn new(
        vault: Arc<CodeVault>,
        users: UserStoreBox,
        notifier: CodeNotifierBox,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            vault,
            users,
            notifier,
            clock,
        }
    }

    /// Creates an unverified user and sends them a verification code.
    pub async fn register(&self, email: &str, password: &str) -> Result<()> {
        let email = normalize_email(email)?;
        let digest = password_digest(password)?;
        if self.users.get(&email).await?.is_some() {
            return Err(LifecycleError::UserAlreadyExists(email));
        }

        self.users
            .store(User::new(email.clone(), digest, self.clock.now()))
            .await?;
        self.send_code(&email, CodePurpose::Verification).await?;
        info!(subject = %mask_subject(&email), "user registered");
        Ok(())
    }

    /// Consumes the code, then marks the user verified.
    ///
    /// The code is redeemed before any store call, so concurrent requests
    /// carrying the same code cannot both get through.
    pub async fn verify_account(&self, email: &str, code: &str) -> Result<()> {
        let email = normalize_email(email)?;
        self.redeem_code(&email, code, CodePurpose::Verification)?;

        let mut user = self
            .users
            .get(&email)
            .await?
            .ok_or_else(|| LifecycleError::UserNotFound(email.clone()))?;
        user.verified = true;
        self.users.store(user).await?;
        info!(subject = %mask_subject(&email), "account verified");
        Ok(())
    }

    /// Sends a password-reset code.
    ///
    /// Unknown addresses get the same `Ok(())` as known ones, without a code
    /// being issued.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let email = normalize_email(email)?;
        if self.users.get(&email).await?.is_none() {
            debug!(subject = %mask_subject(&email), "password reset for unknown user");
            return Ok(());
        }
        self.send_code(&email, CodePurpose::PasswordReset).await
    }

    /// Checks a reset code without consuming it, so the follow-up
    /// [`reset_password`](Self::reset_password) call can still use it.
    pub async fn verify_reset_code(&self, email: &str, code: &str) -> Result<()> {
        let email = normalize_email(email)?;
        self.check_code(&email, code, CodePurpose::PasswordReset)
    }

    pub async fn reset_password(&self, email: &str, code: &str, new_password: &str) -> Result<()> {
        let email = normalize_email(email)?;
        let digest = password_digest(new_password)?;
        self.redeem_code(&email, code, CodePurpose::PasswordReset)?;

        let mut user = self
            .users
            .get(&email)
            .await?
            .ok_or_else(|| LifecycleError::UserNotFound(email.clone()))?;
        user.password_digest = digest;
        self.users.store(user).await?;
        info!(subject = %mask_subject(&email), "password reset");
        Ok(())
    }

    pub async fn get_user(&self, email: &str) -> Result<Option<User>> {
        let email = normalize_email(email)?;
        self.users.get(&email).await
    }

    fn check_code(&self, email: &str, code: &str, purpose: CodePurpose) -> Result<()> {
        if self.vault.verify(email, code.trim(), purpose) {
            Ok(())
        } else {
            Err(LifecycleError::InvalidOrExpiredCode)
        }
    }

    fn redeem_code(&self, email: &str, code: &str, purpose: CodePurpose) -> Result<()> {
        if self.vault.consume(email, code.trim(), purpose) {
            Ok(())
        } else {
            Err(LifecycleError::InvalidOrExpiredCode)
        }
    }

    async fn send_code(&self, email: &str, purpose: CodePurpose) -> Result<()> {
        let code = self.vault.issue(email, purpose);
        self.notifier.deliver(email, purpose, &code).await
    }
}
