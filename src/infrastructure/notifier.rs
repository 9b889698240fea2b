use crate::domain::code_vault::mask_subject;
use crate::domain::ports::CodeNotifier;
use crate::domain::verification::{CodePurpose, VerificationCode};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// A delivered message, as seen by the recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveredCode {
    pub subject: String,
    pub purpose: CodePurpose,
    pub code: VerificationCode,
}

/// Keeps every delivery in memory instead of sending it anywhere.
#[derive(Default, Clone)]
pub struct OutboxNotifier {
    outbox: Arc<Mutex<Vec<DeliveredCode>>>,
}

impl OutboxNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent code delivered to `subject`.
    pub async fn last_for(&self, subject: &str) -> Option<DeliveredCode> {
        let outbox = self.outbox.lock().await;
        outbox.iter().rev().find(|d| d.subject == subject).cloned()
    }

    pub async fn delivered(&self) -> Vec<DeliveredCode> {
        self.outbox.lock().await.clone()
    }
}

#[async_trait]
impl CodeNotifier for OutboxNotifier {
    async fn deliver(
        &self,
        subject: &str,
        purpose: CodePurpose,
        code: &VerificationCode,
    ) -> Result<()> {
        self.outbox.lock().await.push(DeliveredCode {
            subject: subject.to_string(),
            purpose,
            code: code.clone(),
        });
        Ok(())
    }
}

/// Development stand-in for the email channel: writes the code to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl CodeNotifier for LogNotifier {
    async fn deliver(
        &self,
        subject: &str,
        purpose: CodePurpose,
        code: &VerificationCode,
    ) -> Result<()> {
        info!(subject = %mask_subject(subject), %purpose, code = %code, "delivering code");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_outbox_keeps_latest_per_subject() {
        let notifier = OutboxNotifier::new();
        let first = VerificationCode::new("111111").unwrap();
        let second = VerificationCode::new("222222").unwrap();

        notifier
            .deliver("a@x.io", CodePurpose::Verification, &first)
            .await
            .unwrap();
        notifier
            .deliver("b@x.io", CodePurpose::Verification, &first)
            .await
            .unwrap();
        notifier
            .deliver("a@x.io", CodePurpose::PasswordReset, &second)
            .await
            .unwrap();

        let last = notifier.last_for("a@x.io").await.unwrap();
        assert_eq!(last.code, second);
        assert_eq!(last.purpose, CodePurpose::PasswordReset);
        assert_eq!(notifier.delivered().await.len(), 3);
        assert!(notifier.last_for("c@x.io").await.is_none());
    }

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        let code = VerificationCode::new("123456").unwrap();
        assert!(
            LogNotifier
                .deliver("a@x.io", CodePurpose::Verification, &code)
                .await
                .is_ok()
        );
    }
}
