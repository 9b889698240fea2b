use super::accounts::AccountService;
use super::payments::PaymentService;
use crate::config::VaultConfig;
use crate::domain::clock::{Clock, ManualClock};
use crate::domain::code_vault::CodeVault;
use crate::domain::command::{CommandKind, CommandRecord};
use crate::domain::payment::{Amount, PaymentStatus};
use crate::domain::payment_lifecycle::StatusChange;
use crate::domain::ports::{CodeNotifierBox, PaymentStoreBox, UserStoreBox};
use crate::domain::verification::CodeGenerator;
use crate::error::{LifecycleError, Result};
use crate::infrastructure::code_store::ShardedCodeStore;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Ok,
    Unchanged,
    Rejected,
}

/// What a command did, in a form fit for the outcome report.
#[derive(Debug, PartialEq, Clone)]
pub struct Executed {
    pub kind: OutcomeKind,
    pub detail: String,
}

impl Executed {
    fn ok(detail: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Ok,
            detail: detail.into(),
        }
    }
}

/// Replays account and payment commands against the lifecycle core.
///
/// Time is simulated: the engine owns a [`ManualClock`] that only moves on
/// `advance` commands, so a replay gives the same answers however fast it
/// runs.
pub struct LifecycleEngine {
    accounts: AccountService,
    payments: PaymentService,
    vault: Arc<CodeVault>,
    clock: Arc<ManualClock>,
}

impl LifecycleEngine {
    pub fn new(
        config: &VaultConfig,
        generator: Box<dyn CodeGenerator>,
        users: UserStoreBox,
        payments: PaymentStoreBox,
        notifier: CodeNotifierBox,
        clock: Arc<ManualClock>,
    ) -> Self {
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let vault = Arc::new(
            CodeVault::new(
                Box::new(ShardedCodeStore::new(config.shard_count)),
                dyn_clock.clone(),
            )
            .with_ttl(config.code_ttl)
            .with_generator(generator),
        );

        Self {
            accounts: AccountService::new(vault.clone(), users, notifier, dyn_clock.clone()),
            payments: PaymentService::new(payments, dyn_clock),
            vault,
            clock,
        }
    }

    /// The vault shared by every account flow, e.g. for a sweeper.
    pub fn vault(&self) -> Arc<CodeVault> {
        self.vault.clone()
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub fn payments(&self) -> &PaymentService {
        &self.payments
    }

    /// Runs one command. Business rejections come back as `Err`.
    pub async fn execute(&self, cmd: &CommandRecord) -> Result<Executed> {
        match cmd.command {
            CommandKind::Register => {
                self.accounts
                    .register(subject(cmd)?, value(cmd, "password")?)
                    .await?;
                Ok(Executed::ok("verification code sent"))
            }
            CommandKind::VerifyAccount => {
                self.accounts
                    .verify_account(subject(cmd)?, code(cmd)?)
                    .await?;
                Ok(Executed::ok("account verified"))
            }
            CommandKind::ForgotPassword => {
                self.accounts.forgot_password(subject(cmd)?).await?;
                Ok(Executed::ok("reset code sent if the account exists"))
            }
            CommandKind::VerifyResetCode => {
                self.accounts
                    .verify_reset_code(subject(cmd)?, code(cmd)?)
                    .await?;
                Ok(Executed::ok("reset code valid"))
            }
            CommandKind::ResetPassword => {
                self.accounts
                    .reset_password(subject(cmd)?, code(cmd)?, value(cmd, "new password")?)
                    .await?;
                Ok(Executed::ok("password updated"))
            }
            CommandKind::CreatePayment => {
                let amount: Amount = value(cmd, "amount")?.parse()?;
                let payment = self.payments.create_payment(payment_id(cmd)?, amount).await?;
                Ok(Executed::ok(payment.status.to_string()))
            }
            CommandKind::UpdatePayment => {
                let status: PaymentStatus = value(cmd, "status")?.parse()?;
                match self.payments.update_status(payment_id(cmd)?, status).await? {
                    StatusChange::Unchanged(current) => Ok(Executed {
                        kind: OutcomeKind::Unchanged,
                        detail: current.to_string(),
                    }),
                    StatusChange::Transition { from, to } => {
                        Ok(Executed::ok(format!("{} -> {}", from, to)))
                    }
                }
            }
            CommandKind::DeletePayment => {
                let payment = self.payments.delete_payment(payment_id(cmd)?).await?;
                Ok(Executed::ok(format!("deleted ({})", payment.status)))
            }
            CommandKind::Advance => {
                let raw = value(cmd, "seconds")?;
                let secs: i64 = raw.trim().parse().map_err(|_| {
                    LifecycleError::ValidationError(format!("Invalid number of seconds: {}", raw))
                })?;
                if secs < 0 {
                    return Err(LifecycleError::ValidationError(
                        "The clock only moves forward".to_string(),
                    ));
                }
                let by = chrono::Duration::try_seconds(secs).ok_or_else(|| {
                    LifecycleError::ValidationError(format!("Number of seconds out of range: {}", secs))
                })?;
                self.clock.advance(by)?;
                Ok(Executed::ok(format!("clock advanced {}s", secs)))
            }
            CommandKind::Sweep => {
                let removed = self.vault.sweep_expired();
                Ok(Executed::ok(format!("removed {} expired codes", removed)))
            }
        }
    }
}

fn required<'a>(field: &'a Option<String>, cmd: CommandKind, what: &str) -> Result<&'a str> {
    field
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| LifecycleError::ValidationError(format!("{} requires {}", cmd, what)))
}

fn subject(cmd: &CommandRecord) -> Result<&str> {
    required(&cmd.subject, cmd.command, "a subject")
}

fn code(cmd: &CommandRecord) -> Result<&str> {
    required(&cmd.code, cmd.command, "a code")
}

fn value<'a>(cmd: &'a CommandRecord, what: &str) -> Result<&'a str> {
    required(&cmd.value, cmd.command, &format!("a value ({})", what))
}

fn payment_id(cmd: &CommandRecord) -> Result<Uuid> {
    let raw = subject(cmd)?;
    Uuid::parse_str(raw.trim())
        .map_err(|_| LifecycleError::ValidationError(format!("Invalid payment id: {}", raw)))
}
