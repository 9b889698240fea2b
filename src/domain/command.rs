use serde::Deserialize;
use std::fmt;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    Register,
    VerifyAccount,
    ForgotPassword,
    VerifyResetCode,
    ResetPassword,
    CreatePayment,
    UpdatePayment,
    DeletePayment,
    /// Moves the simulated clock forward by `value` seconds.
    Advance,
    /// Purges expired codes now.
    Sweep,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandKind::Register => "register",
            CommandKind::VerifyAccount => "verify-account",
            CommandKind::ForgotPassword => "forgot-password",
            CommandKind::VerifyResetCode => "verify-reset-code",
            CommandKind::ResetPassword => "reset-password",
            CommandKind::CreatePayment => "create-payment",
            CommandKind::UpdatePayment => "update-payment",
            CommandKind::DeletePayment => "delete-payment",
            CommandKind::Advance => "advance",
            CommandKind::Sweep => "sweep",
        };
        f.write_str(name)
    }
}

/// One row of a replay file: `command, subject, code, value`.
///
/// `subject` is an email for account commands and a payment UUID for
/// payment commands. `value` carries the password, amount, status or number
/// of seconds depending on the command.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CommandRecord {
    pub command: CommandKind,
    pub subject: Option<String>,
    pub code: Option<String>,
    pub value: Option<String>,
}
