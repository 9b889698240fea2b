use crate::application::engine::{Executed, OutcomeKind};
use crate::domain::command::CommandRecord;
use crate::error::{LifecycleError, Result};
use serde::Serialize;
use std::io::Write;

/// One row of the replay report.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct CommandOutcome {
    pub line: usize,
    pub command: String,
    pub subject: String,
    pub outcome: OutcomeKind,
    pub detail: String,
}

impl CommandOutcome {
    /// Folds a command's result into a report row; errors become `rejected`.
    pub fn new(line: usize, cmd: &CommandRecord, result: Result<Executed>) -> Self {
        let (outcome, detail) = match result {
            Ok(executed) => (executed.kind, executed.detail),
            Err(e) => (OutcomeKind::Rejected, e.to_string()),
        };
        Self {
            line,
            command: cmd.command.to_string(),
            subject: cmd.subject.clone().unwrap_or_default(),
            outcome,
            detail,
        }
    }
}

/// Writes outcome rows as CSV with a `line,command,subject,outcome,detail` header.
pub struct OutcomeWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write(&mut self, outcome: &CommandOutcome) -> Result<()> {
        self.writer.serialize(outcome)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(LifecycleError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::command::CommandKind;
    use crate::domain::payment::PaymentStatus;

    fn record(command: CommandKind, subject: &str) -> CommandRecord {
        CommandRecord {
            command,
            subject: Some(subject.to_string()),
            code: None,
            value: None,
        }
    }

    #[test]
    fn test_writes_header_and_rows() {
        let mut out = Vec::new();
        {
            let mut writer = OutcomeWriter::new(&mut out);
            let ok = CommandOutcome::new(
                1,
                &record(CommandKind::VerifyAccount, "alice@example.com"),
                Ok(Executed {
                    kind: OutcomeKind::Ok,
                    detail: "account verified".to_string(),
                }),
            );
            let rejected = CommandOutcome::new(
                2,
                &record(CommandKind::UpdatePayment, "p-1"),
                Err(LifecycleError::InvalidTransition {
                    current: PaymentStatus::Processing,
                    proposed: PaymentStatus::Pending,
                }),
            );
            writer.write(&ok).unwrap();
            writer.write(&rejected).unwrap();
            writer.flush().unwrap();
        }

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("line,command,subject,outcome,detail"));
        assert_eq!(
            lines.next(),
            Some("1,verify-account,alice@example.com,ok,account verified")
        );
        assert_eq!(
            lines.next(),
            Some(
                "2,update-payment,p-1,rejected,invalid payment status transition from processing to pending"
            )
        );
    }
}
