use super::payment::PaymentStatus;
use crate::error::{LifecycleError, Result};

/// The outcome of checking a requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// The requested status equals the current one; nothing to write.
    Unchanged(PaymentStatus),
    Transition {
        from: PaymentStatus,
        to: PaymentStatus,
    },
}

/// Gatekeeper for payment status changes and deletion.
///
/// Stateless: every decision is a function of the statuses involved.
#[derive(Debug, Default, Clone, Copy)]
pub struct PaymentLifecycle;

impl PaymentLifecycle {
    /// True iff `proposed` is an outgoing edge of `current`.
    ///
    /// `proposed == current` is never an edge; use [`Self::plan_update`] when
    /// a same-status request should be treated as a no-op.
    pub fn can_transition(current: PaymentStatus, proposed: PaymentStatus) -> bool {
        current.can_transition_to(proposed)
    }

    pub fn assert_transition(current: PaymentStatus, proposed: PaymentStatus) -> Result<()> {
        if Self::can_transition(current, proposed) {
            Ok(())
        } else {
            Err(LifecycleError::InvalidTransition { current, proposed })
        }
    }

    pub fn can_delete(status: PaymentStatus) -> bool {
        !status.is_protected()
    }

    pub fn assert_deletable(status: PaymentStatus) -> Result<()> {
        if Self::can_delete(status) {
            Ok(())
        } else {
            Err(LifecycleError::ProtectedStateDeletion { status })
        }
    }

    /// Resolves an update request into either an idempotent no-op or a
    /// validated transition.
    pub fn plan_update(current: PaymentStatus, proposed: PaymentStatus) -> Result<StatusChange> {
        if current == proposed {
            return Ok(StatusChange::Unchanged(current));
        }
        Self::assert_transition(current, proposed)?;
        Ok(StatusChange::Transition {
            from: current,
            to: proposed,
        })
    }
}
