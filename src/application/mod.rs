//! Application layer: request flows built on the domain gates.
//!
//! `AccountService` and `PaymentService` check with the domain first and only
//! then call out to persistence. `LifecycleEngine` drives both from replayed
//! commands.

pub mod accounts;
pub mod engine;
pub mod payments;
