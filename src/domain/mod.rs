//! Domain layer: records, the two lifecycle gates and the ports they need.

pub mod clock;
pub mod code_vault;
pub mod command;
pub mod payment;
pub mod payment_lifecycle;
pub mod ports;
pub mod user;
pub mod verification;
