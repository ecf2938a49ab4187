//! Crowdfund Domain Types
//!
//! This crate defines the domain types for a threshold-gated crowdfunding
//! campaign: the values that flow through the ledger, the identities that
//! hold them, and the records the ledger leaves behind.
//!
//! # Key Concepts
//!
//! - **Amount**: value in the smallest currency unit (wei). Parsed from and
//!   formatted to ether strings at the edges.
//! - **Campaign**: a recipient, a threshold and a deadline, fixed at
//!   construction. Its state moves from `Pending` to exactly one terminal
//!   outcome.
//! - **Event log**: an append-only record of contributions, withdrawals and
//!   the resolution outcome.
//!
//! # Architecture
//!
//! This is a pure types crate with no runtime dependencies. The state machine
//! that mutates these types lives in `crowdfund-runtime`. IDs use the newtype
//! pattern and implement `Display`, `generate()`, and `new()`.

#![deny(unsafe_code)]

mod address;
mod amount;
mod campaign;
mod errors;
mod events;
mod time;

pub use address::*;
pub use amount::*;
pub use campaign::*;
pub use errors::*;
pub use events::*;
pub use time::*;
