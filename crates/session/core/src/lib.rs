//! Deterministic session rules and data types shared across clients.
//!
//! `session-core` mirrors the read surface of the on-chain Tozlow session
//! contract as plain Rust values and exposes pure APIs over them. Nothing in
//! this crate performs I/O or reads the wall clock: the current time is always
//! passed in by the caller, so every function here is safe to call repeatedly
//! while a view is refreshed.
//!
//! - [`phase::derive_phase`] turns raw on-chain flags and timestamps into a
//!   lifecycle [`Phase`].
//! - [`validation`] holds the client-side checks that run before a write is
//!   ever submitted.
//! - [`amount`] converts between USDC minor units and display strings.
pub mod address;
pub mod amount;
pub mod error;
pub mod phase;
pub mod session;
pub mod validation;

pub use address::Address;
pub use amount::{USDC_DECIMALS, format_usdc, parse_usdc};
pub use error::ValidationError;
pub use phase::{Phase, derive_phase};
pub use session::{ParticipantStatus, Session, SessionId, SessionSummary};
pub use validation::{
    CreateSessionRequest, MAX_PARTICIPANTS, MIN_PARTICIPANTS, MIN_VOTING_PERIOD_SECS,
    ValidatedSession, check_deposit, check_finalize, check_vote,
};
