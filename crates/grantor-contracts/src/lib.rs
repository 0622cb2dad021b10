//! # grantor-contracts
//!
//! Shared types, configuration and error contracts for the GRANTOR runtime
//! access-grant negotiator.
//!
//! All crates in the workspace import from here. No negotiation logic lives
//! in this crate, only data definitions and error types.

pub mod capability;
pub mod config;
pub mod error;
pub mod journal;
pub mod negotiation;
