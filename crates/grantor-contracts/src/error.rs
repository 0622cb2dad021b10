//! Error types for the GRANTOR negotiator.
//!
//! Granted and Denied are outcomes, not errors. Every variant here is a
//! host-integration mistake: it is reported immediately and must not be
//! retried as-is.

use thiserror::Error;

use crate::negotiation::{NegotiationId, Phase};

/// The unified error type for the GRANTOR crates.
#[derive(Debug, Error)]
pub enum GrantorError {
    /// `start()` was called while a negotiation was still in flight.
    ///
    /// The running negotiation is left untouched.
    #[error("negotiation {negotiation_id} is already in flight")]
    ConcurrentNegotiation { negotiation_id: NegotiationId },

    /// An event arrived that the current phase does not accept.
    ///
    /// The negotiator stays in `phase`.
    #[error("event '{event}' is not valid in phase '{phase}'")]
    ProtocolViolation { phase: Phase, event: String },

    /// The capability set, strategy or profile is unusable.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
}

/// Convenience alias used throughout the GRANTOR crates.
pub type GrantorResult<T> = Result<T, GrantorError>;
