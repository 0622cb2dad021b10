//! Transition records.
//!
//! The negotiator emits one `TransitionRecord` per phase change to its
//! optional journal. Records are descriptive only; nothing in the negotiator
//! reads them back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    capability::CapabilityId,
    negotiation::{NegotiationId, Outcome, Phase},
};

/// What caused a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    /// The host called `start()`.
    Start,
    /// The negotiator moved on by itself (status check, terminal hand-off).
    Internal,
    /// An event delivered through `advance()`, named by `NegotiationEvent::kind()`.
    Event(String),
    /// The host called `abandon()`.
    Abandon,
}

/// One phase change inside one negotiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub negotiation_id: NegotiationId,
    /// Position within the negotiation, starting at 0.
    pub sequence: u64,
    pub from: Phase,
    pub to: Phase,
    pub trigger: Trigger,
    /// The capabilities the new phase is working on (requested, pending
    /// rationale, pending settings). Empty for `Idle`/`Checking`.
    pub capabilities: Vec<CapabilityId>,
    /// Set only on the transition into `Terminal`.
    pub outcome: Option<Outcome>,
    pub timestamp: DateTime<Utc>,
}
