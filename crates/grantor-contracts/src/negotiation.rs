//! Negotiation identity, phases, events and outcomes.
//!
//! These types describe the conversation between a host and the negotiator:
//! the host feeds `NegotiationEvent`s into `Negotiator::advance()` and gets an
//! `Advance` back, until an `Outcome` is produced.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::capability::{CapabilityId, GrantResults};

/// Unique identifier for one negotiation run.
///
/// A negotiator instance mints a fresh id on every `start()`. The id appears
/// in every log line and journal record for that run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NegotiationId(pub uuid::Uuid);

impl NegotiationId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for NegotiationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NegotiationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The lifecycle phase of a negotiator.
///
/// `Checking` and `Terminal` are transient: they are entered and left inside
/// a single `start()`/`advance()` call and are only observable through the
/// transition journal. At rest a negotiator is `Idle` or one of the three
/// `Awaiting*` phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Idle,
    Checking,
    AwaitingRequestResult,
    AwaitingRationaleDecision,
    AwaitingSettingsReturn,
    Terminal,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Checking => "checking",
            Phase::AwaitingRequestResult => "awaiting-request-result",
            Phase::AwaitingRationaleDecision => "awaiting-rationale-decision",
            Phase::AwaitingSettingsReturn => "awaiting-settings-return",
            Phase::Terminal => "terminal",
        };
        f.write_str(name)
    }
}

/// What the user did with a two-button dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialogChoice {
    /// The positive button ("Allow", "Go to Settings").
    Proceed,
    /// The negative button ("Deny", "Cancel").
    Decline,
    /// The dialog went away without a button press. Treated as `Decline`.
    Dismissed,
}

impl DialogChoice {
    pub fn is_proceed(self) -> bool {
        matches!(self, DialogChoice::Proceed)
    }
}

/// An externally delivered event that advances a live negotiation.
///
/// Each variant is only valid in one phase; delivering it in any other phase
/// is a `ProtocolViolation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegotiationEvent {
    /// The platform answered the last `request_grants()` call.
    RequestResult(GrantResults),
    /// The user answered the rationale dialog.
    RationaleChoice(DialogChoice),
    /// The user answered the settings-redirect dialog.
    SettingsChoice(DialogChoice),
    /// The settings surface closed and control returned to the host.
    SettingsReturned,
}

impl NegotiationEvent {
    /// Short, stable name used in logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            NegotiationEvent::RequestResult(_) => "request-result",
            NegotiationEvent::RationaleChoice(_) => "rationale-choice",
            NegotiationEvent::SettingsChoice(_) => "settings-choice",
            NegotiationEvent::SettingsReturned => "settings-returned",
        }
    }
}

/// The terminal result of a negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Every capability in the set is granted.
    Granted,
    /// The listed capabilities (non-empty, in set order) are not granted.
    Denied(Vec<CapabilityId>),
}

impl Outcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, Outcome::Granted)
    }

    /// The denied capabilities, or an empty slice for `Granted`.
    pub fn denied(&self) -> &[CapabilityId] {
        match self {
            Outcome::Granted => &[],
            Outcome::Denied(ids) => ids,
        }
    }
}

/// What `start()` or `advance()` left the negotiator doing.
///
/// Callers pattern-match on this:
/// - `Waiting` → route the next platform/user callback into `advance()`
/// - `Resolved` → the outcome callback has fired; the negotiator is idle again
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Waiting(Phase),
    Resolved(Outcome),
}

impl Advance {
    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            Advance::Waiting(_) => None,
            Advance::Resolved(outcome) => Some(outcome),
        }
    }
}

/// Which of the two dialogs the negotiator is asking the host to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialogKind {
    Rationale,
    SettingsRedirect,
}

/// Everything a dialog surface needs to render one prompt.
///
/// The negotiator fills this in from the `MessageCatalog`; the surface only
/// renders it and reports the user's choice back as an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogRequest {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
    pub proceed_label: String,
    pub decline_label: String,
    /// The capabilities this prompt is about, in set order.
    pub capabilities: Vec<CapabilityId>,
}
