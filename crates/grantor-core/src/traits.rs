//! Collaborator trait definitions for the negotiator.
//!
//! These traits are the complete boundary between the state machine and the
//! host:
//!
//! - `Platform`          : live grant status, rationale eligibility, the
//!                         request call and the settings surface
//! - `DialogSurface`     : renders rationale / settings-redirect prompts
//! - `OutcomeCallback`   : receives the terminal outcome, exactly once
//! - `Notifier`          : transient toast-style notifications
//! - `TransitionJournal` : optional record of every phase change
//!
//! Every action method is fire-and-forget. Whatever the platform or the user
//! answers comes back later as a `NegotiationEvent` passed to
//! `Negotiator::advance()`; no method here may call back into the negotiator.

use grantor_contracts::{
    capability::{CapabilityId, GrantStatus},
    journal::TransitionRecord,
    negotiation::DialogRequest,
};

use crate::strategy::PlatformFlags;

/// The OS permission service, as seen by the negotiator.
pub trait Platform: Send + Sync {
    /// Return the current status of `id`.
    ///
    /// Must be cheap, synchronous and side-effect free: two calls without an
    /// intervening request must agree. The negotiator never caches the answer.
    fn grant_status(&self, id: &CapabilityId) -> GrantStatus;

    /// Return true if the platform would still let the app explain itself
    /// before asking for `id` again.
    ///
    /// Only meaningful right after `id` was denied by a request; the
    /// negotiator calls it at no other time.
    fn is_rationale_eligible(&self, id: &CapabilityId) -> bool;

    /// Ask the platform to prompt for `ids` (non-empty, ordered).
    ///
    /// The answer is delivered later as `NegotiationEvent::RequestResult`.
    fn request_grants(&self, ids: &[CapabilityId]);

    /// Open the app's settings surface.
    ///
    /// Its closing is delivered later as `NegotiationEvent::SettingsReturned`.
    fn open_settings(&self);

    /// Platform capability flags (e.g. "background prompting is forbidden").
    ///
    /// Read once, when a negotiator is constructed.
    fn flags(&self) -> PlatformFlags {
        PlatformFlags::default()
    }
}

/// A surface able to show a two-choice dialog.
pub trait DialogSurface: Send + Sync {
    /// Present `dialog`. The user's choice is delivered later as a
    /// `RationaleChoice` or `SettingsChoice` event, depending on
    /// `dialog.kind`; dismissal is delivered as `DialogChoice::Dismissed`.
    fn show_dialog(&self, dialog: &DialogRequest);
}

/// Receiver of the terminal outcome of a negotiation.
///
/// The negotiator calls exactly one of these methods, exactly once, per
/// negotiation that reaches a terminal state. Abandoned negotiations call
/// neither.
pub trait OutcomeCallback: Send + Sync {
    fn on_granted(&self);

    /// `denied` is non-empty and in capability-set order.
    fn on_denied(&self, denied: &[CapabilityId]);
}

/// A transient, fire-and-forget notification surface.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, success: bool);
}

/// A sink for transition records.
///
/// Journals observe; they cannot veto or fail a transition.
pub trait TransitionJournal: Send + Sync {
    fn record(&self, record: &TransitionRecord);
}
