//! The GRANTOR negotiator: the event-driven access-grant state machine.
//!
//! The negotiator runs one negotiation at a time over a fixed capability set:
//!
//!   Idle → Checking → AwaitingRequestResult ⇄ AwaitingRationaleDecision
//!                  ↘ AwaitingSettingsReturn → Checking (re-entry)
//!   … → Terminal(Granted | Denied) → Idle
//!
//! `start()` and `advance()` are the only ways in. Both run synchronously
//! until the machine needs something from outside (a platform answer or a
//! user choice), ask for it through a collaborator, and return. The answer
//! comes back as the next `advance()` call.
//!
//! Two invariants hold structurally:
//! - a capability found granted at `Checking` never appears in a later
//!   request, rationale prompt or denied outcome of the same round;
//! - the outcome callback fires exactly once per negotiation that reaches
//!   `Terminal`, and never for an abandoned one.

use chrono::Utc;
use tracing::{debug, info, warn};

use grantor_contracts::{
    capability::{CapabilityId, CapabilitySet, GrantResults},
    config::{MessageCatalog, NegotiatorConfig, SettingsReturnPolicy},
    error::{GrantorError, GrantorResult},
    journal::{TransitionRecord, Trigger},
    negotiation::{
        Advance, DialogKind, DialogRequest, NegotiationEvent, NegotiationId, Outcome, Phase,
    },
};

use crate::{
    format::format_capability_list,
    strategy::{RequestMode, ResolvedStrategy},
    traits::{DialogSurface, OutcomeCallback, Platform, TransitionJournal},
};

// ── Internal state ───────────────────────────────────────────────────────────

/// The state a live negotiation rests in between events.
#[derive(Debug, Clone)]
enum Waiting {
    /// A `request_grants()` call is outstanding.
    Request {
        /// The exact batch sent, precursors included.
        requested: Vec<CapabilityId>,
        /// The members of the capability set in that batch, in set order.
        targets: Vec<CapabilityId>,
    },
    /// The rationale dialog is up for `denied`.
    Rationale { denied: Vec<CapabilityId> },
    /// The settings redirect is up (`opened == false`) or the settings
    /// surface itself is open (`opened == true`).
    Settings {
        pending: Vec<CapabilityId>,
        opened: bool,
    },
}

impl Waiting {
    fn phase(&self) -> Phase {
        match self {
            Waiting::Request { .. } => Phase::AwaitingRequestResult,
            Waiting::Rationale { .. } => Phase::AwaitingRationaleDecision,
            Waiting::Settings { .. } => Phase::AwaitingSettingsReturn,
        }
    }

    fn capabilities(&self) -> &[CapabilityId] {
        match self {
            Waiting::Request { requested, .. } => requested,
            Waiting::Rationale { denied } => denied,
            Waiting::Settings { pending, .. } => pending,
        }
    }
}

/// Where a run of the decision logic ended up.
enum Step {
    Wait(Waiting),
    Resolve(Outcome),
}

/// Why the status check is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckOrigin {
    Start,
    SettingsReturn,
}

/// Identity and journal cursor of one negotiation.
#[derive(Debug)]
struct Run {
    id: NegotiationId,
    sequence: u64,
}

/// The one live negotiation a negotiator may hold.
#[derive(Debug)]
struct Negotiation {
    run: Run,
    state: Waiting,
}

// ── Negotiator ───────────────────────────────────────────────────────────────

/// Drives access-grant negotiations for one capability set.
///
/// Construct one negotiator per capability set and keep it for as long as
/// the hosting screen lives. Negotiations run one after another, never side
/// by side; `&mut self` on every entry point keeps event delivery serialized.
pub struct Negotiator {
    capabilities: CapabilitySet,
    messages: MessageCatalog,
    strategy: ResolvedStrategy,
    settings_return: SettingsReturnPolicy,
    platform: Box<dyn Platform>,
    dialogs: Box<dyn DialogSurface>,
    callback: Box<dyn OutcomeCallback>,
    journal: Option<Box<dyn TransitionJournal>>,
    live: Option<Negotiation>,
}

impl Negotiator {
    /// Build a negotiator for `capabilities`.
    ///
    /// The platform's flags are read here, once, to resolve the configured
    /// request strategy.
    ///
    /// # Errors
    ///
    /// Returns `GrantorError::InvalidConfiguration` if the strategy cannot be
    /// resolved for this capability set.
    pub fn new(
        capabilities: CapabilitySet,
        config: NegotiatorConfig,
        platform: Box<dyn Platform>,
        dialogs: Box<dyn DialogSurface>,
        callback: Box<dyn OutcomeCallback>,
    ) -> GrantorResult<Self> {
        let flags = platform.flags();
        let strategy = ResolvedStrategy::resolve(&config.strategy, &capabilities, &flags)?;

        debug!(
            capabilities = capabilities.len(),
            flags = ?flags.iter().collect::<Vec<_>>(),
            mode = ?strategy.mode,
            settings_return = ?config.settings_return,
            "negotiator constructed"
        );

        Ok(Self {
            capabilities,
            messages: config.messages,
            strategy,
            settings_return: config.settings_return,
            platform,
            dialogs,
            callback,
            journal: None,
            live: None,
        })
    }

    /// Attach a transition journal. Intended to be called right after `new`.
    pub fn with_journal(mut self, journal: Box<dyn TransitionJournal>) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    pub fn strategy(&self) -> &ResolvedStrategy {
        &self.strategy
    }

    /// The phase the negotiator is resting in.
    pub fn phase(&self) -> Phase {
        self.live
            .as_ref()
            .map(|n| n.state.phase())
            .unwrap_or(Phase::Idle)
    }

    /// The id of the live negotiation, if any.
    pub fn negotiation_id(&self) -> Option<NegotiationId> {
        self.live.as_ref().map(|n| n.run.id)
    }

    /// The capabilities the live negotiation is currently waiting on.
    pub fn pending(&self) -> &[CapabilityId] {
        self.live
            .as_ref()
            .map(|n| n.state.capabilities())
            .unwrap_or(&[])
    }

    /// Start a new negotiation.
    ///
    /// Runs the status check immediately. If every capability is already
    /// granted the negotiation resolves inside this call, without any request
    /// or dialog, and `Advance::Resolved(Outcome::Granted)` is returned.
    ///
    /// # Errors
    ///
    /// Returns `GrantorError::ConcurrentNegotiation` if a negotiation is
    /// already live. That negotiation is not touched.
    pub fn start(&mut self) -> GrantorResult<Advance> {
        if let Some(live) = &self.live {
            warn!(
                negotiation_id = %live.run.id,
                phase = %live.state.phase(),
                "start called while a negotiation is in flight"
            );
            return Err(GrantorError::ConcurrentNegotiation {
                negotiation_id: live.run.id,
            });
        }

        let mut run = Run {
            id: NegotiationId::new(),
            sequence: 0,
        };

        info!(
            negotiation_id = %run.id,
            capabilities = self.capabilities.len(),
            "negotiation started"
        );

        self.record(&mut run, Phase::Idle, Phase::Checking, Trigger::Start, &[], None);
        let step = self.check(run.id, CheckOrigin::Start);
        Ok(self.settle(run, Phase::Checking, Trigger::Internal, step))
    }

    /// Feed one external event into the live negotiation.
    ///
    /// # Errors
    ///
    /// Returns `GrantorError::ProtocolViolation` if no negotiation is live or
    /// the current phase does not accept `event`. The negotiator stays exactly
    /// where it was.
    pub fn advance(&mut self, event: NegotiationEvent) -> GrantorResult<Advance> {
        let Some(Negotiation { mut run, state }) = self.live.take() else {
            warn!(event = event.kind(), "event delivered with no negotiation in flight");
            return Err(GrantorError::ProtocolViolation {
                phase: Phase::Idle,
                event: event.kind().to_string(),
            });
        };

        let from = state.phase();
        let trigger = Trigger::Event(event.kind().to_string());

        debug!(
            negotiation_id = %run.id,
            phase = %from,
            event = event.kind(),
            "event received"
        );

        let step = match (state, event) {
            (Waiting::Request { requested, targets }, NegotiationEvent::RequestResult(results)) => {
                self.on_request_result(run.id, &requested, targets, &results)
            }

            (Waiting::Rationale { denied }, NegotiationEvent::RationaleChoice(choice)) => {
                if choice.is_proceed() {
                    self.issue_request(run.id, denied)
                } else {
                    debug!(negotiation_id = %run.id, ?choice, "rationale declined");
                    Step::Resolve(Outcome::Denied(denied))
                }
            }

            (
                Waiting::Settings {
                    pending,
                    opened: false,
                },
                NegotiationEvent::SettingsChoice(choice),
            ) => {
                if choice.is_proceed() {
                    debug!(negotiation_id = %run.id, "opening settings surface");
                    self.platform.open_settings();
                    Step::Wait(Waiting::Settings {
                        pending,
                        opened: true,
                    })
                } else {
                    debug!(negotiation_id = %run.id, ?choice, "settings redirect declined");
                    Step::Resolve(Outcome::Denied(pending))
                }
            }

            (Waiting::Settings { opened: true, .. }, NegotiationEvent::SettingsReturned) => {
                self.record(&mut run, from, Phase::Checking, trigger, &[], None);
                let step = self.check(run.id, CheckOrigin::SettingsReturn);
                return Ok(self.settle(run, Phase::Checking, Trigger::Internal, step));
            }

            (state, event) => {
                let phase = state.phase();
                warn!(
                    negotiation_id = %run.id,
                    phase = %phase,
                    event = event.kind(),
                    "event does not match the current phase"
                );
                self.live = Some(Negotiation { run, state });
                return Err(GrantorError::ProtocolViolation {
                    phase,
                    event: event.kind().to_string(),
                });
            }
        };

        Ok(self.settle(run, from, trigger, step))
    }

    /// Drop the live negotiation without delivering an outcome.
    ///
    /// This is what happens when the hosting context goes away mid-way. A
    /// no-op when idle.
    pub fn abandon(&mut self) {
        if let Some(Negotiation { mut run, state }) = self.live.take() {
            info!(
                negotiation_id = %run.id,
                phase = %state.phase(),
                "negotiation abandoned"
            );
            self.record(&mut run, state.phase(), Phase::Idle, Trigger::Abandon, &[], None);
        }
    }

    // ── Decision steps ───────────────────────────────────────────────────────

    /// `Checking`: read every status fresh and decide where to go.
    fn check(&self, id: NegotiationId, origin: CheckOrigin) -> Step {
        let ungranted: Vec<CapabilityId> = self
            .capabilities
            .iter()
            .filter(|cap| !self.platform.grant_status(cap).is_granted())
            .cloned()
            .collect();

        debug!(
            negotiation_id = %id,
            ?origin,
            ungranted = ?ungranted,
            "status checked"
        );

        if ungranted.is_empty() {
            return Step::Resolve(Outcome::Granted);
        }

        if origin == CheckOrigin::SettingsReturn
            && self.settings_return == SettingsReturnPolicy::Resolve
        {
            return Step::Resolve(Outcome::Denied(ungranted));
        }

        match self.strategy.mode {
            RequestMode::Direct => self.issue_request(id, ungranted),
            RequestMode::SettingsFirst => self.redirect_to_settings(id, ungranted),
        }
    }

    /// Send one platform request covering `targets`.
    fn issue_request(&self, id: NegotiationId, targets: Vec<CapabilityId>) -> Step {
        let requested = self.strategy.request_batch(&targets, self.platform.as_ref());

        debug!(
            negotiation_id = %id,
            requested = ?requested,
            "requesting grants"
        );
        self.platform.request_grants(&requested);

        Step::Wait(Waiting::Request { requested, targets })
    }

    /// Classify a request result.
    fn on_request_result(
        &self,
        id: NegotiationId,
        requested: &[CapabilityId],
        targets: Vec<CapabilityId>,
        results: &GrantResults,
    ) -> Step {
        for answered in results.ids() {
            if !requested.contains(answered) {
                warn!(
                    negotiation_id = %id,
                    capability = %answered,
                    "ignoring result for a capability that was not requested"
                );
            }
        }

        let denied: Vec<CapabilityId> = targets
            .into_iter()
            .filter(|cap| !results.is_granted(cap))
            .collect();

        if denied.is_empty() {
            return Step::Resolve(Outcome::Granted);
        }

        let eligibility: Vec<(&CapabilityId, bool)> = denied
            .iter()
            .map(|cap| (cap, self.platform.is_rationale_eligible(cap)))
            .collect();
        debug!(
            negotiation_id = %id,
            eligibility = ?eligibility,
            "rationale eligibility checked"
        );
        let rationale_eligible = eligibility.iter().any(|(_, eligible)| *eligible);

        if rationale_eligible {
            self.dialogs.show_dialog(&self.rationale_dialog(&denied));
            Step::Wait(Waiting::Rationale { denied })
        } else {
            self.redirect_to_settings(id, denied)
        }
    }

    /// Show the settings redirect for `pending`.
    fn redirect_to_settings(&self, id: NegotiationId, pending: Vec<CapabilityId>) -> Step {
        debug!(
            negotiation_id = %id,
            pending = ?pending,
            "redirecting to settings"
        );
        self.dialogs.show_dialog(&self.settings_dialog(&pending));
        Step::Wait(Waiting::Settings {
            pending,
            opened: false,
        })
    }

    fn rationale_dialog(&self, denied: &[CapabilityId]) -> DialogRequest {
        DialogRequest {
            kind: DialogKind::Rationale,
            title: self.messages.rationale_title.clone(),
            message: format!(
                "{}\n{}",
                self.messages.rationale_message,
                format_capability_list(denied)
            ),
            proceed_label: self.messages.rationale_proceed.clone(),
            decline_label: self.messages.rationale_decline.clone(),
            capabilities: denied.to_vec(),
        }
    }

    fn settings_dialog(&self, pending: &[CapabilityId]) -> DialogRequest {
        DialogRequest {
            kind: DialogKind::SettingsRedirect,
            title: self.messages.settings_title.clone(),
            message: self.messages.settings_message.clone(),
            proceed_label: self.messages.settings_proceed.clone(),
            decline_label: self.messages.settings_decline.clone(),
            capabilities: pending.to_vec(),
        }
    }

    // ── Bookkeeping ──────────────────────────────────────────────────────────

    /// Store the result of a decision step: either park the negotiation in
    /// its new waiting state, or deliver the outcome and go idle.
    fn settle(&mut self, mut run: Run, from: Phase, trigger: Trigger, step: Step) -> Advance {
        match step {
            Step::Wait(state) => {
                let to = state.phase();
                self.record(&mut run, from, to, trigger, state.capabilities(), None);
                self.live = Some(Negotiation { run, state });
                Advance::Waiting(to)
            }

            Step::Resolve(outcome) => {
                self.record(
                    &mut run,
                    from,
                    Phase::Terminal,
                    trigger,
                    outcome.denied(),
                    Some(outcome.clone()),
                );

                match &outcome {
                    Outcome::Granted => {
                        info!(negotiation_id = %run.id, "negotiation resolved: granted");
                        self.callback.on_granted();
                    }
                    Outcome::Denied(denied) => {
                        info!(
                            negotiation_id = %run.id,
                            denied = ?denied,
                            "negotiation resolved: denied"
                        );
                        self.callback.on_denied(denied);
                    }
                }

                self.record(&mut run, Phase::Terminal, Phase::Idle, Trigger::Internal, &[], None);
                self.live = None;
                Advance::Resolved(outcome)
            }
        }
    }

    fn record(
        &self,
        run: &mut Run,
        from: Phase,
        to: Phase,
        trigger: Trigger,
        capabilities: &[CapabilityId],
        outcome: Option<Outcome>,
    ) {
        if let Some(journal) = &self.journal {
            journal.record(&TransitionRecord {
                negotiation_id: run.id,
                sequence: run.sequence,
                from,
                to,
                trigger,
                capabilities: capabilities.to_vec(),
                outcome,
                timestamp: Utc::now(),
            });
        }
        run.sequence += 1;
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
