//! The simulated host: an event queue and the loop that drains it.
//!
//! Collaborators never call back into the negotiator. They post events to an
//! `EventQueue`, and `Simulation::run` feeds those events to
//! `Negotiator::advance()` one at a time, the way a UI thread would deliver
//! platform and dialog callbacks.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use grantor_contracts::{
    capability::CapabilitySet,
    config::NegotiatorConfig,
    error::GrantorResult,
    negotiation::{Advance, NegotiationEvent},
};
use grantor_core::{strategy::PlatformFlags, Negotiator, NotifyingCallback};
use grantor_journal::InMemoryJournal;

use crate::{
    platform::SimulatedPlatform,
    surface::{RecordingNotifier, ScriptedDialogs},
};

/// A FIFO of events waiting to be delivered. Cloning shares the queue.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    inner: Arc<Mutex<VecDeque<NegotiationEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<NegotiationEvent>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, event: NegotiationEvent) {
        self.lock().push_back(event);
    }

    pub fn pop(&self) -> Option<NegotiationEvent> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Every collaborator a simulated negotiation needs, sharing one queue.
///
/// The fields are handles: the negotiator gets clones, and the simulation
/// keeps these to script behaviour and inspect what happened.
pub struct Simulation {
    pub events: EventQueue,
    pub platform: SimulatedPlatform,
    pub dialogs: ScriptedDialogs,
    pub notifier: RecordingNotifier,
    pub journal: InMemoryJournal,
}

impl Simulation {
    pub fn new() -> Self {
        Self::with_flags(PlatformFlags::default())
    }

    pub fn with_flags(flags: PlatformFlags) -> Self {
        let events = EventQueue::new();
        Self {
            platform: SimulatedPlatform::new(events.clone()).with_flags(flags),
            dialogs: ScriptedDialogs::new(events.clone()),
            notifier: RecordingNotifier::new(),
            journal: InMemoryJournal::new(),
            events,
        }
    }

    /// Build a journaled negotiator wired to this simulation's collaborators.
    ///
    /// Outcomes are reported through a `NotifyingCallback` using the
    /// configured granted notice.
    pub fn negotiator(
        &self,
        capabilities: CapabilitySet,
        config: NegotiatorConfig,
    ) -> GrantorResult<Negotiator> {
        let callback = NotifyingCallback::new(
            Box::new(self.notifier.clone()),
            config.messages.granted_notice.clone(),
        );

        Ok(Negotiator::new(
            capabilities,
            config,
            Box::new(self.platform.clone()),
            Box::new(self.dialogs.clone()),
            Box::new(callback),
        )?
        .with_journal(Box::new(self.journal.clone())))
    }

    /// Start a negotiation and deliver queued events until it resolves.
    ///
    /// Returns `Advance::Waiting` if the queue runs dry first, which happens
    /// when a scripted collaborator has nothing more to say.
    pub fn run(&self, negotiator: &mut Negotiator) -> GrantorResult<Advance> {
        let mut advance = negotiator.start()?;

        while let Advance::Waiting(phase) = advance {
            let Some(event) = self.events.pop() else {
                warn!(%phase, "event queue drained before the negotiation resolved");
                return Ok(advance);
            };
            debug!(%phase, event = event.kind(), "delivering event");
            advance = negotiator.advance(event)?;
        }

        Ok(advance)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
