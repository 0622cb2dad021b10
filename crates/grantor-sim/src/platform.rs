//! A scripted stand-in for an OS permission service.
//!
//! `SimulatedPlatform` keeps a status table, answers `request_grants()` from a
//! queue of scripted responses and applies a scripted set of changes while the
//! settings surface is "open". Every answer is posted to an `EventQueue`
//! instead of being returned, the same way a real platform answers through a
//! later callback.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use grantor_contracts::{
    capability::{CapabilityId, GrantResults, GrantStatus},
    negotiation::NegotiationEvent,
};
use grantor_core::{strategy::PlatformFlags, traits::Platform};

use crate::host::EventQueue;

/// One call the negotiator made into the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    RequestGrants(Vec<CapabilityId>),
    OpenSettings,
}

#[derive(Debug, Default)]
struct PlatformState {
    statuses: HashMap<CapabilityId, GrantStatus>,
    rationale_eligible: HashSet<CapabilityId>,
    responses: VecDeque<GrantResults>,
    settings_grants: Vec<CapabilityId>,
    calls: Vec<PlatformCall>,
}

/// Scripted platform. Cloning shares the underlying state.
#[derive(Debug, Clone)]
pub struct SimulatedPlatform {
    state: Arc<Mutex<PlatformState>>,
    flags: PlatformFlags,
    events: EventQueue,
}

impl SimulatedPlatform {
    pub fn new(events: EventQueue) -> Self {
        Self {
            state: Arc::new(Mutex::new(PlatformState::default())),
            flags: PlatformFlags::default(),
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, PlatformState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the flag set. Only takes effect for negotiators built afterwards.
    pub fn with_flags(mut self, flags: PlatformFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn set_status(&self, id: &str, status: GrantStatus) {
        self.lock().statuses.insert(CapabilityId::new(id), status);
    }

    pub fn set_rationale_eligible(&self, id: &str, eligible: bool) {
        let id = CapabilityId::new(id);
        let mut state = self.lock();
        if eligible {
            state.rationale_eligible.insert(id);
        } else {
            state.rationale_eligible.remove(&id);
        }
    }

    /// Queue the answer to the next `request_grants()` call.
    ///
    /// Once the queue is empty, further requests are answered with every
    /// requested capability denied.
    pub fn script_response(&self, response: GrantResults) {
        self.lock().responses.push_back(response);
    }

    /// Capabilities the user switches on the next time settings are opened.
    pub fn grant_in_settings(&self, id: &str) {
        self.lock().settings_grants.push(CapabilityId::new(id));
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.lock().calls.clone()
    }

    /// Just the request batches, in order.
    pub fn requests(&self) -> Vec<Vec<CapabilityId>> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                PlatformCall::RequestGrants(ids) => Some(ids.clone()),
                PlatformCall::OpenSettings => None,
            })
            .collect()
    }
}

impl Platform for SimulatedPlatform {
    fn grant_status(&self, id: &CapabilityId) -> GrantStatus {
        self.lock()
            .statuses
            .get(id)
            .copied()
            .unwrap_or(GrantStatus::Unknown)
    }

    fn is_rationale_eligible(&self, id: &CapabilityId) -> bool {
        self.lock().rationale_eligible.contains(id)
    }

    fn request_grants(&self, ids: &[CapabilityId]) {
        let response = {
            let mut state = self.lock();
            state.calls.push(PlatformCall::RequestGrants(ids.to_vec()));

            let response = state
                .responses
                .pop_front()
                .unwrap_or_else(|| ids.iter().map(|id| (id.clone(), false)).collect());

            for id in response.ids() {
                let status = if response.is_granted(id) {
                    GrantStatus::Granted
                } else {
                    GrantStatus::Denied
                };
                state.statuses.insert(id.clone(), status);
            }
            response
        };

        debug!(requested = ?ids, answered = response.len(), "simulated request answered");
        self.events.push(NegotiationEvent::RequestResult(response));
    }

    fn open_settings(&self) {
        {
            let mut state = self.lock();
            state.calls.push(PlatformCall::OpenSettings);
            for id in std::mem::take(&mut state.settings_grants) {
                debug!(capability = %id, "granted from settings");
                state.statuses.insert(id, GrantStatus::Granted);
            }
        }
        self.events.push(NegotiationEvent::SettingsReturned);
    }

    fn flags(&self) -> PlatformFlags {
        self.flags.clone()
    }
}
