//! In-memory implementation of `TransitionJournal`.
//!
//! `InMemoryJournal` keeps every record in a `Vec` behind an
//! `Arc<Mutex<_>>`. Cloning the journal clones the handle, so a host can give
//! one clone to the negotiator and keep another to export traces from.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use grantor_contracts::{
    journal::TransitionRecord,
    negotiation::{NegotiationId, Phase},
};
use grantor_core::traits::TransitionJournal;

use crate::trace::{is_well_formed, NegotiationTrace};

/// An append-only, in-memory transition journal.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJournal {
    pub(crate) records: Arc<Mutex<Vec<TransitionRecord>>>,
}

impl InMemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TransitionRecord>> {
        // Records are only ever pushed; a panic mid-push leaves nothing half written.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every record written so far, across all negotiations, in write order.
    pub fn records(&self) -> Vec<TransitionRecord> {
        self.lock().clone()
    }

    /// Ids of every negotiation seen, in the order they started.
    pub fn negotiations(&self) -> Vec<NegotiationId> {
        let mut ids: Vec<NegotiationId> = Vec::new();
        for record in self.lock().iter() {
            if !ids.contains(&record.negotiation_id) {
                ids.push(record.negotiation_id);
            }
        }
        ids
    }

    /// Export the trace of one negotiation.
    pub fn export(&self, negotiation_id: NegotiationId) -> NegotiationTrace {
        let records: Vec<TransitionRecord> = self
            .lock()
            .iter()
            .filter(|r| r.negotiation_id == negotiation_id)
            .cloned()
            .collect();
        NegotiationTrace::new(negotiation_id, records)
    }

    /// Export the trace of the most recently started negotiation.
    pub fn export_latest(&self) -> Option<NegotiationTrace> {
        self.negotiations().last().map(|id| self.export(*id))
    }

    /// True if every negotiation's records form a contiguous walk.
    pub fn verify_integrity(&self) -> bool {
        self.negotiations()
            .into_iter()
            .all(|id| is_well_formed(&self.export(id).records))
    }
}

impl TransitionJournal for InMemoryJournal {
    fn record(&self, record: &TransitionRecord) {
        if record.to == Phase::Idle {
            debug!(
                negotiation_id = %record.negotiation_id,
                sequence = record.sequence,
                "negotiation closed in journal"
            );
        }
        self.lock().push(record.clone());
    }
}
