//! Exported traces.
//!
//! A `NegotiationTrace` is the ordered list of transition records for one
//! negotiation, as captured by a journal, plus the outcome if the
//! negotiation resolved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use grantor_contracts::{
    journal::TransitionRecord,
    negotiation::{NegotiationId, Outcome, Phase},
};

/// The recorded history of one negotiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegotiationTrace {
    pub negotiation_id: NegotiationId,

    /// Transition records in sequence order.
    pub records: Vec<TransitionRecord>,

    /// The outcome carried by the transition into `Terminal`, if any.
    /// `None` for negotiations still in flight or abandoned.
    pub outcome: Option<Outcome>,

    /// Wall-clock time (UTC) the trace was exported.
    pub exported_at: DateTime<Utc>,
}

impl NegotiationTrace {
    pub(crate) fn new(negotiation_id: NegotiationId, records: Vec<TransitionRecord>) -> Self {
        let outcome = records.iter().rev().find_map(|r| r.outcome.clone());
        Self {
            negotiation_id,
            records,
            outcome,
            exported_at: Utc::now(),
        }
    }

    /// The sequence of phases visited, starting with the first `from`.
    pub fn phase_path(&self) -> Vec<Phase> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.first() {
            path.push(first.from);
        }
        path.extend(self.records.iter().map(|r| r.to));
        path
    }

    /// Number of times the trace entered `phase`.
    pub fn entries_into(&self, phase: Phase) -> usize {
        self.records.iter().filter(|r| r.to == phase && r.from != phase).count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Check that `records` form one contiguous walk.
///
/// Sequence numbers must be 0, 1, 2, … and every record must start in the
/// phase the previous one ended in. An empty slice is trivially well formed.
pub fn is_well_formed(records: &[TransitionRecord]) -> bool {
    let mut previous: Option<&TransitionRecord> = None;

    for (idx, record) in records.iter().enumerate() {
        if record.sequence != idx as u64 {
            return false;
        }
        if let Some(prev) = previous {
            if prev.negotiation_id != record.negotiation_id || prev.to != record.from {
                return false;
            }
        }
        previous = Some(record);
    }

    true
}
