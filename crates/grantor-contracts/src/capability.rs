//! Capability identifiers and the per-capability answers a platform gives.
//!
//! A negotiation always runs over one `CapabilitySet`: an ordered, duplicate
//! free list of `CapabilityId`s fixed at construction. Every ordered list the
//! negotiator produces (requests, rationale prompts, denied outcomes) is a
//! subsequence of that set.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GrantorError, GrantorResult};

/// An opaque, platform-defined capability name.
///
/// Examples: "android.permission.CAMERA", "contacts", "location.background".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CapabilityId(pub String);

impl CapabilityId {
    /// Construct a capability id from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CapabilityId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The ordered set of capabilities negotiated together.
///
/// Construction rejects an empty list, blank ids and repeated ids, so every
/// `CapabilitySet` in circulation satisfies the set invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CapabilitySet {
    ordered: Vec<CapabilityId>,
}

impl CapabilitySet {
    /// Build a set from `ids`, preserving their order.
    ///
    /// Returns `GrantorError::InvalidConfiguration` if `ids` is empty, if any
    /// id is blank, or if an id appears more than once.
    pub fn new(ids: Vec<CapabilityId>) -> GrantorResult<Self> {
        if ids.is_empty() {
            return Err(GrantorError::InvalidConfiguration {
                reason: "capability set must contain at least one capability".to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(ids.len());
        for id in &ids {
            if id.0.trim().is_empty() {
                return Err(GrantorError::InvalidConfiguration {
                    reason: "capability ids must not be empty".to_string(),
                });
            }
            if !seen.insert(id) {
                return Err(GrantorError::InvalidConfiguration {
                    reason: format!("capability '{}' appears more than once", id),
                });
            }
        }

        Ok(Self { ordered: ids })
    }

    /// Convenience constructor from string slices.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> GrantorResult<Self> {
        Self::new(names.iter().map(|n| CapabilityId::new(n.as_ref())).collect())
    }

    pub fn contains(&self, id: &CapabilityId) -> bool {
        self.ordered.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapabilityId> {
        self.ordered.iter()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Always false for a constructed set; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn as_slice(&self) -> &[CapabilityId] {
        &self.ordered
    }
}

/// The platform's current answer for one capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrantStatus {
    Granted,
    Denied,
    /// Never asked, or the platform cannot say.
    Unknown,
}

impl GrantStatus {
    pub fn is_granted(self) -> bool {
        matches!(self, GrantStatus::Granted)
    }
}

/// The per-capability result of one platform request.
///
/// A capability absent from the map was not answered; the negotiator treats
/// it as denied, since platforms only under-report when rejecting a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantResults {
    inner: HashMap<CapabilityId, bool>,
}

impl GrantResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the answer for `id`, replacing any earlier answer.
    pub fn insert(&mut self, id: CapabilityId, granted: bool) {
        self.inner.insert(id, granted);
    }

    /// Builder-style variant of `insert`, handy when scripting results.
    pub fn with(mut self, id: impl Into<String>, granted: bool) -> Self {
        self.insert(CapabilityId::new(id), granted);
        self
    }

    /// True only if `id` was answered and the answer was "granted".
    pub fn is_granted(&self, id: &CapabilityId) -> bool {
        self.inner.get(id).copied().unwrap_or(false)
    }

    pub fn contains(&self, id: &CapabilityId) -> bool {
        self.inner.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &CapabilityId> {
        self.inner.keys()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl FromIterator<(CapabilityId, bool)> for GrantResults {
    fn from_iter<T: IntoIterator<Item = (CapabilityId, bool)>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
