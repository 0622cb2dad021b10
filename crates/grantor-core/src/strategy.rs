//! Request strategies.
//!
//! A `StrategySpec` from configuration is resolved exactly once, against the
//! platform's flags, when a negotiator is built. The resolved form answers two
//! questions and nothing else:
//!
//! 1. `mode`: after a status check finds missing capabilities, does the
//!    negotiator prompt (`Direct`) or go straight to settings (`SettingsFirst`)?
//! 2. `batching`: which capabilities go into one `request_grants()` call?
//!
//! The state machine never looks at platform versions or flags itself.

use std::collections::BTreeSet;

use tracing::debug;

use grantor_contracts::{
    capability::{CapabilityId, CapabilitySet},
    config::StrategySpec,
    error::{GrantorError, GrantorResult},
};

use crate::traits::Platform;

/// Named platform capability flags.
///
/// Hosts translate whatever their platform exposes (an API level, a vendor
/// quirk) into flags such as `"background-location-settings-only"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformFlags {
    inner: BTreeSet<String>,
}

impl PlatformFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, flag: impl Into<String>) {
        self.inner.insert(flag.into());
    }

    pub fn with(mut self, flag: impl Into<String>) -> Self {
        self.insert(flag);
        self
    }

    pub fn has(&self, flag: &str) -> bool {
        self.inner.contains(flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(String::as_str)
    }
}

/// What a status check that finds missing capabilities leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Issue a platform request.
    Direct,
    /// Runtime prompting is forbidden; show the settings redirect.
    SettingsFirst,
}

/// How one request batch is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Batching {
    /// Exactly the ungranted capabilities.
    Standard,
    /// The ungranted capabilities plus, unless already satisfied, the
    /// precursor group.
    Escalating {
        precursors: Vec<CapabilityId>,
        narrow_when_precursor_granted: bool,
    },
}

/// A strategy with every platform-dependent decision already taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStrategy {
    pub mode: RequestMode,
    pub batching: Batching,
}

impl ResolvedStrategy {
    /// Resolve `spec` for `capabilities` on a platform reporting `flags`.
    ///
    /// Returns `GrantorError::InvalidConfiguration` if an escalating strategy
    /// names no precursors, names a blank or repeated precursor, or names a
    /// precursor that is itself part of the negotiated set.
    pub fn resolve(
        spec: &StrategySpec,
        capabilities: &CapabilitySet,
        flags: &PlatformFlags,
    ) -> GrantorResult<Self> {
        let resolved = match spec {
            StrategySpec::Standard => Self {
                mode: RequestMode::Direct,
                batching: Batching::Standard,
            },

            StrategySpec::Escalating {
                precursors,
                narrow_when_precursor_granted,
                settings_only_flag,
            } => {
                if precursors.is_empty() {
                    return Err(GrantorError::InvalidConfiguration {
                        reason: "escalating strategy requires at least one precursor".to_string(),
                    });
                }

                let mut seen = BTreeSet::new();
                let mut precursor_ids = Vec::with_capacity(precursors.len());
                for name in precursors {
                    let id = CapabilityId::new(name.as_str());
                    if name.trim().is_empty() || !seen.insert(name.as_str()) {
                        return Err(GrantorError::InvalidConfiguration {
                            reason: format!("precursor '{}' is blank or repeated", name),
                        });
                    }
                    if capabilities.contains(&id) {
                        return Err(GrantorError::InvalidConfiguration {
                            reason: format!(
                                "precursor '{}' is also a negotiated capability",
                                name
                            ),
                        });
                    }
                    precursor_ids.push(id);
                }

                let settings_only = settings_only_flag
                    .as_deref()
                    .map(|flag| flags.has(flag))
                    .unwrap_or(false);

                Self {
                    mode: if settings_only {
                        RequestMode::SettingsFirst
                    } else {
                        RequestMode::Direct
                    },
                    batching: Batching::Escalating {
                        precursors: precursor_ids,
                        narrow_when_precursor_granted: *narrow_when_precursor_granted,
                    },
                }
            }
        };

        debug!(
            mode = ?resolved.mode,
            batching = ?resolved.batching,
            "request strategy resolved"
        );

        Ok(resolved)
    }

    /// Assemble the request batch for `targets` (ungranted capabilities, in
    /// set order).
    ///
    /// Escalating batches put the precursors first, mirroring the order in
    /// which the platform has to grant them.
    pub fn request_batch(
        &self,
        targets: &[CapabilityId],
        platform: &dyn Platform,
    ) -> Vec<CapabilityId> {
        match &self.batching {
            Batching::Standard => targets.to_vec(),

            Batching::Escalating {
                precursors,
                narrow_when_precursor_granted,
            } => {
                let precursor_granted = precursors
                    .iter()
                    .any(|p| platform.grant_status(p).is_granted());

                if precursor_granted && *narrow_when_precursor_granted {
                    targets.to_vec()
                } else {
                    precursors.iter().chain(targets).cloned().collect()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use grantor_contracts::capability::GrantStatus;

    use super::*;

    struct StaticPlatform {
        statuses: HashMap<String, GrantStatus>,
    }

    impl StaticPlatform {
        fn with_granted(names: &[&str]) -> Self {
            Self {
                statuses: names
                    .iter()
                    .map(|n| (n.to_string(), GrantStatus::Granted))
                    .collect(),
            }
        }
    }

    impl Platform for StaticPlatform {
        fn grant_status(&self, id: &CapabilityId) -> GrantStatus {
            self.statuses
                .get(id.as_str())
                .copied()
                .unwrap_or(GrantStatus::Unknown)
        }
        fn is_rationale_eligible(&self, _id: &CapabilityId) -> bool {
            false
        }
        fn request_grants(&self, _ids: &[CapabilityId]) {}
        fn open_settings(&self) {}
    }

    fn escalating(narrow: bool, flag: Option<&str>) -> StrategySpec {
        StrategySpec::Escalating {
            precursors: vec!["fine_location".to_string(), "coarse_location".to_string()],
            narrow_when_precursor_granted: narrow,
            settings_only_flag: flag.map(str::to_string),
        }
    }

    fn background() -> CapabilitySet {
        CapabilitySet::from_names(&["background_location"]).unwrap()
    }

    fn names(ids: &[CapabilityId]) -> Vec<&str> {
        ids.iter().map(CapabilityId::as_str).collect()
    }

    #[test]
    fn test_standard_requests_exactly_the_targets() {
        let set = CapabilitySet::from_names(&["camera", "storage"]).unwrap();
        let strategy =
            ResolvedStrategy::resolve(&StrategySpec::Standard, &set, &PlatformFlags::new())
                .unwrap();

        assert_eq!(strategy.mode, RequestMode::Direct);
        let batch = strategy.request_batch(set.as_slice(), &StaticPlatform::with_granted(&[]));
        assert_eq!(names(&batch), vec!["camera", "storage"]);
    }

    #[test]
    fn test_escalating_without_precursor_sends_everything() {
        let set = background();
        let strategy =
            ResolvedStrategy::resolve(&escalating(true, None), &set, &PlatformFlags::new())
                .unwrap();

        let batch = strategy.request_batch(set.as_slice(), &StaticPlatform::with_granted(&[]));
        assert_eq!(
            names(&batch),
            vec!["fine_location", "coarse_location", "background_location"]
        );
    }

    #[test]
    fn test_escalating_with_any_precursor_narrows() {
        let set = background();
        let strategy =
            ResolvedStrategy::resolve(&escalating(true, None), &set, &PlatformFlags::new())
                .unwrap();

        // Coarse alone satisfies the precursor group.
        let platform = StaticPlatform::with_granted(&["coarse_location"]);
        let batch = strategy.request_batch(set.as_slice(), &platform);
        assert_eq!(names(&batch), vec!["background_location"]);
    }

    #[test]
    fn test_escalating_without_narrowing_always_resends_precursors() {
        let set = background();
        let strategy =
            ResolvedStrategy::resolve(&escalating(false, None), &set, &PlatformFlags::new())
                .unwrap();

        let platform = StaticPlatform::with_granted(&["fine_location"]);
        let batch = strategy.request_batch(set.as_slice(), &platform);
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn test_settings_only_flag_selects_settings_first() {
        let set = background();
        let spec = escalating(true, Some("background-location-settings-only"));

        let gated = ResolvedStrategy::resolve(
            &spec,
            &set,
            &PlatformFlags::new().with("background-location-settings-only"),
        )
        .unwrap();
        assert_eq!(gated.mode, RequestMode::SettingsFirst);

        let older = ResolvedStrategy::resolve(&spec, &set, &PlatformFlags::new()).unwrap();
        assert_eq!(older.mode, RequestMode::Direct);
    }

    #[test]
    fn test_escalating_rejects_bad_precursors() {
        let set = background();

        let empty = StrategySpec::Escalating {
            precursors: vec![],
            narrow_when_precursor_granted: true,
            settings_only_flag: None,
        };
        assert!(matches!(
            ResolvedStrategy::resolve(&empty, &set, &PlatformFlags::new()),
            Err(GrantorError::InvalidConfiguration { .. })
        ));

        let overlapping = StrategySpec::Escalating {
            precursors: vec!["background_location".to_string()],
            narrow_when_precursor_granted: true,
            settings_only_flag: None,
        };
        match ResolvedStrategy::resolve(&overlapping, &set, &PlatformFlags::new()) {
            Err(GrantorError::InvalidConfiguration { reason }) => {
                assert!(reason.contains("also a negotiated capability"), "{reason}");
            }
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }
}
