//! Negotiation profiles loaded from TOML.
//!
//! A profile names one capability set together with the configuration its
//! negotiator is built with. A `ProfileCatalog` holds any number of profiles
//! under `[[profiles]]` and hands them out by name.
//!
//! Example:
//! ```toml
//! [[profiles]]
//! name = "contacts-camera-storage"
//! capabilities = ["contacts", "camera", "storage"]
//!
//! [profiles.messages]
//! rationale_title = "We need a few things"
//!
//! [[profiles]]
//! name = "background-location"
//! capabilities = ["background_location"]
//! settings_return = "resolve"
//!
//! [profiles.strategy]
//! kind = "escalating"
//! precursors = ["fine_location", "coarse_location"]
//! settings_only_flag = "background-location-settings-only"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use grantor_contracts::{
    capability::CapabilitySet,
    config::{MessageCatalog, NegotiatorConfig, SettingsReturnPolicy, StrategySpec},
    error::{GrantorError, GrantorResult},
};
use grantor_core::strategy::{PlatformFlags, ResolvedStrategy};

/// One profile exactly as written in TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDocument {
    /// Stable identifier used to look the profile up.
    pub name: String,

    /// Capability ids, in the order they should be presented.
    pub capabilities: Vec<String>,

    #[serde(default)]
    pub messages: MessageCatalog,

    #[serde(default)]
    pub strategy: StrategySpec,

    #[serde(default)]
    pub settings_return: SettingsReturnPolicy,
}

/// The top-level structure of a profile file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub profiles: Vec<ProfileDocument>,
}

/// A validated profile, ready to build a negotiator from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationProfile {
    pub name: String,
    pub capabilities: CapabilitySet,
    pub config: NegotiatorConfig,
}

impl NegotiationProfile {
    /// Validate a raw document.
    ///
    /// Checks the capability set invariants and that the strategy resolves
    /// for this set. Platform flags are not known yet, so the strategy is
    /// resolved against an empty flag set; flags only ever switch the request
    /// mode and cannot make a valid strategy invalid.
    pub fn from_document(doc: ProfileDocument) -> GrantorResult<Self> {
        let capabilities = CapabilitySet::from_names(&doc.capabilities).map_err(|e| {
            GrantorError::InvalidConfiguration {
                reason: format!("profile '{}': {}", doc.name, reason_of(e)),
            }
        })?;

        ResolvedStrategy::resolve(&doc.strategy, &capabilities, &PlatformFlags::new()).map_err(
            |e| GrantorError::InvalidConfiguration {
                reason: format!("profile '{}': {}", doc.name, reason_of(e)),
            },
        )?;

        debug!(
            profile = %doc.name,
            capabilities = capabilities.len(),
            "profile validated"
        );

        Ok(Self {
            name: doc.name,
            capabilities,
            config: NegotiatorConfig {
                messages: doc.messages,
                strategy: doc.strategy,
                settings_return: doc.settings_return,
            },
        })
    }

    /// Parse a single profile from a TOML document with top-level keys.
    pub fn from_toml_str(s: &str) -> GrantorResult<Self> {
        let doc: ProfileDocument =
            toml::from_str(s).map_err(|e| GrantorError::InvalidConfiguration {
                reason: format!("failed to parse profile TOML: {}", e),
            })?;
        Self::from_document(doc)
    }

    /// Split into the two values `Negotiator::new` takes.
    pub fn into_parts(self) -> (CapabilitySet, NegotiatorConfig) {
        (self.capabilities, self.config)
    }
}

/// A named collection of validated profiles, in file order.
#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    profiles: Vec<NegotiationProfile>,
}

impl ProfileCatalog {
    /// Parse `s` as a TOML profile file.
    ///
    /// Returns `GrantorError::InvalidConfiguration` if the TOML is malformed,
    /// if any profile fails validation, or if two profiles share a name.
    pub fn from_toml_str(s: &str) -> GrantorResult<Self> {
        let doc: CatalogDocument =
            toml::from_str(s).map_err(|e| GrantorError::InvalidConfiguration {
                reason: format!("failed to parse profile TOML: {}", e),
            })?;

        let mut profiles: Vec<NegotiationProfile> = Vec::with_capacity(doc.profiles.len());
        for raw in doc.profiles {
            if profiles.iter().any(|p| p.name == raw.name) {
                return Err(GrantorError::InvalidConfiguration {
                    reason: format!("profile '{}' is defined more than once", raw.name),
                });
            }
            profiles.push(NegotiationProfile::from_document(raw)?);
        }

        Ok(Self { profiles })
    }

    /// Read the file at `path` and parse it as a profile catalog.
    pub fn from_file(path: &Path) -> GrantorResult<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| GrantorError::InvalidConfiguration {
                reason: format!("failed to read profile file '{}': {}", path.display(), e),
            })?;
        Self::from_toml_str(&contents)
    }

    pub fn get(&self, name: &str) -> Option<&NegotiationProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Like `get`, but a missing profile is a configuration error.
    pub fn require(&self, name: &str) -> GrantorResult<NegotiationProfile> {
        self.get(name)
            .cloned()
            .ok_or_else(|| GrantorError::InvalidConfiguration {
                reason: format!("no profile named '{}'", name),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &NegotiationProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn reason_of(err: GrantorError) -> String {
    match err {
        GrantorError::InvalidConfiguration { reason } => reason,
        other => other.to_string(),
    }
}
