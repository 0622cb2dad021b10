//! # grantor-config
//!
//! TOML negotiation profiles and built-in presets for the GRANTOR negotiator.
//!
//! ## Overview
//!
//! A profile bundles a capability set with the `NegotiatorConfig` its
//! negotiator is built with: dialog messages, request strategy and what to do
//! when the settings surface returns. Profiles are validated on load, so a
//! profile that parses is one `Negotiator::new` will accept.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use grantor_config::ProfileCatalog;
//!
//! let catalog = ProfileCatalog::from_file(Path::new("profiles/demo.toml"))?;
//! let (capabilities, config) = catalog.require("background-location")?.into_parts();
//! ```

pub mod presets;
pub mod profile;

pub use profile::{NegotiationProfile, ProfileCatalog, ProfileDocument};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use grantor_contracts::{
        capability::CapabilityId,
        config::{SettingsReturnPolicy, StrategySpec},
        error::GrantorError,
    };

    use crate::{presets, NegotiationProfile, ProfileCatalog};

    // ── 1. minimal profile ────────────────────────────────────────────────────

    /// Only `name` and `capabilities` are required; everything else defaults.
    #[test]
    fn test_minimal_profile_uses_defaults() {
        let toml = r#"
            name = "camera"
            capabilities = ["camera"]
        "#;

        let profile = NegotiationProfile::from_toml_str(toml).unwrap();

        assert_eq!(profile.name, "camera");
        assert_eq!(profile.capabilities.as_slice(), &[CapabilityId::new("camera")]);
        assert_eq!(profile.config.strategy, StrategySpec::Standard);
        assert_eq!(profile.config.settings_return, SettingsReturnPolicy::Resolve);
        assert_eq!(profile.config.messages.rationale_title, "Permissions Required");
    }

    // ── 2. message overrides ──────────────────────────────────────────────────

    /// Overriding one message keeps the defaults for the rest.
    #[test]
    fn test_partial_message_override() {
        let toml = r#"
            name = "contacts"
            capabilities = ["contacts"]

            [messages]
            settings_title = "Contacts Blocked"
        "#;

        let profile = NegotiationProfile::from_toml_str(toml).unwrap();

        assert_eq!(profile.config.messages.settings_title, "Contacts Blocked");
        assert_eq!(profile.config.messages.settings_proceed, "Go to Settings");
    }

    // ── 3. catalog with an escalating profile ─────────────────────────────────

    #[test]
    fn test_catalog_with_escalating_strategy() {
        let toml = r#"
            [[profiles]]
            name = "multi"
            capabilities = ["contacts", "camera", "storage"]

            [[profiles]]
            name = "background-location"
            capabilities = ["background_location"]
            settings_return = "recheck"

            [profiles.strategy]
            kind = "escalating"
            precursors = ["fine_location", "coarse_location"]
            narrow_when_precursor_granted = false
            settings_only_flag = "background-location-settings-only"
        "#;

        let catalog = ProfileCatalog::from_toml_str(toml).unwrap();
        assert_eq!(catalog.len(), 2);

        let bg = catalog.get("background-location").unwrap();
        assert_eq!(bg.config.settings_return, SettingsReturnPolicy::Recheck);
        match &bg.config.strategy {
            StrategySpec::Escalating {
                precursors,
                narrow_when_precursor_granted,
                settings_only_flag,
            } => {
                assert_eq!(precursors, &vec!["fine_location".to_string(), "coarse_location".to_string()]);
                assert!(!narrow_when_precursor_granted);
                assert_eq!(settings_only_flag.as_deref(), Some("background-location-settings-only"));
            }
            other => panic!("expected Escalating, got {:?}", other),
        }
    }

    // ── 4. validation failures ────────────────────────────────────────────────

    #[test]
    fn test_empty_capability_list_rejected() {
        let toml = r#"
            name = "nothing"
            capabilities = []
        "#;

        match NegotiationProfile::from_toml_str(toml) {
            Err(GrantorError::InvalidConfiguration { reason }) => {
                assert!(reason.contains("profile 'nothing'"), "{reason}");
                assert!(reason.contains("at least one"), "{reason}");
            }
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_escalating_without_precursors_rejected() {
        let toml = r#"
            name = "bg"
            capabilities = ["background_location"]

            [strategy]
            kind = "escalating"
            precursors = []
        "#;

        assert!(matches!(
            NegotiationProfile::from_toml_str(toml),
            Err(GrantorError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_duplicate_profile_names_rejected() {
        let toml = r#"
            [[profiles]]
            name = "dup"
            capabilities = ["camera"]

            [[profiles]]
            name = "dup"
            capabilities = ["storage"]
        "#;

        match ProfileCatalog::from_toml_str(toml) {
            Err(GrantorError::InvalidConfiguration { reason }) => {
                assert!(reason.contains("more than once"), "{reason}");
            }
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_strategy_kind_is_parse_error() {
        let toml = r#"
            name = "odd"
            capabilities = ["camera"]

            [strategy]
            kind = "telepathic"
        "#;

        match NegotiationProfile::from_toml_str(toml) {
            Err(GrantorError::InvalidConfiguration { reason }) => {
                assert!(reason.contains("failed to parse profile TOML"), "{reason}");
            }
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_require_missing_profile() {
        let catalog = ProfileCatalog::from_toml_str("").unwrap();
        assert!(catalog.is_empty());
        assert!(matches!(
            catalog.require("camera"),
            Err(GrantorError::InvalidConfiguration { .. })
        ));
    }

    // ── 5. presets ────────────────────────────────────────────────────────────

    #[test]
    fn test_presets_validate() {
        let general = presets::general("multi", &["contacts", "camera", "storage"]).unwrap();
        assert_eq!(general.capabilities.len(), 3);

        let bg = presets::background_location().unwrap();
        assert_eq!(bg.capabilities.as_slice(), &[CapabilityId::new(presets::BACKGROUND_LOCATION)]);
        assert_eq!(bg.config.messages.granted_notice, "Background location permission granted");
        assert!(bg.config.messages.settings_message.contains("\"Allow all the time\""));
    }
}
