//! Built-in profiles.
//!
//! `general` covers any batch of independent capabilities with the stock
//! messages. `background_location` is the escalating location profile: the
//! background capability needs fine or coarse location first, and platforms
//! raising `BACKGROUND_LOCATION_SETTINGS_ONLY` only allow it to be granted
//! from the settings surface.

use grantor_contracts::{
    config::{MessageCatalog, SettingsReturnPolicy, StrategySpec},
    error::GrantorResult,
};

use crate::profile::{NegotiationProfile, ProfileDocument};

/// Platform flag: background location cannot be prompted for at runtime.
pub const BACKGROUND_LOCATION_SETTINGS_ONLY: &str = "background-location-settings-only";

pub const BACKGROUND_LOCATION: &str = "background_location";
pub const FINE_LOCATION: &str = "fine_location";
pub const COARSE_LOCATION: &str = "coarse_location";

/// A standard-strategy profile over `capabilities` with default messages.
pub fn general<S: AsRef<str>>(name: &str, capabilities: &[S]) -> GrantorResult<NegotiationProfile> {
    NegotiationProfile::from_document(ProfileDocument {
        name: name.to_string(),
        capabilities: capabilities.iter().map(|c| c.as_ref().to_string()).collect(),
        messages: MessageCatalog::default(),
        strategy: StrategySpec::Standard,
        settings_return: SettingsReturnPolicy::Resolve,
    })
}

/// The escalating background-location profile.
pub fn background_location() -> GrantorResult<NegotiationProfile> {
    NegotiationProfile::from_document(ProfileDocument {
        name: "background-location".to_string(),
        capabilities: vec![BACKGROUND_LOCATION.to_string()],
        messages: background_location_messages(),
        strategy: StrategySpec::Escalating {
            precursors: vec![FINE_LOCATION.to_string(), COARSE_LOCATION.to_string()],
            narrow_when_precursor_granted: true,
            settings_only_flag: Some(BACKGROUND_LOCATION_SETTINGS_ONLY.to_string()),
        },
        settings_return: SettingsReturnPolicy::Resolve,
    })
}

fn background_location_messages() -> MessageCatalog {
    MessageCatalog {
        rationale_title: "Background location Permission Required".to_string(),
        rationale_message: "This permission is required for the app to function properly."
            .to_string(),
        settings_title: "Background Location Required".to_string(),
        settings_message: "To allow background location access, enable it in app settings.\n\n\
             On the page that opens - click on PERMISSIONS, then on LOCATION and then select \
             \"Allow all the time\""
            .to_string(),
        granted_notice: "Background location permission granted".to_string(),
        ..MessageCatalog::default()
    }
}

