//! Negotiator configuration.
//!
//! A `NegotiatorConfig` is a plain value supplied once, at construction. It is
//! never mutated afterwards. Every field has a default matching the stock
//! dialog texts and the standard request strategy, so hosts only spell out
//! what they override.

use serde::{Deserialize, Serialize};

/// The user-facing strings for the rationale and settings-redirect dialogs.
///
/// The rationale body is followed by an enumerated list of the denied
/// capabilities when the dialog is built; the settings body is shown as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageCatalog {
    pub rationale_title: String,
    pub rationale_message: String,
    pub rationale_proceed: String,
    pub rationale_decline: String,
    pub settings_title: String,
    pub settings_message: String,
    pub settings_proceed: String,
    pub settings_decline: String,
    /// Notification text the default outcome callback shows on success.
    pub granted_notice: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            rationale_title: "Permissions Required".to_string(),
            rationale_message:
                "The following permissions are required to ensure the app operates properly:"
                    .to_string(),
            rationale_proceed: "Allow".to_string(),
            rationale_decline: "Deny".to_string(),
            settings_title: "Permissions Denied".to_string(),
            settings_message:
                "Some permissions are permanently denied. Please enable them in app settings."
                    .to_string(),
            settings_proceed: "Go to Settings".to_string(),
            settings_decline: "Cancel".to_string(),
            granted_notice: "Permissions granted".to_string(),
        }
    }
}

/// How requests for a capability set may be issued.
///
/// Expressed in TOML with a `kind` tag:
/// ```toml
/// [strategy]
/// kind = "escalating"
/// precursors = ["android.permission.ACCESS_FINE_LOCATION"]
/// settings_only_flag = "background-location-settings-only"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StrategySpec {
    /// Request every ungranted capability in one batched call.
    #[default]
    Standard,

    /// The capabilities depend on a precursor group being granted first.
    Escalating {
        /// The precursor capabilities; any one of them granted satisfies
        /// the precursor requirement.
        precursors: Vec<String>,

        /// When a precursor is already granted, request only the dependent
        /// capabilities. When false, every request re-sends the precursors.
        #[serde(default = "default_true")]
        narrow_when_precursor_granted: bool,

        /// Platform flag under which runtime prompting for the dependent
        /// capabilities is forbidden and the settings surface is the only
        /// path. `None` means prompting is always allowed.
        #[serde(default)]
        settings_only_flag: Option<String>,
    },
}

fn default_true() -> bool {
    true
}

/// What happens after the settings surface returns and capabilities are
/// still missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SettingsReturnPolicy {
    /// Re-check status and resolve: `Granted` if everything is granted now,
    /// otherwise `Denied` with whatever is still missing.
    #[default]
    Resolve,
    /// Re-check status and, if anything is missing, re-enter the request
    /// strategy as if the negotiation had just started.
    Recheck,
}

/// The full, immutable configuration of one negotiator instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NegotiatorConfig {
    pub messages: MessageCatalog,
    pub strategy: StrategySpec,
    pub settings_return: SettingsReturnPolicy,
}
