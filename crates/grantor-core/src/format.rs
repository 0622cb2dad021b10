//! User-facing text helpers.
//!
//! Pure functions; nothing here affects what the negotiator decides.

use grantor_contracts::capability::CapabilityId;

/// Turn a capability id into lower-case words.
///
/// Any namespace before the last `.` is dropped and underscores become
/// spaces: `android.permission.READ_CONTACTS` → `read contacts`.
pub fn display_name(id: &CapabilityId) -> String {
    let raw = id.as_str();
    let local = raw.rsplit('.').next().unwrap_or(raw);
    local.to_lowercase().replace('_', " ")
}

/// Render `ids` as a 1-based enumerated list, one entry per line.
///
/// ```text
/// 1) camera
/// 2) read external storage
/// ```
pub fn format_capability_list(ids: &[CapabilityId]) -> String {
    ids.iter()
        .enumerate()
        .map(|(i, id)| format!("{}) {}\n", i + 1, display_name(id)))
        .collect()
}

/// The notification text for a denied outcome.
pub fn denied_message(ids: &[CapabilityId]) -> String {
    format!("Permissions denied:\n{}", format_capability_list(ids))
}
