//! Reference negotiation scenarios.
//!
//! Each scenario wires a `Simulation` with a scripted platform and user,
//! runs one negotiation to completion and prints what happened: the requests
//! issued, the dialogs shown, the outcome and the journaled phase path.

pub mod already_granted;
pub mod background_location;
pub mod partial_denial;
pub mod permanent_denial;
pub mod settings_grant;

use grantor_config::{NegotiationProfile, ProfileCatalog};
use grantor_contracts::{error::GrantorResult, negotiation::Advance};

use crate::host::Simulation;

/// Profiles the scenarios are built from.
pub const DEMO_PROFILES: &str = include_str!("../../profiles/demo.toml");

/// Look up one of the embedded demo profiles.
pub fn demo_profile(name: &str) -> GrantorResult<NegotiationProfile> {
    ProfileCatalog::from_toml_str(DEMO_PROFILES)?.require(name)
}

/// Print everything a scenario run left behind.
pub(crate) fn print_report(sim: &Simulation, advance: &Advance) {
    for batch in sim.platform.requests() {
        let names: Vec<&str> = batch.iter().map(|id| id.as_str()).collect();
        println!("  Request:   [{}]", names.join(", "));
    }

    for dialog in sim.dialogs.shown() {
        let names: Vec<&str> = dialog.capabilities.iter().map(|id| id.as_str()).collect();
        println!("  Dialog:    {:?} \"{}\" [{}]", dialog.kind, dialog.title, names.join(", "));
    }

    for (message, success) in sim.notifier.shown() {
        let tag = if success { "OK" } else { "FAIL" };
        println!("  Notice:    [{}] {}", tag, message.trim_end().replace('\n', " | "));
    }

    match advance {
        Advance::Resolved(outcome) if outcome.is_granted() => println!("  Outcome:   GRANTED"),
        Advance::Resolved(outcome) => {
            let names: Vec<&str> = outcome.denied().iter().map(|id| id.as_str()).collect();
            println!("  Outcome:   DENIED [{}]", names.join(", "));
        }
        Advance::Waiting(phase) => println!("  Outcome:   none (still {})", phase),
    }

    if let Some(trace) = sim.journal.export_latest() {
        let path: Vec<String> = trace.phase_path().iter().map(|p| p.to_string()).collect();
        println!("  Path:      {}", path.join(" -> "));
        println!(
            "  Journal:   {} ({} record(s))",
            if sim.journal.verify_integrity() { "CONSISTENT" } else { "BROKEN" },
            trace.records.len()
        );
    }
}
