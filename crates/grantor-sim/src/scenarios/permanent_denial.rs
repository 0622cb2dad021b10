//! Scenario C: permanent denial, settings declined.
//!
//! Same first request as scenario B, but the platform will not allow a
//! rationale for either denied capability. The negotiator offers the settings
//! redirect instead of asking again; the user cancels.

use grantor_contracts::{
    capability::GrantResults,
    error::GrantorResult,
    negotiation::{Advance, DialogChoice},
};

use crate::host::Simulation;

use super::{demo_profile, print_report};

pub fn run_scenario() -> GrantorResult<Advance> {
    println!("=== Scenario C: Permanent Denial, Settings Declined ===");
    println!();

    let (capabilities, config) = demo_profile("contacts-camera-storage")?.into_parts();

    let sim = Simulation::new();
    sim.platform.script_response(
        GrantResults::new()
            .with("contacts", true)
            .with("camera", false)
            .with("storage", false),
    );
    sim.dialogs.script_choice(DialogChoice::Decline);

    let mut negotiator = sim.negotiator(capabilities, config)?;
    let advance = sim.run(&mut negotiator)?;

    print_report(&sim, &advance);
    println!();

    Ok(advance)
}
