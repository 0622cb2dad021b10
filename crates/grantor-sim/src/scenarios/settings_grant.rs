//! Scenario E: granted from the settings surface.
//!
//! `storage` is permanently denied. The user follows the settings redirect,
//! switches it on there and comes back; the re-check finds everything
//! granted.

use grantor_contracts::{
    capability::GrantResults,
    error::GrantorResult,
    negotiation::{Advance, DialogChoice},
};

use crate::host::Simulation;

use super::{demo_profile, print_report};

pub fn run_scenario() -> GrantorResult<Advance> {
    println!("=== Scenario E: Granted In Settings ===");
    println!();

    let (capabilities, config) = demo_profile("contacts-camera-storage")?.into_parts();

    let sim = Simulation::new();
    sim.platform.script_response(
        GrantResults::new()
            .with("contacts", true)
            .with("camera", true)
            .with("storage", false),
    );
    sim.dialogs.script_choice(DialogChoice::Proceed);
    sim.platform.grant_in_settings("storage");

    let mut negotiator = sim.negotiator(capabilities, config)?;
    let advance = sim.run(&mut negotiator)?;

    print_report(&sim, &advance);
    println!();

    Ok(advance)
}
