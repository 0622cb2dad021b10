//! Scenario A: single capability, already granted.
//!
//! The status check finds `camera` granted, so the negotiation resolves
//! inside `start()` without a request or a dialog.

use grantor_contracts::{capability::GrantStatus, error::GrantorResult, negotiation::Advance};

use crate::host::Simulation;

use super::{demo_profile, print_report};

pub fn run_scenario() -> GrantorResult<Advance> {
    println!("=== Scenario A: Already Granted ===");
    println!();

    let (capabilities, config) = demo_profile("camera")?.into_parts();

    let sim = Simulation::new();
    sim.platform.set_status("camera", GrantStatus::Granted);

    let mut negotiator = sim.negotiator(capabilities, config)?;
    let advance = sim.run(&mut negotiator)?;

    print_report(&sim, &advance);
    println!();

    Ok(advance)
}
