//! Scenario B: partial denial, rationale accepted.
//!
//! `contacts` is granted on the first request; `camera` and `storage` are
//! denied but still rationale-eligible. The user accepts the rationale and
//! the second request, covering only the two denied capabilities, succeeds.

use grantor_contracts::{
    capability::GrantResults,
    error::GrantorResult,
    negotiation::{Advance, DialogChoice},
};

use crate::host::Simulation;

use super::{demo_profile, print_report};

pub fn run_scenario() -> GrantorResult<Advance> {
    println!("=== Scenario B: Partial Denial, Rationale Accepted ===");
    println!();

    let (capabilities, config) = demo_profile("contacts-camera-storage")?.into_parts();

    let sim = Simulation::new();
    sim.platform.script_response(
        GrantResults::new()
            .with("contacts", true)
            .with("camera", false)
            .with("storage", false),
    );
    sim.platform.set_rationale_eligible("camera", true);
    sim.platform.set_rationale_eligible("storage", true);
    sim.dialogs.script_choice(DialogChoice::Proceed);
    sim.platform
        .script_response(GrantResults::new().with("camera", true).with("storage", true));

    let mut negotiator = sim.negotiator(capabilities, config)?;
    let advance = sim.run(&mut negotiator)?;

    print_report(&sim, &advance);
    println!();

    Ok(advance)
}
