//! Scenario D: escalating strategy on a settings-only platform.
//!
//! Background location depends on fine or coarse location, and this
//! platform raises `background-location-settings-only`. The status check
//! goes straight to the settings redirect without issuing a request. The
//! user declines.

use grantor_config::presets;
use grantor_contracts::{
    error::GrantorResult,
    negotiation::{Advance, DialogChoice},
};
use grantor_core::strategy::PlatformFlags;

use crate::host::Simulation;

use super::print_report;

pub fn run_scenario() -> GrantorResult<Advance> {
    println!("=== Scenario D: Background Location, Settings Only ===");
    println!();

    let (capabilities, config) = presets::background_location()?.into_parts();

    let sim = Simulation::with_flags(
        PlatformFlags::new().with(presets::BACKGROUND_LOCATION_SETTINGS_ONLY),
    );
    sim.dialogs.script_choice(DialogChoice::Decline);

    let mut negotiator = sim.negotiator(capabilities, config)?;
    println!("  Strategy:  {:?}", negotiator.strategy().mode);
    let advance = sim.run(&mut negotiator)?;

    print_report(&sim, &advance);
    println!();

    Ok(advance)
}
