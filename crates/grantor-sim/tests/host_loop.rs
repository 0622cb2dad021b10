//! The simulated host loop against the real negotiator.

use grantor_config::presets;
use grantor_contracts::{
    capability::{CapabilityId, GrantResults, GrantStatus},
    config::SettingsReturnPolicy,
    error::GrantorError,
    negotiation::{Advance, DialogChoice, NegotiationEvent, Outcome, Phase},
};
use grantor_core::{strategy::PlatformFlags, traits::Platform};
use grantor_sim::{PlatformCall, Simulation};

fn ids(names: &[&str]) -> Vec<CapabilityId> {
    names.iter().map(|n| CapabilityId::new(*n)).collect()
}

// ── Host loop ─────────────────────────────────────────────────────────────────

#[test]
fn test_run_refused_while_negotiation_live() {
    let sim = Simulation::new();
    let profile = presets::general("camera", &["camera"]).unwrap();
    let (capabilities, config) = profile.into_parts();
    let mut negotiator = sim.negotiator(capabilities, config).unwrap();

    // Start by hand and drop the platform's answer.
    assert_eq!(
        negotiator.start().unwrap(),
        Advance::Waiting(Phase::AwaitingRequestResult)
    );
    assert!(sim.events.pop().is_some());
    assert!(sim.events.is_empty());

    // A second start is refused while the first is still live.
    assert!(matches!(
        sim.run(&mut negotiator),
        Err(GrantorError::ConcurrentNegotiation { .. })
    ));
    assert_eq!(negotiator.phase(), Phase::AwaitingRequestResult);
}

#[test]
fn test_unscripted_request_is_denied_and_dialog_dismissed() {
    let sim = Simulation::new();
    sim.platform.set_rationale_eligible("camera", true);
    let (capabilities, config) = presets::general("camera", &["camera"]).unwrap().into_parts();
    let mut negotiator = sim.negotiator(capabilities, config).unwrap();

    let advance = sim.run(&mut negotiator).unwrap();

    assert_eq!(advance, Advance::Resolved(Outcome::Denied(ids(&["camera"]))));
    assert_eq!(
        sim.notifier.shown(),
        vec![("Permissions denied:\n1) camera\n".to_string(), false)]
    );
}

#[test]
fn test_stray_event_leaves_negotiation_in_place() {
    let sim = Simulation::new();
    let (capabilities, config) = presets::general("camera", &["camera"]).unwrap().into_parts();
    let mut negotiator = sim.negotiator(capabilities, config).unwrap();

    negotiator.start().unwrap();
    let err = negotiator
        .advance(NegotiationEvent::SettingsReturned)
        .unwrap_err();
    assert!(matches!(
        err,
        GrantorError::ProtocolViolation {
            phase: Phase::AwaitingRequestResult,
            ..
        }
    ));

    // The queued platform answer is still accepted afterwards.
    let event = sim.events.pop().unwrap();
    assert_eq!(
        negotiator.advance(event).unwrap(),
        Advance::Waiting(Phase::AwaitingSettingsReturn)
    );
}

// ── Status queries ────────────────────────────────────────────────────────────

#[test]
fn test_status_queries_agree_without_intervening_request() {
    let sim = Simulation::new();
    sim.platform
        .script_response(GrantResults::new().with("contacts", true).with("camera", false));
    let (capabilities, config) = presets::general("pair", &["contacts", "camera"])
        .unwrap()
        .into_parts();
    let mut negotiator = sim.negotiator(capabilities, config).unwrap();
    let camera = CapabilityId::new("camera");

    let first = sim.platform.grant_status(&camera);
    let second = sim.platform.grant_status(&camera);
    assert_eq!(first, second);
    assert_eq!(first, GrantStatus::Unknown);

    // The status check itself sends exactly one request and changes nothing.
    assert_eq!(
        negotiator.start().unwrap(),
        Advance::Waiting(Phase::AwaitingRequestResult)
    );
    assert_eq!(sim.platform.requests(), vec![ids(&["contacts", "camera"])]);

    let event = sim.events.pop().unwrap();
    assert!(matches!(event, NegotiationEvent::RequestResult(_)));
    assert_eq!(
        negotiator.advance(event).unwrap(),
        Advance::Waiting(Phase::AwaitingSettingsReturn)
    );

    let first = sim.platform.grant_status(&camera);
    let second = sim.platform.grant_status(&camera);
    assert_eq!(first, second);
    assert_eq!(first, GrantStatus::Denied);
    assert_eq!(sim.platform.requests().len(), 1);
}

#[test]
fn test_granted_check_issues_no_request() {
    let sim = Simulation::new();
    sim.platform.set_status("camera", GrantStatus::Granted);
    let (capabilities, config) = presets::general("camera", &["camera"]).unwrap().into_parts();
    let mut negotiator = sim.negotiator(capabilities, config).unwrap();
    let camera = CapabilityId::new("camera");

    assert_eq!(
        negotiator.start().unwrap(),
        Advance::Resolved(Outcome::Granted)
    );

    assert!(sim.platform.calls().is_empty());
    assert!(sim.events.is_empty());
    assert_eq!(sim.platform.grant_status(&camera), GrantStatus::Granted);
    assert_eq!(sim.platform.grant_status(&camera), GrantStatus::Granted);
}

// ── Escalating strategy ───────────────────────────────────────────────────────

#[test]
fn test_escalating_requests_precursors_first() {
    let sim = Simulation::new();
    sim.platform.script_response(
        GrantResults::new()
            .with("fine_location", true)
            .with("coarse_location", true)
            .with("background_location", true),
    );
    let (capabilities, config) = presets::background_location().unwrap().into_parts();
    let mut negotiator = sim.negotiator(capabilities, config).unwrap();

    let advance = sim.run(&mut negotiator).unwrap();

    assert_eq!(advance.outcome(), Some(&Outcome::Granted));
    assert_eq!(
        sim.platform.requests(),
        vec![ids(&["fine_location", "coarse_location", "background_location"])]
    );
    assert_eq!(
        sim.notifier.shown(),
        vec![("Background location permission granted".to_string(), true)]
    );
}

#[test]
fn test_escalating_narrows_once_precursor_granted() {
    let sim = Simulation::new();
    sim.platform.set_status("coarse_location", GrantStatus::Granted);
    sim.platform
        .script_response(GrantResults::new().with("background_location", true));
    let (capabilities, config) = presets::background_location().unwrap().into_parts();
    let mut negotiator = sim.negotiator(capabilities, config).unwrap();

    sim.run(&mut negotiator).unwrap();

    assert_eq!(sim.platform.requests(), vec![ids(&["background_location"])]);
}

#[test]
fn test_settings_only_platform_skips_request_phase() {
    let sim = Simulation::with_flags(
        PlatformFlags::new().with(presets::BACKGROUND_LOCATION_SETTINGS_ONLY),
    );
    sim.dialogs.script_choice(DialogChoice::Proceed);
    sim.platform.grant_in_settings("background_location");
    let (capabilities, config) = presets::background_location().unwrap().into_parts();
    let mut negotiator = sim.negotiator(capabilities, config).unwrap();

    let advance = sim.run(&mut negotiator).unwrap();

    assert_eq!(advance.outcome(), Some(&Outcome::Granted));
    assert_eq!(sim.platform.calls(), vec![PlatformCall::OpenSettings]);

    let trace = sim.journal.export_latest().unwrap();
    assert_eq!(trace.entries_into(Phase::AwaitingRequestResult), 0);
    assert_eq!(trace.entries_into(Phase::AwaitingSettingsReturn), 1);
    assert!(sim.journal.verify_integrity());
}

// ── Settings return policy ────────────────────────────────────────────────────

#[test]
fn test_settings_return_resolve_reports_still_missing() {
    let sim = Simulation::new();
    sim.platform
        .script_response(GrantResults::new().with("contacts", true).with("camera", false));
    sim.dialogs.script_choice(DialogChoice::Proceed);
    let (capabilities, config) = presets::general("pair", &["contacts", "camera"])
        .unwrap()
        .into_parts();
    let mut negotiator = sim.negotiator(capabilities, config).unwrap();

    let advance = sim.run(&mut negotiator).unwrap();

    assert_eq!(advance.outcome(), Some(&Outcome::Denied(ids(&["camera"]))));
    assert_eq!(sim.platform.requests().len(), 1);
}

#[test]
fn test_settings_return_recheck_asks_again() {
    let sim = Simulation::new();
    sim.platform
        .script_response(GrantResults::new().with("contacts", true).with("camera", false));
    sim.dialogs.script_choice(DialogChoice::Proceed);
    sim.platform.script_response(GrantResults::new().with("camera", true));

    let (capabilities, mut config) = presets::general("pair", &["contacts", "camera"])
        .unwrap()
        .into_parts();
    config.settings_return = SettingsReturnPolicy::Recheck;
    let mut negotiator = sim.negotiator(capabilities, config).unwrap();

    let advance = sim.run(&mut negotiator).unwrap();

    assert_eq!(advance.outcome(), Some(&Outcome::Granted));
    assert_eq!(
        sim.platform.requests(),
        vec![ids(&["contacts", "camera"]), ids(&["camera"])]
    );
}

// ── Journal ───────────────────────────────────────────────────────────────────

#[test]
fn test_sequential_negotiations_are_journaled_separately() {
    let sim = Simulation::new();
    sim.platform.set_status("camera", GrantStatus::Granted);
    let (capabilities, config) = presets::general("camera", &["camera"]).unwrap().into_parts();
    let mut negotiator = sim.negotiator(capabilities, config).unwrap();

    sim.run(&mut negotiator).unwrap();
    sim.run(&mut negotiator).unwrap();

    let runs = sim.journal.negotiations();
    assert_eq!(runs.len(), 2);
    assert_ne!(runs[0], runs[1]);
    for id in runs {
        let trace = sim.journal.export(id);
        assert_eq!(trace.outcome, Some(Outcome::Granted));
        assert_eq!(
            trace.phase_path(),
            vec![Phase::Idle, Phase::Checking, Phase::Terminal, Phase::Idle]
        );
    }
    assert_eq!(sim.notifier.shown().len(), 2);
}
