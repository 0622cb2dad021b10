//! GRANTOR access-grant negotiation demo CLI.
//!
//! Runs the reference negotiation scenarios against a simulated platform, or
//! validates a TOML profile file.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- already-granted
//!   cargo run -p demo -- partial-denial
//!   cargo run -p demo -- permanent-denial
//!   cargo run -p demo -- background-location
//!   cargo run -p demo -- settings-grant
//!   cargo run -p demo -- check-profile crates/grantor-sim/profiles/demo.toml

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use grantor_config::ProfileCatalog;
use grantor_contracts::error::GrantorResult;
use grantor_core::strategy::{PlatformFlags, ResolvedStrategy};
use grantor_sim::scenarios::{
    already_granted, background_location, partial_denial, permanent_denial, settings_grant,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// GRANTOR: event-driven runtime access-grant negotiation demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "GRANTOR negotiation demo",
    long_about = "Runs GRANTOR negotiation scenarios against a simulated platform,\n\
                  showing requests, rationale and settings dialogs, outcomes and\n\
                  the journaled phase path."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every scenario in sequence.
    RunAll,
    /// Scenario A: single capability already granted.
    AlreadyGranted,
    /// Scenario B: partial denial, rationale accepted.
    PartialDenial,
    /// Scenario C: permanent denial, settings redirect declined.
    PermanentDenial,
    /// Scenario D: escalating background location on a settings-only platform.
    BackgroundLocation,
    /// Scenario E: denial fixed from the settings surface.
    SettingsGrant,
    /// Load and validate a TOML profile file, then print what it resolves to.
    CheckProfile {
        /// Path to the profile file.
        path: PathBuf,
        /// Platform flags to resolve strategies against (repeatable).
        #[arg(long = "flag")]
        flags: Vec<String>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug to see every transition.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::AlreadyGranted => already_granted::run_scenario().map(drop),
        Command::PartialDenial => partial_denial::run_scenario().map(drop),
        Command::PermanentDenial => permanent_denial::run_scenario().map(drop),
        Command::BackgroundLocation => background_location::run_scenario().map(drop),
        Command::SettingsGrant => settings_grant::run_scenario().map(drop),
        Command::CheckProfile { path, flags } => check_profile(&path, &flags),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_all() -> GrantorResult<()> {
    print_banner();
    already_granted::run_scenario()?;
    partial_denial::run_scenario()?;
    permanent_denial::run_scenario()?;
    background_location::run_scenario()?;
    settings_grant::run_scenario()?;
    println!("All scenarios completed.");
    Ok(())
}

fn check_profile(path: &Path, flags: &[String]) -> GrantorResult<()> {
    let catalog = ProfileCatalog::from_file(path)?;
    info!(path = %path.display(), profiles = catalog.len(), "profile file loaded");

    let platform_flags = flags
        .iter()
        .fold(PlatformFlags::new(), |acc, flag| acc.with(flag.as_str()));

    println!("{}: {} profile(s)", path.display(), catalog.len());
    let flag_names: Vec<&str> = platform_flags.iter().collect();
    if !flag_names.is_empty() {
        println!("  platform flags: {}", flag_names.join(", "));
    }
    for profile in catalog.iter() {
        let strategy = ResolvedStrategy::resolve(
            &profile.config.strategy,
            &profile.capabilities,
            &platform_flags,
        )?;
        let names: Vec<&str> = profile.capabilities.iter().map(|id| id.as_str()).collect();

        println!();
        println!("  [{}]", profile.name);
        println!("    capabilities:    {}", names.join(", "));
        println!("    mode:            {:?}", strategy.mode);
        println!("    batching:        {:?}", strategy.batching);
        println!("    settings return: {:?}", profile.config.settings_return);
        println!("    rationale title: {}", profile.config.messages.rationale_title);
        println!("    settings title:  {}", profile.config.messages.settings_title);
    }
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("GRANTOR: Runtime Access-Grant Negotiation");
    println!("=========================================");
    println!();
    println!("Per negotiation:");
    println!("  [1] Check every capability's status");
    println!("  [2] Request the missing ones (or go straight to settings)");
    println!("  [3] Denied but explainable: show the rationale, then ask again");
    println!("  [4] Denied for good: offer the settings redirect");
    println!("  [5] Deliver exactly one outcome, then go idle");
    println!();
}
