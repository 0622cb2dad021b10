//! # grantor-sim
//!
//! A simulated host for the GRANTOR negotiator.
//!
//! Provides a scripted platform, a scripted dialog surface and a recording
//! notifier that all answer through one `EventQueue`, plus the loop that
//! drains the queue into `Negotiator::advance()`. The reference scenarios
//! built on top of them:
//!
//! - **A. Already granted**: resolves inside `start()`, no prompts.
//! - **B. Partial denial**: rationale accepted, only the denied
//!   capabilities are requested again.
//! - **C. Permanent denial**: settings redirect offered and declined.
//! - **D. Background location**: escalating strategy on a settings-only
//!   platform; the request phase is skipped entirely.
//! - **E. Granted in settings**: the user fixes the denial in settings.
//!
//! Nothing here touches a real permission service.

pub mod host;
pub mod platform;
pub mod scenarios;
pub mod surface;

pub use host::{EventQueue, Simulation};
pub use platform::{PlatformCall, SimulatedPlatform};
pub use surface::{RecordingNotifier, ScriptedDialogs};
