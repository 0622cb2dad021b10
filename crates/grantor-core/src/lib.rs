//! # grantor-core
//!
//! The event-driven runtime access-grant negotiator.
//!
//! This crate provides:
//! - The collaborator traits (`Platform`, `DialogSurface`, `OutcomeCallback`,
//!   `Notifier`, `TransitionJournal`)
//! - The `Negotiator` state machine that drives one capability set from a
//!   status check to a granted/denied outcome
//! - Request strategies, resolved once against platform flags
//! - `NotifyingCallback`, the default toast-style outcome callback
//!
//! ## Usage
//!
//! ```rust,ignore
//! use grantor_core::{Negotiator, NotifyingCallback};
//!
//! let mut negotiator = Negotiator::new(set, config, platform, dialogs, callback)?;
//! negotiator.start()?;
//! // later, from the host's platform/dialog callbacks:
//! negotiator.advance(NegotiationEvent::RequestResult(results))?;
//! ```

pub mod callback;
pub mod format;
pub mod negotiator;
pub mod strategy;
pub mod traits;

pub use callback::NotifyingCallback;
pub use negotiator::Negotiator;
pub use strategy::{PlatformFlags, ResolvedStrategy};
