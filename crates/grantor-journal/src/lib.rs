//! # grantor-journal
//!
//! In-memory transition journal for GRANTOR negotiations.
//!
//! ## Overview
//!
//! The negotiator reports every phase change to an optional
//! `TransitionJournal`. `InMemoryJournal` stores those records and exports
//! them per negotiation as a `NegotiationTrace`, which can be inspected
//! (`phase_path`, `entries_into`) or dumped as JSON. Nothing is persisted.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use grantor_journal::InMemoryJournal;
//!
//! let journal = InMemoryJournal::new();
//! let negotiator = Negotiator::new(set, config, platform, dialogs, callback)?
//!     .with_journal(Box::new(journal.clone()));
//! // ... run ...
//! let trace = journal.export_latest().unwrap();
//! assert!(journal.verify_integrity());
//! ```

pub mod memory;
pub mod trace;

pub use memory::InMemoryJournal;
pub use trace::{is_well_formed, NegotiationTrace};

// ── Tests ─────────────────────────────────────────────────────────────────────
