//! Scripted dialog surface and recording notifier.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use grantor_contracts::negotiation::{DialogChoice, DialogKind, DialogRequest, NegotiationEvent};
use grantor_core::traits::{DialogSurface, Notifier};

use crate::host::EventQueue;

#[derive(Debug, Default)]
struct SurfaceState {
    choices: VecDeque<DialogChoice>,
    shown: Vec<DialogRequest>,
}

/// A dialog surface whose "user" answers from a script.
///
/// Each shown dialog consumes the next scripted choice. When the script runs
/// out the dialog is dismissed.
#[derive(Debug, Clone)]
pub struct ScriptedDialogs {
    state: Arc<Mutex<SurfaceState>>,
    events: EventQueue,
}

impl ScriptedDialogs {
    pub fn new(events: EventQueue) -> Self {
        Self {
            state: Arc::new(Mutex::new(SurfaceState::default())),
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn script_choice(&self, choice: DialogChoice) {
        self.lock().choices.push_back(choice);
    }

    /// Every dialog shown so far, in order.
    pub fn shown(&self) -> Vec<DialogRequest> {
        self.lock().shown.clone()
    }
}

impl DialogSurface for ScriptedDialogs {
    fn show_dialog(&self, dialog: &DialogRequest) {
        let choice = {
            let mut state = self.lock();
            state.shown.push(dialog.clone());
            state.choices.pop_front().unwrap_or(DialogChoice::Dismissed)
        };

        debug!(kind = ?dialog.kind, ?choice, "simulated dialog answered");

        let event = match dialog.kind {
            DialogKind::Rationale => NegotiationEvent::RationaleChoice(choice),
            DialogKind::SettingsRedirect => NegotiationEvent::SettingsChoice(choice),
        };
        self.events.push(event);
    }
}

/// A notifier that keeps every message it was asked to show.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    shown: Arc<Mutex<Vec<(String, bool)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<(String, bool)> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, success: bool) {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((message.to_string(), success));
    }
}
