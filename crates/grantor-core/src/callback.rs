//! The default outcome callback.
//!
//! Hosts that have nothing better to do with an outcome than tell the user
//! about it can hand a `NotifyingCallback` to the negotiator instead of
//! writing their own `OutcomeCallback`.

use tracing::debug;

use grantor_contracts::capability::CapabilityId;

use crate::{
    format::denied_message,
    traits::{Notifier, OutcomeCallback},
};

/// An `OutcomeCallback` that reports the outcome through a `Notifier`.
///
/// Granted outcomes show `granted_notice` as a success; denied outcomes show
/// "Permissions denied:" followed by the enumerated list as a failure.
pub struct NotifyingCallback {
    notifier: Box<dyn Notifier>,
    granted_notice: String,
}

impl NotifyingCallback {
    pub fn new(notifier: Box<dyn Notifier>, granted_notice: impl Into<String>) -> Self {
        Self {
            notifier,
            granted_notice: granted_notice.into(),
        }
    }
}

impl OutcomeCallback for NotifyingCallback {
    fn on_granted(&self) {
        debug!(notice = %self.granted_notice, "notifying granted outcome");
        self.notifier.notify(&self.granted_notice, true);
    }

    fn on_denied(&self, denied: &[CapabilityId]) {
        debug!(denied = denied.len(), "notifying denied outcome");
        self.notifier.notify(&denied_message(denied), false);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        shown: Arc<Mutex<Vec<(String, bool)>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str, success: bool) {
            self.shown.lock().unwrap().push((message.to_string(), success));
        }
    }

    #[test]
    fn test_granted_uses_configured_notice() {
        let notifier = RecordingNotifier::default();
        let callback =
            NotifyingCallback::new(Box::new(notifier.clone()), "Background location permission granted");

        callback.on_granted();

        let shown = notifier.shown.lock().unwrap();
        assert_eq!(
            *shown,
            vec![("Background location permission granted".to_string(), true)]
        );
    }

    #[test]
    fn test_denied_lists_capabilities() {
        let notifier = RecordingNotifier::default();
        let callback = NotifyingCallback::new(Box::new(notifier.clone()), "ok");

        callback.on_denied(&[CapabilityId::new("camera"), CapabilityId::new("storage")]);

        let shown = notifier.shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].0, "Permissions denied:\n1) camera\n2) storage\n");
        assert!(!shown[0].1);
    }
}
