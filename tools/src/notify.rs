//! Notification sink seam.
//!
//! The executor reports outcomes through this trait instead of talking to
//! any UI directly: short confirmations via `notify`, larger text blocks
//! (e.g. captured stderr) via `put_text`.

use std::sync::Mutex;

/// Outcome sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    /// Short, one-line confirmation.
    fn notify(&self, message: &str);
    /// Multi-line text block for display.
    fn put_text(&self, text: &str);
}

/// Default sink that routes notifications to the log.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn put_text(&self, text: &str) {
        tracing::info!("{text}");
    }
}

/// Test sink that records everything it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notifications: Mutex<Vec<String>>,
    pub text_blocks: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.notifications
            .lock()
            .expect("notifier lock")
            .push(message.to_string());
    }

    fn put_text(&self, text: &str) {
        self.text_blocks
            .lock()
            .expect("notifier lock")
            .push(text.to_string());
    }
}
