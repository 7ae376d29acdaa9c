//! The notification collaborator that delivers payment reminders.
//!
//! The core composes a [ReminderPayload](crate::invoice::ReminderPayload) and
//! hands it to a [ReminderNotifier] for a single delivery attempt. The actual
//! transport (SMTP and friends) lives outside this service; the default
//! notifier simply writes the payload to the log, which is also what the mail
//! relay sidecar tails in the deployed setup.

use crate::invoice::ReminderPayload;

/// A collaborator that attempts to deliver a payment reminder.
///
/// Implementations make exactly one delivery attempt and report failure with
/// a human-readable reason. Retrying is the caller's decision, not the
/// notifier's.
pub trait ReminderNotifier: Send + Sync {
    /// Deliver `reminder` to its recipient.
    ///
    /// # Errors
    /// Returns the underlying reason as a string if delivery failed.
    fn deliver(&self, reminder: &ReminderPayload) -> Result<(), String>;
}

/// A [ReminderNotifier] that writes reminders to the application log instead
/// of sending them anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

impl ReminderNotifier for LoggingNotifier {
    fn deliver(&self, reminder: &ReminderPayload) -> Result<(), String> {
        tracing::info!(
            recipient = %reminder.email,
            total_due = reminder.total_due,
            items = reminder.items.len(),
            "payment reminder for {}",
            reminder.name
        );

        Ok(())
    }
}
