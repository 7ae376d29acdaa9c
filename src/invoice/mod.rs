//! The invoice and reminder composer.
//!
//! Flattens expense and split data into invoice rows for the admin view, and
//! groups a member's unpaid shares into a reminder payload handed to the
//! notification collaborator.

pub(crate) mod core;
mod list_endpoint;
mod reminder;
mod reminder_endpoint;

pub use core::{InvoiceRow, invoice_rows};
pub use list_endpoint::list_invoices_endpoint;
pub use reminder::{ReminderItem, ReminderPayload, compose_reminder, send_reminder};
pub use reminder_endpoint::send_reminder_endpoint;
