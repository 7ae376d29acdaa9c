//! Composing and sending payment reminders.

use std::collections::HashMap;

use rusqlite::Connection;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    Error,
    expense::{Expense, get_all_expenses, round_to_cents},
    member::{Member, MemberId, get_member, member_directory},
    notification::ReminderNotifier,
};

/// One unpaid item in a reminder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderItem {
    /// What the expense was for.
    pub product_name: String,
    /// The amount the recipient owes.
    pub share: f64,
    /// The name of the member who posted the expense.
    pub posted_by_name: String,
    /// When the expense was posted.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A reminder ready for delivery by the notification collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPayload {
    /// The recipient's email address.
    pub email: String,
    /// The recipient's name.
    pub name: String,
    /// The recipient's outstanding total, rounded to cents.
    pub total_due: f64,
    /// The unpaid items, in the order the expenses were scanned.
    pub items: Vec<ReminderItem>,
}

/// Gather a member's unpaid shares into a reminder payload.
///
/// # Errors
/// Returns [Error::NoPendingDues] if the member owes nothing; a reminder is
/// never composed for a zero total.
pub fn compose_reminder(
    member: &Member,
    expenses: &[Expense],
    directory: &HashMap<MemberId, Member>,
) -> Result<ReminderPayload, Error> {
    let mut total_due = 0.0;
    let mut items = Vec::new();

    for expense in expenses {
        let unpaid_share = expense
            .split_with
            .iter()
            .find(|entry| entry.member_id == member.id)
            .filter(|entry| !entry.is_paid);

        if let Some(entry) = unpaid_share {
            total_due += entry.share;
            items.push(ReminderItem {
                product_name: expense.product_name.clone(),
                share: entry.share,
                posted_by_name: directory
                    .get(&expense.posted_by)
                    .map(|poster| poster.name.clone())
                    .unwrap_or_else(|| "Unknown".to_owned()),
                created_at: expense.created_at,
            });
        }
    }

    if total_due <= 0.0 {
        return Err(Error::NoPendingDues);
    }

    Ok(ReminderPayload {
        email: member.email.clone(),
        name: member.name.clone(),
        total_due: round_to_cents(total_due),
        items,
    })
}

/// Compose a reminder for `member_id` and hand it to the notifier.
///
/// Delivery is attempted exactly once; the expense data is left untouched
/// whether or not delivery succeeds.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `member_id` does not refer to a known member,
/// - or [Error::NoPendingDues] if the member owes nothing (the notifier is
///   not invoked in that case),
/// - or [Error::NotificationFailure] if the notifier reported a delivery
///   failure,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn send_reminder(
    member_id: MemberId,
    connection: &Connection,
    notifier: &dyn ReminderNotifier,
) -> Result<ReminderPayload, Error> {
    let member = get_member(member_id, connection)?;
    let expenses = get_all_expenses(connection)?;
    let directory = member_directory(connection)?;

    let payload = compose_reminder(&member, &expenses, &directory)?;

    notifier
        .deliver(&payload)
        .map_err(Error::NotificationFailure)?;

    tracing::info!(
        recipient = %payload.email,
        total_due = payload.total_due,
        "sent payment reminder"
    );

    Ok(payload)
}
