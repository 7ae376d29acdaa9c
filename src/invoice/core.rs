//! Flattening expenses into presentation-ready invoice rows.

use std::collections::HashMap;

use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    expense::{Expense, ExpenseId},
    member::{Member, MemberId},
};

/// One invoice row: a single member's share of a single expense.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRow {
    /// The expense's ID.
    pub expense_id: ExpenseId,
    /// When the expense was posted.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// What the expense was for.
    pub product_name: String,
    /// The name of the member who posted the expense, or "Unknown" if they
    /// have left the roster.
    pub posted_by_name: String,
    /// The member who owes the share.
    pub member_id: MemberId,
    /// The member's name as snapshotted when the expense was posted.
    pub member_name: String,
    /// The member's current email address, if they are still on the roster.
    pub email: Option<String>,
    /// The amount owed.
    pub share: f64,
    /// Whether the share has been paid.
    pub is_paid: bool,
}

/// Flatten expenses into one invoice row per split entry.
///
/// `expenses` is expected newest first (the order
/// [get_all_expenses](crate::expense::get_all_expenses) returns); rows keep
/// that order, with an expense's entries in their creation order. Poster
/// names and entry emails are resolved against `directory`; the entry name
/// itself is the historical snapshot, not the member's current name.
pub fn invoice_rows(
    expenses: &[Expense],
    directory: &HashMap<MemberId, Member>,
) -> Vec<InvoiceRow> {
    let mut rows = Vec::new();

    for expense in expenses {
        let posted_by_name = directory
            .get(&expense.posted_by)
            .map(|member| member.name.clone())
            .unwrap_or_else(|| "Unknown".to_owned());

        for entry in &expense.split_with {
            rows.push(InvoiceRow {
                expense_id: expense.id,
                date: expense.created_at,
                product_name: expense.product_name.clone(),
                posted_by_name: posted_by_name.clone(),
                member_id: entry.member_id,
                member_name: entry.name.clone(),
                email: directory
                    .get(&entry.member_id)
                    .map(|member| member.email.clone()),
                share: entry.share,
                is_paid: entry.is_paid,
            });
        }
    }

    rows
}
