//! The dues aggregator: money-owed and money-spent summaries computed by
//! scanning expense records.
//!
//! Everything here is read-only over already-loaded expenses. Totals are
//! accumulated at full precision and rounded to cents once at the end, so
//! per-term rounding error cannot compound.

use std::collections::HashMap;

use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    expense::{Expense, round_to_cents},
    member::{Member, MemberId},
};

/// The money totals for a single member.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    /// The sum of the amounts of the expenses the member posted.
    pub total_spent: f64,
    /// The sum of the member's unpaid shares across all expenses.
    pub total_owed: f64,
    /// `total_spent - total_owed`.
    pub balance: f64,
}

/// Compute the spent/owed/balance summary for one member.
///
/// Members with no activity get a zeroed summary; this never fails.
pub fn member_summary(member_id: MemberId, expenses: &[Expense]) -> MemberSummary {
    let mut total_spent = 0.0;
    let mut total_owed = 0.0;

    for expense in expenses {
        if expense.posted_by == member_id {
            total_spent += expense.amount;
        }

        let unpaid_share = expense
            .split_with
            .iter()
            .find(|entry| entry.member_id == member_id)
            .filter(|entry| !entry.is_paid);

        if let Some(entry) = unpaid_share {
            total_owed += entry.share;
        }
    }

    MemberSummary {
        total_spent: round_to_cents(total_spent),
        total_owed: round_to_cents(total_owed),
        balance: round_to_cents(total_spent - total_owed),
    }
}

/// One row of the admin dues table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuesRow {
    /// The member's ID.
    pub member_id: MemberId,
    /// The member's name.
    pub name: String,
    /// The member's email address.
    pub email: String,
    /// The member's phone number.
    pub phone: String,
    /// The sum of the amounts of the expenses the member posted.
    pub total_spent: f64,
    /// The sum of the member's unpaid shares.
    pub total_owed: f64,
    /// `total_spent - total_owed`.
    pub balance: f64,
}

/// Compute the dues table for every member in one pass over the expenses.
///
/// Rather than re-scanning the expense list per member, the expenses are
/// walked once, accumulating spent and owed totals into a map keyed by member
/// ID; members with no activity default to zero. One row is produced per
/// entry of `members`, in roster order.
pub fn all_member_dues(members: &[Member], expenses: &[Expense]) -> Vec<DuesRow> {
    let mut totals: HashMap<MemberId, (f64, f64)> = HashMap::new();

    for expense in expenses {
        totals.entry(expense.posted_by).or_insert((0.0, 0.0)).0 += expense.amount;

        for entry in &expense.split_with {
            if !entry.is_paid {
                totals.entry(entry.member_id).or_insert((0.0, 0.0)).1 += entry.share;
            }
        }
    }

    members
        .iter()
        .map(|member| {
            let (total_spent, total_owed) = totals.get(&member.id).copied().unwrap_or((0.0, 0.0));

            DuesRow {
                member_id: member.id,
                name: member.name.clone(),
                email: member.email.clone(),
                phone: member.phone.clone(),
                total_spent: round_to_cents(total_spent),
                total_owed: round_to_cents(total_owed),
                balance: round_to_cents(total_spent - total_owed),
            }
        })
        .collect()
}

/// One unpaid share of a member, annotated with its parent expense.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingShare {
    /// The parent expense's ID.
    pub expense_id: i64,
    /// The member who owes the share.
    pub member_id: MemberId,
    /// What the parent expense was for.
    pub product_name: String,
    /// The parent expense's total amount.
    pub amount: f64,
    /// The amount the member owes.
    pub share: f64,
    /// The name of the member who posted the parent expense.
    pub posted_by: String,
    /// The parent expense's description.
    pub description: String,
    /// When the parent expense was posted.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A member's unpaid shares with their summed total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingBreakdown {
    /// The sum of the unpaid shares, rounded to cents.
    pub total_to_pay: f64,
    /// Every unpaid share, in the order the expenses were scanned.
    pub breakdown: Vec<PendingShare>,
}

/// List every unpaid share for `member_id`, annotated with its parent
/// expense.
///
/// `member_names` resolves poster IDs to display names; posters that are no
/// longer on the roster are shown as "Unknown".
pub fn pending_breakdown(
    member_id: MemberId,
    expenses: &[Expense],
    member_names: &HashMap<MemberId, String>,
) -> PendingBreakdown {
    let mut total_to_pay = 0.0;
    let mut breakdown = Vec::new();

    for expense in expenses {
        let unpaid_share = expense
            .split_with
            .iter()
            .find(|entry| entry.member_id == member_id)
            .filter(|entry| !entry.is_paid);

        if let Some(entry) = unpaid_share {
            total_to_pay += entry.share;
            breakdown.push(PendingShare {
                expense_id: expense.id,
                member_id,
                product_name: expense.product_name.clone(),
                amount: expense.amount,
                share: entry.share,
                posted_by: member_names
                    .get(&expense.posted_by)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_owned()),
                description: expense.description.clone(),
                created_at: expense.created_at,
            });
        }
    }

    PendingBreakdown {
        total_to_pay: round_to_cents(total_to_pay),
        breakdown,
    }
}
