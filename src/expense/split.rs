//! Split computation and settlement status derivation.

use crate::{
    Error,
    expense::{ExpenseStatus, SplitEntry},
};

/// Round a monetary value to 2 decimal places using half-up rounding.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the per-member share for an expense split evenly among
/// `member_count` members.
///
/// Every member receives the same rounded share, so the shares can sum to up
/// to `0.01 * (member_count - 1)` away from `total_amount`. That remainder is
/// an accepted approximation and is not reconciled onto any member: splitting
/// 100 three ways yields 33.33 each, which sums to 99.99.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if `total_amount` is zero, negative or not
///   finite,
/// - or [Error::EmptySplitList] if `member_count` is zero.
pub fn compute_share(total_amount: f64, member_count: usize) -> Result<f64, Error> {
    if !total_amount.is_finite() || total_amount <= 0.0 {
        return Err(Error::NonPositiveAmount(total_amount));
    }

    if member_count == 0 {
        return Err(Error::EmptySplitList);
    }

    Ok(round_to_cents(total_amount / member_count as f64))
}

/// Derive the settlement status of an expense from its split entries.
///
/// The status is a pure function of the entries: settled when every entry is
/// paid, pending when none are, partially paid otherwise. The whole entry
/// list is evaluated every time. An empty list derives as settled (vacuously
/// all paid); expense creation rejects empty splits, so this case never
/// reaches the database.
pub fn derive_status(entries: &[SplitEntry]) -> ExpenseStatus {
    let all_paid = entries.iter().all(|entry| entry.is_paid);
    let some_paid = entries.iter().any(|entry| entry.is_paid);

    if all_paid {
        ExpenseStatus::Settled
    } else if some_paid {
        ExpenseStatus::PartiallyPaid
    } else {
        ExpenseStatus::Pending
    }
}


#[cfg(test)]
mod derive_status_tests {
    use crate::{
        expense::{ExpenseStatus, SplitEntry},
        member::MemberId,
    };

    use super::derive_status;

    fn entry(member_id: i64, is_paid: bool) -> SplitEntry {
        SplitEntry {
            member_id: MemberId::new(member_id),
            name: format!("Member {member_id}"),
            share: 10.0,
            is_paid,
        }
    }

    #[test]
    fn no_paid_entries_is_pending() {
        let entries = [entry(1, false), entry(2, false), entry(3, false)];

        assert_eq!(derive_status(&entries), ExpenseStatus::Pending);
    }

    #[test]
    fn some_paid_entries_is_partially_paid() {
        let entries = [entry(1, true), entry(2, false), entry(3, false)];

        assert_eq!(derive_status(&entries), ExpenseStatus::PartiallyPaid);
    }

    #[test]
    fn all_paid_entries_is_settled() {
        let entries = [entry(1, true), entry(2, true), entry(3, true)];

        assert_eq!(derive_status(&entries), ExpenseStatus::Settled);
    }

    #[test]
    fn single_unpaid_entry_is_pending() {
        assert_eq!(derive_status(&[entry(1, false)]), ExpenseStatus::Pending);
    }

    #[test]
    fn single_paid_entry_is_settled() {
        assert_eq!(derive_status(&[entry(1, true)]), ExpenseStatus::Settled);
    }

    #[test]
    fn empty_split_does_not_panic() {
        assert_eq!(derive_status(&[]), ExpenseStatus::Settled);
    }
}
