//! The share ledger: toggling paid shares and recomputing expense status.

use rusqlite::Connection;

use crate::{
    Error,
    expense::{
        Expense, ExpenseId,
        core::{get_expense, load_split_entries, update_expense_status},
        split::derive_status,
    },
    member::MemberId,
};

/// Flip the `is_paid` flag of one member's share and recompute the expense
/// status, in one transaction.
///
/// This is a true toggle, not a set-to-paid: calling it twice restores the
/// original state, which is how a mistaken payment is un-marked from the
/// invoice view. The status is re-derived over the full entry list after the
/// flip and persisted with it, so either both changes land or neither does.
///
/// Returns the full updated expense so callers can render the result without
/// a second read.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `expense_id` does not refer to an expense,
/// - or [Error::MemberNotInExpense] if `member_id` does not appear in the
///   expense's split,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn toggle_share_paid(
    expense_id: ExpenseId,
    member_id: MemberId,
    connection: &mut Connection,
) -> Result<Expense, Error> {
    let tx = connection.transaction()?;

    let flipped = tx.execute(
        "UPDATE split_entry SET is_paid = NOT is_paid
         WHERE expense_id = ?1 AND member_id = ?2",
        (expense_id, member_id),
    )?;

    if flipped == 0 {
        let expense_exists: bool = tx.query_row(
            "SELECT EXISTS (SELECT 1 FROM expense WHERE id = ?1)",
            [expense_id],
            |row| row.get(0),
        )?;

        // The transaction rolls back on drop.
        return Err(if expense_exists {
            Error::MemberNotInExpense
        } else {
            Error::NotFound
        });
    }

    let entries = load_split_entries(expense_id, &tx)?;
    let status = derive_status(&entries);
    update_expense_status(expense_id, status, &tx)?;

    tx.commit()?;

    get_expense(expense_id, connection)
}

#[cfg(test)]
mod toggle_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        expense::{Expense, ExpenseStatus, SplitMember},
        member::MemberId,
    };

    use super::toggle_share_paid;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn three_way_expense(conn: &mut Connection) -> Expense {
        let split = [1, 2, 3]
            .iter()
            .map(|id| SplitMember {
                member_id: MemberId::new(*id),
                name: format!("Member {id}"),
            })
            .collect();

        crate::expense::create_expense(
            Expense::build("Groceries", 100.0, "invoices/g.png", MemberId::new(1), split),
            conn,
        )
        .expect("Could not create expense")
    }

    fn entry_is_paid(expense: &Expense, member_id: MemberId) -> bool {
        expense
            .split_with
            .iter()
            .find(|entry| entry.member_id == member_id)
            .expect("member not in split")
            .is_paid
    }

    #[test]
    fn toggle_marks_share_paid_and_updates_status() {
        let mut conn = get_test_connection();
        let expense = three_way_expense(&mut conn);

        let updated = toggle_share_paid(expense.id, MemberId::new(1), &mut conn)
            .expect("Could not toggle share");

        assert!(entry_is_paid(&updated, MemberId::new(1)));
        assert!(!entry_is_paid(&updated, MemberId::new(2)));
        assert_eq!(updated.status, ExpenseStatus::PartiallyPaid);
    }

    #[test]
    fn toggling_every_share_settles_the_expense() {
        let mut conn = get_test_connection();
        let expense = three_way_expense(&mut conn);

        toggle_share_paid(expense.id, MemberId::new(1), &mut conn).unwrap();
        toggle_share_paid(expense.id, MemberId::new(2), &mut conn).unwrap();
        let updated = toggle_share_paid(expense.id, MemberId::new(3), &mut conn).unwrap();

        assert_eq!(updated.status, ExpenseStatus::Settled);
    }

    #[test]
    fn toggle_twice_restores_original_state() {
        let mut conn = get_test_connection();
        let expense = three_way_expense(&mut conn);

        toggle_share_paid(expense.id, MemberId::new(2), &mut conn).unwrap();
        let restored = toggle_share_paid(expense.id, MemberId::new(2), &mut conn).unwrap();

        assert_eq!(restored, expense);
        assert_eq!(restored.status, ExpenseStatus::Pending);
    }

    #[test]
    fn toggle_persists_the_new_state() {
        let mut conn = get_test_connection();
        let expense = three_way_expense(&mut conn);

        toggle_share_paid(expense.id, MemberId::new(1), &mut conn).unwrap();

        let loaded = crate::expense::get_expense(expense.id, &conn).unwrap();
        assert!(entry_is_paid(&loaded, MemberId::new(1)));
        assert_eq!(loaded.status, ExpenseStatus::PartiallyPaid);
    }

    #[test]
    fn toggle_missing_expense_returns_not_found() {
        let mut conn = get_test_connection();

        let result = toggle_share_paid(42, MemberId::new(1), &mut conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn toggle_member_outside_split_returns_member_not_in_expense() {
        let mut conn = get_test_connection();
        let expense = three_way_expense(&mut conn);

        let result = toggle_share_paid(expense.id, MemberId::new(99), &mut conn);

        assert_eq!(result, Err(Error::MemberNotInExpense));
    }

    #[test]
    fn failed_toggle_leaves_state_untouched() {
        let mut conn = get_test_connection();
        let expense = three_way_expense(&mut conn);

        toggle_share_paid(expense.id, MemberId::new(99), &mut conn)
            .expect_err("member outside split should be rejected");

        let loaded = crate::expense::get_expense(expense.id, &conn).unwrap();
        assert_eq!(loaded, expense);
    }
}
