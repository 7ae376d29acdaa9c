//! Expense management for the household ledger.
//!
//! This module contains everything related to expenses:
//! - The `Expense` and `SplitEntry` models and the `ExpenseBuilder`
//! - The split computation and settlement status derivation
//! - The share ledger that toggles paid shares
//! - Route handlers for posting, reading and settling expenses

pub(crate) mod core;
mod create_endpoint;
mod ledger;
mod list_endpoint;
mod split;
mod toggle_endpoint;

pub use core::{
    Expense, ExpenseBuilder, ExpenseId, ExpenseStatus, MemberExpenses, SplitEntry, SplitMember,
    create_expense, create_expense_table, create_split_entry_table, get_all_expenses, get_expense,
    get_member_expenses,
};
pub use create_endpoint::create_expense_endpoint;
pub use ledger::toggle_share_paid;
pub use list_endpoint::{get_expense_endpoint, list_expenses_endpoint, my_expenses_endpoint};
pub use split::{compute_share, derive_status, round_to_cents};
pub use toggle_endpoint::toggle_share_endpoint;
