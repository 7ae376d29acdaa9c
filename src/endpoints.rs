//! The API endpoint URIs.

/// The route to list (GET) members or add (POST, admin) a member.
pub const MEMBERS: &str = "/api/members";
/// The route to get (GET) or remove (DELETE, admin) a single member.
pub const MEMBER: &str = "/api/members/{member_id}";
/// The route to list (GET) expenses or post (POST) a new expense.
pub const EXPENSES: &str = "/api/expenses";
/// The route for the caller's posted and shared expenses.
pub const MY_EXPENSES: &str = "/api/expenses/mine";
/// The route for the caller's spent/owed/balance summary.
pub const EXPENSE_SUMMARY: &str = "/api/expenses/summary";
/// The route for the caller's unpaid share breakdown.
pub const PENDING_SHARES: &str = "/api/expenses/pending";
/// The route to get a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to flip the paid flag of one member's share.
pub const TOGGLE_SHARE: &str = "/api/expenses/{expense_id}/shares/{member_id}/toggle";
/// The admin route for the all-members dues table.
pub const ADMIN_DUES: &str = "/api/admin/dues";
/// The admin route for the invoice listing.
pub const ADMIN_INVOICES: &str = "/api/admin/invoices";
/// The admin route to send a payment reminder.
pub const ADMIN_REMINDERS: &str = "/api/admin/reminders";
/// The admin route for household statistics.
pub const ADMIN_STATS: &str = "/api/admin/stats";
