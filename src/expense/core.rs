//! Defines the core data models and database queries for expenses.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    expense::split::{compute_share, derive_status},
    member::MemberId,
};

// ============================================================================
// MODELS
// ============================================================================

/// The database ID of an expense.
pub type ExpenseId = i64;

/// The settlement state of an expense, derived from its split entries.
///
/// The status is never set directly by a client: it is recomputed from the
/// full entry list and persisted on every mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    /// No member has paid their share yet.
    Pending,
    /// Some, but not all, members have paid their share.
    PartiallyPaid,
    /// Every member has paid their share.
    Settled,
}

impl ExpenseStatus {
    /// The status as the string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Pending => "pending",
            ExpenseStatus::PartiallyPaid => "partially_paid",
            ExpenseStatus::Settled => "settled",
        }
    }
}

impl ToSql for ExpenseStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ExpenseStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "pending" => Ok(ExpenseStatus::Pending),
            "partially_paid" => Ok(ExpenseStatus::PartiallyPaid),
            "settled" => Ok(ExpenseStatus::Settled),
            other => Err(FromSqlError::Other(
                format!("invalid expense status {other}").into(),
            )),
        }
    }
}

/// One member's share of an expense.
///
/// `name` is a snapshot of the member's name at creation time and is
/// intentionally never re-synced if the member later renames; the split
/// records who the expense was split with at the time it was posted.
/// `is_paid` is the only field that changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitEntry {
    /// The member who owes this share.
    pub member_id: MemberId,
    /// The member's name when the expense was posted.
    pub name: String,
    /// The amount owed, in currency units with 2 decimal places.
    pub share: f64,
    /// Whether the member has paid their share.
    pub is_paid: bool,
}

/// An expense posted by a member and split among selected members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// What was bought.
    pub product_name: String,
    /// The total amount of the expense.
    pub amount: f64,
    /// Free-form detail about the expense.
    pub description: String,
    /// An opaque reference to the uploaded invoice image.
    pub invoice_image: String,
    /// The member who paid and posted the expense. Immutable after creation.
    pub posted_by: MemberId,
    /// The shares the expense is split into, in creation order.
    pub split_with: Vec<SplitEntry>,
    /// The derived settlement state.
    pub status: ExpenseStatus,
    /// When the expense was posted. Immutable after creation.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Expense {
    /// Start building a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability.
    pub fn build(
        product_name: &str,
        amount: f64,
        invoice_image: &str,
        posted_by: MemberId,
        split_with: Vec<SplitMember>,
    ) -> ExpenseBuilder {
        ExpenseBuilder {
            product_name: product_name.to_owned(),
            amount,
            description: String::new(),
            invoice_image: invoice_image.to_owned(),
            posted_by,
            split_with,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// A member selected for an expense split: the member's ID and the name
/// snapshot to record against the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitMember {
    /// The member's ID.
    pub member_id: MemberId,
    /// The member's name at the time of posting.
    pub name: String,
}

/// A builder for creating [Expense] instances.
///
/// Collects the client-supplied fields of an expense; [create_expense]
/// validates them, computes the per-member share and persists the expense
/// together with its split entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseBuilder {
    /// What was bought.
    pub product_name: String,
    /// The total amount of the expense.
    pub amount: f64,
    /// Free-form detail about the expense. Defaults to an empty string.
    pub description: String,
    /// An opaque reference to the uploaded invoice image.
    pub invoice_image: String,
    /// The member posting the expense.
    pub posted_by: MemberId,
    /// The members the expense is split among.
    pub split_with: Vec<SplitMember>,
    /// When the expense was posted. Defaults to now.
    pub created_at: OffsetDateTime,
}

impl ExpenseBuilder {
    /// Set the description for the expense.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the creation timestamp for the expense.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the expense table.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_name TEXT NOT NULL,
                amount REAL NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                invoice_image TEXT NOT NULL,
                posted_by INTEGER NOT NULL,
                status TEXT NOT NULL
                    CHECK (status IN ('pending', 'partially_paid', 'settled')),
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    // Index used by the invoice listing, which orders newest first.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_created_at ON expense(created_at);",
        (),
    )?;

    Ok(())
}

/// Create the split entry table.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_split_entry_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS split_entry (
                expense_id INTEGER NOT NULL,
                member_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                share REAL NOT NULL,
                is_paid INTEGER NOT NULL DEFAULT 0,
                UNIQUE (expense_id, member_id),
                FOREIGN KEY (expense_id) REFERENCES expense(id)
                )",
        (),
    )?;

    Ok(())
}

/// Create a new expense with its full split in one transaction.
///
/// The per-member share is computed by splitting the amount evenly and
/// rounding each share to 2 decimal places; see
/// [compute_share](crate::expense::compute_share) for the accepted rounding
/// remainder. The expense starts with every entry unpaid and status
/// `pending`. Nothing is persisted if validation fails.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyProductName] if the product name is blank,
/// - or [Error::NonPositiveAmount] if the amount is not a positive number,
/// - or [Error::MissingInvoiceImage] if the invoice image reference is blank,
/// - or [Error::EmptySplitList] if no members were selected,
/// - or [Error::DuplicateSplitMember] if a member was selected twice,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_expense(builder: ExpenseBuilder, connection: &mut Connection) -> Result<Expense, Error> {
    if builder.product_name.trim().is_empty() {
        return Err(Error::EmptyProductName);
    }

    if builder.invoice_image.trim().is_empty() {
        return Err(Error::MissingInvoiceImage);
    }

    if builder.split_with.is_empty() {
        return Err(Error::EmptySplitList);
    }

    for (index, member) in builder.split_with.iter().enumerate() {
        let is_repeat = builder.split_with[..index]
            .iter()
            .any(|other| other.member_id == member.member_id);

        if is_repeat {
            return Err(Error::DuplicateSplitMember(member.member_id));
        }
    }

    let share = compute_share(builder.amount, builder.split_with.len())?;

    let entries: Vec<SplitEntry> = builder
        .split_with
        .iter()
        .map(|member| SplitEntry {
            member_id: member.member_id,
            name: member.name.clone(),
            share,
            is_paid: false,
        })
        .collect();

    let status = ExpenseStatus::Pending;

    let tx = connection.transaction()?;

    tx.execute(
        "INSERT INTO expense (product_name, amount, description, invoice_image, posted_by, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            &builder.product_name,
            builder.amount,
            &builder.description,
            &builder.invoice_image,
            builder.posted_by,
            status,
            builder.created_at,
        ),
    )?;

    let expense_id = tx.last_insert_rowid();

    {
        let mut insert_entry = tx.prepare(
            "INSERT INTO split_entry (expense_id, member_id, name, share, is_paid)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;

        for entry in &entries {
            insert_entry.execute((
                expense_id,
                entry.member_id,
                &entry.name,
                entry.share,
                entry.is_paid,
            ))?;
        }
    }

    tx.commit()?;

    Ok(Expense {
        id: expense_id,
        product_name: builder.product_name,
        amount: builder.amount,
        description: builder.description,
        invoice_image: builder.invoice_image,
        posted_by: builder.posted_by,
        split_with: entries,
        status,
        created_at: builder.created_at,
    })
}

/// Retrieve an expense and its split entries by ID.
///
/// # Errors
/// This function will return a [Error::NotFound] if `id` does not refer to an
/// expense, or a [Error::SqlError] if there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let mut expense = connection
        .prepare(
            "SELECT id, product_name, amount, description, invoice_image, posted_by, status, created_at
             FROM expense WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_expense_row)?;

    expense.split_with = load_split_entries(id, connection)?;

    Ok(expense)
}

/// Retrieve every expense with its split entries, newest first.
///
/// Expenses posted at the same instant keep their insertion order.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    let expenses: Vec<Expense> = connection
        .prepare(
            "SELECT id, product_name, amount, description, invoice_image, posted_by, status, created_at
             FROM expense ORDER BY created_at DESC, id ASC",
        )?
        .query_map([], map_expense_row)?
        .collect::<Result<_, _>>()?;

    attach_split_entries(expenses, connection)
}

/// The expenses relevant to a single member: those they posted and those they
/// appear in the split of.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberExpenses {
    /// Expenses the member posted, newest first.
    pub posted_expenses: Vec<Expense>,
    /// Expenses whose split includes the member, newest first.
    pub shared_expenses: Vec<Expense>,
}

/// Retrieve the expenses posted by `member_id` and the expenses the member is
/// split into, each newest first.
pub fn get_member_expenses(
    member_id: MemberId,
    connection: &Connection,
) -> Result<MemberExpenses, Error> {
    let posted: Vec<Expense> = connection
        .prepare(
            "SELECT id, product_name, amount, description, invoice_image, posted_by, status, created_at
             FROM expense WHERE posted_by = :member_id ORDER BY created_at DESC, id ASC",
        )?
        .query_map(&[(":member_id", &member_id)], map_expense_row)?
        .collect::<Result<_, _>>()?;

    let shared: Vec<Expense> = connection
        .prepare(
            "SELECT e.id, e.product_name, e.amount, e.description, e.invoice_image, e.posted_by, e.status, e.created_at
             FROM expense e
             JOIN split_entry s ON s.expense_id = e.id
             WHERE s.member_id = :member_id
             ORDER BY e.created_at DESC, e.id ASC",
        )?
        .query_map(&[(":member_id", &member_id)], map_expense_row)?
        .collect::<Result<_, _>>()?;

    Ok(MemberExpenses {
        posted_expenses: attach_split_entries(posted, connection)?,
        shared_expenses: attach_split_entries(shared, connection)?,
    })
}

/// Load the split entries for an expense, in creation order.
pub(crate) fn load_split_entries(
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<Vec<SplitEntry>, Error> {
    connection
        .prepare(
            "SELECT member_id, name, share, is_paid FROM split_entry
             WHERE expense_id = :expense_id ORDER BY rowid",
        )?
        .query_map(&[(":expense_id", &expense_id)], |row| {
            Ok(SplitEntry {
                member_id: row.get(0)?,
                name: row.get(1)?,
                share: row.get(2)?,
                is_paid: row.get(3)?,
            })
        })?
        .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
        .collect()
}

/// Persist the derived status of an expense.
pub(crate) fn update_expense_status(
    expense_id: ExpenseId,
    status: ExpenseStatus,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "UPDATE expense SET status = ?1 WHERE id = ?2",
        (status, expense_id),
    )?;

    Ok(())
}

fn attach_split_entries(
    expenses: Vec<Expense>,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    expenses
        .into_iter()
        .map(|mut expense| {
            expense.split_with = load_split_entries(expense.id, connection)?;
            Ok(expense)
        })
        .collect()
}

/// Map a database row to an [Expense] with an empty split list.
fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        product_name: row.get(1)?,
        amount: row.get(2)?,
        description: row.get(3)?,
        invoice_image: row.get(4)?,
        posted_by: row.get(5)?,
        split_with: Vec::new(),
        status: row.get(6)?,
        created_at: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        db::initialize,
        expense::{Expense, ExpenseStatus, SplitMember},
        member::MemberId,
    };

    use super::{create_expense, get_all_expenses, get_expense, get_member_expenses};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn split_members(ids: &[i64]) -> Vec<SplitMember> {
        ids.iter()
            .map(|id| SplitMember {
                member_id: MemberId::new(*id),
                name: format!("Member {id}"),
            })
            .collect()
    }

    #[test]
    fn create_succeeds_with_even_split() {
        let mut conn = get_test_connection();

        let expense = create_expense(
            Expense::build(
                "Groceries",
                100.0,
                "invoices/groceries.png",
                MemberId::new(1),
                split_members(&[1, 2, 3]),
            )
            .description("weekly shop"),
            &mut conn,
        )
        .expect("Could not create expense");

        assert!(expense.id > 0);
        assert_eq!(expense.status, ExpenseStatus::Pending);
        assert_eq!(expense.split_with.len(), 3);
        assert!(expense.split_with.iter().all(|entry| entry.share == 33.33));
        assert!(expense.split_with.iter().all(|entry| !entry.is_paid));
    }

    #[test]
    fn create_persists_expense_and_entries() {
        let mut conn = get_test_connection();
        let created = create_expense(
            Expense::build(
                "Internet",
                60.0,
                "invoices/net.png",
                MemberId::new(1),
                split_members(&[2, 3]),
            ),
            &mut conn,
        )
        .unwrap();

        let loaded = get_expense(created.id, &conn).expect("Could not load expense");

        assert_eq!(loaded, created);
    }

    #[test]
    fn create_fails_on_blank_product_name() {
        let mut conn = get_test_connection();

        let result = create_expense(
            Expense::build(" ", 10.0, "invoices/x.png", MemberId::new(1), split_members(&[2])),
            &mut conn,
        );

        assert_eq!(result, Err(Error::EmptyProductName));
    }

    #[test]
    fn create_fails_on_non_positive_amount() {
        let mut conn = get_test_connection();

        let result = create_expense(
            Expense::build(
                "Rent",
                -500.0,
                "invoices/rent.png",
                MemberId::new(1),
                split_members(&[2]),
            ),
            &mut conn,
        );

        assert_eq!(result, Err(Error::NonPositiveAmount(-500.0)));
    }

    #[test]
    fn create_fails_on_missing_invoice_image() {
        let mut conn = get_test_connection();

        let result = create_expense(
            Expense::build("Rent", 500.0, "", MemberId::new(1), split_members(&[2])),
            &mut conn,
        );

        assert_eq!(result, Err(Error::MissingInvoiceImage));
    }

    #[test]
    fn create_fails_on_empty_split() {
        let mut conn = get_test_connection();

        let result = create_expense(
            Expense::build("Rent", 500.0, "invoices/rent.png", MemberId::new(1), Vec::new()),
            &mut conn,
        );

        assert_eq!(result, Err(Error::EmptySplitList));
    }

    #[test]
    fn create_fails_on_duplicate_split_member() {
        let mut conn = get_test_connection();

        let result = create_expense(
            Expense::build(
                "Rent",
                500.0,
                "invoices/rent.png",
                MemberId::new(1),
                split_members(&[2, 3, 2]),
            ),
            &mut conn,
        );

        assert_eq!(result, Err(Error::DuplicateSplitMember(MemberId::new(2))));
    }

    #[test]
    fn failed_create_persists_nothing() {
        let mut conn = get_test_connection();

        create_expense(
            Expense::build(
                "Rent",
                500.0,
                "invoices/rent.png",
                MemberId::new(1),
                split_members(&[2, 3, 2]),
            ),
            &mut conn,
        )
        .expect_err("duplicate split member should be rejected");

        let expenses = get_all_expenses(&conn).unwrap();
        assert!(expenses.is_empty());

        let entry_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM split_entry", [], |row| row.get(0))
            .unwrap();
        assert_eq!(entry_count, 0);
    }

    #[test]
    fn get_expense_with_invalid_id_returns_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_expense(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn get_all_expenses_orders_newest_first() {
        let mut conn = get_test_connection();
        let older = create_expense(
            Expense::build("Old", 10.0, "invoices/a.png", MemberId::new(1), split_members(&[2]))
                .created_at(datetime!(2026-01-01 10:00 UTC)),
            &mut conn,
        )
        .unwrap();
        let newer = create_expense(
            Expense::build("New", 10.0, "invoices/b.png", MemberId::new(1), split_members(&[2]))
                .created_at(datetime!(2026-02-01 10:00 UTC)),
            &mut conn,
        )
        .unwrap();

        let expenses = get_all_expenses(&conn).unwrap();

        assert_eq!(
            expenses.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![newer.id, older.id]
        );
    }

    #[test]
    fn get_all_expenses_breaks_timestamp_ties_in_insertion_order() {
        let mut conn = get_test_connection();
        let at = datetime!(2026-03-01 09:00 UTC);
        let first = create_expense(
            Expense::build("First", 10.0, "invoices/a.png", MemberId::new(1), split_members(&[2]))
                .created_at(at),
            &mut conn,
        )
        .unwrap();
        let second = create_expense(
            Expense::build("Second", 10.0, "invoices/b.png", MemberId::new(1), split_members(&[2]))
                .created_at(at),
            &mut conn,
        )
        .unwrap();

        let expenses = get_all_expenses(&conn).unwrap();

        assert_eq!(
            expenses.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
    }

    #[test]
    fn get_member_expenses_separates_posted_and_shared() {
        let mut conn = get_test_connection();
        let asha = MemberId::new(1);
        let ben = MemberId::new(2);
        let posted = create_expense(
            Expense::build("Groceries", 30.0, "invoices/g.png", asha, split_members(&[2])),
            &mut conn,
        )
        .unwrap();
        let shared = create_expense(
            Expense::build("Power", 90.0, "invoices/p.png", ben, split_members(&[1, 2])),
            &mut conn,
        )
        .unwrap();

        let expenses = get_member_expenses(asha, &conn).unwrap();

        assert_eq!(expenses.posted_expenses, vec![posted]);
        assert_eq!(expenses.shared_expenses, vec![shared]);
    }
}
