//! Database initialization for the application.

use rusqlite::Connection;

use crate::{
    expense::{create_expense_table, create_split_entry_table},
    member::create_member_table,
};

/// Create the application's tables if they do not exist.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    // Split entries reference their parent expense by foreign key.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    create_member_table(connection)?;
    create_expense_table(connection)?;
    create_split_entry_table(connection)?;

    Ok(())
}
