//! The member model and the database functions for the member table.

use std::fmt::Display;

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A newtype wrapper for integer member IDs.
///
/// This helps disambiguate member IDs from other types of IDs, leading to
/// better compile time errors, and more flexible generics that can have
/// distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct MemberId(i64);

impl MemberId {
    /// Create a new member ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the member ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ToSql for MemberId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for MemberId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(MemberId)
    }
}

/// The role attached to a member account.
///
/// Admins manage the member roster and the dues/invoice views; regular
/// members post and settle expenses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// An ordinary household member.
    Member,
    /// The household administrator.
    Admin,
}

impl Role {
    /// The role as the string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }

    /// Parse a role from its database representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "member" => Some(Role::Member),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        Role::parse(text).ok_or_else(|| FromSqlError::Other(format!("invalid role {text}").into()))
    }
}

/// A member of the household.
///
/// The core treats member records as read-only reference data; the
/// authentication layer in front of this service owns account credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// The member's ID in the application database.
    pub id: MemberId,
    /// The member's display name.
    pub name: String,
    /// The member's email address, used for payment reminders.
    pub email: String,
    /// The member's phone number.
    pub phone: String,
    /// Whether the member is a regular member or the administrator.
    pub role: Role,
}

/// Create the member table.
///
/// # Errors
/// This function will return an error if the SQL query failed.
pub fn create_member_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS member (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                phone TEXT NOT NULL UNIQUE,
                role TEXT NOT NULL CHECK (role IN ('member', 'admin'))
                )",
        (),
    )?;

    Ok(())
}

/// Insert a new member into the database.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingField] if the name, email or phone is blank,
/// - or [Error::DuplicateMember] if another member already uses the email or
///   phone number,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_member(
    name: &str,
    email: &str,
    phone: &str,
    role: Role,
    connection: &Connection,
) -> Result<Member, Error> {
    if name.trim().is_empty() {
        return Err(Error::MissingField("name"));
    }
    if email.trim().is_empty() {
        return Err(Error::MissingField("email"));
    }
    if phone.trim().is_empty() {
        return Err(Error::MissingField("phone"));
    }

    connection.execute(
        "INSERT INTO member (name, email, phone, role) VALUES (?1, ?2, ?3, ?4)",
        (name, email, phone, role),
    )?;

    let id = MemberId::new(connection.last_insert_rowid());

    Ok(Member {
        id,
        name: name.to_owned(),
        email: email.to_owned(),
        phone: phone.to_owned(),
        role,
    })
}

/// Get the member with an ID equal to `member_id`.
///
/// # Errors
/// This function will return a [Error::NotFound] if `member_id` does not
/// belong to a known member, or a [Error::SqlError] if there is some other SQL
/// error.
pub fn get_member(member_id: MemberId, connection: &Connection) -> Result<Member, Error> {
    connection
        .prepare("SELECT id, name, email, phone, role FROM member WHERE id = :id")?
        .query_row(&[(":id", &member_id)], map_member_row)
        .map_err(|error| error.into())
}

/// Get every member with the `member` role, in roster (insertion) order.
///
/// The administrator account is deliberately excluded: it never takes part in
/// expense splits or dues.
pub fn get_all_members(connection: &Connection) -> Result<Vec<Member>, Error> {
    connection
        .prepare("SELECT id, name, email, phone, role FROM member WHERE role = 'member' ORDER BY id")?
        .query_map([], map_member_row)?
        .map(|maybe_member| maybe_member.map_err(|error| error.into()))
        .collect()
}

/// Load every member (including the administrator) keyed by ID.
///
/// Used by the dues and invoice composers to resolve poster names and
/// recipient emails; members deleted since an expense was posted are simply
/// absent from the map.
pub fn member_directory(
    connection: &Connection,
) -> Result<std::collections::HashMap<MemberId, Member>, Error> {
    connection
        .prepare("SELECT id, name, email, phone, role FROM member")?
        .query_map([], map_member_row)?
        .map(|maybe_member| {
            maybe_member
                .map(|member| (member.id, member))
                .map_err(|error| error.into())
        })
        .collect()
}

/// Delete a member by ID.
///
/// # Errors
/// Returns a [Error::NotFound] if the member does not exist.
pub fn delete_member(member_id: MemberId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM member WHERE id = ?1", [member_id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Get the number of members (excluding the administrator) in the database.
///
/// # Errors
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_members(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM member WHERE role = 'member';",
            [],
            |row| row.get::<_, i64>(0),
        )
        .map(|count| count as usize)
        .map_err(|error| error.into())
}

fn map_member_row(row: &Row) -> Result<Member, rusqlite::Error> {
    Ok(Member {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        role: row.get(4)?,
    })
}
