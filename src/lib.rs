//! Roomledger is a web service for tracking shared household expenses.
//!
//! Members post expenses with an invoice image and a split among selected
//! members, and an administrator manages member accounts, reviews aggregate
//! dues and sends payment reminders. This library provides the JSON REST API;
//! authentication is handled by a reverse proxy in front of the service which
//! forwards the caller's identity in request headers.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod db;
mod dues;
mod endpoints;
mod expense;
mod invoice;
mod logging;
mod member;
mod notification;
mod routing;

pub use app_state::AppState;
pub use auth::Identity;
pub use db::initialize as initialize_db;
pub use dues::{
    DuesRow, MemberSummary, PendingBreakdown, PendingShare, all_member_dues, member_summary,
    pending_breakdown,
};
pub use expense::{
    Expense, ExpenseBuilder, ExpenseId, ExpenseStatus, MemberExpenses, SplitEntry, SplitMember,
    compute_share, create_expense, derive_status, get_all_expenses, get_expense,
    get_member_expenses, round_to_cents, toggle_share_paid,
};
pub use invoice::{
    InvoiceRow, ReminderItem, ReminderPayload, compose_reminder, invoice_rows, send_reminder,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use member::{
    Member, MemberId, Role, count_members, create_member, delete_member, get_all_members,
    get_member, member_directory,
};
pub use notification::{LoggingNotifier, ReminderNotifier};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An expense was posted without a product name.
    #[error("the product name cannot be empty")]
    EmptyProductName,

    /// An expense was posted with a zero or negative amount, or a share was
    /// computed for a non-positive total.
    #[error("{0} is not a valid amount, amounts must be positive")]
    NonPositiveAmount(f64),

    /// An expense was posted without an invoice image reference.
    #[error("an invoice image is required")]
    MissingInvoiceImage,

    /// An expense was posted with an empty split list, or a share was computed
    /// for zero members.
    #[error("an expense must be split with at least one member")]
    EmptySplitList,

    /// The same member appeared more than once in an expense's split list.
    #[error("member {0} appears more than once in the split")]
    DuplicateSplitMember(MemberId),

    /// A required field was missing from a request.
    #[error("the field '{0}' is required")]
    MissingField(&'static str),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A share was toggled for a member that does not appear in the expense's
    /// split list.
    #[error("the member does not appear in the expense's split")]
    MemberNotInExpense,

    /// A member was added with an email or phone number that already belongs
    /// to another member.
    #[error("a member with that email or phone number already exists")]
    DuplicateMember,

    /// A payment reminder was requested for a member with nothing owed.
    ///
    /// Reminders are never composed or delivered when the outstanding total is
    /// zero, so this is reported to the caller rather than sending an empty
    /// email.
    #[error("the member has no pending dues")]
    NoPendingDues,

    /// The notification collaborator failed to deliver a reminder.
    ///
    /// Delivery is attempted exactly once; the underlying reason is carried
    /// for the server logs and the caller is told the send failed.
    #[error("could not deliver the reminder: {0}")]
    NotificationFailure(String),

    /// A non-admin caller requested an admin-only operation.
    #[error("admin access is required")]
    AdminOnly,

    /// The request did not carry a usable caller identity.
    ///
    /// The authenticating proxy in front of this service is expected to set
    /// the identity headers on every request it forwards.
    #[error("the request is missing a valid caller identity")]
    IdentityMissing,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("member.") =>
            {
                Error::DuplicateMember
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::EmptyProductName
            | Error::NonPositiveAmount(_)
            | Error::MissingInvoiceImage
            | Error::EmptySplitList
            | Error::DuplicateSplitMember(_)
            | Error::MissingField(_)
            | Error::NoPendingDues => StatusCode::BAD_REQUEST,
            Error::NotFound | Error::MemberNotInExpense => StatusCode::NOT_FOUND,
            Error::DuplicateMember => StatusCode::CONFLICT,
            Error::AdminOnly => StatusCode::FORBIDDEN,
            Error::IdentityMissing => StatusCode::UNAUTHORIZED,
            Error::NotificationFailure(ref reason) => {
                tracing::error!("reminder delivery failed: {}", reason);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::SqlError(_) => {
                // Not intended to be shown to the client.
                tracing::error!("An unexpected error occurred: {}", self);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "an internal error occurred" })),
                )
                    .into_response();
            }
        };

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
