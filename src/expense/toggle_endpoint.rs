//! Defines the endpoint for toggling whether a member has paid their share.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState,
    expense::{core::ExpenseId, ledger::toggle_share_paid},
    member::MemberId,
};

/// The state needed to toggle a share's paid flag.
#[derive(Clone)]
pub struct ToggleShareState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ToggleShareState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that flips the paid flag for one member's share of an
/// expense and returns the updated expense.
///
/// Calling the endpoint again un-marks the payment.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn toggle_share_endpoint(
    State(state): State<ToggleShareState>,
    Path((expense_id, member_id)): Path<(ExpenseId, MemberId)>,
) -> impl IntoResponse {
    let mut connection = state.db_connection.lock().unwrap();

    match toggle_share_paid(expense_id, member_id, &mut connection) {
        Ok(expense) => Json(json!({
            "message": "Payment status updated",
            "success": true,
            "expense": expense,
        }))
        .into_response(),
        Err(error) => error.into_response(),
    }
}
