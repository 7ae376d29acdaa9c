//! Defines the admin endpoint for the all-members dues table.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error, dues::core::all_member_dues, expense::get_all_expenses,
    member::get_all_members,
};

/// The state needed to compute the dues table.
#[derive(Clone)]
pub struct DuesState {
    /// The database connection for reading expenses and members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DuesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that returns spent/owed/balance totals for every member
/// on the roster, including members with no activity.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn dues_endpoint(State(state): State<DuesState>) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    let dues = (|| -> Result<_, Error> {
        let members = get_all_members(&connection)?;
        let expenses = get_all_expenses(&connection)?;

        Ok(all_member_dues(&members, &expenses))
    })();

    match dues {
        Ok(dues) => Json(json!({ "success": true, "dues": dues })).into_response(),
        Err(error) => error.into_response(),
    }
}
