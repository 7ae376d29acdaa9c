//! Defines the endpoint for the caller's spent/owed/balance summary.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, auth::Identity, dues::core::member_summary, expense::get_all_expenses,
};

/// The state needed to compute a member summary.
#[derive(Clone)]
pub struct SummaryState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that returns the caller's totals: spent, owed and balance.
///
/// A caller with no recorded activity gets a zeroed summary.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn summary_endpoint(
    State(state): State<SummaryState>,
    Extension(identity): Extension<Identity>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match get_all_expenses(&connection) {
        Ok(expenses) => {
            let summary = member_summary(identity.member_id, &expenses);

            Json(json!({ "success": true, "summary": summary })).into_response()
        }
        Err(error) => error.into_response(),
    }
}
