//! Endpoints for reading expenses: the full list, a single expense, and the
//! caller's own expenses.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState,
    auth::Identity,
    expense::core::{ExpenseId, get_all_expenses, get_expense, get_member_expenses},
};

/// The state needed to read expenses.
#[derive(Clone)]
pub struct ExpenseReadState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseReadState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that lists every expense, newest first.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_expenses_endpoint(State(state): State<ExpenseReadState>) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match get_all_expenses(&connection) {
        Ok(expenses) => Json(json!({ "success": true, "expenses": expenses })).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler that returns a single expense with its split.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_expense_endpoint(
    State(state): State<ExpenseReadState>,
    Path(expense_id): Path<ExpenseId>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match get_expense(expense_id, &connection) {
        Ok(expense) => Json(json!({ "success": true, "expense": expense })).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler that returns the expenses the caller posted and the
/// expenses the caller appears in, newest first.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn my_expenses_endpoint(
    State(state): State<ExpenseReadState>,
    Extension(identity): Extension<Identity>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match get_member_expenses(identity.member_id, &connection) {
        Ok(expenses) => Json(json!({
            "success": true,
            "postedExpenses": expenses.posted_expenses,
            "sharedExpenses": expenses.shared_expenses,
        }))
        .into_response(),
        Err(error) => error.into_response(),
    }
}
