//! Defines the endpoint for posting a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    auth::Identity,
    expense::{Expense, SplitMember, core::create_expense},
};

/// The state needed to create an expense.
#[derive(Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for posting an expense.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseForm {
    /// What was bought.
    pub product_name: String,
    /// The total amount of the expense.
    pub amount: f64,
    /// Free-form detail about the expense.
    #[serde(default)]
    pub description: String,
    /// The reference to the uploaded invoice image.
    #[serde(default)]
    pub invoice_image: String,
    /// The members to split the expense among.
    #[serde(default)]
    pub split_with: Vec<SplitMember>,
}

/// A route handler for posting a new expense.
///
/// The caller becomes the expense's poster.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Extension(identity): Extension<Identity>,
    Json(form): Json<ExpenseForm>,
) -> impl IntoResponse {
    let builder = Expense::build(
        &form.product_name,
        form.amount,
        &form.invoice_image,
        identity.member_id,
        form.split_with,
    )
    .description(&form.description);

    let mut connection = state.db_connection.lock().unwrap();

    match create_expense(builder, &mut connection) {
        Ok(expense) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Expense posted successfully",
                "success": true,
                "expense": expense,
            })),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}
