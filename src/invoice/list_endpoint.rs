//! Defines the admin endpoint for the invoice listing.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error, expense::get_all_expenses, invoice::core::invoice_rows,
    member::member_directory,
};

/// The state needed to list invoices.
#[derive(Clone)]
pub struct InvoiceListState {
    /// The database connection for reading expenses and members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for InvoiceListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that returns one invoice row per split entry, newest
/// expense first.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_invoices_endpoint(State(state): State<InvoiceListState>) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    let invoices = (|| -> Result<_, Error> {
        let expenses = get_all_expenses(&connection)?;
        let directory = member_directory(&connection)?;

        Ok(invoice_rows(&expenses, &directory))
    })();

    match invoices {
        Ok(invoices) => Json(json!({ "success": true, "invoices": invoices })).into_response(),
        Err(error) => error.into_response(),
    }
}
