//! Defines the admin endpoint for adding a member to the household.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    member::core::{Role, create_member},
};

/// The state needed to add a member.
#[derive(Clone)]
pub struct AddMemberState {
    /// The database connection for managing members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AddMemberState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for adding a member.
#[derive(Debug, Deserialize)]
pub struct MemberForm {
    /// The member's display name.
    #[serde(default)]
    pub name: String,
    /// The member's email address.
    #[serde(default)]
    pub email: String,
    /// The member's phone number.
    #[serde(default)]
    pub phone: String,
}

/// A route handler for adding a member with the `member` role.
///
/// Account credentials are provisioned separately by the authentication
/// layer; this only creates the roster entry.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn add_member_endpoint(
    State(state): State<AddMemberState>,
    Json(form): Json<MemberForm>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match create_member(&form.name, &form.email, &form.phone, Role::Member, &connection) {
        Ok(member) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Member added successfully",
                "success": true,
                "member": member,
            })),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}
