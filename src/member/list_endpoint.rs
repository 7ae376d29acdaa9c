//! Endpoints for reading the member roster.

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
    member::core::{MemberId, get_all_members, get_member},
};

/// The state needed to read members.
#[derive(Clone)]
pub struct MemberReadState {
    /// The database connection for reading members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for MemberReadState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that lists every member of the household.
///
/// Any authenticated caller may fetch the roster; it is needed to pick the
/// members of an expense split.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_members_endpoint(State(state): State<MemberReadState>) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match get_all_members(&connection) {
        Ok(members) => Json(json!({
            "success": true,
            "count": members.len(),
            "members": members,
        }))
        .into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler that returns a single member's details.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_member_endpoint(
    State(state): State<MemberReadState>,
    Path(member_id): Path<MemberId>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match get_member(member_id, &connection) {
        Ok(member) => Json(json!({ "success": true, "member": member })).into_response(),
        Err(error) => error.into_response(),
    }
}
