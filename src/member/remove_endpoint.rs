//! Defines the admin endpoint for removing a member from the household.
//!
//! Removing a member does not touch the expenses they appear in: split
//! entries keep their name snapshot, and the dues views fall back to
//! "Unknown" for the poster of an orphaned expense.

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
    member::core::{MemberId, delete_member},
};

/// The state needed to remove a member.
#[derive(Clone)]
pub struct RemoveMemberState {
    /// The database connection for managing members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RemoveMemberState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for removing a member.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn remove_member_endpoint(
    State(state): State<RemoveMemberState>,
    Path(member_id): Path<MemberId>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match delete_member(member_id, &connection) {
        Ok(()) => Json(json!({
            "message": "Member removed successfully",
            "success": true,
        }))
        .into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        member::{MemberId, Role, core::create_member},
    };

    use super::{RemoveMemberState, remove_member_endpoint};

    fn get_test_state() -> RemoveMemberState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        RemoveMemberState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn remove_member_deletes_roster_entry() {
        let state = get_test_state();
        let member = {
            let connection = state.db_connection.lock().unwrap();
            create_member("Asha", "asha@example.com", "555-0101", Role::Member, &connection)
                .unwrap()
        };

        let response = remove_member_endpoint(State(state), Path(member.id))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn remove_unknown_member_returns_not_found() {
        let state = get_test_state();

        let response = remove_member_endpoint(State(state), Path(MemberId::new(42)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
