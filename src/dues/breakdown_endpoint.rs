//! Defines the endpoint listing the caller's unpaid shares.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error, auth::Identity, dues::core::pending_breakdown, expense::get_all_expenses,
    member::member_directory,
};

/// The state needed to compute a pending breakdown.
#[derive(Clone)]
pub struct BreakdownState {
    /// The database connection for reading expenses and members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BreakdownState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that lists every unpaid share of the caller, annotated
/// with the parent expense, plus the summed total to pay.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn breakdown_endpoint(
    State(state): State<BreakdownState>,
    Extension(identity): Extension<Identity>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    let pending = (|| -> Result<_, Error> {
        let expenses = get_all_expenses(&connection)?;
        let names = member_directory(&connection)?
            .into_iter()
            .map(|(id, member)| (id, member.name))
            .collect();

        Ok(pending_breakdown(identity.member_id, &expenses, &names))
    })();

    match pending {
        Ok(pending) => Json(json!({
            "success": true,
            "totalToPay": pending.total_to_pay,
            "breakdown": pending.breakdown,
        }))
        .into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{
        auth::Identity,
        db::initialize,
        member::{MemberId, Role},
    };

    use super::{BreakdownState, breakdown_endpoint};

    #[tokio::test]
    async fn breakdown_returns_ok_with_no_activity() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let state = BreakdownState {
            db_connection: Arc::new(Mutex::new(conn)),
        };
        let identity = Identity {
            member_id: MemberId::new(1),
            role: Role::Member,
        };

        let response = breakdown_endpoint(State(state), Extension(identity))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
