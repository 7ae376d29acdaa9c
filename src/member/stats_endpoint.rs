//! Defines the admin endpoint for basic household statistics.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, member::core::count_members};

/// The state needed to compute admin statistics.
#[derive(Clone)]
pub struct StatsState {
    /// The database connection for reading members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for StatsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that returns the member count for the admin dashboard.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn stats_endpoint(State(state): State<StatsState>) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match count_members(&connection) {
        Ok(total_members) => Json(json!({
            "success": true,
            "stats": { "totalMembers": total_members },
        }))
        .into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::db::initialize;

    use super::{StatsState, stats_endpoint};

    #[tokio::test]
    async fn stats_returns_ok() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let state = StatsState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = stats_endpoint(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
