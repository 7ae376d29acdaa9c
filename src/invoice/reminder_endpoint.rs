//! Defines the admin endpoint for sending a payment reminder.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, invoice::reminder::send_reminder, member::MemberId,
    notification::ReminderNotifier,
};

/// The state needed to send a reminder.
#[derive(Clone)]
pub struct SendReminderState {
    /// The database connection for reading expenses and members.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The collaborator that delivers the reminder.
    pub notifier: Arc<dyn ReminderNotifier>,
}

impl FromRef<AppState> for SendReminderState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            notifier: state.notifier.clone(),
        }
    }
}

/// The request body for sending a reminder.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderForm {
    /// The member to remind.
    pub member_id: MemberId,
}

/// A route handler that composes a payment reminder for a member and hands
/// it to the notification collaborator.
///
/// The delivery is attempted once; a failure is reported to the caller, not
/// retried.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn send_reminder_endpoint(
    State(state): State<SendReminderState>,
    Json(form): Json<ReminderForm>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match send_reminder(form.member_id, &connection, state.notifier.as_ref()) {
        Ok(_) => Json(json!({ "success": true, "message": "Reminder sent" })).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        expense::{Expense, SplitMember, create_expense},
        member::{MemberId, Role, create_member},
        notification::LoggingNotifier,
    };

    use super::{ReminderForm, SendReminderState, send_reminder_endpoint};

    fn get_test_state() -> (SendReminderState, MemberId) {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let asha = create_member("Asha", "asha@example.com", "555-0101", Role::Member, &conn)
            .unwrap()
            .id;
        let ben = create_member("Ben", "ben@example.com", "555-0202", Role::Member, &conn)
            .unwrap()
            .id;

        create_expense(
            Expense::build(
                "Groceries",
                50.0,
                "invoices/g.png",
                asha,
                vec![SplitMember {
                    member_id: ben,
                    name: "Ben".to_owned(),
                }],
            ),
            &mut conn,
        )
        .unwrap();

        let state = SendReminderState {
            db_connection: Arc::new(Mutex::new(conn)),
            notifier: Arc::new(LoggingNotifier),
        };

        (state, ben)
    }

    #[tokio::test]
    async fn reminder_for_member_with_dues_succeeds() {
        let (state, ben) = get_test_state();

        let response = send_reminder_endpoint(State(state), Json(ReminderForm { member_id: ben }))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn reminder_for_unknown_member_returns_not_found() {
        let (state, _) = get_test_state();

        let response = send_reminder_endpoint(
            State(state),
            Json(ReminderForm {
                member_id: MemberId::new(99),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reminder_without_dues_returns_bad_request() {
        let (state, _) = get_test_state();
        let asha = MemberId::new(1);

        let response = send_reminder_endpoint(State(state), Json(ReminderForm { member_id: asha }))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
