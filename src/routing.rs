//! Application router configuration with member and admin route definitions.

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::{
    AppState,
    auth::{admin_guard, identity_guard},
    dues::{breakdown_endpoint, dues_endpoint, summary_endpoint},
    endpoints,
    expense::{
        create_expense_endpoint, get_expense_endpoint, list_expenses_endpoint,
        my_expenses_endpoint, toggle_share_endpoint,
    },
    invoice::{list_invoices_endpoint, send_reminder_endpoint},
    logging::logging_middleware,
    member::{
        add_member_endpoint, get_member_endpoint, list_members_endpoint, remove_member_endpoint,
        stats_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Every route requires a caller identity; the `/api/admin` routes and the
/// member management writes additionally require the admin role.
pub fn build_router(state: AppState) -> Router {
    let member_routes = Router::new()
        .route(endpoints::MEMBERS, get(list_members_endpoint))
        .route(endpoints::MEMBER, get(get_member_endpoint))
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(endpoints::MY_EXPENSES, get(my_expenses_endpoint))
        .route(endpoints::EXPENSE_SUMMARY, get(summary_endpoint))
        .route(endpoints::PENDING_SHARES, get(breakdown_endpoint))
        .route(endpoints::EXPENSE, get(get_expense_endpoint))
        .route(endpoints::TOGGLE_SHARE, post(toggle_share_endpoint));

    let admin_routes = Router::new()
        .route(endpoints::MEMBERS, post(add_member_endpoint))
        .route(endpoints::MEMBER, delete(remove_member_endpoint))
        .route(endpoints::ADMIN_DUES, get(dues_endpoint))
        .route(endpoints::ADMIN_INVOICES, get(list_invoices_endpoint))
        .route(endpoints::ADMIN_REMINDERS, post(send_reminder_endpoint))
        .route(endpoints::ADMIN_STATS, get(stats_endpoint))
        .layer(middleware::from_fn(admin_guard));

    member_routes
        .merge(admin_routes)
        .layer(middleware::from_fn(identity_guard))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
