use axum::{
    Router,
    routing::{get, patch, post},
};
use tower::ServiceBuilder;

use roofline_core::health::{healthz, readyz, route_not_found};
use roofline_core::middleware::{http_trace_layer, propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    account::{delete_account, get_account, list_accounts, set_account_status},
    activity::list_activity,
    agreement::{list_agreements, update_payment},
    auth::{login, me},
    dashboard::dashboard_stats,
    employee::{create_employee, list_employees, set_employee_status, update_permissions},
    property::{delete_property, get_property, list_properties, set_availability},
    verification::{
        assign_verification, list_verifications, review_verification, verification_stats,
    },
};
use crate::state::AppState;

fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        // Staff (MAIN_ADMIN)
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/{id}/permissions", patch(update_permissions))
        .route("/employees/{id}/status", patch(set_employee_status))
        // Verification queue
        .route("/verifications", get(list_verifications))
        .route("/verifications/stats", get(verification_stats))
        .route("/verifications/{id}/assign", post(assign_verification))
        .route("/verifications/{id}/review", post(review_verification))
        // Accounts
        .route("/accounts", get(list_accounts))
        .route("/accounts/{id}", get(get_account).delete(delete_account))
        .route("/accounts/{id}/status", patch(set_account_status))
        // Listings
        .route("/properties", get(list_properties))
        .route("/properties/{id}", get(get_property).delete(delete_property))
        .route("/properties/{id}/availability", patch(set_availability))
        // Rent agreements
        .route("/rent-agreements", get(list_agreements))
        .route("/rent-agreements/{id}/payment", patch(update_payment))
        // Reporting
        .route("/dashboard/stats", get(dashboard_stats))
        .route("/activity-logs", get(list_activity))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest("/api/admin", api_routes())
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(http_trace_layer())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
