use axum::{
    Extension, Router,
    routing::{delete, get, patch, post, put},
};
use tower::ServiceBuilder;

use roofline_core::health::{healthz, readyz, route_not_found};
use roofline_core::middleware::{http_trace_layer, propagate_request_id_layer, request_id_layer};
use roofline_domain::account::AccountRole;

use crate::handlers::{
    account::{
        forgot_password, get_profile, login, resend_otp, reset_password, signup, update_profile,
        verify_otp,
    },
    agreement::{
        create_agreement, download_agreement, get_agreement, list_agreements,
        mark_document_generated, update_payment,
    },
    contact::{contact_owner, delete_lead, delete_my_contact, leads, my_contacts},
    mobile,
    property::{
        create_property, delete_property, get_property, my_properties, publish_property,
        toggle_availability, update_images, update_property,
    },
    search::{available_areas, filter_options, get_public_property, near_me, search_properties},
    verification::{
        capture_location, complete_payment, initiate, list_requests, photo_upload_urls, status,
    },
    wishlist::{add_to_wishlist, list_wishlist, remove_from_wishlist},
};
use crate::state::AppState;

/// Signup, OTP, login and profile routes for one account role.
fn account_auth_routes(role: AccountRole) -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/verify-otp", post(verify_otp))
        .route("/resend-otp", post(resend_otp))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/profile", get(get_profile).put(update_profile))
        .layer(Extension(role))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Accounts
        .nest("/user/auth", account_auth_routes(AccountRole::User))
        .nest("/owner/auth", account_auth_routes(AccountRole::Owner))
        // Contact-number verification
        .route("/mobile/send-otp", post(mobile::send_otp))
        .route("/mobile/verify-otp", post(mobile::verify_otp))
        // Owner listings
        .route("/owner/property/create", post(create_property))
        .route("/owner/property/my-properties", get(my_properties))
        .route(
            "/owner/property/{id}",
            get(get_property).delete(delete_property),
        )
        .route(
            "/owner/property/toggle-availability/{id}",
            patch(toggle_availability),
        )
        .route("/owner/property/update-property/{id}", put(update_property))
        .route("/owner/property/update-images/{id}", put(update_images))
        .route("/owner/property/publish/{id}", patch(publish_property))
        // Public search
        .route("/search/property", get(search_properties))
        .route("/search/property/{id}", get(get_public_property))
        .route("/search/near-me", get(near_me))
        .route("/search/filters", get(filter_options))
        .route("/search/available-areas", get(available_areas))
        // Verification (owner side)
        .route("/verification/initiate", post(initiate))
        .route("/verification/payment/complete", post(complete_payment))
        .route("/verification/capture-location", post(capture_location))
        .route("/verification/photo-upload-urls", post(photo_upload_urls))
        .route("/verification/status/{property_id}", get(status))
        .route("/verification/requests", get(list_requests))
        // Contacts and leads
        .route("/user/contacts", post(contact_owner).get(my_contacts))
        .route("/user/contacts/{id}", delete(delete_my_contact))
        .route("/owner/leads", get(leads))
        .route("/owner/leads/{id}", delete(delete_lead))
        // Wishlist
        .route("/user/wishlist", get(list_wishlist).post(add_to_wishlist))
        .route("/user/wishlist/{property_id}", delete(remove_from_wishlist))
        // Rent agreements
        .route("/rent-agreements", post(create_agreement).get(list_agreements))
        .route("/rent-agreements/{id}", get(get_agreement))
        .route("/rent-agreements/{id}/download", get(download_agreement))
        .route("/rent-agreements/{id}/payment", patch(update_payment))
        .route("/rent-agreements/{id}/document", patch(mark_document_generated))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest("/api/v1", api_routes())
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(http_trace_layer())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
