use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{admin, auth, customer, staff};
use crate::middleware::auth::{auth_middleware, require_admin, require_customer, require_staff};
use crate::middleware::rate_limit::create_public_governor;
use crate::middleware::role_rate_limit::{create_role_governor, RateLimitedRole};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Role-specific governor layers (per user id)
    let staff_governor = create_role_governor(RateLimitedRole::Staff);
    let customer_governor = create_role_governor(RateLimitedRole::Customer);
    // IP-based governor for public routes
    let public_governor = create_public_governor();

    // Public auth routes
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(public_governor.clone());

    // Public catalog and joinable-trip routes
    let public_routes = Router::new()
        .route("/itineraries", get(customer::list_itineraries))
        .route("/itineraries/{id}", get(customer::get_itinerary))
        .route("/trips/joinable", get(customer::joinable_trips))
        .route("/trips/quote", post(customer::price_quote))
        .route("/discounts/validate", get(customer::validate_discount))
        .layer(public_governor);

    // Customer routes (requires auth + customer role)
    let customer_routes = Router::new()
        .route("/", post(customer::create_trip))
        .route("/", get(customer::my_trips))
        .route("/{id}/join", post(customer::join_trip))
        .route("/{id}/proof", post(customer::upload_proof))
        .layer(customer_governor)
        .layer(middleware::from_fn(require_customer))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Staff routes (requires auth + staff or admin role)
    let staff_routes = Router::new()
        .route("/payments/pending-proof", get(staff::pending_proof_payments))
        .route("/payments/not-paid", get(staff::not_paid_payments))
        .route("/trips", get(staff::list_trips))
        .route("/trips/{id}/confirm", post(staff::confirm_payment))
        .route("/trips/{id}/cancel", post(staff::cancel_payment))
        .route("/trips/{id}/handover", put(staff::update_handover))
        .layer(staff_governor)
        .layer(middleware::from_fn(require_staff))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Admin routes (requires auth + admin role)
    let admin_routes = Router::new()
        // Itinerary catalog
        .route("/itineraries", post(admin::create_itinerary))
        .route("/itineraries/{id}", put(admin::update_itinerary))
        .route("/itineraries/{id}", delete(admin::delete_itinerary))
        // District surcharges
        .route("/surcharges", get(admin::list_surcharges))
        .route("/surcharges", post(admin::create_surcharge))
        .route("/surcharges/{id}", put(admin::update_surcharge))
        .route("/surcharges/{id}", delete(admin::delete_surcharge))
        // Additional services
        .route("/services", get(admin::list_services))
        .route("/services", post(admin::create_service))
        .route("/services/{id}", put(admin::update_service))
        .route("/services/{id}", delete(admin::delete_service))
        // Discount codes
        .route("/discounts", get(admin::list_discounts))
        .route("/discounts", post(admin::create_discount))
        .route("/discounts/{id}", put(admin::update_discount))
        .route("/discounts/{id}", delete(admin::delete_discount))
        // Trip oversight
        .route("/trips/{id}/revert", post(admin::revert_payment))
        .route("/trips/{id}", delete(admin::delete_trip))
        // User management
        .route("/users", get(admin::list_all_users))
        .route("/users/{id}/role", put(admin::update_user_role))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", public_routes)
        .nest("/api/trips", customer_routes)
        .nest("/api/staff", staff_routes)
        .nest("/api/admin", admin_routes)
        .with_state(state)
}
