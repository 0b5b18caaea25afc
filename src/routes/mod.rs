use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{self, auth, clubs, notifications};

pub fn create_routes(state: handlers::AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/signup-admin", post(auth::sign_up_admin))
        .route("/auth/signin", post(auth::sign_in))
        .route("/auth/signout", post(auth::sign_out))
        .route("/clubs", get(clubs::list_clubs).post(clubs::create_club))
        .route("/clubs/:id", get(clubs::get_club))
        .route("/clubs/:id/stats", get(clubs::club_stats))
        .route(
            "/clubs/:id/events",
            get(clubs::list_events).post(clubs::create_event),
        )
        .route("/clubs/:id/follow", post(clubs::follow_club))
        .route("/clubs/:id/unfollow", post(clubs::unfollow_club))
        .route("/me/clubs", get(clubs::my_clubs))
        .route("/me/notifications", get(notifications::list))
        .route(
            "/me/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route(
            "/me/notifications/:id/read",
            post(notifications::mark_read),
        )
        .route(
            "/visited",
            get(handlers::visited).post(handlers::mark_visited),
        )
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
