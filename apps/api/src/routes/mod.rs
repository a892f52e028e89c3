pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::{gate, handlers as auth_handlers};
use crate::generation::handlers as generation_handlers;
use crate::history::handlers as history_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Screens behind the session gate: loading → 503, signed out → /auth
    let protected_screens = Router::new()
        .route("/", get(generation_handlers::handle_generator_screen))
        .route("/history", get(history_handlers::handle_history))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gate::require_session,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/auth", get(auth_handlers::handle_auth_screen))
        .route("/api/v1/session", get(auth_handlers::handle_session))
        .route("/api/v1/auth/signin", post(auth_handlers::handle_sign_in))
        .route("/api/v1/auth/signup", post(auth_handlers::handle_sign_up))
        .route("/api/v1/auth/signout", post(auth_handlers::handle_sign_out))
        // Generation (actions reject with 401 instead of redirecting)
        .route("/api/v1/generate", post(generation_handlers::handle_generate))
        .route("/api/v1/plans", get(generation_handlers::handle_plans))
        .route("/api/v1/upgrade", post(generation_handlers::handle_upgrade))
        .merge(protected_screens)
        .with_state(state)
}
