//! Route gating and the navigation chrome around protected screens.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::RETRY_AFTER, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::auth::AuthState;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

pub const SIGN_IN_PATH: &str = "/auth";
pub const SIGN_OUT_PATH: &str = "/api/v1/auth/signout";

/// Where a request for a protected route goes, given the current auth state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteGate {
    Resolving,
    Authenticated(User),
    Unauthenticated,
}

impl RouteGate {
    pub fn from_state(state: &AuthState) -> Self {
        if state.loading {
            return RouteGate::Resolving;
        }
        match state.user() {
            Some(user) => RouteGate::Authenticated(user.clone()),
            None => RouteGate::Unauthenticated,
        }
    }
}

/// Middleware for protected screens: waits out resolution, redirects anonymous
/// visitors to the sign-in screen, and hands the `User` to the handler.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match RouteGate::from_state(&state.auth.snapshot()) {
        RouteGate::Resolving => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(RETRY_AFTER, "1")],
            Json(json!({ "status": "loading" })),
        )
            .into_response(),
        RouteGate::Unauthenticated => {
            debug!("Redirecting {} to sign-in", request.uri().path());
            Redirect::to(SIGN_IN_PATH).into_response()
        }
        RouteGate::Authenticated(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
    }
}

/// Extractor for protected API actions. Rejects instead of redirecting.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match RouteGate::from_state(&state.auth.snapshot()) {
            RouteGate::Authenticated(user) => Ok(CurrentUser(user)),
            RouteGate::Resolving => Err(AppError::SessionResolving),
            RouteGate::Unauthenticated => Err(AppError::Unauthorized),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NavChrome {
    pub links: Vec<NavLink>,
    pub user: String,
    pub sign_out: &'static str,
}

impl NavChrome {
    pub fn for_user(user: &User) -> Self {
        Self {
            links: vec![
                NavLink {
                    label: "Generate",
                    href: "/",
                },
                NavLink {
                    label: "History",
                    href: "/history",
                },
            ],
            user: user.display_name().to_string(),
            sign_out: SIGN_OUT_PATH,
        }
    }
}

/// A protected screen: navigation chrome plus the screen's own content.
#[derive(Debug, Serialize)]
pub struct Shell<T> {
    pub nav: NavChrome,
    pub content: T,
}

impl<T> Shell<T> {
    pub fn new(user: &User, content: T) -> Self {
        Self {
            nav: NavChrome::for_user(user),
            content,
        }
    }
}
