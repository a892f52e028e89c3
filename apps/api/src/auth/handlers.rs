use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::gate::{CurrentUser, SIGN_IN_PATH};
use crate::auth::provider::SignUp;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    fn validate(&self) -> Result<(), AppError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::Validation(
                "Please fill in all fields".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub redirect_to: &'static str,
    pub confirmation_required: bool,
}

#[derive(Debug, Serialize)]
pub struct SignOutResponse {
    pub redirect_to: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: Option<User>,
    pub loading: bool,
}

#[derive(Debug, Serialize)]
pub struct AuthAction {
    pub label: &'static str,
    pub method: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AuthScreen {
    pub fields: [&'static str; 2],
    pub actions: [AuthAction; 2],
}

/// GET /auth
pub async fn handle_auth_screen() -> Json<AuthScreen> {
    Json(AuthScreen {
        fields: ["email", "password"],
        actions: [
            AuthAction {
                label: "Sign In",
                method: "POST",
                href: "/api/v1/auth/signin",
            },
            AuthAction {
                label: "Sign Up",
                method: "POST",
                href: "/api/v1/auth/signup",
            },
        ],
    })
}

/// GET /api/v1/session
pub async fn handle_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let snapshot = state.auth.snapshot();
    Json(SessionResponse {
        user: snapshot.user().cloned(),
        loading: snapshot.loading,
    })
}

/// POST /api/v1/auth/signin
pub async fn handle_sign_in(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<AuthResponse>, AppError> {
    credentials.validate()?;
    let user = state
        .auth
        .sign_in(credentials.email.trim(), &credentials.password)
        .await?;
    Ok(Json(AuthResponse {
        user,
        redirect_to: "/",
        confirmation_required: false,
    }))
}

/// POST /api/v1/auth/signup
///
/// Sends the client home either way; without a session the gate bounces it back
/// to the sign-in screen until the email is confirmed.
pub async fn handle_sign_up(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<AuthResponse>, AppError> {
    credentials.validate()?;
    let outcome = state
        .auth
        .sign_up(credentials.email.trim(), &credentials.password)
        .await?;
    let (user, confirmation_required) = match outcome {
        SignUp::Session(session) => (session.user, false),
        SignUp::ConfirmationPending(user) => (user, true),
    };
    Ok(Json(AuthResponse {
        user,
        redirect_to: "/",
        confirmation_required,
    }))
}

/// POST /api/v1/auth/signout
pub async fn handle_sign_out(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<SignOutResponse>, AppError> {
    state.auth.sign_out().await?;
    Ok(Json(SignOutResponse {
        redirect_to: SIGN_IN_PATH,
    }))
}
