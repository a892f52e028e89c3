//! Hosted auth service client.
//!
//! `AuthContext` talks to the service only through the `AuthProvider` trait;
//! `SupabaseAuth` is the production implementation over its REST API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::user::User;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service refused the request; `message` is safe to show to the user.
    #[error("Auth service rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed auth response: {0}")]
    MalformedResponse(String),
}

/// A live session as issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

/// Sign-up either opens a session right away or waits on email confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUp {
    Session(Session),
    ConfirmationPending(User),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthServiceError>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, AuthServiceError>;
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthServiceError>;
    async fn current_user(&self, access_token: &str) -> Result<User, AuthServiceError>;
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(Session),
    User(User),
}

#[derive(Debug, Default, Deserialize)]
struct ServiceError {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Clone)]
pub struct SupabaseAuth {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(base_url: &str, anon_key: String) -> Result<Self, AuthServiceError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, AuthServiceError> {
        let response = request.header("apikey", &self.anon_key).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AuthServiceError::Rejected {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthServiceError> {
        let request = self
            .client
            .post(self.endpoint("token?grant_type=password"))
            .json(&Credentials { email, password });
        let session: Session = self.send(request).await?.json().await?;
        debug!("Signed in user {}", session.user.id);
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, AuthServiceError> {
        let request = self
            .client
            .post(self.endpoint("signup"))
            .json(&Credentials { email, password });
        let body = self.send(request).await?.text().await?;
        parse_sign_up(&body)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthServiceError> {
        let request = self
            .client
            .post(self.endpoint("logout"))
            .bearer_auth(access_token);
        self.send(request).await?;
        Ok(())
    }

    async fn current_user(&self, access_token: &str) -> Result<User, AuthServiceError> {
        let request = self.client.get(self.endpoint("user")).bearer_auth(access_token);
        Ok(self.send(request).await?.json().await?)
    }
}

fn parse_sign_up(body: &str) -> Result<SignUp, AuthServiceError> {
    match serde_json::from_str::<SignUpResponse>(body) {
        Ok(SignUpResponse::Session(session)) => Ok(SignUp::Session(session)),
        Ok(SignUpResponse::User(user)) => Ok(SignUp::ConfirmationPending(user)),
        Err(e) => Err(AuthServiceError::MalformedResponse(e.to_string())),
    }
}

/// Picks the human-readable message out of an auth service error body.
fn error_message(body: &str) -> String {
    let parsed: ServiceError = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .unwrap_or_else(|| "Authentication failed".to_string())
}
