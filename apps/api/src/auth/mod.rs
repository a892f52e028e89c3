//! Authentication Context — process-wide session state.
//!
//! Starts out `loading` until `resolve()` has looked up the persisted session,
//! then tracks sign-in and sign-out for the rest of the process. Consumers that
//! need to react to changes hold a `watch::Receiver` from `subscribe()`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, OnceCell};
use tracing::{info, warn};

use crate::models::user::User;

pub mod gate;
pub mod handlers;
pub mod provider;
pub mod session_file;

use provider::{AuthProvider, AuthServiceError, Session, SignUp};
use session_file::SessionFile;

/// Snapshot of the auth state published to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub session: Option<Session>,
    pub loading: bool,
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }
}

pub struct AuthContext {
    provider: Arc<dyn AuthProvider>,
    session_file: Option<SessionFile>,
    state: watch::Sender<AuthState>,
    resolved: OnceCell<()>,
    /// Set once the user has signed in or out; a restored session must not override that.
    superseded: AtomicBool,
}

impl AuthContext {
    pub fn new(provider: Arc<dyn AuthProvider>, session_file: Option<SessionFile>) -> Self {
        let (state, _) = watch::channel(AuthState {
            session: None,
            loading: true,
        });
        Self {
            provider,
            session_file,
            state,
            resolved: OnceCell::new(),
            superseded: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Resolves the persisted session and clears `loading`.
    /// Runs once per process; concurrent and later calls wait for or skip it.
    pub async fn resolve(&self) {
        self.resolved
            .get_or_init(|| async {
                let restored = self.restore_session().await;
                match &restored {
                    Some(session) => info!("Restored session for user {}", session.user.id),
                    None => info!("No active session"),
                }
                // A sign-in or sign-out that raced ahead of resolution wins.
                let superseded = self.superseded.load(Ordering::SeqCst);
                self.state.send_modify(|state| {
                    if !superseded {
                        state.session = restored;
                    }
                    state.loading = false;
                });
            })
            .await;
    }

    async fn restore_session(&self) -> Option<Session> {
        let file = self.session_file.as_ref()?;
        let saved = match file.load().await {
            Ok(saved) => saved?,
            Err(e) => {
                warn!("Could not load saved session: {e:?}");
                return None;
            }
        };

        match self.provider.current_user(&saved.access_token).await {
            Ok(user) => Some(Session { user, ..saved }),
            Err(AuthServiceError::Rejected {
                status: 401 | 403,
                message,
            }) => {
                warn!("Discarding expired saved session: {message}");
                self.forget_session().await;
                None
            }
            Err(e) => {
                // Keep the file so the next start can try again.
                warn!("Could not validate saved session: {e}");
                None
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthServiceError> {
        let session = self.provider.sign_in(email, password).await?;
        let user = session.user.clone();
        self.open_session(session).await;
        info!("User {} signed in", user.id);
        Ok(user)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, AuthServiceError> {
        let outcome = self.provider.sign_up(email, password).await?;
        match &outcome {
            SignUp::Session(session) => {
                info!("User {} signed up", session.user.id);
                self.open_session(session.clone()).await;
            }
            SignUp::ConfirmationPending(user) => {
                info!("User {} signed up, awaiting email confirmation", user.id);
            }
        }
        Ok(outcome)
    }

    /// Ends the session. Local state is cleared even when the service call fails;
    /// the service's error is still returned.
    pub async fn sign_out(&self) -> Result<(), AuthServiceError> {
        let Some(session) = self.snapshot().session else {
            return Ok(());
        };

        self.superseded.store(true, Ordering::SeqCst);
        let result = self.provider.sign_out(&session.access_token).await;
        self.state.send_modify(|state| state.session = None);
        self.forget_session().await;
        info!("User {} signed out", session.user.id);
        result
    }

    async fn open_session(&self, session: Session) {
        self.superseded.store(true, Ordering::SeqCst);
        if let Some(file) = &self.session_file {
            if let Err(e) = file.save(&session).await {
                warn!("Could not persist session: {e:?}");
            }
        }
        self.state.send_modify(|state| state.session = Some(session));
    }

    async fn forget_session(&self) {
        if let Some(file) = &self.session_file {
            if let Err(e) = file.clear().await {
                warn!("Could not remove saved session: {e:?}");
            }
        }
    }
}
