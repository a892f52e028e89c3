//! Fakes for the remote collaborators, shared by unit tests across modules.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::auth::provider::{AuthProvider, AuthServiceError, Session, SignUp};
use crate::auth::AuthContext;
use crate::generation::usage_cache::UsageCache;
use crate::image_client::{ImageApiError, ImageGenerator};
use crate::models::user::User;
use crate::state::AppState;
use crate::store::memory::MemoryStore;

pub const VALID_TOKEN: &str = "valid-token";
/// Token lookups with this token fail as if the service could not be reached.
pub const UNREACHABLE_TOKEN: &str = "unreachable-token";
/// Token lookups with this token fail with a server error.
pub const FLAKY_TOKEN: &str = "flaky-token";
pub const IMAGE_URL: &str = "https://images.example/coloring-page.png";

pub fn test_user() -> User {
    User {
        id: Uuid::from_u128(0x4f9c_0a52_8f0e_4d5f_9b39_0c1d_2e3f_4a5b),
        email: Some("kid@example.com".to_string()),
    }
}

pub fn other_user() -> User {
    User {
        id: Uuid::from_u128(0x1111_2222_3333_4444_5555_6666_7777_8888),
        email: Some("sibling@example.com".to_string()),
    }
}

/// Auth service stand-in. Password "wrong" is rejected; emails starting with
/// "confirm" sign up without a session; only `VALID_TOKEN` resolves to a user.
/// Token lookups can be held until the test releases them.
#[derive(Default)]
pub struct FakeAuth {
    fail_sign_out: AtomicBool,
    hold_lookups: AtomicBool,
    lookup_entered: Notify,
    lookup_released: Notify,
}

impl FakeAuth {
    pub fn session_for(&self, user: User) -> Session {
        Session {
            access_token: VALID_TOKEN.to_string(),
            refresh_token: Some("refresh".to_string()),
            user,
        }
    }

    pub fn fail_sign_out(&self) {
        self.fail_sign_out.store(true, Ordering::SeqCst);
    }

    pub fn hold_lookups(&self) {
        self.hold_lookups.store(true, Ordering::SeqCst);
    }

    pub async fn wait_for_lookup(&self) {
        self.lookup_entered.notified().await;
    }

    pub fn release_lookup(&self) {
        self.lookup_released.notify_one();
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn sign_in(&self, _email: &str, password: &str) -> Result<Session, AuthServiceError> {
        if password == "wrong" {
            return Err(AuthServiceError::Rejected {
                status: 400,
                message: "Invalid login credentials".to_string(),
            });
        }
        Ok(self.session_for(test_user()))
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<SignUp, AuthServiceError> {
        if email.starts_with("confirm") {
            return Ok(SignUp::ConfirmationPending(test_user()));
        }
        Ok(SignUp::Session(self.session_for(test_user())))
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), AuthServiceError> {
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(AuthServiceError::Rejected {
                status: 500,
                message: "Service unavailable".to_string(),
            });
        }
        Ok(())
    }

    async fn current_user(&self, access_token: &str) -> Result<User, AuthServiceError> {
        if self.hold_lookups.load(Ordering::SeqCst) {
            self.lookup_entered.notify_one();
            self.lookup_released.notified().await;
        }
        match access_token {
            VALID_TOKEN => Ok(test_user()),
            UNREACHABLE_TOKEN => Err(AuthServiceError::MalformedResponse(
                "connection reset".to_string(),
            )),
            FLAKY_TOKEN => Err(AuthServiceError::Rejected {
                status: 503,
                message: "Service unavailable".to_string(),
            }),
            _ => Err(AuthServiceError::Rejected {
                status: 401,
                message: "invalid JWT".to_string(),
            }),
        }
    }
}

/// Image API stand-in that records every prompt it receives.
#[derive(Default)]
pub struct FakeImages {
    prompts: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl FakeImages {
    pub fn failing() -> Self {
        let images = Self::default();
        images.fail.store(true, Ordering::SeqCst);
        images
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageGenerator for FakeImages {
    async fn generate(&self, prompt: &str) -> Result<String, ImageApiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(ImageApiError::Api {
                status: 500,
                message: "server error".to_string(),
            });
        }
        Ok(IMAGE_URL.to_string())
    }
}

pub fn test_state(store: Arc<MemoryStore>, images: Arc<FakeImages>) -> AppState {
    AppState {
        auth: Arc::new(AuthContext::new(Arc::new(FakeAuth::default()), None)),
        store,
        images,
        usage_cache: UsageCache::default(),
    }
}
