use std::sync::Arc;

use crate::auth::AuthContext;
use crate::generation::usage_cache::UsageCache;
use crate::image_client::ImageGenerator;
use crate::store::UsageStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide session; resolved once at startup, torn down on sign-out.
    pub auth: Arc<AuthContext>,
    pub store: Arc<dyn UsageStore>,
    pub images: Arc<dyn ImageGenerator>,
    /// Usage tier of the signed-in user, cleared when the session ends.
    pub usage_cache: UsageCache,
}
