use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use crate::auth::AuthState;
use crate::models::usage::UsageTier;
use crate::store::UsageStore;

/// Process-wide copy of the signed-in user's usage tier.
///
/// The copy lives for one view of the generation screen: `refresh` reloads it
/// each time the screen is opened, and generations in between reuse it.
#[derive(Clone, Default)]
pub struct UsageCache {
    inner: Arc<RwLock<Option<UsageTier>>>,
}

impl UsageCache {
    /// Returns the cached tier for `user_id`, reading the store on a miss.
    /// A user without a tier row is not cached and is looked up again next time.
    pub async fn get_or_load(
        &self,
        user_id: Uuid,
        store: &dyn UsageStore,
    ) -> Result<Option<UsageTier>, sqlx::Error> {
        if let Some(tier) = self.inner.read().await.as_ref() {
            if tier.user_id == user_id {
                return Ok(Some(tier.clone()));
            }
        }

        let loaded = store.usage_tier(user_id).await?;
        if let Some(tier) = &loaded {
            *self.inner.write().await = Some(tier.clone());
        }
        Ok(loaded)
    }

    /// Reloads the tier from the store, replacing whatever was cached.
    pub async fn refresh(
        &self,
        user_id: Uuid,
        store: &dyn UsageStore,
    ) -> Result<Option<UsageTier>, sqlx::Error> {
        let loaded = store.usage_tier(user_id).await?;
        *self.inner.write().await = loaded.clone();
        Ok(loaded)
    }

    pub async fn set(&self, tier: UsageTier) {
        *self.inner.write().await = Some(tier);
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    /// Clears the cache every time the session ends.
    pub fn clear_on_sign_out(&self, mut auth: watch::Receiver<AuthState>) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            while auth.changed().await.is_ok() {
                let signed_out = {
                    let state = auth.borrow_and_update();
                    !state.loading && state.session.is_none()
                };
                if signed_out {
                    debug!("Session ended; clearing usage tier cache");
                    cache.clear().await;
                }
            }
        })
    }
}
