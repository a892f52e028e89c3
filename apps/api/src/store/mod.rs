//! Account/Usage Store — row-level access to `user_tiers` and `generated_images`.
//!
//! The rows live in the hosted backend; this process only holds transient copies.
//! `AppState` carries an `Arc<dyn UsageStore>`, so the workflow and the history view
//! never see which backend is behind it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::usage::{GeneratedImage, NewGeneratedImage, UsageTier};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Reads the user's tier row, if the backend has provisioned one.
    async fn usage_tier(&self, user_id: Uuid) -> Result<Option<UsageTier>, sqlx::Error>;

    /// Overwrites the counter with a value computed by the caller.
    /// A user without a tier row is left untouched.
    async fn update_images_generated(
        &self,
        user_id: Uuid,
        images_generated: i32,
        updated_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>;

    async fn insert_generated_image(
        &self,
        image: NewGeneratedImage,
    ) -> Result<GeneratedImage, sqlx::Error>;

    /// All of a user's images, newest first.
    async fn list_generated_images(&self, user_id: Uuid)
        -> Result<Vec<GeneratedImage>, sqlx::Error>;
}
