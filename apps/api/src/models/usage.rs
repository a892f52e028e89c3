use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of `user_tiers`. One per user, provisioned by the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UsageTier {
    pub user_id: Uuid,
    pub is_premium: bool,
    pub images_generated: i32,
    pub updated_at: DateTime<Utc>,
}

/// Row of `generated_images`. Immutable once inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GeneratedImage {
    pub id: i64,
    pub user_id: Uuid,
    pub prompt: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `generated_images`; `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewGeneratedImage {
    pub user_id: Uuid,
    pub prompt: String,
    pub image_url: String,
}
