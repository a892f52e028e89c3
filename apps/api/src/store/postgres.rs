use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::usage::{GeneratedImage, NewGeneratedImage, UsageTier};
use crate::store::UsageStore;

/// `UsageStore` backed by the hosted Postgres database.
#[derive(Clone)]
pub struct PgUsageStore {
    pool: PgPool,
}

impl PgUsageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageStore for PgUsageStore {
    async fn usage_tier(&self, user_id: Uuid) -> Result<Option<UsageTier>, sqlx::Error> {
        sqlx::query_as::<_, UsageTier>(
            "SELECT user_id, is_premium, images_generated, updated_at FROM user_tiers WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_images_generated(
        &self,
        user_id: Uuid,
        images_generated: i32,
        updated_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_tiers SET images_generated = $1, updated_at = $2 WHERE user_id = $3",
        )
        .bind(images_generated)
        .bind(updated_at)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            warn!("No user_tiers row for user {user_id}; usage counter not updated");
        }
        Ok(())
    }

    async fn insert_generated_image(
        &self,
        image: NewGeneratedImage,
    ) -> Result<GeneratedImage, sqlx::Error> {
        let row = sqlx::query_as::<_, GeneratedImage>(
            r#"
            INSERT INTO generated_images (user_id, prompt, image_url)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, prompt, image_url, created_at
            "#,
        )
        .bind(image.user_id)
        .bind(&image.prompt)
        .bind(&image.image_url)
        .fetch_one(&self.pool)
        .await?;

        info!("Recorded generated image {} for user {}", row.id, row.user_id);
        Ok(row)
    }

    async fn list_generated_images(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<GeneratedImage>, sqlx::Error> {
        sqlx::query_as::<_, GeneratedImage>(
            r#"
            SELECT id, user_id, prompt, image_url, created_at
            FROM generated_images
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
