//! Generation Workflow — quota gate, prompt expansion, image call, usage recording.
//!
//! Flow: usage tier (cached) → gate → expand prompt → image API →
//!       counter update → history insert → return.
//!
//! The gate runs before the image API is called. The two store writes are
//! independent calls with no transaction around them: if the insert fails after
//! the counter moved, the counter stays ahead of the history. A failed write
//! still hands the image URL back inside the error.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::prompts::{expand_prompt, Complexity};
use crate::generation::quota::{is_gated, QuotaStatus};
use crate::generation::usage_cache::UsageCache;
use crate::image_client::ImageGenerator;
use crate::models::usage::{GeneratedImage, NewGeneratedImage, UsageTier};
use crate::models::user::User;
use crate::store::UsageStore;

/// A finished generation as shown to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    /// The expanded prompt actually sent to the image API.
    pub prompt: String,
    pub image_url: String,
    /// The stored history row; absent for anonymous generations.
    pub record: Option<GeneratedImage>,
}

#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    Generated(Generation),
    /// Free-tier limit reached; nothing was called or written.
    GateRejected(QuotaStatus),
}

pub struct GenerationWorkflow<'a> {
    pub store: &'a dyn UsageStore,
    pub images: &'a dyn ImageGenerator,
    pub cache: &'a UsageCache,
}

impl GenerationWorkflow<'_> {
    pub async fn generate(
        &self,
        user: Option<&User>,
        prompt: &str,
        complexity: Complexity,
    ) -> Result<GenerationOutcome, AppError> {
        if prompt.trim().is_empty() {
            return Err(AppError::Validation("Please enter a prompt".to_string()));
        }

        // Step 1: usage tier, signed-in users only
        let tier = match user {
            Some(user) => self.cache.get_or_load(user.id, self.store).await?,
            None => None,
        };

        // Step 2: gate before spending an image call
        if is_gated(tier.as_ref()) {
            if let Some(user) = user {
                info!("User {} reached the free-tier limit", user.id);
            }
            return Ok(GenerationOutcome::GateRejected(QuotaStatus::from_tier(
                tier.as_ref(),
            )));
        }

        // Step 3 + 4: expand and call the image API
        let expanded = expand_prompt(prompt, complexity);
        let image_url = self.images.generate(&expanded).await?;

        // Step 5: record usage and history
        let record = match user {
            Some(user) => Some(
                self.record(user, tier, &expanded, &image_url)
                    .await
                    .map_err(|source| AppError::RecordFailed {
                        image_url: image_url.clone(),
                        source,
                    })?,
            ),
            None => None,
        };

        Ok(GenerationOutcome::Generated(Generation {
            prompt: expanded,
            image_url,
            record,
        }))
    }

    async fn record(
        &self,
        user: &User,
        tier: Option<UsageTier>,
        prompt: &str,
        image_url: &str,
    ) -> Result<GeneratedImage, sqlx::Error> {
        match tier {
            Some(tier) => {
                // The counter moves for premium users too; only the gate looks at the tier.
                let updated = UsageTier {
                    images_generated: tier.images_generated.saturating_add(1),
                    updated_at: Utc::now(),
                    ..tier
                };
                self.store
                    .update_images_generated(user.id, updated.images_generated, updated.updated_at)
                    .await?;
                self.cache.set(updated).await;
            }
            None => warn!("User {} has no usage tier; counter not updated", user.id),
        }

        let row = self
            .store
            .insert_generated_image(NewGeneratedImage {
                user_id: user.id,
                prompt: prompt.to_string(),
                image_url: image_url.to_string(),
            })
            .await?;

        info!("Generated image {} for user {}", row.id, user.id);
        Ok(row)
    }
}
