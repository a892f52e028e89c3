//! History View: a user's past generations, newest first. Read-only, no paging.

use tracing::debug;

use crate::errors::AppError;
use crate::models::usage::GeneratedImage;
use crate::models::user::User;
use crate::store::UsageStore;

pub mod handlers;

pub async fn list_history(
    store: &dyn UsageStore,
    user: &User,
) -> Result<Vec<GeneratedImage>, AppError> {
    let images = store.list_generated_images(user.id).await?;
    debug!("Loaded {} history entries for user {}", images.len(), user.id);
    Ok(images)
}
