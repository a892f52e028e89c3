//! In-memory `UsageStore` used by tests. Records how often each operation ran
//! and can be told to fail one of them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::models::usage::{GeneratedImage, NewGeneratedImage, UsageTier};
use crate::store::UsageStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Read,
    Update,
    Insert,
}

#[derive(Default)]
pub struct MemoryStore {
    tiers: Mutex<Vec<UsageTier>>,
    images: Mutex<Vec<GeneratedImage>>,
    fail_on: Mutex<Option<FailOn>>,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tier(self, user_id: Uuid, is_premium: bool, images_generated: i32) -> Self {
        self.tiers.lock().unwrap().push(UsageTier {
            user_id,
            is_premium,
            images_generated,
            updated_at: epoch(),
        });
        self
    }

    /// Changes a tier row behind the application's back.
    pub fn set_tier(&self, user_id: Uuid, is_premium: bool, images_generated: i32) {
        let mut tiers = self.tiers.lock().unwrap();
        if let Some(tier) = tiers.iter_mut().find(|t| t.user_id == user_id) {
            tier.is_premium = is_premium;
            tier.images_generated = images_generated;
        }
    }

    pub fn fail_on(&self, op: FailOn) {
        *self.fail_on.lock().unwrap() = Some(op);
    }

    pub fn tier(&self, user_id: Uuid) -> Option<UsageTier> {
        self.tiers
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.user_id == user_id)
            .cloned()
    }

    pub fn images_for(&self, user_id: Uuid) -> Vec<GeneratedImage> {
        self.images
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn image_count(&self) -> usize {
        self.images.lock().unwrap().len()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self, op: FailOn) -> Result<(), sqlx::Error> {
        if *self.fail_on.lock().unwrap() == Some(op) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

#[async_trait]
impl UsageStore for MemoryStore {
    async fn usage_tier(&self, user_id: Uuid) -> Result<Option<UsageTier>, sqlx::Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check(FailOn::Read)?;
        Ok(self.tier(user_id))
    }

    async fn update_images_generated(
        &self,
        user_id: Uuid,
        images_generated: i32,
        updated_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check(FailOn::Update)?;
        let mut tiers = self.tiers.lock().unwrap();
        if let Some(tier) = tiers.iter_mut().find(|t| t.user_id == user_id) {
            tier.images_generated = images_generated;
            tier.updated_at = updated_at;
        }
        Ok(())
    }

    async fn insert_generated_image(
        &self,
        image: NewGeneratedImage,
    ) -> Result<GeneratedImage, sqlx::Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check(FailOn::Insert)?;
        let mut images = self.images.lock().unwrap();
        let id = images.len() as i64 + 1;
        // Strictly increasing timestamps so ordering is deterministic.
        let row = GeneratedImage {
            id,
            user_id: image.user_id,
            prompt: image.prompt,
            image_url: image.image_url,
            created_at: epoch() + Duration::minutes(id),
        };
        images.push(row.clone());
        Ok(row)
    }

    async fn list_generated_images(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<GeneratedImage>, sqlx::Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check(FailOn::Read)?;
        let mut rows = self.images_for(user_id);
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}
