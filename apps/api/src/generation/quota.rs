use serde::Serialize;

use crate::models::usage::UsageTier;

/// Lifetime generations allowed to a non-premium user.
pub const FREE_TIER_LIMIT: i32 = 5;

/// True when the tier blocks another generation. No tier row means no gate.
pub fn is_gated(tier: Option<&UsageTier>) -> bool {
    matches!(tier, Some(t) if !t.is_premium && t.images_generated >= FREE_TIER_LIMIT)
}

/// Usage summary shown on the generation screen and with a rejected generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaStatus {
    pub is_premium: bool,
    pub images_generated: i32,
    pub limit: i32,
    /// `None` when the user is not limited.
    pub remaining: Option<i32>,
    pub can_generate: bool,
}

impl QuotaStatus {
    pub fn from_tier(tier: Option<&UsageTier>) -> Self {
        let is_premium = tier.is_some_and(|t| t.is_premium);
        let images_generated = tier.map_or(0, |t| t.images_generated);
        let remaining = match tier {
            Some(t) if !t.is_premium => Some((FREE_TIER_LIMIT - t.images_generated).max(0)),
            _ => None,
        };
        Self {
            is_premium,
            images_generated,
            limit: FREE_TIER_LIMIT,
            remaining,
            can_generate: !is_gated(tier),
        }
    }
}
