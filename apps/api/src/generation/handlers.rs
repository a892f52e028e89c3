//! Axum route handlers for the generation screen and its actions.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::auth::gate::{CurrentUser, Shell};
use crate::errors::AppError;
use crate::generation::pricing::{plans, upgrade_notice, Notice, Plan, PlanKind};
use crate::generation::prompts::Complexity;
use crate::generation::quota::QuotaStatus;
use crate::generation::workflow::{Generation, GenerationOutcome, GenerationWorkflow};
use crate::models::user::User;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub complexity: Complexity,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GenerateResponse {
    Generated {
        #[serde(flatten)]
        generation: Generation,
    },
    QuotaExceeded {
        quota: QuotaStatus,
        plans: Vec<Plan>,
    },
}

#[derive(Debug, Serialize)]
pub struct ComplexityOption {
    pub value: Complexity,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct GeneratorScreen {
    pub complexity_options: Vec<ComplexityOption>,
    pub quota: QuotaStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpgradeRequest {
    pub plan: PlanKind,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
///
/// Generation form: complexity choices plus the user's remaining quota.
/// Reloads the usage tier from the store.
pub async fn handle_generator_screen(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Shell<GeneratorScreen>>, AppError> {
    // Each visit to the screen starts a new view of the tier.
    let tier = state
        .usage_cache
        .refresh(user.id, state.store.as_ref())
        .await?;

    let screen = GeneratorScreen {
        complexity_options: Complexity::ALL
            .into_iter()
            .map(|value| ComplexityOption {
                value,
                label: value.label(),
            })
            .collect(),
        quota: QuotaStatus::from_tier(tier.as_ref()),
    };

    Ok(Json(Shell::new(&user, screen)))
}

/// POST /api/v1/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let workflow = GenerationWorkflow {
        store: state.store.as_ref(),
        images: state.images.as_ref(),
        cache: &state.usage_cache,
    };

    let response = match workflow
        .generate(Some(&user), &request.prompt, request.complexity)
        .await?
    {
        GenerationOutcome::Generated(generation) => GenerateResponse::Generated { generation },
        GenerationOutcome::GateRejected(quota) => GenerateResponse::QuotaExceeded {
            quota,
            plans: plans(),
        },
    };

    Ok(Json(response))
}

/// GET /api/v1/plans
pub async fn handle_plans(CurrentUser(_user): CurrentUser) -> Json<Vec<Plan>> {
    Json(plans())
}

/// POST /api/v1/upgrade
pub async fn handle_upgrade(
    CurrentUser(_user): CurrentUser,
    Json(request): Json<UpgradeRequest>,
) -> Json<Notice> {
    Json(upgrade_notice(request.plan))
}
