use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::auth::gate::Shell;
use crate::errors::AppError;
use crate::history::list_history;
use crate::models::usage::GeneratedImage;
use crate::models::user::User;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HistoryScreen {
    pub images: Vec<GeneratedImage>,
}

/// GET /history
pub async fn handle_history(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Shell<HistoryScreen>>, AppError> {
    let images = list_history(state.store.as_ref(), &user).await?;
    Ok(Json(Shell::new(&user, HistoryScreen { images })))
}
