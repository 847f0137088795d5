use crate::dtos::{ProfilePayload, ProfileResponse};
use crate::middleware::UserId;
use crate::startup::AppState;
use axum::extract::State;
use axum::Json;
use crate::models::BusinessProfile;
use service_core::error::AppError;
use validator::Validate;

pub async fn get_profile(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .store
        .get_profile(&user.0)
        .await?
        .unwrap_or_else(|| BusinessProfile::empty(&user.0));
    Ok(Json(profile.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    user: UserId,
    Json(payload): Json<ProfilePayload>,
) -> Result<Json<ProfileResponse>, AppError> {
    payload.validate()?;

    let current = state
        .store
        .get_profile(&user.0)
        .await?
        .unwrap_or_else(|| BusinessProfile::empty(&user.0));
    let profile = payload.into_profile(&user.0, current);
    state.store.upsert_profile(&profile).await?;
    tracing::info!("Business profile updated");

    Ok(Json(profile.into()))
}
