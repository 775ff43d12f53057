/// /api/user/* endpoints
use crate::{
    api::extract::ApiJson,
    auth::AuthContext,
    context::AppContext,
    error::ApiResult,
    profile::{ProfileView, UpdateProfileRequest, UpdateProfileResponse},
};
use axum::{extract::State, routing::get, Json, Router};

/// Build user routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/api/user/profile", get(get_profile).put(update_profile))
}

async fn get_profile(
    State(ctx): State<AppContext>,
    auth: AuthContext,
) -> ApiResult<Json<ProfileView>> {
    let profile = ctx.profiles.get_profile(auth.user_id).await?;
    Ok(Json(profile))
}

async fn update_profile(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<UpdateProfileResponse>> {
    Ok(Json(apply_profile_update(&ctx, &auth, req).await?))
}

pub(crate) async fn apply_profile_update(
    ctx: &AppContext,
    auth: &AuthContext,
    req: UpdateProfileRequest,
) -> ApiResult<UpdateProfileResponse> {
    ctx.profiles
        .update_profile(auth.user_id, req.full_name.as_deref(), req.phone.as_deref())
        .await?;

    tracing::info!(user_id = auth.user_id, email = %auth.email, "Profile updated");


    Ok(UpdateProfileResponse {
        success: true,
        message: "Profile updated successfully".to_string(),
    })
}
