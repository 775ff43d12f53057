/// RPC surface: one JSON endpoint per method, `POST /rpc/domunity.<Service>/<Method>`
///
/// Domain outcomes (failed login, duplicate email, rejected refresh token)
/// come back as `success=false` bodies with 200. Transport failures such as
/// a missing bearer token or malformed input use the shared error mapping.
use crate::{
    account::{
        ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, LoginResponse,
        RefreshTokenRequest, RefreshTokenResponse, RegisterRequest, RegisterResponse,
    },
    api::{account, contact, extract::ApiJson, health, parse_id, user},
    auth::AuthContext,
    building::{ApartmentList, FinancialReport},
    context::AppContext,
    db::models::Building,
    error::ApiResult,
    profile::{ProfileView, UpdateProfileRequest, UpdateProfileResponse},
};
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

/// Request naming a building by its string id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingRequest {
    pub building_id: String,
}

/// Build RPC routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/rpc/domunity.AuthService/Login", post(login))
        .route("/rpc/domunity.AuthService/Register", post(register))
        .route("/rpc/domunity.AuthService/RefreshToken", post(refresh_token))
        .route("/rpc/domunity.AuthService/ForgotPassword", post(forgot_password))
        .route("/rpc/domunity.UserService/GetProfile", post(get_profile))
        .route("/rpc/domunity.UserService/UpdateProfile", post(update_profile))
        .route("/rpc/domunity.BuildingService/GetBuilding", post(get_building))
        .route("/rpc/domunity.BuildingService/ListApartments", post(list_apartments))
        .route(
            "/rpc/domunity.FinancialService/GetFinancialReport",
            post(get_financial_report),
        )
        .route(
            "/rpc/domunity.ContactService/SendContactForm",
            post(contact::send_contact_form),
        )
        .route("/rpc/domunity.ContactService/RequestOffer", post(contact::request_offer))
        .route(
            "/rpc/domunity.ContactService/RequestPresentation",
            post(contact::request_presentation),
        )
        .route("/rpc/domunity.HealthService/Check", post(health_check))
}

async fn login(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (_, body) = account::login_outcome(&ctx, req).await?;
    Ok(Json(body))
}

async fn register(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    let (_, body) = account::register_outcome(&ctx, req).await?;
    Ok(Json(body))
}

async fn refresh_token(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<RefreshTokenRequest>,
) -> ApiResult<Json<RefreshTokenResponse>> {
    let (_, body) = account::refresh_outcome(&ctx, req).await?;
    Ok(Json(body))
}

async fn forgot_password(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<ForgotPasswordRequest>,
) -> Json<ForgotPasswordResponse> {
    Json(account::forgot_password_outcome(&ctx, req))
}

// The subject comes from the bearer token, never from the request body
async fn get_profile(
    State(ctx): State<AppContext>,
    auth: AuthContext,
) -> ApiResult<Json<ProfileView>> {
    Ok(Json(ctx.profiles.get_profile(auth.user_id).await?))
}

async fn update_profile(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<UpdateProfileResponse>> {
    Ok(Json(user::apply_profile_update(&ctx, &auth, req).await?))
}

async fn get_building(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<BuildingRequest>,
) -> ApiResult<Json<Building>> {
    let building_id = parse_id(&req.building_id, "building")?;
    Ok(Json(ctx.buildings.get_building(building_id).await?))
}

async fn list_apartments(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<BuildingRequest>,
) -> ApiResult<Json<ApartmentList>> {
    let building_id = parse_id(&req.building_id, "building")?;
    let apartments = ctx.buildings.list_apartments(building_id).await?;
    Ok(Json(ApartmentList { apartments }))
}

async fn get_financial_report(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<BuildingRequest>,
) -> ApiResult<Json<FinancialReport>> {
    let building_id = parse_id(&req.building_id, "building")?;
    Ok(Json(ctx.buildings.get_financial_report(building_id).await?))
}

async fn health_check(State(ctx): State<AppContext>) -> Json<health::HealthCheckResponse> {
    Json(health::check(&ctx).await)
}
