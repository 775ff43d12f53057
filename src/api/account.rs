/// /api/auth/* endpoints
///
/// The outcome helpers are shared with the RPC surface, which returns the
/// same bodies without the HTTP status.
use crate::{
    account::{
        ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, LoginResponse,
        RefreshTokenRequest, RefreshTokenResponse, RegisterRequest, RegisterResponse,
    },
    api::extract::ApiJson,
    context::AppContext,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

/// Build auth routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/forgot-password", post(forgot_password))
}

async fn login(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<(StatusCode, Json<LoginResponse>)> {
    let (status, body) = login_outcome(&ctx, req).await?;
    Ok((status, Json(body)))
}

async fn register(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let (status, body) = register_outcome(&ctx, req).await?;
    Ok((status, Json(body)))
}

async fn refresh(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<RefreshTokenRequest>,
) -> ApiResult<(StatusCode, Json<RefreshTokenResponse>)> {
    let (status, body) = refresh_outcome(&ctx, req).await?;
    Ok((status, Json(body)))
}

async fn forgot_password(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<ForgotPasswordRequest>,
) -> Json<ForgotPasswordResponse> {
    Json(forgot_password_outcome(&ctx, req))
}

/// Login result: 200 with tokens, or 401 with `success=false`
pub(crate) async fn login_outcome(
    ctx: &AppContext,
    req: LoginRequest,
) -> ApiResult<(StatusCode, LoginResponse)> {
    match ctx.account_manager.login(&req.email, &req.password).await {
        Ok(session) => Ok((StatusCode::OK, LoginResponse::success(session))),
        Err(err @ ApiError::InvalidCredentials) => Ok((
            StatusCode::UNAUTHORIZED,
            LoginResponse::failure(err.public_message()),
        )),
        Err(err) => Err(err),
    }
}

/// Registration result: 201 with the new id, or 400 with `success=false`
/// for invalid input and duplicate emails
pub(crate) async fn register_outcome(
    ctx: &AppContext,
    req: RegisterRequest,
) -> ApiResult<(StatusCode, RegisterResponse)> {
    match ctx.account_manager.register(req).await {
        Ok(user_id) => Ok((
            StatusCode::CREATED,
            RegisterResponse {
                success: true,
                message: "User registered successfully".to_string(),
                user_id: Some(user_id),
            },
        )),
        Err(err @ (ApiError::Validation(_) | ApiError::Conflict(_))) => Ok((
            StatusCode::BAD_REQUEST,
            RegisterResponse {
                success: false,
                message: err.public_message(),
                user_id: None,
            },
        )),
        Err(err) => Err(err),
    }
}

/// Refresh result: 200 with a new access token, or 401 with `success=false`
pub(crate) async fn refresh_outcome(
    ctx: &AppContext,
    req: RefreshTokenRequest,
) -> ApiResult<(StatusCode, RefreshTokenResponse)> {
    match ctx.account_manager.refresh_token(&req.refresh_token).await {
        Ok(access_token) => Ok((
            StatusCode::OK,
            RefreshTokenResponse {
                success: true,
                access_token: Some(access_token),
            },
        )),
        Err(ApiError::Authentication(reason)) => {
            tracing::debug!(%reason, "Token refresh rejected");
            Ok((
                StatusCode::UNAUTHORIZED,
                RefreshTokenResponse {
                    success: false,
                    access_token: None,
                },
            ))
        }
        Err(err) => Err(err),
    }
}

pub(crate) fn forgot_password_outcome(
    ctx: &AppContext,
    req: ForgotPasswordRequest,
) -> ForgotPasswordResponse {
    ForgotPasswordResponse {
        success: true,
        message: ctx.account_manager.forgot_password(&req.email).to_string(),
    }
}
