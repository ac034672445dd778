use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::{extract::ApiJson, state::AppState},
    auth::{AuthService, SESSION_COOKIE},
    domain::User,
    error::{AppError, Result},
};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    req.validate()?;

    let ctx = &state.service_context;

    // Unknown email and wrong password look the same to the caller
    let verified = match ctx.user_repo.password_hash(&req.email).await? {
        Some(hash) => AuthService::verify_password(&req.password, &hash).await?,
        None => ctx.auth_service.verify_unknown_user(&req.password).await?,
    };

    if !verified {
        tracing::info!(email = %req.email, "Rejected login");
        return Err(AppError::Unauthenticated);
    }

    let user = ctx.user_repo
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    let token = ctx.auth_service.create_session(user.id).await?;
    let cookie = ctx.auth_service.create_session_cookie(&token);

    tracing::info!(user_id = %user.id, "User signed in");

    Ok((jar.add(cookie), Json(LoginResponse { user })))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode)> {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE) {
        state.service_context.auth_service
            .invalidate_session(session_cookie.value())
            .await?;
    }

    let jar = jar.add(AuthService::create_logout_cookie());

    Ok((jar, StatusCode::NO_CONTENT))
}
