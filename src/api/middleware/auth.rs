use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    api::state::AppState,
    auth::SESSION_COOKIE,
    domain::User,
    error::AppError,
};

/// The authenticated caller, loaded fresh for every request so role
/// changes take effect on the next call.
#[derive(Clone)]
pub struct CurrentUser {
    pub user: User,
}

pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session_cookie = jar
        .get(SESSION_COOKIE)
        .ok_or(AppError::Unauthenticated)?;

    let user_id = state.service_context.auth_service
        .validate_session(session_cookie.value())
        .await?
        .ok_or(AppError::Unauthenticated)?;

    // A session can outlive its user row only if the row was removed by hand
    let user = state.service_context.user_service
        .get(user_id)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    request.extensions_mut().insert(CurrentUser { user });

    Ok(next.run(request).await)
}
