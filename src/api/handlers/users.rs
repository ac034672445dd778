use axum::{
    extract::State,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    api::{
        extract::{ApiJson, ApiPath},
        middleware::auth::CurrentUser,
        state::AppState,
    },
    domain::{UpdateUserRoleRequest, User},
    error::Result,
};

pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<User>>> {
    let users = state.service_context.user_service.list(&current.user).await?;

    Ok(Json(users))
}

pub async fn update_role(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateUserRoleRequest>,
) -> Result<Json<User>> {
    let user = state.service_context.user_service
        .update_role(&current.user, id, request.role)
        .await?;

    Ok(Json(user))
}
