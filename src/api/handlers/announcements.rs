use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    api::{
        extract::{ApiJson, ApiPath},
        middleware::auth::CurrentUser,
        state::AppState,
    },
    domain::{Announcement, CreateAnnouncementRequest, SetPinnedRequest},
    error::Result,
};

pub async fn list(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
) -> Result<Json<Vec<Announcement>>> {
    let announcements = state.service_context.announcement_service.list().await?;

    Ok(Json(announcements))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(request): ApiJson<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<Announcement>)> {
    let announcement = state.service_context.announcement_service
        .create(&current.user, request)
        .await?;

    Ok((StatusCode::CREATED, Json(announcement)))
}

pub async fn set_pinned(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<SetPinnedRequest>,
) -> Result<Json<Announcement>> {
    let announcement = state.service_context.announcement_service
        .set_pinned(&current.user, id, request.pinned)
        .await?;

    Ok(Json(announcement))
}
