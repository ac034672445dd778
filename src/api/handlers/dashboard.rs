use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    auth::policy::{Capabilities, DashboardView},
    domain::Announcement,
    error::Result,
    service::RoleCounts,
};

const RECENT_LIMIT: usize = 5;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub view: DashboardView,
    pub capabilities: Capabilities,
    pub pinned: Vec<Announcement>,
    pub recent: Vec<Announcement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_counts: Option<RoleCounts>,
}

pub async fn summary(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<DashboardSummary>> {
    let ctx = &state.service_context;
    let role = current.user.role;
    let capabilities = Capabilities::for_role(role);

    let (pinned, unpinned): (Vec<_>, Vec<_>) = ctx.announcement_service
        .list()
        .await?
        .into_iter()
        .partition(|a| a.pinned);

    let user_counts = if capabilities.view_analytics {
        Some(ctx.user_service.role_counts().await?)
    } else {
        None
    };

    Ok(Json(DashboardSummary {
        view: DashboardView::for_role(role),
        capabilities,
        pinned,
        recent: unpinned.into_iter().take(RECENT_LIMIT).collect(),
        user_counts,
    }))
}
