use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{
    api::middleware::auth::CurrentUser,
    auth::policy::{Capabilities, DashboardView},
    domain::User,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct CapabilitiesResponse {
    pub view: DashboardView,
    pub capabilities: Capabilities,
}

/// The caller's identity as currently stored.
pub async fn current(Extension(current): Extension<CurrentUser>) -> Json<User> {
    Json(current.user)
}

pub async fn capabilities(Extension(current): Extension<CurrentUser>) -> Json<CapabilitiesResponse> {
    Json(CapabilitiesResponse {
        view: DashboardView::for_role(current.user.role),
        capabilities: Capabilities::for_role(current.user.role),
    })
}
