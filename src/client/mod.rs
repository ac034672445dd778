//! Typed client for the dashboard API.
//!
//! Reads are cached per query and refetched after the client's own
//! mutations invalidate them. Mutations never update caches optimistically;
//! the next read goes back to the server.

pub mod cache;
pub mod identity;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    api::handlers::{dashboard::DashboardSummary, session::CapabilitiesResponse},
    domain::{Announcement, User, UserRole},
    error::ErrorKind,
};
use cache::QueryCache;
use identity::IdentityProvider;

#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ClientError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    async fn from_response(response: Response) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            error: String,
            kind: ErrorKind,
        }

        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => Self::new(body.kind, body.error),
            Err(_) => Self::new(kind_for_status(status), format!("HTTP {}", status)),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::new(ErrorKind::Unavailable, err.to_string())
    }
}

fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::UNAUTHORIZED => ErrorKind::Unauthenticated,
        StatusCode::FORBIDDEN => ErrorKind::Unauthorized,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::InvalidInput,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        s if s.is_server_error() => ErrorKind::Unavailable,
        _ => ErrorKind::Internal,
    }
}

pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: String,
}

impl Transport {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }
        Ok(response.json().await?)
    }

    async fn execute_empty(&self, request: RequestBuilder) -> Result<(), ClientError> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }
        Ok(())
    }
}

pub struct DashboardClient {
    transport: Arc<Transport>,
    identity: IdentityProvider,
    announcements: QueryCache<Vec<Announcement>>,
    users: QueryCache<Vec<User>>,
}

impl DashboardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let transport = Arc::new(Transport { http, base_url });

        Self {
            identity: IdentityProvider::new(transport.clone()),
            transport,
            announcements: QueryCache::new(),
            users: QueryCache::new(),
        }
    }

    pub fn identity(&self) -> &IdentityProvider {
        &self.identity
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, ClientError> {
        self.clear_caches().await;
        self.identity.sign_in(email, password).await
    }

    pub async fn sign_out(&self) -> Result<(), ClientError> {
        let result = self.identity.sign_out().await;
        self.clear_caches().await;
        result
    }

    /// Cached announcement feed; fetches on a miss.
    pub async fn announcements(&self) -> Result<Vec<Announcement>, ClientError> {
        if let Some(cached) = self.announcements.get().await {
            return Ok(cached);
        }
        self.refetch_announcements().await
    }

    pub async fn refetch_announcements(&self) -> Result<Vec<Announcement>, ClientError> {
        let ticket = self.announcements.begin().await;
        let list: Vec<Announcement> = self.send(Method::GET, "/announcements", None).await?;
        self.announcements.complete(ticket, list.clone()).await;
        Ok(list)
    }

    pub async fn create_announcement(&self, title: &str, content: &str) -> Result<Announcement, ClientError> {
        let author = self.identity.current_user().await.ok_or_else(|| {
            ClientError::new(ErrorKind::Unauthenticated, "Not signed in")
        })?;

        let body = json!({
            "title": title,
            "content": content,
            "authorId": author.id,
            "authorName": author.name,
        });

        let created = self.send(Method::POST, "/announcements", Some(body)).await?;
        self.announcements.invalidate().await;
        Ok(created)
    }

    pub async fn set_pinned(&self, announcement_id: Uuid, pinned: bool) -> Result<Announcement, ClientError> {
        let path = format!("/announcements/{}", announcement_id);
        let updated = self
            .send(Method::PATCH, &path, Some(json!({ "pinned": pinned })))
            .await?;
        self.announcements.invalidate().await;
        Ok(updated)
    }

    /// Cached user directory; fetches on a miss.
    pub async fn users(&self) -> Result<Vec<User>, ClientError> {
        if let Some(cached) = self.users.get().await {
            return Ok(cached);
        }
        self.refetch_users().await
    }

    pub async fn refetch_users(&self) -> Result<Vec<User>, ClientError> {
        let ticket = self.users.begin().await;
        let list: Vec<User> = self.send(Method::GET, "/users", None).await?;
        self.users.complete(ticket, list.clone()).await;
        Ok(list)
    }

    /// Changes another user's role, then refreshes the local identity.
    ///
    /// An error from the refresh is returned even though the change itself
    /// was applied; the local identity may be stale until the next
    /// successful refresh. Repeating the call is a no-op on the server.
    pub async fn update_role(&self, user_id: Uuid, role: UserRole) -> Result<User, ClientError> {
        let path = format!("/users/{}", user_id);
        let updated = self
            .send(Method::PATCH, &path, Some(json!({ "role": role })))
            .await?;
        self.users.invalidate().await;

        if let Err(e) = self.identity.refresh().await {
            tracing::warn!(user_id = %user_id, "Identity refresh after role change failed: {}", e);
            return Err(e);
        }

        Ok(updated)
    }

    pub async fn capabilities(&self) -> Result<CapabilitiesResponse, ClientError> {
        self.send(Method::GET, "/session/capabilities", None).await
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary, ClientError> {
        self.send(Method::GET, "/dashboard", None).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ClientError> {
        let mut request = self.transport.request(method, path);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let request = self.identity.authorize(request).await?;

        let result = self.transport.execute(request).await;
        if let Err(e) = &result {
            if e.kind == ErrorKind::Unauthenticated {
                self.identity.expire().await;
                self.clear_caches().await;
            }
        }
        result
    }

    async fn clear_caches(&self) {
        self.announcements.invalidate().await;
        self.users.invalidate().await;
    }
}
