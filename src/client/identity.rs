use std::sync::Arc;

use cookie::Cookie;
use reqwest::{header, RequestBuilder};
use serde_json::json;
use tokio::sync::RwLock;

use crate::{
    api::handlers::auth::LoginResponse,
    auth::{policy::Capabilities, SESSION_COOKIE},
    client::{ClientError, Transport},
    domain::User,
    error::ErrorKind,
};

#[derive(Debug, Clone, PartialEq)]
pub enum IdentityState {
    Anonymous,
    Authenticating,
    Authenticated(User),
}

/// Client-side view of who is signed in.
///
/// `Anonymous -> Authenticating -> Authenticated` on sign-in, back to
/// `Anonymous` on sign-out, on a failed sign-in, or as soon as the server
/// stops recognizing the session.
pub struct IdentityProvider {
    transport: Arc<Transport>,
    state: RwLock<IdentityState>,
    token: RwLock<Option<String>>,
}

impl IdentityProvider {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            transport,
            state: RwLock::new(IdentityState::Anonymous),
            token: RwLock::new(None),
        }
    }

    pub async fn state(&self) -> IdentityState {
        self.state.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        match &*self.state.read().await {
            IdentityState::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }

    /// What the signed-in role may do, for deciding which controls to offer.
    pub async fn capabilities(&self) -> Option<Capabilities> {
        self.current_user()
            .await
            .map(|user| Capabilities::for_role(user.role))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, ClientError> {
        *self.state.write().await = IdentityState::Authenticating;

        match self.login(email, password).await {
            Ok((user, token)) => {
                *self.token.write().await = Some(token);
                *self.state.write().await = IdentityState::Authenticated(user.clone());
                tracing::debug!(user_id = %user.id, "Signed in");
                Ok(user)
            }
            Err(e) => {
                self.expire().await;
                Err(e)
            }
        }
    }

    async fn login(&self, email: &str, password: &str) -> Result<(User, String), ClientError> {
        let response = self.transport
            .request(reqwest::Method::POST, "/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }

        let token = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| Cookie::parse(value).ok())
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| ClientError::new(
                ErrorKind::Unavailable,
                "Login response carried no session cookie",
            ))?;

        let body: LoginResponse = response.json().await?;

        Ok((body.user, token))
    }

    pub async fn sign_out(&self) -> Result<(), ClientError> {
        let token = self.token.read().await.clone();
        let result = match token {
            Some(_) => {
                let request = self.authorize(
                    self.transport.request(reqwest::Method::POST, "/auth/logout"),
                ).await?;
                self.transport.execute_empty(request).await
            }
            None => Ok(()),
        };

        // Local state is dropped even when the server call fails
        self.expire().await;
        result
    }

    /// Re-reads the identity from the server. Call after anything that may
    /// have changed the caller's own attributes.
    pub async fn refresh(&self) -> Result<User, ClientError> {
        let request = self.authorize(
            self.transport.request(reqwest::Method::GET, "/session"),
        ).await?;

        match self.transport.execute::<User>(request).await {
            Ok(user) => {
                *self.state.write().await = IdentityState::Authenticated(user.clone());
                Ok(user)
            }
            Err(e) => {
                if e.kind == ErrorKind::Unauthenticated {
                    self.expire().await;
                }
                Err(e)
            }
        }
    }

    /// Attaches the session cookie, or fails without touching the network
    /// when nobody is signed in.
    pub(crate) async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token.read().await.clone().ok_or_else(|| {
            ClientError::new(ErrorKind::Unauthenticated, "Not signed in")
        })?;

        Ok(request.header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token)))
    }

    pub(crate) async fn expire(&self) {
        *self.token.write().await = None;
        *self.state.write().await = IdentityState::Anonymous;
    }
}
