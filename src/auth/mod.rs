use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use chrono::{Duration, Utc};
use cookie::{Cookie, SameSite};
use sqlx::SqlitePool;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::error::{AppError, Result};

pub mod policy;
pub mod session;

use session::SessionStore;

pub const SESSION_COOKIE: &str = "session";

pub struct AuthService {
    session_store: SessionStore,
    session_duration_hours: i64,
    secure_cookies: bool,
    placeholder_hash: OnceCell<String>,
}

impl AuthService {
    pub fn new(pool: SqlitePool, session_duration_hours: i64, secure_cookies: bool) -> Self {
        Self {
            session_store: SessionStore::new(pool),
            session_duration_hours,
            secure_cookies,
            placeholder_hash: OnceCell::new(),
        }
    }

    pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        let argon2 = Argon2::default();

        Ok(argon2.verify_password(password.as_bytes(), &parsed_hash).is_ok())
    }

    /// Hash a password using Argon2. Used when provisioning accounts.
    pub async fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    /// Full argon2 verification for a login whose email matched no account,
    /// so both rejection paths cost the same. Always `false`.
    pub async fn verify_unknown_user(&self, password: &str) -> Result<bool> {
        let placeholder = self.placeholder_hash
            .get_or_try_init(|| async {
                Self::hash_password(&generate_token()).await
            })
            .await?;

        Self::verify_password(password, placeholder).await?;

        Ok(false)
    }

    /// Issues a session for `user_id`. The raw token is only ever handed to
    /// the client.
    pub async fn create_session(&self, user_id: Uuid) -> Result<String> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(self.session_duration_hours);

        self.session_store.insert(user_id, &token, expires_at).await?;

        Ok(token)
    }

    /// User behind a live session token.
    pub async fn validate_session(&self, token: &str) -> Result<Option<Uuid>> {
        self.session_store.resolve(token).await
    }

    pub async fn invalidate_session(&self, token: &str) -> Result<()> {
        self.session_store.revoke(token).await
    }

    pub async fn cleanup_expired_sessions(&self) -> Result<u64> {
        self.session_store.purge_expired().await
    }

    pub fn create_session_cookie(&self, token: &str) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token.to_string()))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(self.secure_cookies)
            .max_age(cookie::time::Duration::hours(self.session_duration_hours))
            .build()
    }

    pub fn create_logout_cookie() -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .max_age(cookie::time::Duration::seconds(0))
            .build()
    }
}

fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
