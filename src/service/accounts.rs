use crate::db::{NewUser, TempleStorage, User};
use crate::error::TempleError;
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct AdminSetupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl AdminSetupRequest {
    pub fn validate(&self) -> Result<(), TempleError> {
        let username_len = self.username.chars().count();
        if !(4..=20).contains(&username_len) {
            return Err(TempleError::Validation(
                "Username must be between 4 and 20 characters".to_string(),
            ));
        }
        if !looks_like_email(&self.email) {
            return Err(TempleError::Validation("Invalid email address".to_string()));
        }
        if self.password.chars().count() < 6 {
            return Err(TempleError::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }
        if self.password != self.confirm_password {
            return Err(TempleError::Validation("Passwords must match".to_string()));
        }
        Ok(())
    }
}

pub(crate) fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Create the first admin account. Only allowed while none exists.
pub async fn setup_admin(
    storage: &TempleStorage,
    req: AdminSetupRequest,
    now: NaiveDateTime,
) -> Result<User, TempleError> {
    if storage.has_admin_account().await? {
        return Err(TempleError::AlreadyActivated);
    }
    req.validate()?;
    if storage.find_user_by_username(&req.username).await?.is_some() {
        return Err(TempleError::DuplicateKey("Username".to_string()));
    }
    if storage.user_email_taken(&req.email).await? {
        return Err(TempleError::DuplicateKey("Email".to_string()));
    }

    let password_hash = hash_password(req.password).await?;
    let user = storage
        .create_user(
            NewUser {
                username: req.username,
                email: req.email,
                password_hash,
                is_admin: true,
            },
            now,
        )
        .await?;
    info!(username = %user.username, "admin account created; application activated");
    Ok(user)
}

/// Verify a username/password pair against the stored hash.
pub async fn authenticate(storage: &TempleStorage, req: LoginRequest) -> Result<User, TempleError> {
    let Some(user) = storage.find_user_by_username(&req.username).await? else {
        warn!(username = %req.username, "login rejected: unknown user");
        return Err(TempleError::InvalidCredentials);
    };

    let hash = user.password.clone();
    let ok = tokio::task::spawn_blocking(move || bcrypt::verify(req.password, &hash))
        .await
        .map_err(|e| TempleError::Internal(format!("password check task failed: {e}")))??;
    if !ok {
        warn!(username = %user.username, "login rejected: wrong password");
        return Err(TempleError::InvalidCredentials);
    }
    info!(username = %user.username, "login successful");
    Ok(user)
}

async fn hash_password(password: String) -> Result<String, TempleError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| TempleError::Internal(format!("password hash task failed: {e}")))??;
    Ok(hash)
}
