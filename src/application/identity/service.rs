//! Identity service
//!
//! Registration per role, login per portal, profile and password changes.
//! Emails are trimmed and lower-cased before they reach storage.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AdminSection;
use crate::domain::{
    Actor, DomainError, DomainResult, NewUser, RepositoryProvider, User, UserRole,
};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Issued token plus the user it belongs to
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Which login form the credentials came through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPortal {
    /// Any role may sign in
    Any,
    /// BusinessOwner only
    Business,
    /// Admin only
    Admin,
}

impl LoginPortal {
    fn admits(self, role: UserRole) -> bool {
        match self {
            Self::Any => true,
            Self::Business => role == UserRole::BusinessOwner,
            Self::Admin => role == UserRole::Admin,
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_registration(name: &str, email: &str, password: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation("Name is required".into()));
    }
    validate_email(email)?;
    validate_password(password)
}

fn validate_email(email: &str) -> DomainResult<()> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(DomainError::Validation("Invalid email address".into())),
    }
}

fn validate_password(password: &str) -> DomainResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub struct IdentityService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

impl IdentityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    fn issue(&self, user: User) -> DomainResult<AuthResult> {
        let token = create_token(user.id, &user.email, user.role, &self.jwt_config)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {}", e)))?;

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expires_in_secs(),
            user,
        })
    }

    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> DomainResult<User> {
        validate_registration(name, email, password)?;

        let email = normalize_email(email);
        if self.repos.users().find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("User already exists".into()));
        }

        let password_hash = hash_password(password)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;

        let user = self
            .repos
            .users()
            .create(NewUser {
                name: name.trim().to_string(),
                email,
                password_hash,
                role,
            })
            .await?;

        info!(user_id = user.id, role = %user.role, "New user registered");
        Ok(user)
    }

    // ── Registration ────────────────────────────────────────────

    /// Self-service sign-up for diners and business owners
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> DomainResult<AuthResult> {
        if role == UserRole::Admin {
            return Err(DomainError::Forbidden(
                "Admin accounts can only be created by an admin".into(),
            ));
        }
        let user = self.create_user(name, email, password, role).await?;
        self.issue(user)
    }

    pub async fn register_admin(
        &self,
        actor: &Actor,
        name: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<AuthResult> {
        if !actor.is_admin() {
            return Err(DomainError::Forbidden("Unauthorized".into()));
        }
        let user = self.create_user(name, email, password, UserRole::Admin).await?;
        info!(created_by = actor.user_id, admin_id = user.id, "Admin account created");
        self.issue(user)
    }

    /// Create the configured admin when no user exists yet.
    /// Returns the new admin, or `None` when the table was not empty.
    pub async fn ensure_default_admin(&self, admin: &AdminSection) -> DomainResult<Option<User>> {
        if self.repos.users().count().await? > 0 {
            return Ok(None);
        }
        let user = self
            .create_user(&admin.name, &admin.email, &admin.password, UserRole::Admin)
            .await?;
        warn!(
            email = %user.email,
            "Created default admin account; change its password"
        );
        Ok(Some(user))
    }

    // ── Authentication ──────────────────────────────────────────

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        portal: LoginPortal,
    ) -> DomainResult<AuthResult> {
        let email = normalize_email(email);
        let Some(user) = self.repos.users().find_by_email(&email).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !verify_password(password, &user.password_hash).unwrap_or(false) {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        if !portal.admits(user.role) {
            warn!(user_id = user.id, ?portal, "Login through the wrong portal");
            return Err(DomainError::Forbidden("Unauthorized".into()));
        }

        info!(user_id = user.id, "User logged in");
        self.issue(user)
    }

    // ── Profile ─────────────────────────────────────────────────

    pub async fn me(&self, actor: &Actor) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(actor.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", actor.user_id))
    }

    pub async fn update_profile(&self, actor: &Actor, name: &str, email: &str) -> DomainResult<User> {
        if name.trim().is_empty() {
            return Err(DomainError::Validation("Name is required".into()));
        }
        validate_email(email)?;

        self.repos
            .users()
            .update_profile(actor.user_id, name.trim(), &normalize_email(email))
            .await
    }

    pub async fn change_password(
        &self,
        actor: &Actor,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        validate_password(new_password)?;

        let user = self.me(actor).await?;
        if !verify_password(current_password, &user.password_hash).unwrap_or(false) {
            return Err(DomainError::Unauthorized("Invalid current password".into()));
        }

        let new_hash = hash_password(new_password)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;
        self.repos.users().update_password(user.id, &new_hash).await?;

        info!(user_id = user.id, "Password changed");
        Ok(())
    }
}
