//! JWT issuance and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecuritySection;
use crate::domain::UserRole;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    /// `iss` claim; tokens from another issuer are rejected
    pub issuer: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
            issuer: "dinebook".to_string(),
        }
    }

    pub fn from_security(section: &SecuritySection) -> Self {
        Self::new(section.jwt_secret.clone(), section.jwt_expiration_hours)
    }

    pub fn expires_in_secs(&self) -> i64 {
        self.expiration_hours * 3600
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .field("issuer", &self.issuer)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// User id
    pub id: i32,
    pub email: String,
    /// `User`, `BusinessOwner` or `Admin`
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl TokenClaims {
    pub fn new(user_id: i32, email: &str, role: UserRole, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            id: user_id,
            email: email.to_string(),
            role: role.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    /// `None` for a role string this service never issues
    pub fn user_role(&self) -> Option<UserRole> {
        UserRole::from_str(&self.role)
    }
}

pub fn create_token(
    user_id: i32,
    email: &str,
    role: UserRole,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = TokenClaims::new(user_id, email, role, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Decode `token`, checking signature, expiry and issuer
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig::new("test-secret", 24)
    }

    #[test]
    fn token_round_trips_claims() {
        let cfg = config();
        let token = create_token(42, "owner@example.com", UserRole::BusinessOwner, &cfg).unwrap();
        let claims = verify_token(&token, &cfg).unwrap();

        assert_eq!(claims.id, 42);
        assert_eq!(claims.email, "owner@example.com");
        assert_eq!(claims.user_role(), Some(UserRole::BusinessOwner));
        assert_eq!(claims.iss, "dinebook");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token(1, "a@example.com", UserRole::User, &config()).unwrap();
        let other = JwtConfig::new("another-secret", 24);
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let cfg = config();
        let token = create_token(1, "a@example.com", UserRole::User, &cfg).unwrap();
        let mut other = cfg.clone();
        other.issuer = "someone-else".into();
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let cfg = JwtConfig::new("test-secret", -2);
        let token = create_token(1, "a@example.com", UserRole::User, &cfg).unwrap();
        assert!(verify_token(&token, &cfg).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_token("not.a.jwt", &config()).is_err());
    }
}
