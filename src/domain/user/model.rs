//! User domain entity

use chrono::{DateTime, Utc};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRole {
    /// Diner: searches, reviews and books tables
    User,
    /// Lists and manages their own restaurants
    BusinessOwner,
    /// Approves listings and sees analytics
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::BusinessOwner => "BusinessOwner",
            Self::Admin => "Admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "User" => Some(Self::User),
            "BusinessOwner" => Some(Self::BusinessOwner),
            "Admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered account
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to insert a user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// The authenticated caller of a use-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: i32, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admins may act on anything; everyone else only on what they own.
    pub fn owns_or_admin(&self, owner_id: Option<i32>) -> bool {
        self.is_admin() || owner_id == Some(self.user_id)
    }

    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        roles.contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_strings_match_stored_values() {
        for role in [UserRole::User, UserRole::BusinessOwner, UserRole::Admin] {
            assert_eq!(UserRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::from_str("admin"), None);
    }

    #[test]
    fn admin_owns_everything() {
        let admin = Actor::new(1, UserRole::Admin);
        assert!(admin.owns_or_admin(Some(99)));
        assert!(admin.owns_or_admin(None));
    }

    #[test]
    fn non_admin_only_owns_own_records() {
        let diner = Actor::new(5, UserRole::User);
        assert!(diner.owns_or_admin(Some(5)));
        assert!(!diner.owns_or_admin(Some(6)));
        assert!(!diner.owns_or_admin(None));
    }
}
