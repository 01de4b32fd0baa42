use crate::error::{ExpenseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Manager,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Admin => "admin",
        };
        f.write_str(name)
    }
}

/// Trims and lowercases `email`, rejecting anything without exactly one `@`
/// separating non-empty parts.
pub fn normalize_email(email: &str) -> Result<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let mut parts = normalized.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => {
            Ok(normalized)
        }
        _ => Err(ExpenseError::ValidationError(format!(
            "Invalid email address '{}'",
            email.trim()
        ))),
    }
}

/// An account known to the workflow. Authentication happens elsewhere; the
/// engine only sees ids.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct User {
    pub id: u32,
    pub email: String,
    pub role: Role,
    /// Manager responsible for this employee's claims, if assigned.
    pub manager: Option<u32>,
    pub active: bool,
}

impl User {
    pub fn new(id: u32, email: &str, role: Role) -> Result<Self> {
        Ok(Self {
            id,
            email: normalize_email(email)?,
            role,
            manager: None,
            active: true,
        })
    }

    pub fn with_manager(mut self, manager: Option<u32>) -> Self {
        self.manager = manager;
        self
    }

    pub fn is_active_as(&self, role: Role) -> bool {
        self.active && self.role == role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  Alice@Example.COM ").unwrap(),
            "alice@example.com"
        );
        assert!(normalize_email("alice").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("alice@").is_err());
        assert!(normalize_email("a@b@c").is_err());
    }

    #[test]
    fn test_user_roles() {
        let manager = User::new(10, "boss@example.com", Role::Manager).unwrap();
        assert!(manager.is_active_as(Role::Manager));
        assert!(!manager.is_active_as(Role::Admin));

        let mut inactive = manager.clone();
        inactive.active = false;
        assert!(!inactive.is_active_as(Role::Manager));
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Manager).unwrap();
        assert_eq!(json, "\"manager\"");
    }
}
