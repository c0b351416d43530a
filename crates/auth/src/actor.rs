//! The acting user of a league operation

use matchday_common::{Error, Result};
use uuid::Uuid;

/// Who is performing an operation.
///
/// Built by the auth extractors from a validated token, or directly by
/// callers and tests. Every workflow takes it as an explicit argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Option<Uuid>,
    pub roles: Vec<String>,
    admin: bool,
}

impl Actor {
    /// Regular authenticated user
    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            roles: Vec::new(),
            admin: false,
        }
    }

    /// League administrator
    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            roles: vec![matchday_common::config::DEFAULT_ADMIN_ROLE.to_string()],
            admin: true,
        }
    }

    /// Caller without a resolvable identity
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            roles: Vec::new(),
            admin: false,
        }
    }

    /// Build an actor from identity-provider roles
    pub fn with_roles(user_id: Option<Uuid>, roles: Vec<String>, admin_role: &str) -> Self {
        let admin = roles.iter().any(|role| role == admin_role);
        Self {
            user_id,
            roles,
            admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Resolve the actor's user id or fail as unauthorized
    pub fn require_user(&self) -> Result<Uuid> {
        self.user_id
            .ok_or_else(|| Error::Unauthorized("No authenticated user for this request".to_string()))
    }

    /// Coarse role gate for administrative operations
    pub fn require_admin(&self) -> Result<()> {
        if self.admin {
            Ok(())
        } else {
            Err(Error::Unauthorized(
                "This operation requires league administrator rights".to_string(),
            ))
        }
    }
}
