//! Concrete authentication backend
//!
//! Wraps `AuthConfig` and turns a bearer token into an [`Actor`]. Identity
//! itself lives with the external provider, so no database lookups happen here.

use uuid::Uuid;

use crate::actor::Actor;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::jwt::validate_jwt_token;

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<LeagueState> for AuthBackend {
///     fn from_ref(state: &LeagueState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Validate a bearer token and build the acting user from its claims
    pub(crate) fn authenticate_jwt(&self, token: &str) -> Result<Actor, AuthError> {
        let claims = validate_jwt_token(token, &self.config)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            tracing::debug!(sub = %claims.sub, "Token subject is not a UUID");
            AuthError::InvalidUserId
        })?;

        Ok(Actor::with_roles(
            Some(user_id),
            claims.roles,
            &self.config.admin_role,
        ))
    }
}
